mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    use blinken_panel::layout::{COLS, SWITCH_ROWS};
    use blinken_panel::{
        ControlId, Effect, LedId, Panel, PanelConfig, PinDriver, ScanState, Scanner,
    };

    type Contacts = Rc<RefCell<HashSet<(u8, u8)>>>;

    /// Scripted pin driver: a column reads low while any driven-low row
    /// has a closed contact to it, mimicking the pulled-up matrix.
    struct MockDriver {
        contacts: Contacts,
        low: HashSet<u8>,
        claim_fails: bool,
        released: Rc<RefCell<bool>>,
    }

    impl MockDriver {
        fn new(contacts: &Contacts) -> Self {
            Self {
                contacts: contacts.clone(),
                low: HashSet::new(),
                claim_fails: false,
                released: Rc::new(RefCell::new(false)),
            }
        }
    }

    impl PinDriver for MockDriver {
        type Error = &'static str;

        fn claim(&mut self) -> Result<(), Self::Error> {
            if self.claim_fails {
                Err("claim failed")
            } else {
                Ok(())
            }
        }

        fn release(&mut self) -> Result<(), Self::Error> {
            *self.released.borrow_mut() = true;
            Ok(())
        }

        fn set_input(&mut self, line: u8) {
            // An input line is high-impedance: it no longer drives low.
            self.low.remove(&line);
        }
        fn set_output(&mut self, _line: u8) {}

        fn set_high(&mut self, line: u8) {
            self.low.remove(&line);
        }

        fn set_low(&mut self, line: u8) {
            self.low.insert(line);
        }

        fn pull_up(&mut self, _line: u8) {}
        fn pull_off(&mut self, _line: u8) {}

        fn read(&mut self, line: u8) -> bool {
            let contacts = self.contacts.borrow();
            let closed = self.low.iter().any(|&row| contacts.contains(&(row, line)));
            !closed
        }

        fn delay_ns(&mut self, _ns: u32) {}
    }

    const TEST_LINE: u8 = 24;
    const LOAD_LINE: u8 = 25;
    const ENABLE_LINE: u8 = 29;
    const KNOBA_ACW_LINE: u8 = 32;
    const KNOBA_CW_LINE: u8 = 33;

    /// Row/column lines of one control-matrix position.
    fn contact(lnum: u8) -> (u8, u8) {
        (
            SWITCH_ROWS[(lnum / 12) as usize],
            COLS[(lnum % 12) as usize],
        )
    }

    /// Rest state of the physical panel: the TEST lever contact is
    /// closed.
    fn resting_contacts() -> Contacts {
        let contacts: Contacts = Rc::new(RefCell::new(HashSet::new()));
        contacts.borrow_mut().insert(contact(TEST_LINE));
        contacts
    }

    #[test]
    fn test_register_read_back() {
        let contacts = resting_contacts();
        let panel = Panel::new(PanelConfig::default());
        let mut scanner = Scanner::new(&panel, MockDriver::new(&contacts));
        scanner.start().unwrap();

        for bit in [0u8, 3, 5] {
            contacts.borrow_mut().insert(contact(bit));
        }
        scanner.cycle();
        assert_eq!(panel.read_register_switches(), 0b10_1001);

        let events = panel.events();
        let mut seen = Vec::new();
        while let Ok(evt) = events.try_receive() {
            assert!(evt.on);
            seen.push(evt.id);
        }
        assert_eq!(
            seen,
            vec![ControlId::sr(0), ControlId::sr(3), ControlId::sr(5)]
        );

        // Releasing a switch clears its bit and emits an off event
        contacts.borrow_mut().remove(&contact(3));
        scanner.cycle();
        assert_eq!(panel.read_register_switches(), 0b10_0001);
        assert_eq!(
            events.try_receive().map(|e| (e.id, e.on)),
            Ok((ControlId::sr(3), false))
        );
    }

    #[test]
    fn test_set_then_clear_light() {
        let contacts = resting_contacts();
        let panel = Panel::new(PanelConfig::default());
        let mut scanner = Scanner::new(&panel, MockDriver::new(&contacts));
        scanner.start().unwrap();

        panel.set_light(LedId::A0, 1.0, Effect::simple(0, 0), &[]);
        scanner.cycle();
        assert_eq!(panel.light_level(LedId::A0), 31);

        panel.clear_lights(0);
        scanner.cycle();
        assert_eq!(panel.light_level(LedId::A0), 0);
    }

    #[test]
    fn test_momentary_and_lever_events() {
        let contacts = resting_contacts();
        let panel = Panel::new(PanelConfig::default());
        let mut scanner = Scanner::new(&panel, MockDriver::new(&contacts));
        scanner.start().unwrap();
        let events = panel.events();

        contacts.borrow_mut().insert(contact(LOAD_LINE));
        scanner.cycle();
        assert_eq!(
            events.try_receive().map(|e| (e.id, e.on)),
            Ok((ControlId::LOAD, true))
        );

        // Momentary controls emit nothing on release
        contacts.borrow_mut().remove(&contact(LOAD_LINE));
        scanner.cycle();
        assert!(events.try_receive().is_err());

        // The two-position lever: pressed is HALT, released is ENABLE
        contacts.borrow_mut().insert(contact(ENABLE_LINE));
        scanner.cycle();
        assert_eq!(
            events.try_receive().map(|e| (e.id, e.on)),
            Ok((ControlId::HALT, true))
        );
        contacts.borrow_mut().remove(&contact(ENABLE_LINE));
        scanner.cycle();
        assert_eq!(
            events.try_receive().map(|e| (e.id, e.on)),
            Ok((ControlId::ENABLE, true))
        );
    }

    #[test]
    fn test_test_lever_rest_inversion() {
        let contacts = resting_contacts();
        let panel = Panel::new(PanelConfig::default());
        let mut scanner = Scanner::new(&panel, MockDriver::new(&contacts));
        scanner.start().unwrap();
        let events = panel.events();

        // Rest position produces no transition
        scanner.cycle();
        assert!(events.try_receive().is_err());

        // Lifting the lever opens the contact: that is the assertion
        contacts.borrow_mut().remove(&contact(TEST_LINE));
        scanner.cycle();
        assert_eq!(
            events.try_receive().map(|e| (e.id, e.on)),
            Ok((ControlId::TEST, true))
        );
    }

    #[test]
    fn test_knob_rotation_events() {
        let contacts = resting_contacts();
        let panel = Panel::new(PanelConfig::default());
        let mut scanner = Scanner::new(&panel, MockDriver::new(&contacts));
        scanner.start().unwrap();
        let events = panel.events();

        // Clockwise detent: acw closes, cw closes, acw opens, cw opens
        contacts.borrow_mut().insert(contact(KNOBA_ACW_LINE));
        scanner.cycle();
        contacts.borrow_mut().insert(contact(KNOBA_CW_LINE));
        scanner.cycle();
        contacts.borrow_mut().remove(&contact(KNOBA_ACW_LINE));
        scanner.cycle();
        contacts.borrow_mut().remove(&contact(KNOBA_CW_LINE));
        scanner.cycle();

        // Exactly one synthetic event for the whole edge train
        assert_eq!(
            events.try_receive().map(|e| (e.id, e.on)),
            Ok((ControlId::KNOBA, true))
        );
        assert!(events.try_receive().is_err());
    }

    #[test]
    fn test_stop_releases_hardware() {
        let contacts = resting_contacts();
        let panel = Panel::new(PanelConfig::default());
        let mut driver = MockDriver::new(&contacts);
        let released = Rc::new(RefCell::new(false));
        driver.released = released.clone();
        let mut scanner = Scanner::new(&panel, driver);
        scanner.start().unwrap();
        assert!(panel.is_running());
        assert_eq!(scanner.state(), ScanState::Running);

        panel.set_light(LedId::RUN, 1.0, Effect::simple(0, 0), &[]);
        panel.stop();
        scanner.run();

        assert_eq!(scanner.state(), ScanState::Stopped);
        assert!(*released.borrow());
        assert!(!panel.is_running());
        // The stop ramped everything off before the final cycle
        assert_eq!(panel.light_level(LedId::RUN), 0);

        // Stopping again is a no-op
        panel.stop();
    }

    #[test]
    fn test_claim_failure_propagates() {
        let contacts = resting_contacts();
        let panel = Panel::new(PanelConfig::default());
        let mut driver = MockDriver::new(&contacts);
        driver.claim_fails = true;
        let mut scanner = Scanner::new(&panel, driver);

        assert!(scanner.start().is_err());
        assert!(!panel.is_running());
        assert_eq!(scanner.state(), ScanState::Initializing);
    }

    #[test]
    fn test_self_calibration_reports_cycle_duration() {
        let contacts = resting_contacts();
        let config = PanelConfig {
            calibration_cycles: 50,
            ..Default::default()
        };
        let panel = Panel::new(config);
        let mut scanner = Scanner::new(&panel, MockDriver::new(&contacts));
        scanner.start().unwrap();
        assert_eq!(panel.cycle_us(), 400);

        for _ in 0..50 {
            scanner.cycle();
        }
        // Mock cycles run in no time at all; the estimate collapses
        // towards the clamp floor
        assert!(panel.cycle_us() < 400);
        assert!(panel.cycle_us() >= 1);
    }

    #[test]
    fn test_brightness_adjust_dims_globally() {
        let contacts = resting_contacts();
        let panel = Panel::new(PanelConfig::default());
        let mut scanner = Scanner::new(&panel, MockDriver::new(&contacts));
        scanner.start().unwrap();

        panel.set_brightness_adjust(0.5);
        panel.set_light(LedId::A0, 1.0, Effect::simple(0, 0), &[]);
        scanner.cycle();
        assert_eq!(panel.light_level(LedId::A0), 16);
    }
}
