//! The real-time scan loop.
//!
//! Every cycle drives the six indicator rows in turn, consulting each
//! indicator's envelope for its multiplexing decision, then drives the
//! three control rows and samples the columns, synthesizing events from
//! level transitions. The loop runs on exactly one thread and never
//! yields inside a cycle; timing precision comes from busy-wait delays
//! in the pin driver.

use embassy_time::{Duration, Instant};
use log::{info, warn};

use crate::PinDriver;
use crate::knob::KnobDecoder;
use crate::layout::{COLS, ControlId, LED_ROWS, LINE_COUNT, SWITCH_ROWS, line};
use crate::panel::{Event, Panel};

/// Indicator row on-time per multiplexing slot.
pub const LED_ON_NS: u32 = 50_000;

/// Pause after deasserting an indicator row, so residual charge cannot
/// faintly light the next row.
pub const ANTI_GHOSTING_PAUSE_NS: u32 = 10_000;

/// Settle time between driving a control row low and sampling its
/// columns.
pub const SETTLE_NS: u32 = 500;

/// How long callers should allow after [`Panel::stop`] before assuming
/// the hardware lines have been released.
pub const STOP_GRACE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Initializing,
    Running,
    Stopped,
}

/// The scan loop driver.
///
/// Owns the pin driver and the raw control-line state; everything else
/// is read from and written to the shared [`Panel`].
pub struct Scanner<'a, P: PinDriver> {
    panel: &'a Panel,
    driver: P,
    state: ScanState,
    counter: u32,
    started: Instant,
    lines: [bool; LINE_COUNT],
    knob_a: KnobDecoder,
    knob_d: KnobDecoder,
}

impl<'a, P: PinDriver> Scanner<'a, P> {
    pub fn new(panel: &'a Panel, driver: P) -> Self {
        Self {
            panel,
            driver,
            state: ScanState::Initializing,
            counter: 1,
            started: Instant::from_millis(0),
            lines: [false; LINE_COUNT],
            knob_a: KnobDecoder::new(),
            knob_d: KnobDecoder::new(),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Claim the hardware and configure every matrix line.
    ///
    /// All lines start as inputs: pull-ups on the columns, pulls off on
    /// the rows. Fails if the pin driver cannot claim the device.
    pub fn start(&mut self) -> Result<(), P::Error> {
        self.driver.claim()?;
        for &row in &LED_ROWS {
            self.driver.set_input(row);
            self.driver.set_low(row);
        }
        for &col in &COLS {
            self.driver.set_input(col);
        }
        for &row in &SWITCH_ROWS {
            self.driver.set_input(row);
        }
        for &col in &COLS {
            self.driver.pull_up(col);
        }
        for &row in &LED_ROWS {
            self.driver.pull_off(row);
        }
        for &row in &SWITCH_ROWS {
            self.driver.pull_off(row);
        }
        self.started = Instant::now();
        self.state = ScanState::Running;
        self.panel.mark_running();
        Ok(())
    }

    /// Run cycles until [`Panel::stop`] is observed, then release the
    /// hardware. The stop signal is only checked between full cycles.
    pub fn run(&mut self) {
        loop {
            self.cycle();
            if !self.panel.is_running() {
                break;
            }
        }
        self.shutdown();
    }

    /// One full scan cycle: indicator phase, then control phase.
    pub fn cycle(&mut self) {
        if self.counter == self.panel.calibration_cycles() {
            let elapsed = Instant::now().duration_since(self.started);
            let cycle_us = (elapsed.as_micros() / u64::from(self.counter)).max(1);
            self.panel.set_cycle_us(cycle_us as u32);
            info!("estimated cycle duration: {cycle_us}µs");
        }
        self.scan_indicators();
        self.scan_controls();
        self.counter = self.counter.wrapping_add(1);
    }

    /// Drive each indicator row in turn. A column sinks current (and
    /// the indicator lights) when driven low while its row is asserted.
    fn scan_indicators(&mut self) {
        for &col in &COLS {
            self.driver.set_output(col);
        }
        for (rownum, &row) in LED_ROWS.iter().enumerate() {
            for (colnum, &col) in COLS.iter().enumerate() {
                let index = rownum * COLS.len() + colnum;
                if self.panel.step_light(index, self.counter) {
                    self.driver.set_low(col);
                } else {
                    self.driver.set_high(col);
                }
            }
            self.driver.set_high(row);
            self.driver.set_output(row);
            self.driver.delay_ns(LED_ON_NS);
            self.driver.set_low(row);
            self.driver.delay_ns(ANTI_GHOSTING_PAUSE_NS);
        }
    }

    /// Drive each control row low and sample the columns, diffing
    /// against the previous sample to synthesize events.
    fn scan_controls(&mut self) {
        for &col in &COLS {
            self.driver.set_input(col);
        }
        for (rownum, &row) in SWITCH_ROWS.iter().enumerate() {
            self.driver.set_output(row);
            self.driver.set_low(row);
            self.driver.delay_ns(SETTLE_NS);
            for (colnum, &col) in COLS.iter().enumerate() {
                let lnum = (rownum * COLS.len() + colnum) as u8;
                // A low reading means the contact is closed
                let mut state = !self.driver.read(col);
                if lnum == line::TEST {
                    // Rest position is electrically closed
                    state = !state;
                }
                if state != self.lines[lnum as usize] {
                    self.lines[lnum as usize] = state;
                    if let Some(event) = self.synth_event(lnum, state) {
                        self.panel.push_event(event);
                    }
                }
            }
            self.driver.set_input(row);
        }
    }

    /// Map one raw line transition to a semantic event, if any.
    fn synth_event(&mut self, lnum: u8, state: bool) -> Option<Event> {
        let momentary = |id: ControlId| state.then_some(Event { id, on: true });
        match lnum {
            // Register switches: track the packed position as well as
            // emitting a level event
            line::SR0..=line::SR21 => {
                let bit = lnum - line::SR0;
                self.panel.set_register_bit(bit, state);
                Some(Event {
                    id: ControlId::sr(bit),
                    on: state,
                })
            }
            line::KNOBA_CW | line::KNOBA_ACW | line::KNOBD_CW | line::KNOBD_ACW => {
                self.knob_event(lnum, state)
            }
            line::KNOBA_PUSH => momentary(ControlId::KNOBA_PUSH),
            line::KNOBD_PUSH => momentary(ControlId::KNOBD_PUSH),
            line::TEST => Some(Event {
                id: ControlId::TEST,
                on: state,
            }),
            line::LOAD => momentary(ControlId::LOAD),
            line::EXAM => momentary(ControlId::EXAM),
            line::DEP => momentary(ControlId::DEP),
            line::CONT => momentary(ControlId::CONT),
            // Two-position lever: released is ENABLE, pressed is HALT
            line::ENABLE => {
                let id = if state {
                    ControlId::HALT
                } else {
                    ControlId::ENABLE
                };
                Some(Event { id, on: true })
            }
            line::SINST => {
                let id = if state {
                    ControlId::S_BUS_CYCLE
                } else {
                    ControlId::S_INST
                };
                Some(Event { id, on: true })
            }
            line::START => momentary(ControlId::START),
            _ => None,
        }
    }

    /// Route a knob-line transition through the matching rotation
    /// decoder. Calling this with a non-knob line is a programming
    /// error.
    fn knob_event(&mut self, lnum: u8, state: bool) -> Option<Event> {
        let (id, cw, decoder) = match lnum {
            line::KNOBA_CW => (ControlId::KNOBA, true, &mut self.knob_a),
            line::KNOBA_ACW => (ControlId::KNOBA, false, &mut self.knob_a),
            line::KNOBD_CW => (ControlId::KNOBD, true, &mut self.knob_d),
            line::KNOBD_ACW => (ControlId::KNOBD, false, &mut self.knob_d),
            _ => panic!("not a knob line: {lnum}"),
        };
        decoder
            .feed(cw, state)
            .map(|clockwise| Event { id, on: clockwise })
    }

    /// Park every line as an input and release the hardware.
    fn shutdown(&mut self) {
        for &row in &LED_ROWS {
            self.driver.set_low(row);
            self.driver.set_input(row);
        }
        for &row in &SWITCH_ROWS {
            self.driver.set_input(row);
        }
        for &col in &COLS {
            self.driver.pull_off(col);
            self.driver.set_input(col);
        }
        if let Err(err) = self.driver.release() {
            warn!("hardware release failed: {err:?}");
        }
        self.state = ScanState::Stopped;
        info!("scan loop stopped after {} cycles", self.counter);
    }
}
