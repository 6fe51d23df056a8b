mod tests {
    use blinken_panel::{Effect, FrequencyScale, LightState};

    const CYCLE_US: u32 = 1000;

    fn frequency() -> FrequencyScale {
        FrequencyScale::default()
    }

    /// Park the light at a level by playing an instantaneous ramp.
    fn light_at(level: u8) -> LightState {
        let mut light = LightState::default();
        light.envelope_mut().add_stage(0, level, 0, true);
        light.step();
        assert_eq!(light.level(), level);
        light
    }

    #[test]
    fn test_simple_ramp_duration_scales_with_delta() {
        let mut light = LightState::default();
        Effect::simple(3000, 0).build(&mut light, 31, &[], CYCLE_US, frequency());

        // Full-range change uses the full configured duration
        let stage = light.envelope().stages()[0];
        assert!(stage.is_final);
        assert_eq!(stage.cycles, 3000);

        for _ in 0..3001 {
            light.step();
        }
        assert_eq!(light.level(), 31);
        assert_eq!(light.envelope().stage_count(), 0);
    }

    #[test]
    fn test_simple_ramp_no_change_is_instant() {
        let mut light = light_at(31);
        Effect::simple(3000, 0).build(&mut light, 31, &[], CYCLE_US, frequency());
        assert_eq!(light.envelope().stages()[0].cycles, 0);
    }

    #[test]
    fn test_simple_uses_off_duration_towards_zero() {
        let mut light = light_at(31);
        Effect::simple(0, 3000).build(&mut light, 0, &[], CYCLE_US, frequency());
        let stage = light.envelope().stages()[0];
        assert_eq!(stage.cycles, 3000);
        assert_eq!(stage.end, 0);
    }

    #[test]
    fn test_flash_zero_hz_holds_off() {
        let mut light = light_at(31);
        // Default scaler maps 0.0 below the minimum frequency, so 0 Hz
        Effect::flash(0, 0).build(&mut light, 31, &[0.0], CYCLE_US, frequency());

        assert_eq!(light.envelope().stage_count(), 1);
        assert!(!light.envelope().is_periodic());
        light.step();
        assert_eq!(light.level(), 0);
    }

    #[test]
    fn test_flash_builds_symmetric_asrs() {
        let mut light = light_at(31);
        // 1.0 maps to 10 Hz: period 100ms, half-period 50ms.
        // At 100µs per cycle, 1ms is 10 cycles.
        Effect::flash(10, 20).build(&mut light, 31, &[1.0], 100, frequency());

        let stages = light.envelope().stages();
        assert_eq!(stages.len(), 4);
        assert!(stages.iter().all(|s| !s.is_final));
        // attack, sustain high, release, sustain low
        assert_eq!(stages[0].cycles, 100);
        assert_eq!((stages[0].start, stages[0].end), (0, 31));
        assert_eq!(stages[1].cycles, 400);
        assert_eq!(stages[2].cycles, 200);
        assert_eq!((stages[2].start, stages[2].end), (31, 0));
        assert_eq!(stages[3].cycles, 300);
    }

    #[test]
    fn test_flash_clamps_ramps_to_half_period() {
        let mut light = light_at(31);
        // Ramps larger than the 50ms half-period shrink to fit it
        Effect::flash(80, 90).build(&mut light, 31, &[1.0], 100, frequency());

        let stages = light.envelope().stages();
        assert_eq!(stages.len(), 4);
        assert_eq!(stages[0].cycles, 500); // attack = half-period
        assert_eq!(stages[1].cycles, 0); // no sustain left
        assert_eq!(stages[2].cycles, 500);
        assert_eq!(stages[3].cycles, 0);
    }

    #[test]
    fn test_strobe_shrinks_ramps_proportionally() {
        let mut light = light_at(31);
        // 10 Hz: period 100ms; fixed on-time 60 cycles at 500µs = 30ms,
        // so 70ms of rest. on+off = 140ms exceeds it: both halve.
        Effect::strobe(100, 40).build(&mut light, 31, &[1.0], 500, frequency());

        let stages = light.envelope().stages();
        assert_eq!(stages.len(), 4);
        assert_eq!(stages[0].cycles, 100); // attack: 50ms, was 100ms
        assert_eq!(stages[1].cycles, 60); // fixed strobe on-time
        assert_eq!(stages[2].cycles, 40); // release: 20ms, was 40ms
        assert_eq!(stages[3].cycles, 0);
        assert_eq!((stages[0].start, stages[0].end), (0, 31));
    }

    #[test]
    fn test_strobe_zero_hz_holds_off() {
        let mut light = light_at(31);
        Effect::strobe(0, 0).build(&mut light, 31, &[0.0], CYCLE_US, frequency());
        assert!(!light.envelope().is_periodic());
        light.step();
        assert_eq!(light.level(), 0);
    }

    #[test]
    #[should_panic]
    fn test_strobe_impossible_period_panics() {
        let mut light = light_at(31);
        // 40 Hz leaves a 25ms period, shorter than the 60ms fixed
        // on-time at 1000µs per cycle
        let frequency = FrequencyScale::linear(0.5, 40.0, 0.1);
        Effect::strobe(0, 0).build(&mut light, 31, &[1.0], CYCLE_US, frequency);
    }

    #[test]
    fn test_error_pulse_stages() {
        let mut light = light_at(31);
        Effect::error().build(&mut light, 31, &[], CYCLE_US, frequency());

        let stages = light.envelope().stages();
        assert_eq!(stages.len(), 3);
        assert!(stages.iter().all(|s| !s.is_final));
        assert!(stages.iter().all(|s| s.cycles == 200));
        assert_eq!((stages[0].start, stages[0].end), (31, 0));
        assert_eq!((stages[1].start, stages[1].end), (0, 7));
        assert_eq!((stages[2].start, stages[2].end), (7, 7));
    }

    #[test]
    fn test_rebuild_preserves_phase() {
        let mut light = light_at(31);
        Effect::flash(10, 20).build(&mut light, 31, &[1.0], 100, frequency());
        for _ in 0..250 {
            light.step();
        }
        let progress = light.progress();
        assert!(progress > 0.0);

        // Reconfigure mid-flight, as the control surface does
        Effect::flash(10, 20).build(&mut light, 31, &[1.0], 100, frequency());
        light.set_progress(progress);
        assert_eq!(light.progress(), progress);
    }

    #[test]
    #[should_panic]
    fn test_flash_requires_one_param() {
        let mut light = LightState::default();
        Effect::flash(0, 0).build(&mut light, 31, &[], CYCLE_US, frequency());
    }

    #[test]
    #[should_panic]
    fn test_simple_rejects_params() {
        let mut light = LightState::default();
        Effect::simple(0, 0).build(&mut light, 31, &[0.5], CYCLE_US, frequency());
    }
}
