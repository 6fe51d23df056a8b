//! Periodic strobing with a short fixed on-time.

use super::{LOW_DIVIDER, assert_params, setup_asrs};
use crate::envelope::{LightState, ms_to_cycles};
use crate::scaling::FrequencyScale;

/// Scan cycles the indicator stays on per strobe period, independent of
/// the strobe frequency.
const STROBE_ON_CYCLES: u32 = 60;

/// Periodic strobing; the indicator stays on for a fixed time, the
/// off-time varies with frequency. Takes one `[0, 1]` call-time
/// parameter which is mapped to a frequency by the panel's
/// [`FrequencyScale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrobeEffect {
    on_ms: u32,
    off_ms: u32,
}

impl StrobeEffect {
    pub fn new(on_ms: u32, off_ms: u32) -> Self {
        Self { on_ms, off_ms }
    }

    pub(crate) fn build(
        &self,
        light: &mut LightState,
        level: u8,
        params: &[f64],
        cycle_us: u32,
        frequency: FrequencyScale,
    ) {
        assert_params(1, params);
        let hz = frequency.scale(params[0]);
        if hz == 0.0 {
            let start = light.level();
            light
                .envelope_mut()
                .add_stage(start, 0, ms_to_cycles(self.off_ms, cycle_us), true);
            return;
        }
        let period_ms = libm::round(1000.0 / hz) as i64;
        let strobe_on_ms = i64::from(cycle_us) * i64::from(STROBE_ON_CYCLES) / 1000;
        let rest_ms = period_ms - strobe_on_ms;
        assert!(rest_ms >= 0, "rest_ms={rest_ms}");
        let mut on_ms = i64::from(self.on_ms);
        let mut off_ms = i64::from(self.off_ms);
        if on_ms + off_ms > rest_ms {
            // Shrink both ramps by the same factor until they fit
            let shrinkage = rest_ms as f64 / (on_ms + off_ms) as f64;
            on_ms = libm::floor(on_ms as f64 * shrinkage) as i64;
            off_ms = libm::floor(off_ms as f64 * shrinkage) as i64;
            assert!(
                on_ms + off_ms <= rest_ms,
                "on_ms={on_ms} off_ms={off_ms} rest_ms={rest_ms}"
            );
        }
        let up_ms = on_ms + strobe_on_ms;
        let down_ms = period_ms - up_ms;
        let lo = (u32::from(level) / LOW_DIVIDER) as u8;
        setup_asrs(
            light,
            level,
            lo,
            on_ms as u32,
            off_ms as u32,
            up_ms as u32,
            down_ms as u32,
            cycle_us,
        );
    }
}
