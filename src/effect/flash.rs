//! Periodic flashing with symmetric duty cycle.

use super::{LOW_DIVIDER, assert_params, setup_asrs};
use crate::envelope::{LightState, ms_to_cycles};
use crate::scaling::FrequencyScale;

/// Periodic flashing; the indicator stays on and off for the same
/// amount of time. Takes one `[0, 1]` call-time parameter which is
/// mapped to a frequency by the panel's [`FrequencyScale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashEffect {
    on_ms: u32,
    off_ms: u32,
}

impl FlashEffect {
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
        let mut on_ms = self.on_ms;
        let mut off_ms = self.off_ms;
        if hz == 0.0 {
            // Below the useful band: hold off instead of flashing
            let start = light.level();
            light
                .envelope_mut()
                .add_stage(start, 0, ms_to_cycles(off_ms, cycle_us), true);
            return;
        }
        let period_ms = libm::round(1000.0 / hz) as u32;
        assert!(period_ms >= 2, "period_ms={period_ms}");
        let down_ms = period_ms / 2;
        let up_ms = down_ms;
        if off_ms > down_ms {
            off_ms = down_ms;
        }
        if on_ms > up_ms {
            on_ms = up_ms;
        }
        let lo = (u32::from(level) / LOW_DIVIDER) as u8;
        setup_asrs(light, level, lo, on_ms, off_ms, up_ms, down_ms, cycle_us);
    }
}
