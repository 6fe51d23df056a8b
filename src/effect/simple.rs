//! One-shot ramp to a target brightness.

use super::assert_params;
use crate::envelope::{LightState, ms_to_cycles, scale_linear};
use crate::phases::MAX_LEVEL;

/// One-shot attack or release; `on_ms` is used when switching on,
/// `off_ms` when switching off. Takes no call-time parameters.
///
/// The ramp duration scales with the size of the brightness change, so
/// a small adjustment completes proportionally faster than a full-range
/// sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleEffect {
    on_ms: u32,
    off_ms: u32,
}

impl SimpleEffect {
    pub fn new(on_ms: u32, off_ms: u32) -> Self {
        Self { on_ms, off_ms }
    }

    pub(crate) fn build(&self, light: &mut LightState, level: u8, params: &[f64], cycle_us: u32) {
        assert_params(0, params);
        let delta = u32::from(light.level().abs_diff(level));
        let fx_ms = if level == 0 { self.off_ms } else { self.on_ms };
        let ms = scale_linear(delta, u32::from(MAX_LEVEL), 0, fx_ms);
        let start = light.level();
        light
            .envelope_mut()
            .add_stage(start, level, ms_to_cycles(ms, cycle_us), true);
    }
}
