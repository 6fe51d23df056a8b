//! Recognisable error pulse.

use super::assert_params;
use crate::envelope::{LightState, ms_to_cycles};

/// Duration of each pulse stage.
const STAGE_MS: u32 = 200;

/// Periodic pulsating envelope: full brightness, cut to off, rise to a
/// quarter, hold. Takes no call-time parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorEffect;

impl ErrorEffect {
    pub fn new() -> Self {
        Self
    }

    pub(crate) fn build(&self, light: &mut LightState, level: u8, params: &[f64], cycle_us: u32) {
        assert_params(0, params);
        let hi = level;
        let lo = hi / 4;
        let cycles = ms_to_cycles(STAGE_MS, cycle_us);
        let env = light.envelope_mut();
        env.add_stage(hi, 0, cycles, false);
        env.add_stage(0, lo, cycles, false);
        env.add_stage(lo, lo, cycles, false);
    }
}
