//! Effect system with compile-time known effect variants
//!
//! All effects are stored in an enum to avoid dynamic dispatch. Each
//! variant is a pure builder: given a target brightness level and its
//! parameters, it populates an indicator's envelope with stages.

mod error_pulse;
mod flash;
mod simple;
mod strobe;

pub use error_pulse::ErrorEffect;
pub use flash::FlashEffect;
pub use simple::SimpleEffect;
pub use strobe::StrobeEffect;

use log::debug;

use crate::envelope::{LightState, ms_to_cycles};
use crate::scaling::FrequencyScale;

/// Denominator for deriving the low level of a periodic effect from its
/// commanded brightness, keeping the effect anchored to the command
/// rather than hard-coding an off level.
pub(crate) const LOW_DIVIDER: u32 = 999;

/// Effect selector - enum containing all possible effects
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// One-shot ramp to the target brightness
    Simple(SimpleEffect),
    /// Periodic flashing with symmetric on/off times
    Flash(FlashEffect),
    /// Periodic strobing with a short fixed on-time
    Strobe(StrobeEffect),
    /// Recognisable pulsating error pattern
    Error(ErrorEffect),
}

impl Effect {
    pub fn simple(on_ms: u32, off_ms: u32) -> Self {
        Self::Simple(SimpleEffect::new(on_ms, off_ms))
    }

    pub fn flash(on_ms: u32, off_ms: u32) -> Self {
        Self::Flash(FlashEffect::new(on_ms, off_ms))
    }

    pub fn strobe(on_ms: u32, off_ms: u32) -> Self {
        Self::Strobe(StrobeEffect::new(on_ms, off_ms))
    }

    pub fn error() -> Self {
        Self::Error(ErrorEffect::new())
    }

    /// Rebuild `light`'s envelope for this effect at the given target
    /// level.
    ///
    /// `params` are effect-specific; a parameter-count mismatch is a
    /// programming error. The cursor is left at stage zero; callers
    /// preserving phase wrap this in a progress save/restore.
    pub fn build(
        &self,
        light: &mut LightState,
        level: u8,
        params: &[f64],
        cycle_us: u32,
        frequency: FrequencyScale,
    ) {
        light.envelope_mut().reset();
        match self {
            Self::Simple(fx) => fx.build(light, level, params, cycle_us),
            Self::Flash(fx) => fx.build(light, level, params, cycle_us, frequency),
            Self::Strobe(fx) => fx.build(light, level, params, cycle_us, frequency),
            Self::Error(fx) => fx.build(light, level, params, cycle_us),
        }
    }
}

pub(crate) fn assert_params(count: usize, params: &[f64]) {
    assert!(
        params.len() == count,
        "expected {count} params, got {}",
        params.len()
    );
}

/// Append an attack-sustain-release-sustain cycle to `light`'s
/// envelope. Zero-length attack/release stages are omitted.
pub(crate) fn setup_asrs(
    light: &mut LightState,
    hi: u8,
    lo: u8,
    on_ms: u32,
    off_ms: u32,
    up_ms: u32,
    down_ms: u32,
    cycle_us: u32,
) {
    debug!(
        "setup_asrs: light={} on_ms={on_ms} off_ms={off_ms} up_ms={up_ms} down_ms={down_ms}",
        light.name()
    );
    let env = light.envelope_mut();
    if on_ms > 0 {
        env.add_stage(lo, hi, ms_to_cycles(on_ms, cycle_us), false); // attack
    }
    env.add_stage(hi, hi, ms_to_cycles(up_ms - on_ms, cycle_us), false); // sustain high
    if off_ms > 0 {
        env.add_stage(hi, lo, ms_to_cycles(off_ms, cycle_us), false); // release
    }
    env.add_stage(lo, lo, ms_to_cycles(down_ms - off_ms, cycle_us), false); // sustain low
}
