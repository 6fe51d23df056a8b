//! Brightness envelopes.
//!
//! An envelope describes the evolution of an indicator's brightness as
//! a short sequence of linear stages, advanced by exactly one discrete
//! step per scan cycle. One-shot effects collapse to a single final
//! stage; periodic effects cycle through their stages forever.

use heapless::Vec;
use log::debug;

/// Stage capacity of an envelope.
pub const MAX_STAGES: usize = 4;

/// A linear progression between two brightness levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stage {
    /// Duration of the stage, in scan cycles.
    pub cycles: u32,
    /// Initial brightness level.
    pub start: u8,
    /// Final brightness level.
    pub end: u8,
    /// Cycles between brightness increments, 0 when `start == end`.
    pub step_cycles: u32,
    /// Once consumed, brightness freezes on `end` forever.
    pub is_final: bool,
}

/// An ordered sequence of stages plus a playback cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Envelope {
    stages: Vec<Stage, MAX_STAGES>,
    /// Position in the current stage, in cycles.
    offset: u32,
    /// Index of the current stage.
    index: usize,
}

impl Envelope {
    pub const fn new() -> Self {
        Self {
            stages: Vec::new(),
            offset: 0,
            index: 0,
        }
    }

    /// Clear all stages and reset the cursor.
    pub fn reset(&mut self) {
        self.stages.clear();
        self.offset = 0;
        self.index = 0;
    }

    /// A periodic envelope repeats forever; one-shot envelopes hold a
    /// single final stage.
    pub fn is_periodic(&self) -> bool {
        self.stages.len() > 1
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Append a stage running from `start` to `end` over `cycles` scan
    /// cycles.
    ///
    /// When the duration does not allow at least one cycle per level of
    /// brightness change, the stage degrades to an instantaneous jump
    /// to `end`. Exceeding the stage capacity is a programming error.
    pub fn add_stage(&mut self, start: u8, end: u8, cycles: u32, is_final: bool) {
        debug!("add_stage: {start}->{end} cycles={cycles} final={is_final}");
        let mut cycles = cycles;
        let mut start = start;
        let mut step_cycles = 0;
        if start != end {
            let delta = u32::from(start.abs_diff(end));
            step_cycles = cycles / delta;
            if step_cycles == 0 || step_cycles * delta > cycles {
                // No time for a gradual change
                cycles = 0;
                step_cycles = 0;
                start = end;
            }
        }
        self.stages
            .push(Stage {
                cycles,
                start,
                end,
                step_cycles,
                is_final,
            })
            .expect("too many stages on envelope");
    }
}

/// Current brightness of one indicator, and its envelope.
///
/// Channel identity is fixed at panel construction; the name is kept
/// for diagnostics only.
#[derive(Debug, Clone, Default)]
pub struct LightState {
    level: u8,
    env: Envelope,
    name: &'static str,
}

impl LightState {
    pub(crate) const fn named(name: &'static str) -> Self {
        Self {
            level: 0,
            env: Envelope::new(),
            name,
        }
    }

    /// Current discretized brightness level, `0..=31`.
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn envelope(&self) -> &Envelope {
        &self.env
    }

    /// Direct envelope access, for building custom effects.
    pub fn envelope_mut(&mut self) -> &mut Envelope {
        &mut self.env
    }

    /// Advance by one scan cycle through the envelope and update the
    /// brightness level.
    pub fn step(&mut self) {
        let env = &mut self.env;
        let Some(&stage) = env.stages.get(env.index) else {
            return; // fixed brightness
        };
        if env.offset == stage.cycles {
            if stage.is_final {
                // Remove all stages and remain forever on the target
                self.level = stage.end;
                env.reset();
            } else {
                env.index = (env.index + 1) % env.stages.len();
                env.offset = 0;
                self.level = env.stages[env.index].start;
            }
        } else {
            if stage.step_cycles != 0 && env.offset % stage.step_cycles == 0 {
                if self.level < stage.end {
                    self.level += 1;
                } else if self.level > stage.end {
                    self.level -= 1;
                }
            }
            env.offset += 1;
        }
    }

    /// A `[0, 1]` cursor indicating progress through a periodic
    /// envelope; one-shot envelopes report 0.
    ///
    /// Rebuilding an envelope mid-flight would otherwise restart it
    /// from stage zero on every reconfiguration, producing a jarring
    /// visual stutter at reconfiguration rate. Saving and restoring the
    /// fractional position preserves the phase instead.
    pub fn progress(&self) -> f64 {
        let env = &self.env;
        if !env.is_periodic() {
            return 0.0;
        }
        let mut total: u32 = 0;
        let mut elapsed: u32 = 0;
        for (i, stage) in env.stages.iter().enumerate() {
            if i < env.index {
                elapsed += stage.cycles;
            } else if i == env.index {
                elapsed += env.offset;
            }
            total += stage.cycles;
        }
        if total == 0 {
            return 0.0;
        }
        f64::from(elapsed) / f64::from(total)
    }

    /// Reposition the cursor at `pct` through the envelope and set the
    /// interpolated brightness for that position.
    pub fn set_progress(&mut self, pct: f64) {
        if !self.env.is_periodic() {
            if let Some(stage) = self.env.stages.first() {
                self.level = stage.start;
            }
            return;
        }
        let total: u32 = self.env.stages.iter().map(|s| s.cycles).sum();
        let target = libm::round(pct * f64::from(total)) as u32;
        let mut sofar: u32 = 0;
        for (i, &stage) in self.env.stages.iter().enumerate() {
            if target < sofar + stage.cycles {
                self.env.index = i;
                self.env.offset = target - sofar;
                self.level = scale_linear(
                    target - sofar,
                    stage.cycles,
                    u32::from(stage.start),
                    u32::from(stage.end),
                ) as u8;
                return;
            }
            sofar += stage.cycles;
        }
        // A saved progress of exactly 1 lands on the tail stage boundary.
        let last = self.env.stages.len() - 1;
        let tail = self.env.stages[last];
        self.env.index = last;
        self.env.offset = tail.cycles;
        self.level = tail.end;
    }
}

/// Convert a duration in milliseconds to scan cycles, given the
/// calibrated cycle duration in microseconds.
pub fn ms_to_cycles(ms: u32, cycle_us: u32) -> u32 {
    assert!(cycle_us > 0, "cycle duration must be nonzero");
    libm::round(f64::from(ms) * 1000.0 / f64::from(cycle_us)) as u32
}

/// Linear scaling between input and output ranges, rounded to nearest.
pub(crate) fn scale_linear(val: u32, max: u32, lo: u32, hi: u32) -> u32 {
    if max == 0 || lo == hi {
        return lo;
    }
    let frac = f64::from(val) / f64::from(max);
    libm::round(f64::from(lo) + frac * (f64::from(hi) - f64::from(lo))) as u32
}
