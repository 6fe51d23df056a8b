//! The panel context and its control surface.
//!
//! One [`Panel`] holds all shared state: the per-indicator channels,
//! the mutable scaling configuration, the packed register-switch value
//! and the synthesized event queue. It is constructed once, shared by
//! reference between the scan thread and any number of caller threads,
//! and torn down with the process.

use core::cell::RefCell;
use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use critical_section::Mutex;
use log::{debug, info, warn};

use crate::channel::{Channel, Receiver};
use crate::effect::Effect;
use crate::envelope::LightState;
use crate::layout::{self, ControlId, LED_COUNT, LedId};
use crate::phases::{self, MAX_LEVEL};
use crate::scaling::{BrightnessScale, FrequencyScale};

/// Capacity of the synthesized event queue.
///
/// Sized for human interaction rates; on overflow the oldest event is
/// dropped rather than blocking the scan thread.
pub const EVENT_QUEUE_SIZE: usize = 100;

/// Initial per-cycle duration estimate in microseconds, used until the
/// scan loop reports its self-calibration.
pub const DEFAULT_CYCLE_US: u32 = 400;

/// Default length of the self-calibration window, in scan cycles.
pub const DEFAULT_CALIBRATION_CYCLES: u32 = 3000;

/// A synthesized control event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub id: ControlId,
    /// Asserted state; for knob rotations, `true` means clockwise.
    pub on: bool,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let on_off = if self.on { "on" } else { "off" };
        write!(f, "{} ({on_off})", self.id.name())
    }
}

/// Receiver handle for the synthesized event stream.
pub type EventReceiver<'a> = Receiver<'a, Event, EVENT_QUEUE_SIZE>;

/// Construction-time configuration for a [`Panel`].
#[derive(Debug, Clone, Copy)]
pub struct PanelConfig {
    pub brightness: BrightnessScale,
    pub frequency: FrequencyScale,
    /// Multiplicative factor applied after the brightness scaler, for
    /// overall dimming independent of per-indicator requests.
    pub brightness_adjust: f64,
    /// Initial per-cycle duration estimate, replaced by calibration.
    pub cycle_us: u32,
    /// Scan cycles in the self-calibration window.
    pub calibration_cycles: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            brightness: BrightnessScale::default(),
            frequency: FrequencyScale::default(),
            brightness_adjust: 1.0,
            cycle_us: DEFAULT_CYCLE_US,
            calibration_cycles: DEFAULT_CALIBRATION_CYCLES,
        }
    }
}

/// The runtime-mutable part of the configuration.
#[derive(Debug, Clone, Copy)]
struct Scalers {
    brightness: BrightnessScale,
    frequency: FrequencyScale,
    adjust: f64,
}

/// Shared panel state and control surface.
pub struct Panel {
    lights: [Mutex<RefCell<LightState>>; LED_COUNT],
    scalers: Mutex<RefCell<Scalers>>,
    events: Channel<Event, EVENT_QUEUE_SIZE>,
    register: AtomicU32,
    cycle_us: AtomicU32,
    calibration_cycles: u32,
    running: AtomicBool,
}

impl Panel {
    pub fn new(config: PanelConfig) -> Self {
        Self {
            lights: core::array::from_fn(|i| {
                Mutex::new(RefCell::new(LightState::named(layout::LED_NAMES[i])))
            }),
            scalers: Mutex::new(RefCell::new(Scalers {
                brightness: config.brightness,
                frequency: config.frequency,
                adjust: config.brightness_adjust,
            })),
            events: Channel::new(),
            register: AtomicU32::new(0),
            cycle_us: AtomicU32::new(config.cycle_us),
            calibration_cycles: config.calibration_cycles,
            running: AtomicBool::new(false),
        }
    }

    /// Set one indicator's effect.
    ///
    /// `brightness` is a logical `[0, 1]` value; `params` are
    /// interpreted by the effect, which may panic if they are invalid.
    /// If a periodic effect is already playing on the indicator, the
    /// new envelope picks up at the same phase.
    pub fn set_light(&self, id: LedId, brightness: f64, fx: Effect, params: &[f64]) {
        let scalers = critical_section::with(|cs| *self.scalers.borrow(cs).borrow());
        let scaled = scalers.brightness.scale(brightness) * scalers.adjust;
        let level = (libm::round(scaled * f64::from(MAX_LEVEL)) as u8).min(MAX_LEVEL);
        debug!(
            "set {}: brightness={brightness} level={level} fx={fx:?} params={params:?}",
            id.name()
        );
        let cycle_us = self.cycle_us();
        critical_section::with(|cs| {
            let mut light = self.lights[id.index()].borrow(cs).borrow_mut();
            let progress = light.progress();
            fx.build(&mut light, level, params, cycle_us, scalers.frequency);
            light.set_progress(progress);
        });
    }

    /// Switch off all indicators, ramping brightness down over
    /// `off_ms`.
    pub fn clear_lights(&self, off_ms: u32) {
        let fx = Effect::simple(0, off_ms);
        for id in LedId::all() {
            self.set_light(id, 0.0, fx, &[]);
        }
    }

    /// Current discretized brightness level of one indicator.
    pub fn light_level(&self, id: LedId) -> u8 {
        critical_section::with(|cs| self.lights[id.index()].borrow(cs).borrow().level())
    }

    /// Receiver for the synthesized event stream.
    pub fn events(&self) -> EventReceiver<'_> {
        self.events.receiver()
    }

    /// The value indicated by the register switches, one bit per
    /// switch.
    pub fn read_register_switches(&self) -> u32 {
        self.register.load(Ordering::Relaxed)
    }

    pub fn brightness_adjust(&self) -> f64 {
        critical_section::with(|cs| self.scalers.borrow(cs).borrow().adjust)
    }

    /// Set the global brightness level - e.g. in a dark room a low
    /// value keeps the panel readable without being blinding.
    pub fn set_brightness_adjust(&self, adjust: f64) {
        critical_section::with(|cs| self.scalers.borrow(cs).borrow_mut().adjust = adjust);
    }

    /// Replace the logical-to-physical brightness mapping.
    pub fn set_brightness_scale(&self, scale: BrightnessScale) {
        critical_section::with(|cs| self.scalers.borrow(cs).borrow_mut().brightness = scale);
    }

    /// Replace the intensity-to-frequency mapping used by the periodic
    /// effects.
    pub fn set_frequency_scale(&self, scale: FrequencyScale) {
        critical_section::with(|cs| self.scalers.borrow(cs).borrow_mut().frequency = scale);
    }

    /// Signal the scan loop to stop and command all indicators off.
    ///
    /// The loop finishes its current cycle before releasing the
    /// hardware; callers should allow [`crate::STOP_GRACE`] before
    /// assuming the lines are free. Idempotent.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        info!("panel stop requested");
        self.clear_lights(0);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Calibrated (or estimated) scan cycle duration in microseconds.
    pub fn cycle_us(&self) -> u32 {
        self.cycle_us.load(Ordering::Relaxed)
    }

    pub fn calibration_cycles(&self) -> u32 {
        self.calibration_cycles
    }

    pub(crate) fn mark_running(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    pub(crate) fn set_cycle_us(&self, us: u32) {
        self.cycle_us.store(us, Ordering::Relaxed);
    }

    /// Advance one indicator's envelope by a cycle and return its
    /// multiplexing decision for this cycle.
    pub(crate) fn step_light(&self, index: usize, counter: u32) -> bool {
        critical_section::with(|cs| {
            let mut light = self.lights[index].borrow(cs).borrow_mut();
            light.step();
            phases::is_on(light.level(), counter)
        })
    }

    pub(crate) fn push_event(&self, event: Event) {
        if let Some(dropped) = self.events.send(event) {
            warn!("event queue overflow, dropped {dropped}");
        }
    }

    pub(crate) fn set_register_bit(&self, bit: u8, on: bool) {
        let mask = 1 << bit;
        if on {
            self.register.fetch_or(mask, Ordering::Relaxed);
        } else {
            self.register.fetch_and(!mask, Ordering::Relaxed);
        }
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new(PanelConfig::default())
    }
}
