#![no_std]

pub mod channel;
pub mod effect;
pub mod envelope;
pub mod knob;
pub mod layout;
pub mod panel;
pub mod phases;
pub mod scaling;
pub mod scanner;

pub use effect::{Effect, ErrorEffect, FlashEffect, SimpleEffect, StrobeEffect};
pub use envelope::{Envelope, LightState, MAX_STAGES, ms_to_cycles};
pub use knob::KnobDecoder;
pub use layout::{ControlId, LED_COUNT, LedId, REGISTER_SWITCH_COUNT};
pub use panel::{EVENT_QUEUE_SIZE, Event, EventReceiver, Panel, PanelConfig};
pub use scaling::{BrightnessScale, FrequencyScale};
pub use scanner::{STOP_GRACE, ScanState, Scanner};

pub use embassy_time::{Duration, Instant};

/// Abstract pin driver trait
///
/// Implement this trait to support different hardware platforms.
/// The scan loop is generic over this trait and calls it from a single
/// thread only; implementations must support microsecond-scale toggling.
pub trait PinDriver {
    /// Error produced when claiming or releasing the hardware.
    type Error: core::fmt::Debug;

    /// Claim the underlying GPIO device.
    fn claim(&mut self) -> Result<(), Self::Error>;

    /// Release the underlying GPIO device.
    fn release(&mut self) -> Result<(), Self::Error>;

    /// Configure a line as an input.
    fn set_input(&mut self, line: u8);

    /// Configure a line as an output.
    fn set_output(&mut self, line: u8);

    /// Drive a line high.
    fn set_high(&mut self, line: u8);

    /// Drive a line low.
    fn set_low(&mut self, line: u8);

    /// Enable the pull-up resistor on a line.
    fn pull_up(&mut self, line: u8);

    /// Disable the pull resistors on a line.
    fn pull_off(&mut self, line: u8);

    /// Read the electrical level of a line. `true` is high.
    fn read(&mut self, line: u8) -> bool;

    /// Busy-wait for `ns` nanoseconds without yielding.
    fn delay_ns(&mut self, ns: u32);
}
