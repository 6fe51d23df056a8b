//! Pulse-pattern table for brightness multiplexing.
//!
//! An indicator at level `L` is switched on for exactly `L` of the 31
//! slots of a super-frame. The "on" slots are spread across the frame
//! instead of bunched together, which keeps flicker below what the eye
//! resolves at the scan rate.

/// Number of brightness levels, including fully off.
pub const BRIGHTNESS_STEPS: usize = 32;

/// Highest brightness level.
pub const MAX_LEVEL: u8 = (BRIGHTNESS_STEPS - 1) as u8;

/// Slots per multiplexing super-frame.
pub const PHASE_COLUMNS: u32 = 31;

/// One row per brightness level; bit `n` is the on/off decision for
/// super-frame slot `n`.
static PHASES: [u32; BRIGHTNESS_STEPS] = [
    0b0000000000000000000000000000000, //  0/31 =   0%
    0b0000000000000000000000000000001, //  1/31 =   3%
    0b0000000000000010000000000000001, //  2/31 =   6%
    0b0000000000100000000000000000011, //  3/31 =  10%
    0b0000000000000110000000000000011, //  4/31 =  13%
    0b0000000000011000000000000000111, //  5/31 =  16%
    0b0000000000001110000000000000111, //  6/31 =  19%
    0b0000000000011100000000000001111, //  7/31 =  23%
    0b0000000000011110000000000001111, //  8/31 =  26%
    0b0000000000111100000000000011111, //  9/31 =  29%
    0b0000000000111110000000000011111, // 10/31 =  32%
    0b0000000001111100000000000111111, // 11/31 =  35%
    0b0000000000111111000000000111111, // 12/31 =  39%
    0b0000000001111110000000001111111, // 13/31 =  42%
    0b0000000001111111000000001111111, // 14/31 =  45%
    0b0000000011111110000000011111111, // 15/31 =  48%
    0b0000000111111110000000011111111, // 16/31 =  52%
    0b0000001111111100000000111111111, // 17/31 =  55%
    0b0000001111111110000000111111111, // 18/31 =  58%
    0b0000011111111100000001111111111, // 19/31 =  61%
    0b0000011111111110000001111111111, // 20/31 =  65%
    0b0000011111111110000011111111111, // 21/31 =  68%
    0b0000111111111110000011111111111, // 22/31 =  71%
    0b0000111111111110000111111111111, // 23/31 =  74%
    0b0001111111111110000111111111111, // 24/31 =  77%
    0b0001111111111110001111111111111, // 25/31 =  81%
    0b0011111111111110001111111111111, // 26/31 =  84%
    0b0011111111111110011111111111111, // 27/31 =  87%
    0b0111111111111110011111111111111, // 28/31 =  90%
    0b0111111111111110111111111111111, // 29/31 =  94%
    0b1111111111111110111111111111111, // 30/31 =  97%
    0b1111111111111111111111111111111, // 31/31 = 100%
];

/// On/off decision for an indicator at `level` during scan cycle
/// `counter`.
pub fn is_on(level: u8, counter: u32) -> bool {
    (PHASES[level as usize] >> (counter % PHASE_COLUMNS)) & 1 == 1
}

/// Number of "on" slots in the super-frame at `level`.
pub fn duty(level: u8) -> u32 {
    PHASES[level as usize].count_ones()
}
