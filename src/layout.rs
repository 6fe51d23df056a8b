//! Identities and physical layout of the panel matrix.
//!
//! Indicator and control positions are fixed by the panel wiring: six
//! indicator rows and three control rows share twelve column lines.

/// Number of indicators on the panel.
pub const LED_COUNT: usize = 72;

/// Number of raw control-matrix lines.
pub const LINE_COUNT: usize = 36;

/// Number of register switches, packed into the register read-back value.
pub const REGISTER_SWITCH_COUNT: usize = 22;

/// BCM line numbers of the indicator rows.
pub const LED_ROWS: [u8; 6] = [20, 21, 22, 23, 24, 25];

/// BCM line numbers of the control rows.
pub const SWITCH_ROWS: [u8; 3] = [16, 17, 18];

/// BCM line numbers of the columns, shared by both matrices.
pub const COLS: [u8; 12] = [26, 27, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];

/// One physical indicator, identified by its position in the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LedId(u8);

macro_rules! led_ids {
    ($($name:ident = $index:expr,)*) => {
        impl LedId {
            $(pub const $name: Self = Self($index);)*
        }
    };
}

led_ids! {
    A0 = 0,
    A1 = 1,
    A2 = 2,
    A3 = 3,
    A4 = 4,
    A5 = 5,
    A6 = 6,
    A7 = 7,
    A8 = 8,
    A9 = 9,
    A10 = 10,
    A11 = 11,
    A12 = 12,
    A13 = 13,
    A14 = 14,
    A15 = 15,
    A16 = 16,
    A17 = 17,
    A18 = 18,
    A19 = 19,
    A20 = 20,
    A21 = 21,
    UNUSED1 = 22,
    UNUSED2 = 23,
    ADDR_22 = 24,
    ADDR_18 = 25,
    ADDR_16 = 26,
    DATA = 27,
    KERNEL = 28,
    SUPER = 29,
    USER = 30,
    MASTER = 31,
    PAUSE = 32,
    RUN = 33,
    ADRS_ERR = 34,
    PAR_ERR = 35,
    D0 = 36,
    D1 = 37,
    D2 = 38,
    D3 = 39,
    D4 = 40,
    D5 = 41,
    D6 = 42,
    D7 = 43,
    D8 = 44,
    D9 = 45,
    D10 = 46,
    D11 = 47,
    D12 = 48,
    D13 = 49,
    D14 = 50,
    D15 = 51,
    PAR_LO = 52,
    PAR_HI = 53,
    USER_D = 54,
    SUPER_D = 55,
    KERNEL_D = 56,
    CONS_PHY = 57,
    DATA_PATHS = 58,
    BUS_REG = 59,
    UNUSED3 = 60,
    UNUSED4 = 61,
    UNUSED5 = 62,
    UNUSED6 = 63,
    UNUSED7 = 64,
    UNUSED8 = 65,
    USER_I = 66,
    SUPER_I = 67,
    KERNEL_I = 68,
    PROG_PHY = 69,
    UADR_FPP_CPU = 70,
    DISPLAY_REGISTER = 71,
}

pub(crate) static LED_NAMES: [&str; LED_COUNT] = [
    "A0",
    "A1",
    "A2",
    "A3",
    "A4",
    "A5",
    "A6",
    "A7",
    "A8",
    "A9",
    "A10",
    "A11",
    "A12",
    "A13",
    "A14",
    "A15",
    "A16",
    "A17",
    "A18",
    "A19",
    "A20",
    "A21",
    "UNUSED1",
    "UNUSED2",
    "ADDR_22",
    "ADDR_18",
    "ADDR_16",
    "DATA",
    "KERNEL",
    "SUPER",
    "USER",
    "MASTER",
    "PAUSE",
    "RUN",
    "ADRS_ERR",
    "PAR_ERR",
    "D0",
    "D1",
    "D2",
    "D3",
    "D4",
    "D5",
    "D6",
    "D7",
    "D8",
    "D9",
    "D10",
    "D11",
    "D12",
    "D13",
    "D14",
    "D15",
    "PAR_LO",
    "PAR_HI",
    "USER_D",
    "SUPER_D",
    "KERNEL_D",
    "CONS_PHY",
    "DATA_PATHS",
    "BUS_REG",
    "UNUSED3",
    "UNUSED4",
    "UNUSED5",
    "UNUSED6",
    "UNUSED7",
    "UNUSED8",
    "USER_I",
    "SUPER_I",
    "KERNEL_I",
    "PROG_PHY",
    "μADR_FPP_CPU",
    "DISPLAY_REGISTER",
];

impl LedId {
    pub const fn from_raw(raw: u8) -> Option<Self> {
        if (raw as usize) < LED_COUNT {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Position of the indicator in the matrix (row-major).
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Stable human-readable name, for diagnostics.
    pub fn name(self) -> &'static str {
        LED_NAMES[self.0 as usize]
    }

    pub fn by_name(name: &str) -> Option<Self> {
        LED_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| Self(i as u8))
    }

    /// Iterate over every indicator on the panel.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..LED_COUNT as u8).map(Self)
    }
}

/// A synthesized control identity, as carried by [`crate::Event`].
///
/// These are semantic identities, not raw matrix lines: a single
/// two-position lever maps to two identities (ENABLE/HALT), and each
/// rotary knob maps to one identity whose event state is the rotation
/// direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ControlId(u8);

const SR_BASE: u8 = 14;

impl ControlId {
    pub const KNOBA_PUSH: Self = Self(0);
    pub const KNOBD_PUSH: Self = Self(1);
    pub const TEST: Self = Self(2);
    pub const LOAD: Self = Self(3);
    pub const EXAM: Self = Self(4);
    pub const DEP: Self = Self(5);
    pub const CONT: Self = Self(6);
    pub const ENABLE: Self = Self(7);
    pub const HALT: Self = Self(8);
    pub const S_INST: Self = Self(9);
    pub const S_BUS_CYCLE: Self = Self(10);
    pub const START: Self = Self(11);
    /// Address knob rotation; event state `true` means clockwise.
    pub const KNOBA: Self = Self(12);
    /// Data knob rotation; event state `true` means clockwise.
    pub const KNOBD: Self = Self(13);

    /// Register switch identity for one bit position.
    pub const fn sr(bit: u8) -> Self {
        assert!((bit as usize) < REGISTER_SWITCH_COUNT);
        Self(SR_BASE + bit)
    }

    pub fn name(self) -> &'static str {
        CONTROL_NAMES[self.0 as usize]
    }
}

static CONTROL_NAMES: [&str; 36] = [
    "KNOBA_PUSH",
    "KNOBD_PUSH",
    "TEST",
    "LOAD",
    "EXAM",
    "DEP",
    "CONT",
    "ENABLE",
    "HALT",
    "S_INST",
    "S_BUS_CYCLE",
    "START",
    "KNOBA",
    "KNOBD",
    "SR0",
    "SR1",
    "SR2",
    "SR3",
    "SR4",
    "SR5",
    "SR6",
    "SR7",
    "SR8",
    "SR9",
    "SR10",
    "SR11",
    "SR12",
    "SR13",
    "SR14",
    "SR15",
    "SR16",
    "SR17",
    "SR18",
    "SR19",
    "SR20",
    "SR21",
];

/// Raw control-matrix line positions (`row * COLS.len() + column`).
pub(crate) mod line {
    pub(crate) const SR0: u8 = 0;
    pub(crate) const SR21: u8 = 21;
    pub(crate) const KNOBA_PUSH: u8 = 22;
    pub(crate) const KNOBD_PUSH: u8 = 23;
    pub(crate) const TEST: u8 = 24;
    pub(crate) const LOAD: u8 = 25;
    pub(crate) const EXAM: u8 = 26;
    pub(crate) const DEP: u8 = 27;
    pub(crate) const CONT: u8 = 28;
    pub(crate) const ENABLE: u8 = 29;
    pub(crate) const SINST: u8 = 30;
    pub(crate) const START: u8 = 31;
    pub(crate) const KNOBA_ACW: u8 = 32;
    pub(crate) const KNOBA_CW: u8 = 33;
    pub(crate) const KNOBD_ACW: u8 = 34;
    pub(crate) const KNOBD_CW: u8 = 35;
}
