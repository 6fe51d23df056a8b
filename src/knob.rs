//! Quadrature decoding for the panel's rotary knobs.
//!
//! Each knob has two out-of-phase contacts. A full detent would
//! naively be a sequence of four consecutive edges; matching just the
//! starting edge and its non-adjacent completing edge recognises the
//! same rotation while tolerating bounce on the edges in between.

/// One raw contact transition: which contact moved, and its new level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edge {
    cw: bool,
    asserted: bool,
}

const CW_START: Edge = Edge {
    cw: true,
    asserted: true,
};
const CW_END: Edge = Edge {
    cw: false,
    asserted: false,
};
const ACW_START: Edge = Edge {
    cw: false,
    asserted: true,
};
const ACW_END: Edge = Edge {
    cw: true,
    asserted: false,
};

/// Edge-pair matcher for a single knob.
#[derive(Debug, Clone, Default)]
pub struct KnobDecoder {
    /// The completing edge we expect after a recognised start edge.
    pending: Option<Edge>,
}

impl KnobDecoder {
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Feed one raw transition from either contact of the knob.
    ///
    /// Returns `Some(clockwise)` when a start/completing edge pair is
    /// recognised; every other transition is treated as noise and
    /// ignored.
    pub fn feed(&mut self, cw: bool, asserted: bool) -> Option<bool> {
        let edge = Edge { cw, asserted };
        match edge {
            CW_START => {
                self.pending = Some(CW_END);
                None
            }
            ACW_START => {
                self.pending = Some(ACW_END);
                None
            }
            _ if self.pending == Some(edge) => {
                self.pending = None;
                Some(edge == CW_END)
            }
            _ => None,
        }
    }
}
