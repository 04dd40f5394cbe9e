//! Small newtypes for the identifiers that travel between layers, so a
//! raw `u32` CIC can't be handed to a function expecting a point code by
//! accident. No `serde`/`bytes` dependency: persistence is out of scope
//! and these values never need to cross a process boundary on their own.

use std::fmt;

/// Which signalling dialect is in effect. Point-code width, CIC width,
/// routing-label packing, and a handful of ISUP parameter-count
/// exceptions all key off this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchType {
    Itu,
    Ansi,
}

impl SwitchType {
    /// Routing-label point-code field width in bits (14 ITU, 24 ANSI).
    pub fn pc_bits(self) -> u32 {
        match self {
            SwitchType::Itu => 14,
            SwitchType::Ansi => 24,
        }
    }

    /// SLS field width in bits (4 ITU, 8 ANSI).
    pub fn sls_bits(self) -> u32 {
        match self {
            SwitchType::Itu => 4,
            SwitchType::Ansi => 8,
        }
    }

    /// Routing label size on the wire (4 octets ITU, 7 octets ANSI).
    pub fn routing_label_len(self) -> usize {
        match self {
            SwitchType::Itu => 4,
            SwitchType::Ansi => 7,
        }
    }

    /// CIC field width in bits (12 ITU, 14 ANSI).
    pub fn cic_bits(self) -> u32 {
        match self {
            SwitchType::Itu => 12,
            SwitchType::Ansi => 14,
        }
    }

    pub fn pc_mask(self) -> u32 {
        (1u32 << self.pc_bits()) - 1
    }

    pub fn cic_mask(self) -> u16 {
        ((1u32 << self.cic_bits()) - 1) as u16
    }
}

/// A network point code. Width depends on [`SwitchType`]; stored as the
/// widest representation (24 bits, ANSI) and masked on encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointCode(pub u32);

impl PointCode {
    pub const ZERO: PointCode = PointCode(0);

    pub fn masked(self, switch: SwitchType) -> u32 {
        self.0 & switch.pc_mask()
    }
}

impl fmt::Display for PointCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Circuit Identification Code: 12 bits ITU, 14 bits ANSI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cic(pub u16);

impl Cic {
    pub fn masked(self, switch: SwitchType) -> u16 {
        self.0 & switch.cic_mask()
    }
}

impl fmt::Display for Cic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signalling Link Selection: picks among parallel links in a link-set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sls(pub u8);

/// Signalling Link Code: a link's local index within its link-set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slc(pub u8);

/// Key identifying a single call-associated ISUP record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallKey {
    pub dpc: PointCode,
    pub cic: Cic,
}

impl CallKey {
    pub fn new(dpc: PointCode, cic: Cic) -> Self {
        Self { dpc, cic }
    }
}
