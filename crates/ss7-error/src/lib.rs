//! Structured error kinds for the SS7 signalling engine.
//!
//! Mirrors the error-kind taxonomy of the signalling engine: every
//! recoverable error is tagged with which layer detected it and which of
//! the six kinds it falls into, so a host application can match on
//! `(Layer, Kind)` without downcasting into a layer-specific enum. Five of
//! the six (everything but `Config`) come from the wire protocol itself;
//! `Config` covers misuse of the host-facing API.
//!
//! Layer crates (`mtp2`, `mtp3`, `isup`) define their own narrow error
//! enums and convert into [`SsError`] at the boundary; this crate never
//! depends on them.

use core::fmt;

/// Which of the six error kinds an error falls into.
///
/// Recoverable kinds (everything but [`Kind::FatalLink`]) never propagate
/// past the layer that detected them in the engine's own control flow; they
/// are surfaced here purely so a host can log/count them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Truncated SU, unknown message type, unknown mandatory parameter,
    /// out-of-range CIC, bad LI.
    Framing,
    /// Wrong network indicator, wrong DPC, MSU received outside IN_SERVICE.
    Protocol,
    /// Duplicate FSN, sequence gap (triggers a NAK, never fatal).
    Sequence,
    /// Event queue full, scheduler slot exhaustion, call table exhaustion.
    Resource,
    /// Alignment timer expiry or SIOS received: the link returns to IDLE.
    FatalLink,
    /// Misuse of the host-facing API: unknown fd, invalid switch type.
    Config,
}

impl Kind {
    #[inline]
    pub fn is_fatal_to_link(&self) -> bool {
        matches!(self, Kind::FatalLink)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::Framing => "framing",
            Kind::Protocol => "protocol",
            Kind::Sequence => "sequence",
            Kind::Resource => "resource",
            Kind::FatalLink => "fatal-link",
            Kind::Config => "config",
        };
        f.write_str(s)
    }
}

/// Which layer detected the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Mtp2,
    Mtp3,
    Isup,
    Scheduler,
    Engine,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Layer::Mtp2 => "mtp2",
            Layer::Mtp3 => "mtp3",
            Layer::Isup => "isup",
            Layer::Scheduler => "scheduler",
            Layer::Engine => "engine",
        };
        f.write_str(s)
    }
}

/// A structured, layer-tagged error.
///
/// Carries a static description rather than a formatted string in the
/// common case — allocation only happens when `detail` is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsError {
    pub layer: Layer,
    pub kind: Kind,
    pub what: &'static str,
    pub detail: Option<String>,
}

impl SsError {
    pub const fn new(layer: Layer, kind: Kind, what: &'static str) -> Self {
        Self { layer, kind, what, detail: None }
    }

    pub fn with_detail(layer: Layer, kind: Kind, what: &'static str, detail: impl Into<String>) -> Self {
        Self { layer, kind, what, detail: Some(detail.into()) }
    }

    #[inline]
    pub fn is_fatal_to_link(&self) -> bool {
        self.kind.is_fatal_to_link()
    }
}

impl fmt::Display for SsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(d) => write!(f, "[{}:{}] {}: {}", self.layer, self.kind, self.what, d),
            None => write!(f, "[{}:{}] {}", self.layer, self.kind, self.what),
        }
    }
}

impl std::error::Error for SsError {}

pub type SsResult<T> = Result<T, SsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_link_detection() {
        let e = SsError::new(Layer::Mtp2, Kind::FatalLink, "t4 expiry");
        assert!(e.is_fatal_to_link());
        let e2 = SsError::new(Layer::Mtp3, Kind::Protocol, "wrong dpc");
        assert!(!e2.is_fatal_to_link());
    }

    #[test]
    fn display_format() {
        let e = SsError::new(Layer::Isup, Kind::Framing, "truncated parameter");
        assert_eq!(format!("{}", e), "[isup:framing] truncated parameter");

        let e2 = SsError::with_detail(Layer::Mtp3, Kind::Protocol, "dpc mismatch", "got 3 want 2");
        assert_eq!(format!("{}", e2), "[mtp3:protocol] dpc mismatch: got 3 want 2");
    }
}
