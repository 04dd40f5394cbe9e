//! MTP2: the per-link signal-unit state machine — alignment, proving,
//! and sequenced reliable transport over a host-owned byte transport.

pub mod link;
pub mod lssu;
pub mod timer;
pub mod transport;

pub use link::{Mtp2Event, Mtp2Link, LinkState};
pub use lssu::LssuStatus;
pub use timer::{TimerKind, TimerProfile};
pub use transport::{FdTransport, Transport};
