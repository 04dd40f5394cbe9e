//! Host-facing SS7 signalling engine (spec §6): one [`Ss7`] value owns an
//! MTP3 link-set and an ISUP call-control engine and exposes them through
//! file descriptors, matching the source's one-`struct-ss7`-per-process
//! shape rather than a socket-abstraction API.
//!
//! Layer crates (`mtp2`, `mtp3`, `isup`, `ss7-core`, `ss7-error`) do the
//! protocol work; this crate is the thinnest possible host seam on top —
//! real `read(2)`/`write(2)` against the fds the host handed it, and the
//! TCP "external MTP2 offload" framing for links whose peer has already
//! terminated MTP2 itself.

pub mod engine;
pub mod event;
pub mod transport;

pub use engine::{PollFlags, Ss7};
pub use event::Ss7Event;
pub use transport::TransportKind;
