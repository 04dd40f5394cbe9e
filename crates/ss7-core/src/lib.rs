//! Primitives shared by every layer of the SS7 signalling engine: the
//! signalling-unit buffer and header codec, identifier newtypes, the
//! deadline scheduler, the bounded event queue, a circuit-status bitmap,
//! and leveled tracing.
//!
//! Nothing in this crate spawns a thread or takes a lock — spec §5's
//! single-threaded cooperative core starts here.

pub mod bitmap;
pub mod event_queue;
pub mod ids;
pub mod log;
pub mod scheduler;
pub mod su;

pub use bitmap::CircuitStatusMap;
pub use event_queue::EventQueue;
pub use ids::{CallKey, Cic, PointCode, Slc, Sls, SwitchType};
pub use log::{LogLevel, NullTrace, StderrTrace, Trace};
pub use scheduler::{Scheduler, SharedScheduler, TimerGuard, TimerHandle};
pub use su::{SignallingUnit, SuClass, SuHeader, MTP2_LI_MAX, MTP2_SU_HEAD_SIZE, MTP_MAX_SIZE, SIF_MAX_SIZE};
