//! Bounded single-threaded event queue.
//!
//! A plain ring buffer, stripped of everything a cross-thread channel
//! would need (waiter lists, spinlocks, closed-flag, multi-producer
//! bookkeeping): the host application is the only caller, on the only
//! thread that ever touches the engine.
//!
//! Backs a fixed-capacity event array with an explicit `Resource` error
//! on overflow rather than silently dropping the event.

use std::collections::VecDeque;

use ss7_error::{Kind, Layer, SsError};

/// FIFO ring of pending events, capacity-bounded at construction.
pub struct EventQueue<E> {
    buf: VecDeque<E>,
    capacity: usize,
}

impl<E> EventQueue<E> {
    /// Default capacity, matching the source's `MAX_EVENTS`.
    pub const DEFAULT_CAPACITY: usize = 16;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: VecDeque::with_capacity(capacity), capacity }
    }

    /// Push an event. Fails with `Kind::Resource` if the queue is full —
    /// the caller decides whether that's fatal (it generally isn't for
    /// link-status events, which the source simply drops on overflow).
    pub fn push(&mut self, event: E) -> Result<(), SsError> {
        if self.buf.len() >= self.capacity {
            return Err(SsError::new(Layer::Engine, Kind::Resource, "event queue full"));
        }
        self.buf.push_back(event);
        Ok(())
    }

    /// Pop the oldest pending event, if any.
    pub fn pop(&mut self) -> Option<E> {
        self.buf.pop_front()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.buf.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}
