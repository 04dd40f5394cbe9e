//! Single-threaded deadline scheduler.
//!
//! A binary min-heap keyed by deadline with lazy cancellation, de-threaded:
//! no `Mutex`, since the engine core never spawns a thread. Arming,
//! cancelling, finding the next deadline, and running due timers are
//! realized as `arm`/(guard `Drop`)/`next_deadline`/`run`.
//!
//! Timer handles are RAII: `arm` returns a [`TimerGuard`] whose `Drop`
//! cancels the timer if it's still pending, replacing a pass-by-pointer
//! int-id handle with an opaque handle whose destructor cancels the timer
//! if still armed. The MTP2/MTP3/ISUP state machines store these guards
//! in `Option` timer fields; overwriting or clearing the field cancels
//! whatever was armed, matching the rule that a state machine leaving a
//! state cancels every timer armed in that state — no explicit
//! cancel-by-id call site is needed, the assignment does it.

use std::cell::RefCell;
use std::collections::{BinaryHeap, HashSet};
use std::rc::{Rc, Weak};
use std::time::Instant;

/// Opaque identity of an armed timer. Not itself cancellable — use the
/// owning [`TimerGuard`] for that — but useful for logging/equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    #[inline]
    pub fn raw(&self) -> u64 {
        self.0
    }
}

struct Entry<T> {
    handle: TimerHandle,
    deadline: Instant,
    payload: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.handle == other.handle
    }
}
impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed: BinaryHeap is a max-heap, we want earliest deadline first.
        match other.deadline.cmp(&self.deadline) {
            std::cmp::Ordering::Equal => other.handle.0.cmp(&self.handle.0),
            ord => ord,
        }
    }
}

/// A fired timer, returned by [`Scheduler::run`].
pub struct Fired<T> {
    pub handle: TimerHandle,
    pub payload: T,
}

/// Deadline-ordered, lazily-cancelling timer wheel.
///
/// `T` is whatever a layer wants to tag a timer with — MTP2 uses a
/// `TimerKind`, MTP3 a `LinkTestTimer`, ISUP an `IsupTimer`. The scheduler
/// itself is agnostic. Used directly by callers that want plain
/// [`TimerHandle`]s (tests, simple cases); layers that want RAII
/// cancellation wrap one in a [`SharedScheduler`].
pub struct Scheduler<T> {
    heap: BinaryHeap<Entry<T>>,
    cancelled: HashSet<TimerHandle>,
    next_handle: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            cancelled: HashSet::new(),
            next_handle: 1,
        }
    }

    /// Arm a new timer for `payload`, firing at `deadline`.
    pub fn arm(&mut self, deadline: Instant, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.heap.push(Entry { handle, deadline, payload });
        handle
    }

    /// Cancel a previously armed timer. Idempotent; returns whether it was
    /// still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.cancelled.insert(handle)
    }

    /// Earliest deadline still pending. An approximate hint (may include
    /// an already-cancelled entry at the front), used only to size a poll
    /// timeout.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|e| e.deadline)
    }

    /// Number of pending (non-cancelled) timers.
    pub fn len(&self) -> usize {
        self.heap.len().saturating_sub(self.cancelled.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pop and return every timer whose deadline is `<= now`, skipping
    /// cancelled entries. Clears the cancelled set once the heap drains.
    pub fn run(&mut self, now: Instant) -> Vec<Fired<T>> {
        let mut fired = Vec::new();
        while let Some(top) = self.heap.peek() {
            if top.deadline > now {
                break;
            }
            let entry = self.heap.pop().expect("peeked Some");
            if self.cancelled.remove(&entry.handle) {
                continue;
            }
            fired.push(Fired { handle: entry.handle, payload: entry.payload });
        }
        if self.heap.is_empty() {
            self.cancelled.clear();
        }
        fired
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared, interior-mutable handle to a [`Scheduler`], so that
/// [`TimerGuard`] can reach back in to cancel on `Drop` without the owning
/// state machine needing `&mut self` at drop time.
///
/// Single-threaded only (`Rc`/`RefCell`), matching spec §5: the core never
/// spawns a thread, so there is no data race to guard against, only the
/// usual single-owner aliasing rules `RefCell` enforces at runtime.
pub struct SharedScheduler<T>(Rc<RefCell<Scheduler<T>>>);

impl<T> SharedScheduler<T> {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Scheduler::new())))
    }

    /// Arm a timer and return an RAII guard. Dropping the guard (or
    /// calling [`TimerGuard::cancel`] explicitly) cancels it if it hasn't
    /// already fired.
    pub fn arm(&self, deadline: Instant, payload: T) -> TimerGuard<T> {
        let handle = self.0.borrow_mut().arm(deadline, payload);
        TimerGuard { scheduler: Rc::downgrade(&self.0), handle, armed: true }
    }

    pub fn run(&self, now: Instant) -> Vec<Fired<T>> {
        self.0.borrow_mut().run(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.0.borrow().next_deadline()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl<T> Clone for SharedScheduler<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Default for SharedScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII handle returned by [`SharedScheduler::arm`]. Cancels its timer on
/// `Drop` unless it has already fired or been explicitly disarmed.
pub struct TimerGuard<T> {
    scheduler: Weak<RefCell<Scheduler<T>>>,
    handle: TimerHandle,
    armed: bool,
}

impl<T> TimerGuard<T> {
    pub fn handle(&self) -> TimerHandle {
        self.handle
    }

    /// Cancel explicitly. Equivalent to dropping the guard, but lets a
    /// caller report whether the timer was still pending.
    pub fn cancel(mut self) -> bool {
        self.do_cancel()
    }

    fn do_cancel(&mut self) -> bool {
        if !self.armed {
            return false;
        }
        self.armed = false;
        match self.scheduler.upgrade() {
            Some(sched) => sched.borrow_mut().cancel(self.handle),
            None => false,
        }
    }
}

impl<T> Drop for TimerGuard<T> {
    fn drop(&mut self) {
        self.do_cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn fires_in_deadline_order() {
        let mut sched = Scheduler::new();
        let now = Instant::now();
        sched.arm(now + Duration::from_millis(30), "c");
        sched.arm(now + Duration::from_millis(10), "a");
        sched.arm(now + Duration::from_millis(20), "b");

        let fired = sched.run(now + Duration::from_millis(50));
        let order: Vec<_> = fired.iter().map(|f| f.payload).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn cancel_suppresses_firing() {
        let mut sched = Scheduler::new();
        let now = Instant::now();
        let h = sched.arm(now + Duration::from_millis(10), "t1");
        assert!(sched.cancel(h));
        assert!(!sched.cancel(h)); // idempotent, already cancelled
        let fired = sched.run(now + Duration::from_millis(20));
        assert!(fired.is_empty());
        assert_eq!(sched.len(), 0);
    }

    #[test]
    fn partial_drain_leaves_later_timers_armed() {
        let mut sched = Scheduler::new();
        let now = Instant::now();
        sched.arm(now + Duration::from_millis(10), 1u32);
        sched.arm(now + Duration::from_millis(1000), 2u32);

        let fired = sched.run(now + Duration::from_millis(15));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].payload, 1);
        assert_eq!(sched.len(), 1);
    }

    #[test]
    fn next_deadline_reports_earliest() {
        let mut sched: Scheduler<u32> = Scheduler::new();
        assert!(sched.next_deadline().is_none());
        let now = Instant::now();
        sched.arm(now + Duration::from_millis(100), 7);
        let d = sched.next_deadline().unwrap();
        assert!(d > now);
    }

    #[test]
    fn guard_drop_cancels_timer() {
        let sched: SharedScheduler<&'static str> = SharedScheduler::new();
        let now = Instant::now();
        {
            let _guard = sched.arm(now + Duration::from_millis(10), "t1");
            assert_eq!(sched.len(), 1);
        }
        // Guard dropped: cancelled before ever firing.
        assert_eq!(sched.len(), 0);
        let fired = sched.run(now + Duration::from_millis(20));
        assert!(fired.is_empty());
    }

    #[test]
    fn overwriting_option_cancels_previous_guard() {
        let sched: SharedScheduler<&'static str> = SharedScheduler::new();
        let now = Instant::now();
        let mut field: Option<TimerGuard<&'static str>> =
            Some(sched.arm(now + Duration::from_millis(10), "first"));
        assert_eq!(sched.len(), 1);

        // Re-arming for the same logical timer field cancels the old one.
        field = Some(sched.arm(now + Duration::from_millis(20), "second"));
        assert_eq!(sched.len(), 1);

        let fired = sched.run(now + Duration::from_millis(30));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].payload, "second");
        drop(field);
    }

    #[test]
    fn explicit_cancel_reports_pending_state() {
        let sched: SharedScheduler<u8> = SharedScheduler::new();
        let now = Instant::now();
        let guard = sched.arm(now + Duration::from_millis(10), 1);
        assert!(guard.cancel());
    }
}
