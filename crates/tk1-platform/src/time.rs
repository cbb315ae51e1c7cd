//! Virtual-clock primitives shared by every timer-driven device.
//!
//! The device crates never read wall-clock time directly; they hold a
//! [`TimeSource`] backed by a [`HostClock`] trait object, and schedule future
//! work through a [`TimerQueue`]. Tests back the clock with [`FakeHostClock`]
//! and advance it manually instead of sleeping.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

/// A source of monotonically nondecreasing virtual nanoseconds.
pub trait HostClock: Send + Sync {
    fn now_ns(&self) -> u64;
}

/// A clock a test can set directly. Never decreases in production use, but
/// nothing here enforces that — tests are free to rewind if that's useful.
#[derive(Debug, Default)]
pub struct FakeHostClock {
    ns: AtomicU64,
}

impl FakeHostClock {
    pub fn new(initial_ns: u64) -> Self {
        Self {
            ns: AtomicU64::new(initial_ns),
        }
    }

    pub fn set_ns(&self, ns: u64) {
        self.ns.store(ns, AtomicOrdering::SeqCst);
    }
}

impl HostClock for FakeHostClock {
    fn now_ns(&self) -> u64 {
        self.ns.load(AtomicOrdering::SeqCst)
    }
}

/// Thin handle to a shared clock, cheap to clone and pass to device state.
#[derive(Clone)]
pub struct TimeSource {
    clock: Arc<dyn HostClock>,
}

impl TimeSource {
    pub fn new(clock: Arc<dyn HostClock>) -> Self {
        Self { clock }
    }

    pub fn now_ns(&self) -> u64 {
        self.clock.now_ns()
    }
}

/// A due or pending scheduled event popped from a [`TimerQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event<Payload> {
    pub deadline_ns: u64,
    pub payload: Payload,
}

struct QueuedEvent<Payload> {
    deadline_ns: u64,
    seq: u64,
    payload: Payload,
}

impl<Payload> PartialEq for QueuedEvent<Payload> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline_ns == other.deadline_ns && self.seq == other.seq
    }
}
impl<Payload> Eq for QueuedEvent<Payload> {}

impl<Payload> Ord for QueuedEvent<Payload> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so `BinaryHeap`, a max-heap, pops the earliest deadline first.
        other
            .deadline_ns
            .cmp(&self.deadline_ns)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
impl<Payload> PartialOrd for QueuedEvent<Payload> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A generic deadline-ordered queue of device callbacks.
///
/// Nothing here knows what a `Payload` means; the consumer matches on the
/// popped value and dispatches to whatever per-device handler applies. There
/// is no cancellation: a handler that schedules under one condition and
/// disarms under another must re-check its own `running` flag on pop.
pub struct TimerQueue<Payload> {
    heap: BinaryHeap<QueuedEvent<Payload>>,
    seq: u64,
}

impl<Payload> Default for TimerQueue<Payload> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Payload> TimerQueue<Payload> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    pub fn schedule(&mut self, deadline_ns: u64, payload: Payload) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(QueuedEvent {
            deadline_ns,
            seq,
            payload,
        });
    }

    /// Pops and returns the earliest event if its deadline has passed.
    /// Callers loop on this until it returns `None` to drain every event due
    /// at or before `now_ns`.
    pub fn pop_due(&mut self, now_ns: u64) -> Option<Event<Payload>> {
        if self.heap.peek()?.deadline_ns > now_ns {
            return None;
        }
        let ev = self.heap.pop().expect("peek succeeded");
        Some(Event {
            deadline_ns: ev.deadline_ns,
            payload: ev.payload,
        })
    }

    /// The next deadline a host should wake us at, if anything is scheduled.
    pub fn next_deadline_ns(&self) -> Option<u64> {
        self.heap.peek().map(|e| e.deadline_ns)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    enum Payload {
        A,
        B,
    }

    #[test]
    fn pops_in_deadline_order_regardless_of_insertion_order() {
        let mut q = TimerQueue::new();
        q.schedule(300, Payload::B);
        q.schedule(100, Payload::A);
        q.schedule(200, Payload::B);

        let first = q.pop_due(1_000).unwrap();
        assert_eq!((first.deadline_ns, first.payload), (100, Payload::A));
        let second = q.pop_due(1_000).unwrap();
        assert_eq!((second.deadline_ns, second.payload), (200, Payload::B));
        let third = q.pop_due(1_000).unwrap();
        assert_eq!((third.deadline_ns, third.payload), (300, Payload::B));
        assert!(q.pop_due(1_000).is_none());
    }

    #[test]
    fn does_not_pop_future_events() {
        let mut q = TimerQueue::new();
        q.schedule(500, Payload::A);
        assert!(q.pop_due(499).is_none());
        assert_eq!(q.next_deadline_ns(), Some(500));
        assert!(q.pop_due(500).is_some());
    }

    #[test]
    fn fake_clock_reads_back_what_was_set() {
        let clock = FakeHostClock::new(42);
        let time = TimeSource::new(Arc::new(clock));
        assert_eq!(time.now_ns(), 42);
    }
}
