//! Logical clock and scheduled continuations.
//!
//! The engine never reads wall-clock time. Every timer (bite wait, reaction
//! window, escape reel-in, result display) is a tick number on `SimClock`,
//! so a paused engine stays paused and a replayed tick sequence replays
//! exactly.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Fixed-step simulation clock.
#[derive(Debug, Clone)]
pub struct SimClock {
    tick: u64,
    tick_rate_hz: f64,
}

impl SimClock {
    pub fn new(tick_rate_hz: f32) -> Self {
        Self {
            tick: 0,
            tick_rate_hz: tick_rate_hz as f64,
        }
    }

    /// Step one tick forward and return the new tick number.
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Seconds since the clock started.
    pub fn seconds(&self) -> f64 {
        self.tick as f64 / self.tick_rate_hz
    }

    /// Whole ticks needed for `secs` to elapse, rounded up.
    pub fn ticks_for(&self, secs: f32) -> u64 {
        // The small bias keeps 1.1 * 60 at 66 rather than 67.
        ((secs as f64) * self.tick_rate_hz - 1e-4).ceil().max(0.0) as u64
    }

    /// Tick at which `secs` from now will have elapsed.
    pub fn deadline_after(&self, secs: f32) -> u64 {
        self.tick + self.ticks_for(secs)
    }
}

/// Work the engine has promised to do at a later tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeferredAction {
    /// Finish an escape: reel the line in and return to idle.
    ReelIn,
    /// Drop the displayed result, unless a newer result replaced it.
    ClearResult { generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Deferred {
    fire_at_tick: u64,
    seq: u64,
    action: DeferredAction,
}

/// Min-heap of deferred actions keyed by tick, FIFO among equal ticks.
#[derive(Debug, Default, Clone)]
pub struct DeferredQueue {
    heap: BinaryHeap<Reverse<Deferred>>,
    next_seq: u64,
}

impl DeferredQueue {
    pub fn schedule(&mut self, fire_at_tick: u64, action: DeferredAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Deferred {
            fire_at_tick,
            seq,
            action,
        }));
    }

    /// Pop the next action due at or before `now_tick`.
    pub fn pop_due(&mut self, now_tick: u64) -> Option<DeferredAction> {
        match self.heap.peek() {
            Some(Reverse(next)) if next.fire_at_tick <= now_tick => {
                self.heap.pop().map(|Reverse(deferred)| deferred.action)
            }
            _ => None,
        }
    }

    /// Drop every pending action matching `predicate`.
    pub fn cancel(&mut self, predicate: impl Fn(&DeferredAction) -> bool) {
        self.heap.retain(|Reverse(deferred)| !predicate(&deferred.action));
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, predicate: impl Fn(&DeferredAction) -> bool) -> bool {
        self.heap.iter().any(|Reverse(deferred)| predicate(&deferred.action))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_for_rounds_up_without_float_drift() {
        let clock = SimClock::new(60.0);
        assert_eq!(clock.ticks_for(1.0), 60);
        assert_eq!(clock.ticks_for(1.1), 66);
        assert_eq!(clock.ticks_for(1.5), 90);
        assert_eq!(clock.ticks_for(0.001), 1);
        assert_eq!(clock.ticks_for(0.0), 0);
    }

    #[test]
    fn test_clock_seconds_track_ticks() {
        let mut clock = SimClock::new(60.0);
        for _ in 0..120 {
            clock.advance();
        }
        assert_eq!(clock.tick(), 120);
        assert!((clock.seconds() - 2.0).abs() < 1e-9);
        assert_eq!(clock.deadline_after(1.0), 180);
    }

    #[test]
    fn test_deferred_fires_in_tick_order() {
        let mut queue = DeferredQueue::default();
        queue.schedule(30, DeferredAction::ClearResult { generation: 1 });
        queue.schedule(10, DeferredAction::ReelIn);

        assert_eq!(queue.pop_due(9), None);
        assert_eq!(queue.pop_due(10), Some(DeferredAction::ReelIn));
        assert_eq!(queue.pop_due(29), None);
        assert_eq!(
            queue.pop_due(100),
            Some(DeferredAction::ClearResult { generation: 1 })
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_deferred_same_tick_is_fifo() {
        let mut queue = DeferredQueue::default();
        queue.schedule(5, DeferredAction::ClearResult { generation: 9 });
        queue.schedule(5, DeferredAction::ReelIn);

        assert_eq!(
            queue.pop_due(5),
            Some(DeferredAction::ClearResult { generation: 9 })
        );
        assert_eq!(queue.pop_due(5), Some(DeferredAction::ReelIn));
    }

    #[test]
    fn test_cancel_removes_matching_actions() {
        let mut queue = DeferredQueue::default();
        queue.schedule(5, DeferredAction::ReelIn);
        queue.schedule(6, DeferredAction::ClearResult { generation: 1 });

        queue.cancel(|action| matches!(action, DeferredAction::ReelIn));

        assert_eq!(queue.len(), 1);
        assert!(!queue.contains(|action| matches!(action, DeferredAction::ReelIn)));
        assert_eq!(
            queue.pop_due(6),
            Some(DeferredAction::ClearResult { generation: 1 })
        );
    }
}
