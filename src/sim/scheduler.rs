//! Deferred actions keyed by tick
//!
//! Timers are kept sorted by fire tick (FIFO among equal ticks), so the next
//! one to fire is always at the front.

use serde::{Deserialize, Serialize};

/// A pending action and the tick it fires on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer<A> {
    pub fire_tick: u64,
    pub action: A,
}

/// Time-ordered queue of deferred actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler<A> {
    timers: Vec<Timer<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self { timers: Vec::new() }
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to fire `delay` ticks after `now`
    pub fn schedule(&mut self, now: u64, delay: u64, action: A) {
        let fire_tick = now + delay;
        // After every timer with the same tick, keeping insertion order
        let at = self.timers.partition_point(|t| t.fire_tick <= fire_tick);
        self.timers.insert(at, Timer { fire_tick, action });
    }

    /// Pop the front action if it fires exactly on `now`.
    ///
    /// Call repeatedly until `None`; actions scheduled with zero delay while
    /// draining fire in the same drain. Timers left behind in the past are
    /// dropped.
    pub fn pop_due(&mut self, now: u64) -> Option<A> {
        while let Some(front) = self.timers.first() {
            if front.fire_tick > now {
                return None;
            }
            let timer = self.timers.remove(0);
            if timer.fire_tick == now {
                return Some(timer.action);
            }
            log::warn!(
                "Dropping timer for tick {} at tick {}",
                timer.fire_tick,
                now
            );
        }
        None
    }

    /// Drain every action due on `now`
    pub fn drain_due(&mut self, now: u64) -> Vec<A> {
        let mut due = Vec::new();
        while let Some(action) = self.pop_due(now) {
            due.push(action);
        }
        due
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Tick of the earliest pending timer
    pub fn next_fire_tick(&self) -> Option<u64> {
        self.timers.first().map(|t| t.fire_tick)
    }

    pub fn pending(&self) -> impl Iterator<Item = &Timer<A>> {
        self.timers.iter()
    }
}
