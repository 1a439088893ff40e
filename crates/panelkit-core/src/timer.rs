//! Timer system.
//!
//! Provides one-shot and repeating timers that are driven by the loop core.
//! Timers never fire on their own: a processing pass asks the manager for the
//! timers that are due and invokes their callbacks outside of any lock.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, TimerError};
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// The type of timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once after the specified duration.
    OneShot,
    /// Fires repeatedly at the specified interval.
    Repeating,
}

impl TimerKind {
    /// Pick the kind from a "single shot" flag.
    pub fn from_single_shot(single: bool) -> Self {
        if single { Self::OneShot } else { Self::Repeating }
    }
}

/// Callback invoked when a timer expires.
pub type TimerCallback = Arc<dyn Fn() + Send + Sync + 'static>;

struct TimerData {
    next_fire: Instant,
    interval: Duration,
    kind: TimerKind,
    callback: Option<TimerCallback>,
}

/// An entry in the timer queue (min-heap by fire time, then start order).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
    sequence: u64,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time && self.sequence == other.sequence
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .fire_time
            .cmp(&self.fire_time)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// A timer that came due during a processing pass.
pub struct ExpiredTimer {
    /// The timer that fired.
    pub id: TimerId,
    /// Its callback, if one was registered.
    pub callback: Option<TimerCallback>,
}

/// Manages all timers of a loop core.
pub struct TimerManager {
    timers: SlotMap<TimerId, TimerData>,
    queue: BinaryHeap<TimerQueueEntry>,
    sequence: u64,
}

impl TimerManager {
    /// Create a new timer manager.
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
            sequence: 0,
        }
    }

    /// Start a timer that first fires `interval` after `now`.
    pub fn start_at(
        &mut self,
        now: Instant,
        interval: Duration,
        kind: TimerKind,
        callback: Option<TimerCallback>,
    ) -> TimerId {
        let next_fire = now + interval;
        let id = self.timers.insert(TimerData {
            next_fire,
            interval,
            kind,
            callback,
        });
        self.schedule(id, next_fire);
        id
    }

    /// Start a timer relative to the current instant.
    pub fn start(
        &mut self,
        interval: Duration,
        kind: TimerKind,
        callback: Option<TimerCallback>,
    ) -> TimerId {
        self.start_at(Instant::now(), interval, kind, callback)
    }

    fn schedule(&mut self, id: TimerId, fire_time: Instant) {
        self.sequence += 1;
        self.queue.push(TimerQueueEntry {
            id,
            fire_time,
            sequence: self.sequence,
        });
    }

    /// Stop and remove a timer.
    ///
    /// Fails with [`TimerError::InvalidTimerId`] if the timer already fired
    /// (one-shot) or was stopped before.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        match self.timers.remove(id) {
            Some(_) => Ok(()),
            None => Err(TimerError::InvalidTimerId.into()),
        }
    }

    /// Check if a timer is currently active.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Get the duration from `now` until the next timer fires, if any.
    pub fn time_until_next_at(&mut self, now: Instant) -> Option<Duration> {
        // Drop stale entries of stopped timers from the front of the queue.
        while let Some(entry) = self.queue.peek() {
            match self.timers.get(entry.id) {
                Some(timer) if timer.next_fire == entry.fire_time => break,
                _ => {
                    self.queue.pop();
                }
            }
        }

        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    /// Get the duration until the next timer fires, if any.
    pub fn time_until_next(&mut self) -> Option<Duration> {
        self.time_until_next_at(Instant::now())
    }

    /// Take every timer due at `now` off the queue, in expiry order.
    ///
    /// Repeating timers are rescheduled for `now + interval`. One-shot timers
    /// stay registered until [`fire`](Self::fire) is called for them, so a
    /// timer stopped between collection and firing is skipped. Each timer is
    /// due at most once per call, so a zero-interval repeating timer cannot
    /// starve the caller.
    #[tracing::instrument(skip(self), target = "panelkit_core::timer", level = "trace")]
    pub fn collect_due_at(&mut self, now: Instant) -> Vec<TimerId> {
        let mut due = Vec::new();
        while let Some(entry) = self.queue.peek() {
            if entry.fire_time > now {
                break;
            }
            if let Some(entry) = self.queue.pop() {
                due.push(entry);
            }
        }

        let mut ids = Vec::with_capacity(due.len());
        for entry in due {
            let id = entry.id;
            let Some(timer) = self.timers.get_mut(id) else {
                continue;
            };
            // Entry left over from an earlier schedule of the same timer.
            if timer.next_fire != entry.fire_time {
                continue;
            }
            if timer.kind == TimerKind::Repeating {
                let next_fire = now + timer.interval;
                timer.next_fire = next_fire;
                self.schedule(id, next_fire);
            }
            ids.push(id);
        }
        ids
    }

    /// Fire a timer returned by [`collect_due_at`](Self::collect_due_at).
    ///
    /// Returns `None` if the timer was stopped in the meantime. A one-shot
    /// timer is removed here.
    pub fn fire(&mut self, id: TimerId) -> Option<ExpiredTimer> {
        let Some(timer) = self.timers.get(id) else {
            tracing::trace!(target: targets::TIMER, ?id, "skipping stopped timer");
            return None;
        };
        let callback = timer.callback.clone();
        if timer.kind == TimerKind::OneShot {
            self.timers.remove(id);
        }
        tracing::trace!(target: targets::TIMER, ?id, "timer fired");
        Some(ExpiredTimer { id, callback })
    }

    /// Collect and fire every timer due at `now`.
    pub fn process_expired_at(&mut self, now: Instant) -> Vec<ExpiredTimer> {
        self.collect_due_at(now)
            .into_iter()
            .filter_map(|id| self.fire(id))
            .collect()
    }

    /// Collect every timer due now.
    pub fn process_expired(&mut self) -> Vec<ExpiredTimer> {
        self.process_expired_at(Instant::now())
    }

    /// Get the number of active timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }
}

impl Default for TimerManager {
    fn default() -> Self {
        Self::new()
    }
}

/// A thread-safe wrapper around `TimerManager`.
pub(crate) struct SharedTimerManager {
    inner: Mutex<TimerManager>,
}

impl SharedTimerManager {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TimerManager::new()),
        }
    }

    pub fn start(
        &self,
        interval: Duration,
        kind: TimerKind,
        callback: Option<TimerCallback>,
    ) -> TimerId {
        self.inner.lock().start(interval, kind, callback)
    }

    pub fn stop(&self, id: TimerId) -> Result<()> {
        self.inner.lock().stop(id)
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.inner.lock().is_active(id)
    }

    pub fn time_until_next(&self) -> Option<Duration> {
        self.inner.lock().time_until_next()
    }

    pub fn collect_due(&self) -> Vec<TimerId> {
        self.inner.lock().collect_due_at(Instant::now())
    }

    pub fn fire(&self, id: TimerId) -> Option<ExpiredTimer> {
        self.inner.lock().fire(id)
    }

    pub fn active_count(&self) -> usize {
        self.inner.lock().active_count()
    }
}

impl Default for SharedTimerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering as AtomicOrdering};

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_one_shot_fires_once() {
        let mut timers = TimerManager::new();
        let start = Instant::now();
        let id = timers.start_at(start, 10 * MS, TimerKind::OneShot, None);

        assert!(timers.process_expired_at(start + 5 * MS).is_empty());
        assert!(timers.is_active(id));

        let fired = timers.process_expired_at(start + 10 * MS);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, id);
        assert!(!timers.is_active(id));

        assert!(timers.process_expired_at(start + 100 * MS).is_empty());
    }

    #[test]
    fn test_repeating_reschedules() {
        let mut timers = TimerManager::new();
        let start = Instant::now();
        let id = timers.start_at(start, 10 * MS, TimerKind::Repeating, None);

        assert_eq!(timers.process_expired_at(start + 10 * MS).len(), 1);
        assert!(timers.is_active(id));
        assert!(timers.process_expired_at(start + 15 * MS).is_empty());
        assert_eq!(timers.process_expired_at(start + 20 * MS).len(), 1);
    }

    #[test]
    fn test_zero_interval_repeating_fires_once_per_pass() {
        let mut timers = TimerManager::new();
        let start = Instant::now();
        timers.start_at(start, Duration::ZERO, TimerKind::Repeating, None);

        assert_eq!(timers.process_expired_at(start).len(), 1);
        assert_eq!(timers.process_expired_at(start).len(), 1);
        assert_eq!(timers.active_count(), 1);
    }

    #[test]
    fn test_stop_twice_is_an_error() {
        let mut timers = TimerManager::new();
        let id = timers.start(10 * MS, TimerKind::OneShot, None);

        assert!(timers.stop(id).is_ok());
        assert!(!timers.is_active(id));
        assert!(timers.stop(id).is_err());
    }

    #[test]
    fn test_stopped_timer_never_fires() {
        let mut timers = TimerManager::new();
        let start = Instant::now();
        let id = timers.start_at(start, 10 * MS, TimerKind::OneShot, None);
        timers.stop(id).unwrap();

        assert!(timers.process_expired_at(start + 50 * MS).is_empty());
        assert_eq!(timers.time_until_next_at(start), None);
    }

    #[test]
    fn test_expiry_order_follows_fire_time() {
        let mut timers = TimerManager::new();
        let start = Instant::now();
        let late = timers.start_at(start, 20 * MS, TimerKind::OneShot, None);
        let early = timers.start_at(start, 5 * MS, TimerKind::OneShot, None);
        let tie = timers.start_at(start, 5 * MS, TimerKind::OneShot, None);

        let fired: Vec<_> = timers
            .process_expired_at(start + 30 * MS)
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(fired, vec![early, tie, late]);
    }

    #[test]
    fn test_timer_stopped_after_collection_is_skipped() {
        let mut timers = TimerManager::new();
        let start = Instant::now();
        let first = timers.start_at(start, Duration::ZERO, TimerKind::OneShot, None);
        let second = timers.start_at(start, Duration::ZERO, TimerKind::Repeating, None);

        let due = timers.collect_due_at(start);
        assert_eq!(due, vec![first, second]);
        assert!(timers.is_active(first));

        timers.stop(second).unwrap();
        assert!(timers.fire(first).is_some());
        assert!(timers.fire(second).is_none());
        assert!(!timers.is_active(first));
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn test_time_until_next() {
        let mut timers = TimerManager::new();
        let start = Instant::now();
        assert_eq!(timers.time_until_next_at(start), None);

        timers.start_at(start, 10 * MS, TimerKind::OneShot, None);
        assert_eq!(timers.time_until_next_at(start + 4 * MS), Some(6 * MS));
        assert_eq!(timers.time_until_next_at(start + 40 * MS), Some(Duration::ZERO));
    }

    #[test]
    fn test_callback_is_returned() {
        let counter = Arc::new(AtomicI32::new(0));
        let counter_clone = counter.clone();
        let mut timers = TimerManager::new();
        let start = Instant::now();
        timers.start_at(
            start,
            Duration::ZERO,
            TimerKind::OneShot,
            Some(Arc::new(move || {
                counter_clone.fetch_add(1, AtomicOrdering::SeqCst);
            })),
        );

        for expired in timers.process_expired_at(start) {
            if let Some(callback) = expired.callback {
                callback();
            }
        }
        assert_eq!(counter.load(AtomicOrdering::SeqCst), 1);
    }
}
