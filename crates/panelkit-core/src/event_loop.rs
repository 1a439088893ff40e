//! The cooperative loop core shared by every application backend.
//!
//! [`LoopCore`] owns the timers and the deferred task queue of one
//! application. A *processing pass* fires every expired timer, then runs the
//! tasks that were queued before the pass started. Nothing in the core runs
//! concurrently with anything else: timer callbacks and queued callbacks are
//! all invoked from the thread that drives the passes.
//!
//! The core can drive itself ([`LoopCore::run_until_quit`]) or be pumped from
//! a native event loop that calls [`LoopCore::process_pass`] when idle. In the
//! latter case a wake hook lets the core nudge the native loop whenever new
//! work is scheduled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};

use crate::error::Result;
use crate::event::PassSummary;
use crate::logging::targets;
use crate::signal::TaskPoster;
use crate::task::{BoxedTask, SharedTaskQueue, TaskId};
use crate::timer::{SharedTimerManager, TimerCallback, TimerId, TimerKind};

/// Hook invoked whenever new work is scheduled on the core.
pub type WakeHook = Box<dyn Fn() + Send + Sync + 'static>;

/// Timers, deferred tasks and the quit flag of one application.
pub struct LoopCore {
    timers: SharedTimerManager,
    tasks: SharedTaskQueue,
    quit_requested: AtomicBool,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
    wake_hook: RwLock<Option<WakeHook>>,
}

impl LoopCore {
    /// Create an idle core with no timers and no tasks.
    pub fn new() -> Self {
        let (wake_tx, wake_rx) = crossbeam_channel::bounded(1);
        Self {
            timers: SharedTimerManager::new(),
            tasks: SharedTaskQueue::new(),
            quit_requested: AtomicBool::new(false),
            wake_tx,
            wake_rx,
            wake_hook: RwLock::new(None),
        }
    }

    /// Install a hook that is called whenever new work is scheduled.
    pub fn set_wake_hook(&self, hook: Option<WakeHook>) {
        *self.wake_hook.write() = hook;
    }

    fn wake(&self) {
        // A full channel already holds a pending wake-up.
        if let Err(TrySendError::Disconnected(())) = self.wake_tx.try_send(()) {
            tracing::warn!(target: targets::EVENT_LOOP, "wake channel disconnected");
        }
        if let Some(hook) = self.wake_hook.read().as_ref() {
            hook();
        }
    }

    // -------------------------------------------------------------------------
    // Task API
    // -------------------------------------------------------------------------

    /// Post a task to run during the next processing pass.
    pub fn post<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        self.post_task(Box::new(task))
    }

    /// Cancel a pending task.
    ///
    /// Returns `true` if the task was found and cancelled.
    pub fn cancel_task(&self, id: TaskId) -> bool {
        self.tasks.cancel(id)
    }

    /// Number of tasks waiting for the next pass.
    pub fn pending_task_count(&self) -> usize {
        self.tasks.pending_count()
    }

    // -------------------------------------------------------------------------
    // Timer API
    // -------------------------------------------------------------------------

    /// Start a timer that fires after `interval`.
    ///
    /// A single-shot timer fires once and is then inactive; otherwise it fires
    /// every `interval` until stopped.
    pub fn start_timer(
        &self,
        interval: Duration,
        single_shot: bool,
        callback: Option<TimerCallback>,
    ) -> TimerId {
        let kind = TimerKind::from_single_shot(single_shot);
        let id = self.timers.start(interval, kind, callback);
        tracing::debug!(target: targets::TIMER, ?id, ?interval, ?kind, "timer started");
        self.wake();
        id
    }

    /// Stop a timer.
    pub fn stop_timer(&self, id: TimerId) -> Result<()> {
        self.timers.stop(id)?;
        tracing::debug!(target: targets::TIMER, ?id, "timer stopped");
        Ok(())
    }

    /// Check if a timer is active.
    pub fn is_timer_active(&self, id: TimerId) -> bool {
        self.timers.is_active(id)
    }

    /// Number of active timers.
    pub fn active_timer_count(&self) -> usize {
        self.timers.active_count()
    }

    /// Time until the next timer expires, if any timer is active.
    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.timers.time_until_next()
    }

    /// Whether a pass right now would have something to do.
    pub fn has_ready_work(&self) -> bool {
        self.tasks.has_pending() || self.time_until_next_timer() == Some(Duration::ZERO)
    }

    // -------------------------------------------------------------------------
    // Passes
    // -------------------------------------------------------------------------

    /// Run one non-blocking processing pass.
    ///
    /// Expired timers fire first, in expiry order. A timer stopped by an
    /// earlier callback of the same pass does not fire. Then every task queued
    /// before this point runs in FIFO order; tasks queued by those tasks wait
    /// for the next pass.
    #[tracing::instrument(skip(self), target = "panelkit_core::event_loop", level = "trace")]
    pub fn process_pass(&self) -> PassSummary {
        let mut timers_fired = 0;
        for id in self.timers.collect_due() {
            // The lock is released before the callback runs.
            let Some(timer) = self.timers.fire(id) else {
                continue;
            };
            timers_fired += 1;
            if let Some(callback) = timer.callback {
                callback();
            }
        }

        let tasks_run = self.tasks.run_pending();
        if timers_fired > 0 || tasks_run > 0 {
            tracing::trace!(
                target: targets::EVENT_LOOP,
                timers_fired,
                tasks_run,
                "processing pass finished"
            );
        }
        PassSummary {
            timers_fired,
            tasks_run,
        }
    }

    /// Block until work may be ready or `max_wait` elapses.
    ///
    /// Returns immediately if tasks are pending or a timer is due.
    pub fn wait_for_work(&self, max_wait: Option<Duration>) {
        if self.tasks.has_pending() || self.quit_requested() {
            return;
        }
        let timeout = match (self.time_until_next_timer(), max_wait) {
            (Some(t), Some(m)) => Some(t.min(m)),
            (t, m) => t.or(m),
        };
        match timeout {
            Some(Duration::ZERO) => {}
            Some(timeout) => match self.wake_rx.recv_timeout(timeout) {
                Ok(()) | Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::warn!(target: targets::EVENT_LOOP, "wake channel disconnected");
                }
            },
            None => {
                if self.wake_rx.recv().is_err() {
                    tracing::warn!(target: targets::EVENT_LOOP, "wake channel disconnected");
                }
            }
        }
    }

    /// Run passes until quit is requested.
    ///
    /// A quit request left over from before the call is discarded on entry.
    /// Returns the accumulated work done by all passes.
    #[tracing::instrument(skip(self), target = "panelkit_core::event_loop", level = "debug")]
    pub fn run_until_quit(&self) -> PassSummary {
        tracing::info!(target: targets::EVENT_LOOP, "starting loop");
        self.clear_quit();
        let mut total = PassSummary::default();
        loop {
            total.merge(self.process_pass());
            if self.quit_requested() {
                break;
            }
            self.wait_for_work(None);
            if self.quit_requested() {
                break;
            }
        }
        self.clear_quit();
        tracing::info!(target: targets::EVENT_LOOP, "loop exited");
        total
    }

    // -------------------------------------------------------------------------
    // Quit
    // -------------------------------------------------------------------------

    /// Ask a running loop to stop after the current pass.
    pub fn request_quit(&self) {
        tracing::info!(target: targets::EVENT_LOOP, "quit requested");
        self.quit_requested.store(true, Ordering::SeqCst);
        self.wake();
    }

    /// Forget a pending quit request.
    pub fn clear_quit(&self) {
        self.quit_requested.store(false, Ordering::SeqCst);
    }

    /// Check if a quit has been requested.
    pub fn quit_requested(&self) -> bool {
        self.quit_requested.load(Ordering::SeqCst)
    }
}

impl Default for LoopCore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskPoster for LoopCore {
    fn post_task(&self, task: BoxedTask) -> TaskId {
        let id = self.tasks.post_boxed(task);
        self.wake();
        id
    }
}

static_assertions::assert_impl_all!(LoopCore: Send, Sync);

/// The single timer handle an application backend owns.
///
/// Starting the slot stops whatever timer it held before, so at most one
/// timer per slot is ever active. Stopping an empty slot is a no-op.
pub struct TimerSlot {
    current: Mutex<Option<TimerId>>,
}

impl TimerSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    /// Replace the slot's timer with a new one.
    pub fn start(
        &self,
        core: &LoopCore,
        interval: Duration,
        single_shot: bool,
        callback: Option<TimerCallback>,
    ) -> TimerId {
        let mut current = self.current.lock();
        if let Some(previous) = current.take() {
            Self::stop_quietly(core, previous);
        }
        let id = core.start_timer(interval, single_shot, callback);
        *current = Some(id);
        id
    }

    /// Stop the slot's timer if one is active.
    ///
    /// Returns `true` if an active timer was stopped.
    pub fn stop(&self, core: &LoopCore) -> bool {
        match self.current.lock().take() {
            Some(id) => Self::stop_quietly(core, id),
            None => {
                tracing::trace!(target: targets::TIMER, "no timer to stop");
                false
            }
        }
    }

    fn stop_quietly(core: &LoopCore, id: TimerId) -> bool {
        if core.is_timer_active(id) {
            match core.stop_timer(id) {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(target: targets::TIMER, ?id, %err, "timer vanished while stopping");
                    false
                }
            }
        } else {
            // A single-shot timer that already fired.
            tracing::trace!(target: targets::TIMER, ?id, "timer already finished");
            false
        }
    }

    /// Whether the slot currently holds an active timer.
    pub fn is_active(&self, core: &LoopCore) -> bool {
        self.current
            .lock()
            .is_some_and(|id| core.is_timer_active(id))
    }

    /// The id of the slot's timer, if it is still active.
    pub fn current(&self, core: &LoopCore) -> Option<TimerId> {
        let current = *self.current.lock();
        current.filter(|id| core.is_timer_active(*id))
    }
}

impl Default for TimerSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to a loop core.
pub type SharedLoopCore = Arc<LoopCore>;
