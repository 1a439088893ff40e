//! Signal/slot system.
//!
//! A [`Signal`] keeps an ordered list of connected slots (callbacks). Emitting
//! invokes them in connection order. Widgets use queued emission: one task per
//! connected slot is posted to a [`TaskPoster`] (normally the loop core), and
//! the slot runs during the next processing pass.
//!
//! Slots are always called without any signal lock held, so a slot may
//! connect or disconnect slots on the signal that is invoking it.
//!
//! # Example
//!
//! ```
//! use panelkit_core::Signal;
//!
//! let value_changed = Signal::<i64>::new();
//! let id = value_changed.connect(|value| println!("value is now {value}"));
//! value_changed.emit(42);
//! value_changed.disconnect(id);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;
use crate::task::{BoxedTask, TaskId};

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    pub struct ConnectionId;
}

/// Something that can run tasks later, in posting order.
pub trait TaskPoster: Send + Sync {
    /// Queue a task for the next processing pass.
    fn post_task(&self, task: BoxedTask) -> TaskId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

struct Connections<Args> {
    slots: SlotMap<ConnectionId, Slot<Args>>,
    order: Vec<ConnectionId>,
}

impl<Args> Connections<Args> {
    fn snapshot(&self) -> Vec<Slot<Args>> {
        self.order
            .iter()
            .filter_map(|id| self.slots.get(*id).cloned())
            .collect()
    }
}

/// A type-safe signal that can have multiple connected slots.
///
/// `Args` is the argument type passed to connected slots. Use `()` for
/// signals with no arguments, or a tuple for multiple arguments.
pub struct Signal<Args> {
    connections: Arc<Mutex<Connections<Args>>>,
    blocked: AtomicBool,
}

impl<Args: Clone + Send + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: Clone + Send + 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Arc::new(Mutex::new(Connections {
                slots: SlotMap::with_key(),
                order: Vec::new(),
            })),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Slots are invoked in the order they were connected.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connect_arc(Arc::new(slot))
    }

    /// Connect an already boxed slot.
    pub fn connect_boxed(&self, slot: Box<dyn Fn(&Args) + Send + Sync>) -> ConnectionId {
        self.connect_arc(Arc::from(slot))
    }

    fn connect_arc(&self, slot: Slot<Args>) -> ConnectionId {
        let mut connections = self.connections.lock();
        let id = connections.slots.insert(slot);
        connections.order.push(id);
        tracing::trace!(target: targets::SIGNAL, ?id, "slot connected");
        id
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed. Queued
    /// invocations of a disconnected slot that have not run yet are dropped.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.lock();
        if connections.slots.remove(id).is_some() {
            connections.order.retain(|c| *c != id);
            true
        } else {
            false
        }
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        let mut connections = self.connections.lock();
        connections.slots.clear();
        connections.order.clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().slots.len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, both `emit` and `emit_queued` do nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking every connected slot immediately.
    #[tracing::instrument(skip_all, target = "panelkit_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let slots = self.connections.lock().snapshot();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");
        for slot in slots {
            slot(&args);
        }
    }

    /// Emit the signal through a task poster.
    ///
    /// One task is posted per connected slot, in connection order. Each task
    /// looks its slot up again when it runs, so disconnecting before delivery
    /// cancels the call. Returns the number of posted tasks.
    #[tracing::instrument(skip_all, target = "panelkit_core::signal", level = "trace")]
    pub fn emit_queued(&self, args: Args, poster: &dyn TaskPoster) -> usize {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping queued emit");
            return 0;
        }

        let ids = self.connections.lock().order.clone();
        for id in &ids {
            let id = *id;
            let weak: Weak<Mutex<Connections<Args>>> = Arc::downgrade(&self.connections);
            let args = args.clone();
            poster.post_task(Box::new(move || {
                let Some(connections) = weak.upgrade() else {
                    return;
                };
                let slot = connections.lock().slots.get(id).cloned();
                if let Some(slot) = slot {
                    slot(&args);
                }
            }));
        }
        tracing::trace!(target: targets::SIGNAL, queued = ids.len(), "queued signal emission");
        ids.len()
    }
}

static_assertions::assert_impl_all!(Signal<i64>: Send, Sync);
static_assertions::assert_impl_all!(Signal<()>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskQueue;
    use std::sync::atomic::AtomicI32;

    /// Collects posted tasks so tests can decide when they run.
    #[derive(Default)]
    struct ManualPoster {
        queue: Mutex<TaskQueue>,
    }

    impl ManualPoster {
        fn run_all(&self) -> usize {
            let tasks = self.queue.lock().drain();
            let count = tasks.len();
            for task in tasks {
                task();
            }
            count
        }
    }

    impl TaskPoster for ManualPoster {
        fn post_task(&self, task: BoxedTask) -> TaskId {
            self.queue.lock().post_boxed(task)
        }
    }

    #[test]
    fn test_signal_connect_emit() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(AtomicI32::new(0));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.store(value, Ordering::SeqCst);
        });

        signal.emit(42);
        assert_eq!(received.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal = Signal::<i32>::new();
        let counter = Arc::new(AtomicI32::new(0));

        let counter_clone = counter.clone();
        let id = signal.connect(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        signal.emit(1);
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit(2);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_signal_blocked() {
        let signal = Signal::<()>::new();
        let counter = Arc::new(AtomicI32::new(0));

        let counter_clone = counter.clone();
        signal.connect(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        signal.set_blocked(true);
        signal.emit(());
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        signal.set_blocked(false);
        signal.emit(());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_slots_run_in_connection_order() {
        let signal = Signal::<()>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut ids = Vec::new();
        for i in 0..5 {
            let order = order.clone();
            ids.push(signal.connect(move |_| order.lock().push(i)));
        }
        // Free a slot so the next insert reuses it.
        signal.disconnect(ids[1]);
        let order_clone = order.clone();
        signal.connect(move |_| order_clone.lock().push(5));

        signal.emit(());
        assert_eq!(*order.lock(), vec![0, 2, 3, 4, 5]);
    }

    #[test]
    fn test_disconnect_all() {
        let signal = Signal::<()>::new();
        for _ in 0..5 {
            signal.connect(|_| {});
        }

        assert_eq!(signal.connection_count(), 5);
        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_slot_may_disconnect_itself() {
        let signal = Arc::new(Signal::<()>::new());
        let counter = Arc::new(AtomicI32::new(0));
        let own_id = Arc::new(Mutex::new(None));

        let signal_clone = signal.clone();
        let counter_clone = counter.clone();
        let own_id_clone = own_id.clone();
        let id = signal.connect(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = *own_id_clone.lock() {
                signal_clone.disconnect(id);
            }
        });
        *own_id.lock() = Some(id);

        signal.emit(());
        signal.emit(());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_emit_queued_defers_until_run() {
        let signal = Signal::<i64>::new();
        let poster = ManualPoster::default();
        let received = Arc::new(Mutex::new(Vec::new()));

        for tag in 0..2 {
            let received = received.clone();
            signal.connect(move |&value| received.lock().push((tag, value)));
        }

        assert_eq!(signal.emit_queued(7, &poster), 2);
        assert!(received.lock().is_empty());

        assert_eq!(poster.run_all(), 2);
        assert_eq!(*received.lock(), vec![(0, 7), (1, 7)]);
    }

    #[test]
    fn test_disconnect_cancels_pending_delivery() {
        let signal = Signal::<i64>::new();
        let poster = ManualPoster::default();
        let counter = Arc::new(AtomicI32::new(0));

        let counter_clone = counter.clone();
        let id = signal.connect(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        signal.emit_queued(1, &poster);
        signal.disconnect(id);
        poster.run_all();
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dropped_signal_skips_pending_delivery() {
        let poster = ManualPoster::default();
        let counter = Arc::new(AtomicI32::new(0));
        {
            let signal = Signal::<()>::new();
            let counter_clone = counter.clone();
            signal.connect(move |_| {
                counter_clone.fetch_add(1, Ordering::SeqCst);
            });
            signal.emit_queued((), &poster);
        }

        poster.run_all();
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_blocked_signal_queues_nothing() {
        let signal = Signal::<()>::new();
        let poster = ManualPoster::default();
        signal.connect(|_| {});
        signal.set_blocked(true);

        assert_eq!(signal.emit_queued((), &poster), 0);
        assert_eq!(poster.run_all(), 0);
    }

    #[test]
    fn test_emit_from_multiple_threads() {
        let signal = Arc::new(Signal::<i32>::new());
        let total = Arc::new(AtomicI32::new(0));

        let total_clone = total.clone();
        signal.connect(move |&n| {
            total_clone.fetch_add(n, Ordering::SeqCst);
        });

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let signal = signal.clone();
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        signal.emit(1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(total.load(Ordering::SeqCst), 40);
    }
}
