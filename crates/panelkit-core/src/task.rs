//! Deferred task queue.
//!
//! Tasks are posted from any thread and run in FIFO order by the next
//! processing pass of the loop core. Queued callback delivery is built on
//! top of this queue.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// A unique identifier for a deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

/// A boxed task closure.
pub type BoxedTask = Box<dyn FnOnce() + Send + 'static>;

struct TaskData {
    id: TaskId,
    task: BoxedTask,
}

/// A FIFO queue of deferred tasks.
pub struct TaskQueue {
    tasks: VecDeque<TaskData>,
}

impl TaskQueue {
    /// Create a new task queue.
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    /// Post a boxed task.
    pub fn post_boxed(&mut self, task: BoxedTask) -> TaskId {
        let id = next_task_id();
        self.tasks.push_back(TaskData { id, task });
        id
    }

    /// Post a task to run on the next processing pass.
    pub fn post<F>(&mut self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        self.post_boxed(Box::new(task))
    }

    /// Cancel a pending task.
    ///
    /// Returns `true` if the task was found and cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        if let Some(pos) = self.tasks.iter().position(|t| t.id == id) {
            self.tasks.remove(pos);
            true
        } else {
            false
        }
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Take every pending task, oldest first.
    pub fn drain(&mut self) -> Vec<BoxedTask> {
        self.tasks.drain(..).map(|t| t.task).collect()
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// A thread-safe wrapper around `TaskQueue`.
pub(crate) struct SharedTaskQueue {
    inner: Mutex<TaskQueue>,
}

impl SharedTaskQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TaskQueue::new()),
        }
    }

    pub fn post_boxed(&self, task: BoxedTask) -> TaskId {
        self.inner.lock().post_boxed(task)
    }

    pub fn cancel(&self, id: TaskId) -> bool {
        self.inner.lock().cancel(id)
    }

    pub fn has_pending(&self) -> bool {
        self.inner.lock().has_pending()
    }

    pub fn pending_count(&self) -> usize {
        self.inner.lock().pending_count()
    }

    /// Run the tasks that were pending when the call started.
    ///
    /// Tasks posted while running are left for the next call. The queue lock
    /// is released before any task runs, so tasks may post further tasks.
    pub fn run_pending(&self) -> usize {
        let batch = self.inner.lock().drain();
        let count = batch.len();
        for task in batch {
            task();
        }
        count
    }
}

impl Default for SharedTaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_tasks_run_in_fifo_order() {
        let queue = SharedTaskQueue::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let seen = seen.clone();
            queue.post_boxed(Box::new(move || seen.lock().push(i)));
        }

        assert_eq!(queue.run_pending(), 3);
        assert_eq!(*seen.lock(), vec![0, 1, 2]);
        assert!(!queue.has_pending());
    }

    #[test]
    fn test_cancel_removes_task() {
        let mut queue = TaskQueue::new();
        let id = queue.post(|| panic!("cancelled task ran"));
        queue.post(|| {});

        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert_eq!(queue.pending_count(), 1);
        for task in queue.drain() {
            task();
        }
    }

    #[test]
    fn test_task_posted_while_running_waits_for_next_pass() {
        let queue = Arc::new(SharedTaskQueue::new());
        let inner = queue.clone();
        queue.post_boxed(Box::new(move || {
            inner.post_boxed(Box::new(|| {}));
        }));

        assert_eq!(queue.run_pending(), 1);
        assert_eq!(queue.pending_count(), 1);
        assert_eq!(queue.run_pending(), 1);
        assert_eq!(queue.run_pending(), 0);
    }
}
