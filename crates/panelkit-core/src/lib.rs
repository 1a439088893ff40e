//! Core runtime for panelkit.
//!
//! This crate provides the toolkit-neutral machinery every panelkit backend
//! builds on:
//!
//! - **Widget handles**: opaque [`WidgetId`] arena keys
//! - **Signal/Slot System**: ordered callbacks with queued delivery
//! - **Timers**: one-shot and repeating timers
//! - **Task Queue**: deferred tasks run by the next processing pass
//! - **Loop Core**: the cooperative pass/wait/quit cycle shared by backends
//! - **Application**: the process-wide native event loop built on winit
//!   (with the `native` feature)
//!
//! # Signal/Slot Example
//!
//! ```
//! use panelkit_core::{LoopCore, Signal};
//! use std::sync::Arc;
//!
//! let core = Arc::new(LoopCore::new());
//! let value_changed = Signal::<i64>::new();
//! value_changed.connect(|value| println!("value changed to {value}"));
//!
//! // Queued delivery: nothing runs until the next pass.
//! value_changed.emit_queued(5, core.as_ref());
//! assert_eq!(core.process_pass().tasks_run, 1);
//! ```
//!
//! # Loop Core Example
//!
//! ```
//! use panelkit_core::LoopCore;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let core = Arc::new(LoopCore::new());
//! let quitter = core.clone();
//! core.start_timer(
//!     Duration::from_millis(1),
//!     true,
//!     Some(Arc::new(move || quitter.request_quit())),
//! );
//! core.run_until_quit();
//! ```

#[cfg(all(
    feature = "native",
    any(target_os = "windows", target_os = "macos", target_os = "linux")
))]
mod application;
mod error;
mod event;
mod event_loop;
pub mod logging;
pub mod object;
pub mod signal;
mod task;
mod timer;

#[cfg(all(
    feature = "native",
    any(target_os = "windows", target_os = "macos", target_os = "linux")
))]
pub use application::Application;
pub use error::{CoreError, Result, TimerError};
pub use event::{LoopEvent, PassSummary};
pub use event_loop::{LoopCore, SharedLoopCore, TimerSlot, WakeHook};
pub use logging::{DebugTree, PerfSpan, TreeFormatOptions, TreeFormatter, TreeStyle};
pub use object::WidgetId;
pub use signal::{ConnectionId, Signal, TaskPoster};
pub use task::{BoxedTask, TaskId, TaskQueue};
pub use timer::{ExpiredTimer, TimerCallback, TimerId, TimerKind, TimerManager};
