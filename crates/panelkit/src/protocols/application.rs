//! The application backend contract.

use std::any::Any;
use std::time::Duration;

use panelkit_core::PassSummary;

use crate::error::WidgetResult;

/// Callback run when an application timer expires.
pub type TimeoutCallback = Box<dyn Fn() + Send + Sync + 'static>;

/// Lifecycle of the process-wide native application and its event loop.
///
/// All methods take `&self` so they can be called from inside callbacks the
/// loop is currently running.
pub trait ApplicationBackend: Send + Sync {
    /// Identifying name of the backend.
    fn backend_name(&self) -> &str;

    /// Process pending events and run due callbacks without blocking.
    fn process_events(&self) -> WidgetResult<PassSummary>;

    /// Run the event loop until [`quit`](Self::quit) is called.
    fn run(&self) -> WidgetResult<()>;

    /// Ask the running loop to stop. Safe to call from any callback.
    fn quit(&self);

    /// The backend's native application object.
    fn native_app(&self) -> &dyn Any;

    /// Start the application timer.
    ///
    /// A timer started earlier is stopped first, so at most one is ever
    /// active. With `single_shot` the timer fires once and becomes inactive.
    fn start_timer(
        &self,
        interval: Duration,
        on_timeout: Option<TimeoutCallback>,
        single_shot: bool,
    );

    /// Stop the application timer. Does nothing if no timer is active.
    fn stop_timer(&self);

    fn is_timer_active(&self) -> bool;
}
