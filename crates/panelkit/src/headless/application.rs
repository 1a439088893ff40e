//! Application backends for headless widgets.

use std::any::Any;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use panelkit_core::logging::targets;
use panelkit_core::{LoopCore, PassSummary, TimerCallback, TimerSlot};

use crate::error::WidgetResult;
use crate::protocols::{ApplicationBackend, TimeoutCallback};

static SHARED: OnceLock<Arc<HeadlessApplication>> = OnceLock::new();

fn timer_callback(on_timeout: Option<TimeoutCallback>) -> Option<TimerCallback> {
    on_timeout.map(TimerCallback::from)
}

/// An application whose event loop is a bare [`LoopCore`].
///
/// There is no native event source: a pass runs expired timers and queued
/// tasks, and [`run`](ApplicationBackend::run) sleeps until the next timer
/// or posted task.
pub struct HeadlessApplication {
    core: Arc<LoopCore>,
    timer: TimerSlot,
}

impl HeadlessApplication {
    pub fn new() -> Self {
        Self::with_core(Arc::new(LoopCore::new()))
    }

    /// Drive an existing loop core.
    pub fn with_core(core: Arc<LoopCore>) -> Self {
        Self {
            core,
            timer: TimerSlot::new(),
        }
    }

    /// The process-wide shared application, created on first access.
    pub fn instance() -> Arc<HeadlessApplication> {
        SHARED
            .get_or_init(|| {
                tracing::info!(target: targets::BACKEND, "shared headless application created");
                Arc::new(HeadlessApplication::new())
            })
            .clone()
    }

    pub fn core(&self) -> &Arc<LoopCore> {
        &self.core
    }
}

impl Default for HeadlessApplication {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationBackend for HeadlessApplication {
    fn backend_name(&self) -> &str {
        "headless"
    }

    fn process_events(&self) -> WidgetResult<PassSummary> {
        Ok(self.core.process_pass())
    }

    fn run(&self) -> WidgetResult<()> {
        let summary = self.core.run_until_quit();
        tracing::debug!(
            target: targets::BACKEND,
            timers = summary.timers_fired,
            tasks = summary.tasks_run,
            "headless loop finished"
        );
        Ok(())
    }

    fn quit(&self) {
        self.core.request_quit();
    }

    /// The [`LoopCore`].
    fn native_app(&self) -> &dyn Any {
        self.core.as_ref()
    }

    fn start_timer(
        &self,
        interval: Duration,
        on_timeout: Option<TimeoutCallback>,
        single_shot: bool,
    ) {
        self.timer
            .start(&self.core, interval, single_shot, timer_callback(on_timeout));
    }

    fn stop_timer(&self) {
        self.timer.stop(&self.core);
    }

    fn is_timer_active(&self) -> bool {
        self.timer.is_active(&self.core)
    }
}

#[cfg(all(
    feature = "native",
    any(target_os = "windows", target_os = "macos", target_os = "linux")
))]
pub use native_app::NativeApplication;

#[cfg(all(
    feature = "native",
    any(target_os = "windows", target_os = "macos", target_os = "linux")
))]
mod native_app {
    use super::*;

    use panelkit_core::Application;

    /// Headless widgets driven by the platform event loop.
    ///
    /// Wraps the process-wide [`Application`], which must be created on the
    /// main thread.
    pub struct NativeApplication {
        app: &'static Application,
        timer: TimerSlot,
    }

    impl NativeApplication {
        pub fn new() -> WidgetResult<Self> {
            Ok(Self {
                app: Application::get_or_init()?,
                timer: TimerSlot::new(),
            })
        }

        pub fn core(&self) -> &Arc<LoopCore> {
            self.app.core()
        }
    }

    impl ApplicationBackend for NativeApplication {
        fn backend_name(&self) -> &str {
            "headless-native"
        }

        fn process_events(&self) -> WidgetResult<PassSummary> {
            Ok(self.app.process_events()?)
        }

        fn run(&self) -> WidgetResult<()> {
            Ok(self.app.run()?)
        }

        fn quit(&self) {
            self.app.quit();
        }

        /// The [`Application`].
        fn native_app(&self) -> &dyn Any {
            self.app
        }

        fn start_timer(
            &self,
            interval: Duration,
            on_timeout: Option<TimeoutCallback>,
            single_shot: bool,
        ) {
            self.timer.start(
                self.app.core(),
                interval,
                single_shot,
                timer_callback(on_timeout),
            );
        }

        fn stop_timer(&self) {
            self.timer.stop(self.app.core());
        }

        fn is_timer_active(&self) -> bool {
            self.timer.is_active(self.app.core())
        }
    }
}
