//! The native application singleton, backed by a winit event loop.
//!
//! The winit loop only supplies the native wait-for-event point. All timers
//! and queued callbacks live in a [`LoopCore`]; the loop handler runs one
//! core pass each time winit is about to wait, and the core wakes winit
//! through an event-loop proxy whenever new work is scheduled.

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use parking_lot::Mutex;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::WindowId;

use crate::error::{CoreError, Result};
use crate::event::{LoopEvent, PassSummary};
use crate::event_loop::LoopCore;
use crate::logging::targets;

/// Global application instance.
static APPLICATION: OnceLock<Application> = OnceLock::new();

// The event loop cannot live in a static; it stays on the thread that built it.
thread_local! {
    static EVENT_LOOP: RefCell<Option<EventLoop<LoopEvent>>> = const { RefCell::new(None) };
}

/// The process-wide native application.
///
/// This is a singleton: the first call to [`Application::new`] or
/// [`Application::get_or_init`] creates it, and it lives until process exit.
///
/// # Example
///
/// ```no_run
/// use panelkit_core::Application;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let app = Application::get_or_init()?;
///     app.core().post(|| println!("first pass"));
///     app.process_events()?;
///     Ok(())
/// }
/// ```
pub struct Application {
    proxy: Mutex<EventLoopProxy<LoopEvent>>,
    core: Arc<LoopCore>,
}

impl Application {
    /// Create the application and its native event loop.
    ///
    /// Must be called from the thread that will pump events (the main thread
    /// on most platforms).
    ///
    /// # Errors
    ///
    /// Returns an error if an `Application` already exists, or if the native
    /// event loop could not be created.
    pub fn new() -> Result<&'static Application> {
        if APPLICATION.get().is_some() {
            return Err(CoreError::ApplicationAlreadyInitialized);
        }

        let event_loop: EventLoop<LoopEvent> = EventLoop::with_user_event()
            .build()
            .map_err(|e| CoreError::EventLoopCreation(e.to_string()))?;

        let core = Arc::new(LoopCore::new());
        let hook_proxy = Mutex::new(event_loop.create_proxy());
        core.set_wake_hook(Some(Box::new(move || {
            // The loop being gone only means nobody is waiting any more.
            let _ = hook_proxy.lock().send_event(LoopEvent::WakeUp);
        })));

        let app = Application {
            proxy: Mutex::new(event_loop.create_proxy()),
            core,
        };

        APPLICATION
            .set(app)
            .map_err(|_| CoreError::ApplicationAlreadyInitialized)?;

        EVENT_LOOP.with(|cell| {
            *cell.borrow_mut() = Some(event_loop);
        });

        tracing::info!(target: targets::EVENT_LOOP, "native application initialized");
        Self::try_instance().ok_or(CoreError::EventLoopExited)
    }

    /// Get the application, creating it on first access.
    pub fn get_or_init() -> Result<&'static Application> {
        match APPLICATION.get() {
            Some(app) => Ok(app),
            None => Self::new(),
        }
    }

    /// Get the application if it has been created.
    pub fn try_instance() -> Option<&'static Application> {
        APPLICATION.get()
    }

    /// The loop core holding this application's timers and tasks.
    pub fn core(&self) -> &Arc<LoopCore> {
        &self.core
    }

    /// Process pending native events and run one core pass, without blocking.
    ///
    /// When called from inside a handler of the running loop, only the core
    /// pass runs.
    pub fn process_events(&self) -> Result<PassSummary> {
        EVENT_LOOP.with(|cell| {
            let Ok(mut slot) = cell.try_borrow_mut() else {
                return Ok(self.core.process_pass());
            };
            let Some(event_loop) = slot.as_mut() else {
                return Err(CoreError::EventLoopExited);
            };

            let mut handler = PumpHandler::new(&self.core);
            let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut handler);
            if let PumpStatus::Exit(code) = status {
                tracing::debug!(target: targets::EVENT_LOOP, code, "native loop exited");
                *slot = None;
            }
            if handler.passes == 0 {
                handler.summary.merge(self.core.process_pass());
            }
            Ok(handler.summary)
        })
    }

    /// Run the native loop until [`quit`](Self::quit) is called.
    ///
    /// A quit requested before the call is discarded. When called from inside
    /// a handler of an already running loop, the core is driven directly.
    #[tracing::instrument(skip(self), target = "panelkit_core::event_loop", level = "debug")]
    pub fn run(&self) -> Result<()> {
        EVENT_LOOP.with(|cell| {
            let Ok(mut slot) = cell.try_borrow_mut() else {
                self.core.run_until_quit();
                return Ok(());
            };
            let Some(event_loop) = slot.as_mut() else {
                return Err(CoreError::EventLoopExited);
            };

            tracing::info!(target: targets::EVENT_LOOP, "starting native loop");
            self.core.clear_quit();
            let mut handler = PumpHandler::new(&self.core);
            loop {
                if let PumpStatus::Exit(code) = event_loop.pump_app_events(None, &mut handler) {
                    tracing::debug!(target: targets::EVENT_LOOP, code, "native loop exited");
                    *slot = None;
                    break;
                }
                if self.core.quit_requested() {
                    break;
                }
            }
            self.core.clear_quit();
            tracing::info!(
                target: targets::EVENT_LOOP,
                passes = handler.passes,
                "native loop stopped"
            );
            Ok(())
        })
    }

    /// Request the running loop to stop.
    ///
    /// Safe to call from inside any callback; the loop returns after the
    /// current pass.
    pub fn quit(&self) {
        self.core.request_quit();
        let _ = self.proxy.lock().send_event(LoopEvent::Quit);
    }
}

/// Drives core passes from winit callbacks.
struct PumpHandler<'a> {
    core: &'a LoopCore,
    passes: usize,
    summary: PassSummary,
}

impl<'a> PumpHandler<'a> {
    fn new(core: &'a LoopCore) -> Self {
        Self {
            core,
            passes: 0,
            summary: PassSummary::default(),
        }
    }

    fn update_control_flow(&self, event_loop: &ActiveEventLoop) {
        let control_flow = if self.core.quit_requested() || self.core.has_ready_work() {
            ControlFlow::Poll
        } else {
            match self.core.time_until_next_timer() {
                Some(wait) => ControlFlow::wait_duration(wait),
                None => ControlFlow::Wait,
            }
        };
        event_loop.set_control_flow(control_flow);
    }
}

impl ApplicationHandler<LoopEvent> for PumpHandler<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.update_control_flow(event_loop);
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        _event: WindowEvent,
    ) {
        // The core owns no windows.
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: LoopEvent) {
        tracing::trace!(target: targets::EVENT_LOOP, ?event, "received user event");
        self.update_control_flow(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.summary.merge(self.core.process_pass());
        self.passes += 1;
        self.update_control_flow(event_loop);
    }
}
