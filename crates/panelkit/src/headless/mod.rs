//! The headless reference backend.
//!
//! Native widgets live in an in-memory [`NativeTree`] and paint themselves
//! into bitmaps in software. Every widget kind satisfies its full contract,
//! which makes this backend the reference for conformance tests and for
//! rendering snapshots without a display.
//!
//! # Example
//!
//! ```
//! use panelkit::headless::HeadlessBackend;
//! use panelkit::{ApplicationBackend, RangedWidgetProtocol, ValueWidgetProtocol, Value};
//!
//! let backend = HeadlessBackend::new();
//! let mut slider = backend.slider();
//! slider.set_range(0.0, 10.0).unwrap();
//! slider.set_value(Value::Int(5)).unwrap();
//! backend.app().process_events().unwrap();
//! assert_eq!(slider.value(), Value::Int(5));
//! ```

mod application;
mod layout;
mod native;
mod paint;
mod state;
mod widgets;

use std::sync::Arc;

pub use application::HeadlessApplication;
#[cfg(all(
    feature = "native",
    any(target_os = "windows", target_os = "macos", target_os = "linux")
))]
pub use application::NativeApplication;
pub use native::{LayoutDefaults, NativeHandle, NativeLayout, NativeNode, NativeTree};
pub use state::{ChoiceModel, LayoutState, NativeState, RangeModel};
pub use widgets::{
    HeadlessButton, HeadlessComboBox, HeadlessContainer, HeadlessDateTimeEdit, HeadlessSlider,
    HeadlessSpinBox, HeadlessTextWidget,
};

use panelkit_core::LoopCore;
use panelkit_core::logging::targets;

use crate::backend::Backend;
use crate::config::PanelkitConfig;
use crate::error::WidgetResult;
use crate::kind::WidgetKind;
use crate::protocols::{ApplicationBackend, WidgetProtocol};

/// Factory for headless widgets sharing one application and native tree.
pub struct HeadlessBackend {
    name: &'static str,
    app: Arc<dyn ApplicationBackend>,
    tree: Arc<NativeTree>,
}

impl HeadlessBackend {
    /// A backend with its own application and default layout settings.
    pub fn new() -> Self {
        Self::with_application(
            Arc::new(HeadlessApplication::new()),
            LayoutDefaults::default(),
            1,
        )
    }

    /// A backend driven by `app`.
    pub fn with_application(
        app: Arc<HeadlessApplication>,
        defaults: LayoutDefaults,
        scale: u32,
    ) -> Self {
        let core = app.core().clone();
        Self::build("headless", app, core, defaults, scale)
    }

    fn build(
        name: &'static str,
        app: Arc<dyn ApplicationBackend>,
        core: Arc<LoopCore>,
        defaults: LayoutDefaults,
        scale: u32,
    ) -> Self {
        tracing::debug!(target: targets::BACKEND, name, ?defaults, scale, "headless backend created");
        Self {
            name,
            app,
            tree: Arc::new(NativeTree::new(core, defaults, scale)),
        }
    }

    /// A backend configured from `config`, driven by the process-wide
    /// [`HeadlessApplication::instance`].
    pub fn from_config(config: &PanelkitConfig) -> Self {
        Self::with_application(
            HeadlessApplication::instance(),
            Self::defaults_from(config),
            config.scale(),
        )
    }

    /// A backend driven by the platform event loop.
    #[cfg(all(
        feature = "native",
        any(target_os = "windows", target_os = "macos", target_os = "linux")
    ))]
    pub fn native(config: &PanelkitConfig) -> WidgetResult<Self> {
        let app = NativeApplication::new()?;
        let core = app.core().clone();
        Ok(Self::build(
            "headless-native",
            Arc::new(app),
            core,
            Self::defaults_from(config),
            config.scale(),
        ))
    }

    fn defaults_from(config: &PanelkitConfig) -> LayoutDefaults {
        LayoutDefaults {
            orientation: config.layout.orientation,
            margins: config.layout.margins,
            spacing: config.layout.spacing,
        }
    }

    pub fn app(&self) -> &Arc<dyn ApplicationBackend> {
        &self.app
    }

    pub fn tree(&self) -> &Arc<NativeTree> {
        &self.tree
    }

    /// Text dump of every native widget.
    pub fn dump_tree(&self) -> String {
        self.tree.dump()
    }

    pub fn label(&self) -> HeadlessTextWidget {
        HeadlessTextWidget::new(&self.tree, WidgetKind::Label)
    }

    pub fn line_edit(&self) -> HeadlessTextWidget {
        HeadlessTextWidget::new(&self.tree, WidgetKind::LineEdit)
    }

    pub fn text_edit(&self) -> HeadlessTextWidget {
        HeadlessTextWidget::new(&self.tree, WidgetKind::TextEdit)
    }

    pub fn file_edit(&self) -> HeadlessTextWidget {
        HeadlessTextWidget::new(&self.tree, WidgetKind::FileEdit)
    }

    pub fn push_button(&self) -> HeadlessButton {
        HeadlessButton::new(&self.tree, WidgetKind::PushButton)
    }

    pub fn check_box(&self) -> HeadlessButton {
        HeadlessButton::new(&self.tree, WidgetKind::CheckBox)
    }

    pub fn radio_button(&self) -> HeadlessButton {
        HeadlessButton::new(&self.tree, WidgetKind::RadioButton)
    }

    pub fn spin_box(&self) -> HeadlessSpinBox {
        HeadlessSpinBox::new(&self.tree, WidgetKind::SpinBox)
    }

    pub fn float_spin_box(&self) -> HeadlessSpinBox {
        HeadlessSpinBox::new(&self.tree, WidgetKind::FloatSpinBox)
    }

    pub fn slider(&self) -> HeadlessSlider {
        HeadlessSlider::new(&self.tree, WidgetKind::Slider)
    }

    pub fn float_slider(&self) -> HeadlessSlider {
        HeadlessSlider::new(&self.tree, WidgetKind::FloatSlider)
    }

    pub fn combo_box(&self) -> HeadlessComboBox {
        HeadlessComboBox::new(&self.tree)
    }

    pub fn datetime_edit(&self) -> HeadlessDateTimeEdit {
        HeadlessDateTimeEdit::new(&self.tree)
    }

    pub fn container(&self) -> HeadlessContainer {
        HeadlessContainer::new(&self.tree)
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for HeadlessBackend {
    fn name(&self) -> &str {
        self.name
    }

    fn application(&self) -> &dyn ApplicationBackend {
        self.app.as_ref()
    }

    fn build_widget(&self, kind: WidgetKind) -> WidgetResult<Box<dyn WidgetProtocol>> {
        Ok(match kind {
            WidgetKind::Label
            | WidgetKind::LineEdit
            | WidgetKind::TextEdit
            | WidgetKind::FileEdit => Box::new(HeadlessTextWidget::new(&self.tree, kind)),
            WidgetKind::PushButton | WidgetKind::CheckBox | WidgetKind::RadioButton => {
                Box::new(HeadlessButton::new(&self.tree, kind))
            }
            WidgetKind::SpinBox | WidgetKind::FloatSpinBox => {
                Box::new(HeadlessSpinBox::new(&self.tree, kind))
            }
            WidgetKind::Slider | WidgetKind::FloatSlider => {
                Box::new(HeadlessSlider::new(&self.tree, kind))
            }
            WidgetKind::ComboBox => Box::new(HeadlessComboBox::new(&self.tree)),
            WidgetKind::DateTimeEdit => Box::new(HeadlessDateTimeEdit::new(&self.tree)),
            WidgetKind::Container => Box::new(HeadlessContainer::new(&self.tree)),
        })
    }
}

static_assertions::assert_impl_all!(HeadlessBackend: Send, Sync);
static_assertions::assert_impl_all!(HeadlessApplication: Send, Sync);
