//! The base widget contract and capability probing.

use std::any::Any;

use panelkit_core::{ConnectionId, WidgetId};

use crate::bitmap::Bitmap;
use crate::error::{WidgetError, WidgetResult};

use super::capability::{Capabilities, SupportsChoices, SupportsOrientation, SupportsText};
use super::container::ContainerProtocol;
use super::value::{RangedWidgetProtocol, ValueWidgetProtocol};

/// A callback bound to a widget notification.
///
/// Callbacks are delivered through the owning application's task queue: they
/// never run inside the call that caused the change, and a widget's
/// callbacks run in the order its changes happened.
pub type Callback<T> = Box<dyn Fn(&T) + Send + Sync + 'static>;

/// The contract every backend widget satisfies.
///
/// A backend widget wraps exactly one native widget and releases it when
/// dropped. Richer contracts are discovered through the `as_*` probes, which
/// a widget overrides for each capability it implements.
pub trait WidgetProtocol: Send {
    /// Handle of the wrapped native widget.
    fn widget_id(&self) -> WidgetId;

    /// Make the native widget visible. Does nothing if it already is.
    fn show_widget(&mut self);

    /// Hide the native widget. Does nothing if it already is hidden.
    fn hide_widget(&mut self);

    fn is_visible(&self) -> bool;

    /// Effective enabled state: `false` if this widget or any ancestor is disabled.
    fn is_enabled(&self) -> bool;

    /// Set this widget's own enabled flag. The widget's value is untouched.
    fn set_enabled(&mut self, enabled: bool);

    fn parent(&self) -> Option<WidgetId>;

    /// Move the native widget under `parent` (or make it a top-level widget).
    ///
    /// This never adds the widget to the parent's ordered children: container
    /// membership is managed through [`ContainerProtocol`].
    fn set_parent(&mut self, parent: Option<WidgetId>) -> WidgetResult<()>;

    /// The backend's native object.
    fn native_widget(&self) -> &dyn Any;

    /// Call `callback` with the new parent after every actual reparent.
    fn bind_parent_change_callback(
        &mut self,
        callback: Callback<Option<WidgetId>>,
    ) -> ConnectionId;

    fn unbind_parent_change_callback(&mut self, connection: ConnectionId) -> bool;

    /// Snapshot the widget as currently shown.
    ///
    /// Pending layout is applied first. The bitmap has the widget's displayed
    /// pixel size.
    fn render(&self) -> WidgetResult<Bitmap>;

    // -------------------------------------------------------------------------
    // Capability probes
    // -------------------------------------------------------------------------

    fn as_value_widget(&self) -> Option<&dyn ValueWidgetProtocol> {
        None
    }

    fn as_value_widget_mut(&mut self) -> Option<&mut dyn ValueWidgetProtocol> {
        None
    }

    fn as_ranged(&self) -> Option<&dyn RangedWidgetProtocol> {
        None
    }

    fn as_ranged_mut(&mut self) -> Option<&mut dyn RangedWidgetProtocol> {
        None
    }

    fn as_choices(&self) -> Option<&dyn SupportsChoices> {
        None
    }

    fn as_choices_mut(&mut self) -> Option<&mut dyn SupportsChoices> {
        None
    }

    fn as_text(&self) -> Option<&dyn SupportsText> {
        None
    }

    fn as_text_mut(&mut self) -> Option<&mut dyn SupportsText> {
        None
    }

    fn as_orientation(&self) -> Option<&dyn SupportsOrientation> {
        None
    }

    fn as_orientation_mut(&mut self) -> Option<&mut dyn SupportsOrientation> {
        None
    }

    fn as_container(&self) -> Option<&dyn ContainerProtocol> {
        None
    }

    fn as_container_mut(&mut self) -> Option<&mut dyn ContainerProtocol> {
        None
    }
}

/// Capability queries available on every widget.
///
/// The `require_*` methods turn a missing capability into
/// [`WidgetError::NotImplemented`] at call time.
pub trait CapabilityExt {
    /// The capabilities this widget's probes report.
    fn capabilities(&self) -> Capabilities;

    fn supports(&self, required: Capabilities) -> bool {
        self.capabilities().contains(required)
    }

    fn require_value(&self) -> WidgetResult<&dyn ValueWidgetProtocol>;
    fn require_value_mut(&mut self) -> WidgetResult<&mut dyn ValueWidgetProtocol>;
    fn require_ranged(&self) -> WidgetResult<&dyn RangedWidgetProtocol>;
    fn require_ranged_mut(&mut self) -> WidgetResult<&mut dyn RangedWidgetProtocol>;
    fn require_choices(&self) -> WidgetResult<&dyn SupportsChoices>;
    fn require_choices_mut(&mut self) -> WidgetResult<&mut dyn SupportsChoices>;
    fn require_text(&self) -> WidgetResult<&dyn SupportsText>;
    fn require_text_mut(&mut self) -> WidgetResult<&mut dyn SupportsText>;
    fn require_orientation(&self) -> WidgetResult<&dyn SupportsOrientation>;
    fn require_orientation_mut(&mut self) -> WidgetResult<&mut dyn SupportsOrientation>;
    fn require_container(&self) -> WidgetResult<&dyn ContainerProtocol>;
    fn require_container_mut(&mut self) -> WidgetResult<&mut dyn ContainerProtocol>;
}

impl<W: WidgetProtocol + ?Sized> CapabilityExt for W {
    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::empty();
        caps.set(Capabilities::VALUE, self.as_value_widget().is_some());
        caps.set(Capabilities::RANGED, self.as_ranged().is_some());
        caps.set(Capabilities::CHOICES, self.as_choices().is_some());
        caps.set(Capabilities::TEXT, self.as_text().is_some());
        caps.set(Capabilities::ORIENTATION, self.as_orientation().is_some());
        caps.set(Capabilities::CONTAINER, self.as_container().is_some());
        caps
    }

    fn require_value(&self) -> WidgetResult<&dyn ValueWidgetProtocol> {
        self.as_value_widget()
            .ok_or(WidgetError::not_implemented("value"))
    }

    fn require_value_mut(&mut self) -> WidgetResult<&mut dyn ValueWidgetProtocol> {
        self.as_value_widget_mut()
            .ok_or(WidgetError::not_implemented("value"))
    }

    fn require_ranged(&self) -> WidgetResult<&dyn RangedWidgetProtocol> {
        self.as_ranged().ok_or(WidgetError::not_implemented("ranged"))
    }

    fn require_ranged_mut(&mut self) -> WidgetResult<&mut dyn RangedWidgetProtocol> {
        self.as_ranged_mut()
            .ok_or(WidgetError::not_implemented("ranged"))
    }

    fn require_choices(&self) -> WidgetResult<&dyn SupportsChoices> {
        self.as_choices()
            .ok_or(WidgetError::not_implemented("choices"))
    }

    fn require_choices_mut(&mut self) -> WidgetResult<&mut dyn SupportsChoices> {
        self.as_choices_mut()
            .ok_or(WidgetError::not_implemented("choices"))
    }

    fn require_text(&self) -> WidgetResult<&dyn SupportsText> {
        self.as_text().ok_or(WidgetError::not_implemented("text"))
    }

    fn require_text_mut(&mut self) -> WidgetResult<&mut dyn SupportsText> {
        self.as_text_mut().ok_or(WidgetError::not_implemented("text"))
    }

    fn require_orientation(&self) -> WidgetResult<&dyn SupportsOrientation> {
        self.as_orientation()
            .ok_or(WidgetError::not_implemented("orientation"))
    }

    fn require_orientation_mut(&mut self) -> WidgetResult<&mut dyn SupportsOrientation> {
        self.as_orientation_mut()
            .ok_or(WidgetError::not_implemented("orientation"))
    }

    fn require_container(&self) -> WidgetResult<&dyn ContainerProtocol> {
        self.as_container()
            .ok_or(WidgetError::not_implemented("container"))
    }

    fn require_container_mut(&mut self) -> WidgetResult<&mut dyn ContainerProtocol> {
        self.as_container_mut()
            .ok_or(WidgetError::not_implemented("container"))
    }
}
