//! Headless backend widgets.
//!
//! Each widget wraps one node of a [`NativeTree`] and destroys it when
//! dropped. Notifications are queued on the tree's loop core, so callbacks
//! run on the next pass of the application loop.

use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDateTime;
use panelkit_core::logging::targets;
use panelkit_core::{ConnectionId, WidgetId};

use crate::bitmap::Bitmap;
use crate::choices::Choices;
use crate::error::{WidgetError, WidgetResult};
use crate::geometry::{Margins, Orientation};
use crate::kind::WidgetKind;
use crate::protocols::{
    Callback, ContainerProtocol, RangedWidgetProtocol, SupportsChoices, SupportsOrientation,
    SupportsText, ValueWidgetProtocol, WidgetProtocol,
};
use crate::value::{Value, ValueKind};

use super::native::{NativeHandle, NativeLayout, NativeTree};
use super::state::{ChoiceModel, NativeState, RangeModel};

/// The native node shared by every headless widget.
struct HeadlessBase {
    id: WidgetId,
    kind: WidgetKind,
    tree: Arc<NativeTree>,
    native: NativeHandle,
}

impl HeadlessBase {
    fn new(tree: &Arc<NativeTree>, kind: WidgetKind) -> Self {
        let id = tree.create(kind);
        Self {
            id,
            kind,
            tree: tree.clone(),
            native: NativeHandle::new(id, tree.clone()),
        }
    }

    fn set_visible(&self, visible: bool) {
        if let Err(err) = self.tree.set_visible(self.id, visible) {
            tracing::warn!(target: targets::WIDGET, id = ?self.id, %err, "visibility not applied");
        }
    }

    fn is_visible(&self) -> bool {
        self.tree.with_node(self.id, |n| n.visible).unwrap_or(false)
    }

    fn is_enabled(&self) -> bool {
        self.tree.is_effectively_enabled(self.id).unwrap_or(false)
    }

    fn set_enabled(&self, enabled: bool) {
        if let Err(err) = self.tree.set_enabled(self.id, enabled) {
            tracing::warn!(target: targets::WIDGET, id = ?self.id, %err, "enabled state not applied");
        }
    }

    fn parent(&self) -> Option<WidgetId> {
        self.tree.parent(self.id).ok().flatten()
    }

    fn orientation(&self) -> Orientation {
        self.tree
            .with_node(self.id, |n| n.orientation)
            .unwrap_or_default()
    }

    fn set_orientation(&self, orientation: Orientation) {
        match self
            .tree
            .with_node_mut(self.id, |n| n.orientation = orientation)
        {
            Ok(()) => {
                tracing::debug!(target: targets::WIDGET, id = ?self.id, %orientation, "orientation set");
            }
            Err(err) => {
                tracing::warn!(target: targets::WIDGET, id = ?self.id, %err, "orientation not applied");
            }
        }
    }

    /// Read the node's state.
    fn state<R>(&self, f: impl FnOnce(&NativeState) -> R) -> WidgetResult<R> {
        self.tree.with_node(self.id, |n| f(&n.state))
    }

    fn value(&self) -> Value {
        self.tree
            .with_node(self.id, |n| n.value())
            .unwrap_or_default()
    }

    fn bind_value(&self, callback: Callback<Value>) -> ConnectionId {
        self.tree
            .connect_value_changed(self.id, callback)
            .unwrap_or_default()
    }

    fn unbind_value(&self, connection: ConnectionId) -> bool {
        self.tree.disconnect_value_changed(self.id, connection)
    }

    /// Coerce an incoming value to the kind this widget holds.
    fn coerce(&self, value: Value) -> WidgetResult<Value> {
        self.kind.value_kind().unwrap_or(ValueKind::None).coerce(value)
    }
}

impl Drop for HeadlessBase {
    fn drop(&mut self) {
        self.tree.destroy(self.id);
    }
}

/// Implements [`WidgetProtocol`] for a type with a `base: HeadlessBase`
/// field, overriding the listed capability probes.
macro_rules! headless_widget {
    (@probe value) => {
        fn as_value_widget(&self) -> Option<&dyn ValueWidgetProtocol> {
            Some(self)
        }

        fn as_value_widget_mut(&mut self) -> Option<&mut dyn ValueWidgetProtocol> {
            Some(self)
        }
    };
    (@probe ranged) => {
        fn as_ranged(&self) -> Option<&dyn RangedWidgetProtocol> {
            Some(self)
        }

        fn as_ranged_mut(&mut self) -> Option<&mut dyn RangedWidgetProtocol> {
            Some(self)
        }
    };
    (@probe choices) => {
        fn as_choices(&self) -> Option<&dyn SupportsChoices> {
            Some(self)
        }

        fn as_choices_mut(&mut self) -> Option<&mut dyn SupportsChoices> {
            Some(self)
        }
    };
    (@probe text) => {
        fn as_text(&self) -> Option<&dyn SupportsText> {
            Some(self)
        }

        fn as_text_mut(&mut self) -> Option<&mut dyn SupportsText> {
            Some(self)
        }
    };
    (@probe orientation) => {
        fn as_orientation(&self) -> Option<&dyn SupportsOrientation> {
            Some(self)
        }

        fn as_orientation_mut(&mut self) -> Option<&mut dyn SupportsOrientation> {
            Some(self)
        }
    };
    (@probe container) => {
        fn as_container(&self) -> Option<&dyn ContainerProtocol> {
            Some(self)
        }

        fn as_container_mut(&mut self) -> Option<&mut dyn ContainerProtocol> {
            Some(self)
        }
    };
    ($ty:ty { $($cap:ident),* $(,)? }) => {
        impl WidgetProtocol for $ty {
            fn widget_id(&self) -> WidgetId {
                self.base.id
            }

            fn show_widget(&mut self) {
                self.base.set_visible(true);
            }

            fn hide_widget(&mut self) {
                self.base.set_visible(false);
            }

            fn is_visible(&self) -> bool {
                self.base.is_visible()
            }

            fn is_enabled(&self) -> bool {
                self.base.is_enabled()
            }

            fn set_enabled(&mut self, enabled: bool) {
                self.base.set_enabled(enabled);
            }

            fn parent(&self) -> Option<WidgetId> {
                self.base.parent()
            }

            fn set_parent(&mut self, parent: Option<WidgetId>) -> WidgetResult<()> {
                self.base.tree.set_parent(self.base.id, parent)
            }

            fn native_widget(&self) -> &dyn Any {
                &self.base.native
            }

            fn bind_parent_change_callback(
                &mut self,
                callback: Callback<Option<WidgetId>>,
            ) -> ConnectionId {
                self.base
                    .tree
                    .connect_parent_changed(self.base.id, callback)
                    .unwrap_or_default()
            }

            fn unbind_parent_change_callback(&mut self, connection: ConnectionId) -> bool {
                self.base
                    .tree
                    .disconnect_parent_changed(self.base.id, connection)
            }

            fn render(&self) -> WidgetResult<Bitmap> {
                self.base.tree.render(self.base.id)
            }

            $(headless_widget!(@probe $cap);)*
        }
    };
}

/// Implements [`ValueWidgetProtocol`] with the given state setter.
macro_rules! value_widget {
    ($ty:ty, |$state:ident, $value:ident| $apply:expr) => {
        impl ValueWidgetProtocol for $ty {
            fn value_kind(&self) -> ValueKind {
                self.base.kind.value_kind().unwrap_or(ValueKind::None)
            }

            fn value(&self) -> Value {
                self.base.value()
            }

            fn set_value(&mut self, value: Value) -> WidgetResult<()> {
                let $value = self.base.coerce(value)?;
                self.base
                    .tree
                    .update_state(self.base.id, |$state| $apply)
            }

            fn bind_change_callback(&mut self, callback: Callback<Value>) -> ConnectionId {
                self.base.bind_value(callback)
            }

            fn unbind_change_callback(&mut self, connection: ConnectionId) -> bool {
                self.base.unbind_value(connection)
            }
        }
    };
}

fn replace_text(state: &mut NativeState, new_text: String) -> bool {
    match state {
        NativeState::Text { text } | NativeState::Button { text, .. } => {
            if *text == new_text {
                false
            } else {
                *text = new_text;
                true
            }
        }
        NativeState::Path(path) => replace_path(path, PathBuf::from(new_text)),
        _ => false,
    }
}

fn replace_path(path: &mut PathBuf, new_path: PathBuf) -> bool {
    if *path == new_path {
        false
    } else {
        *path = new_path;
        true
    }
}

fn state_mismatch(kind: WidgetKind) -> WidgetError {
    tracing::error!(target: targets::WIDGET, %kind, "native state does not match widget kind");
    WidgetError::not_implemented("value")
}

// =============================================================================
// Text widgets
// =============================================================================

/// A label, line edit, text edit or file edit.
///
/// The value mirrors the text: [`Value::Text`], or [`Value::Path`] for a
/// file edit. A file edit stores the path itself, so paths that are not
/// valid UTF-8 survive a round trip through the value.
pub struct HeadlessTextWidget {
    base: HeadlessBase,
}

impl HeadlessTextWidget {
    pub(crate) fn new(tree: &Arc<NativeTree>, kind: WidgetKind) -> Self {
        Self {
            base: HeadlessBase::new(tree, kind),
        }
    }
}

headless_widget!(HeadlessTextWidget { value, text });

value_widget!(HeadlessTextWidget, |state, value| match (state, value) {
    (NativeState::Path(path), Value::Path(new_path)) => Ok(replace_path(path, new_path)),
    (NativeState::Path(_), other) => Err(WidgetError::TypeMismatch {
        expected: ValueKind::Path,
        found: other.kind(),
    }),
    (state, Value::Text(text)) => Ok(replace_text(state, text)),
    (_, other) => Err(WidgetError::TypeMismatch {
        expected: ValueKind::Text,
        found: other.kind(),
    }),
});

impl SupportsText for HeadlessTextWidget {
    fn text(&self) -> String {
        self.base
            .state(|state| match state {
                NativeState::Text { text } => text.clone(),
                NativeState::Path(path) => path.display().to_string(),
                _ => String::new(),
            })
            .unwrap_or_default()
    }

    fn set_text(&mut self, text: &str) {
        let text = text.to_owned();
        if let Err(err) = self
            .base
            .tree
            .update_state(self.base.id, |state| Ok(replace_text(state, text)))
        {
            tracing::warn!(target: targets::WIDGET, id = ?self.base.id, %err, "text not applied");
        }
    }
}

impl HeadlessTextWidget {
    /// The value as a path, for file edits.
    pub fn path(&self) -> PathBuf {
        self.base
            .state(|state| match state {
                NativeState::Path(path) => path.clone(),
                NativeState::Text { text } => PathBuf::from(text),
                _ => PathBuf::new(),
            })
            .unwrap_or_default()
    }
}

// =============================================================================
// Buttons
// =============================================================================

/// A push button, check box or radio button.
///
/// The checked state is the value; the label is the text.
pub struct HeadlessButton {
    base: HeadlessBase,
}

impl HeadlessButton {
    pub(crate) fn new(tree: &Arc<NativeTree>, kind: WidgetKind) -> Self {
        Self {
            base: HeadlessBase::new(tree, kind),
        }
    }

    pub fn is_checked(&self) -> bool {
        self.base.value().as_bool().unwrap_or(false)
    }
}

headless_widget!(HeadlessButton { value, text });

value_widget!(HeadlessButton, |state, value| match (state, value) {
    (NativeState::Button { checked, .. }, Value::Bool(new)) => {
        let changed = *checked != new;
        *checked = new;
        Ok(changed)
    }
    _ => Err(state_mismatch(WidgetKind::PushButton)),
});

impl SupportsText for HeadlessButton {
    fn text(&self) -> String {
        self.base
            .state(|state| match state {
                NativeState::Button { text, .. } => text.clone(),
                _ => String::new(),
            })
            .unwrap_or_default()
    }

    fn set_text(&mut self, text: &str) {
        let text = text.to_owned();
        // The label is not the value.
        if let Err(err) = self.base.tree.update_state(self.base.id, |state| {
            replace_text(state, text);
            Ok(false)
        }) {
            tracing::warn!(target: targets::WIDGET, id = ?self.base.id, %err, "label not applied");
        }
    }
}

// =============================================================================
// Ranged widgets
// =============================================================================

fn with_range<R>(base: &HeadlessBase, f: impl FnOnce(&RangeModel) -> R) -> Option<R> {
    base.state(|state| match state {
        NativeState::Range(model) => Some(f(model)),
        _ => None,
    })
    .ok()
    .flatten()
}

fn update_range(
    base: &HeadlessBase,
    f: impl FnOnce(&mut RangeModel) -> WidgetResult<bool>,
) -> WidgetResult<()> {
    let kind = base.kind;
    base.tree.update_state(base.id, |state| match state {
        NativeState::Range(model) => f(model),
        _ => Err(state_mismatch(kind)),
    })
}

macro_rules! ranged_widget {
    ($ty:ty) => {
        value_widget!($ty, |state, value| match (state, value.as_float()) {
            (NativeState::Range(model), Some(x)) => model.set_value(x),
            (NativeState::Range(_), None) => Err(WidgetError::TypeMismatch {
                expected: ValueKind::Float,
                found: value.kind(),
            }),
            _ => Err(state_mismatch(WidgetKind::SpinBox)),
        });

        impl RangedWidgetProtocol for $ty {
            fn minimum(&self) -> f64 {
                with_range(&self.base, RangeModel::minimum).unwrap_or_default()
            }

            fn set_minimum(&mut self, minimum: f64) -> WidgetResult<()> {
                update_range(&self.base, |model| model.set_minimum(minimum))
            }

            fn maximum(&self) -> f64 {
                with_range(&self.base, RangeModel::maximum).unwrap_or_default()
            }

            fn set_maximum(&mut self, maximum: f64) -> WidgetResult<()> {
                update_range(&self.base, |model| model.set_maximum(maximum))
            }

            fn step(&self) -> f64 {
                with_range(&self.base, RangeModel::step).unwrap_or_default()
            }

            fn set_step(&mut self, step: f64) -> WidgetResult<()> {
                update_range(&self.base, |model| model.set_step(step).map(|()| false))
            }
        }
    };
}

/// An integer or float spin box.
pub struct HeadlessSpinBox {
    base: HeadlessBase,
}

impl HeadlessSpinBox {
    pub(crate) fn new(tree: &Arc<NativeTree>, kind: WidgetKind) -> Self {
        Self {
            base: HeadlessBase::new(tree, kind),
        }
    }
}

headless_widget!(HeadlessSpinBox { value, ranged });
ranged_widget!(HeadlessSpinBox);

/// An integer or float slider.
pub struct HeadlessSlider {
    base: HeadlessBase,
}

impl HeadlessSlider {
    pub(crate) fn new(tree: &Arc<NativeTree>, kind: WidgetKind) -> Self {
        Self {
            base: HeadlessBase::new(tree, kind),
        }
    }
}

headless_widget!(HeadlessSlider { value, ranged, orientation });
ranged_widget!(HeadlessSlider);

impl SupportsOrientation for HeadlessSlider {
    fn orientation(&self) -> Orientation {
        self.base.orientation()
    }

    fn set_orientation(&mut self, orientation: Orientation) {
        self.base.set_orientation(orientation);
    }
}

// =============================================================================
// Combo box
// =============================================================================

/// A drop-down choice among (label, data) pairs. The value is the data of
/// the selected choice.
pub struct HeadlessComboBox {
    base: HeadlessBase,
}

impl HeadlessComboBox {
    pub(crate) fn new(tree: &Arc<NativeTree>) -> Self {
        Self {
            base: HeadlessBase::new(tree, WidgetKind::ComboBox),
        }
    }

    fn with_model<R>(&self, f: impl FnOnce(&ChoiceModel) -> R) -> Option<R> {
        self.base
            .state(|state| match state {
                NativeState::Choice(model) => Some(f(model)),
                _ => None,
            })
            .ok()
            .flatten()
    }

    /// Label of the selected choice.
    pub fn current_label(&self) -> Option<String> {
        self.with_model(|m| m.current_label().map(str::to_owned))
            .flatten()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.with_model(ChoiceModel::current_index).flatten()
    }
}

headless_widget!(HeadlessComboBox { value, choices });

value_widget!(HeadlessComboBox, |state, value| match state {
    NativeState::Choice(model) => model.set_value(&value),
    _ => Err(state_mismatch(WidgetKind::ComboBox)),
});

impl SupportsChoices for HeadlessComboBox {
    fn choices(&self) -> Choices {
        self.with_model(|m| m.choices().clone()).unwrap_or_default()
    }

    fn set_choices(&mut self, choices: Choices) -> WidgetResult<()> {
        tracing::debug!(target: targets::WIDGET, id = ?self.base.id, count = choices.len(), "choices set");
        self.base.tree.update_state(self.base.id, |state| match state {
            NativeState::Choice(model) => Ok(model.set_choices(choices)),
            _ => Err(state_mismatch(WidgetKind::ComboBox)),
        })
    }
}

// =============================================================================
// Date and time
// =============================================================================

/// A date and time editor.
pub struct HeadlessDateTimeEdit {
    base: HeadlessBase,
}

impl HeadlessDateTimeEdit {
    pub(crate) fn new(tree: &Arc<NativeTree>) -> Self {
        Self {
            base: HeadlessBase::new(tree, WidgetKind::DateTimeEdit),
        }
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.base.value().as_datetime().unwrap_or_default()
    }
}

headless_widget!(HeadlessDateTimeEdit { value });

value_widget!(HeadlessDateTimeEdit, |state, value| match (state, value) {
    (NativeState::DateTime(current), Value::DateTime(new)) => {
        let changed = *current != new;
        *current = new;
        Ok(changed)
    }
    _ => Err(state_mismatch(WidgetKind::DateTimeEdit)),
});

// =============================================================================
// Container
// =============================================================================

/// A box layout container.
pub struct HeadlessContainer {
    base: HeadlessBase,
    layout: NativeLayout,
}

impl HeadlessContainer {
    pub(crate) fn new(tree: &Arc<NativeTree>) -> Self {
        let base = HeadlessBase::new(tree, WidgetKind::Container);
        let layout = NativeLayout::new(base.id, tree.clone());
        Self { base, layout }
    }

    fn members(&self) -> Vec<WidgetId> {
        self.layout.members()
    }
}

headless_widget!(HeadlessContainer { orientation, container });

impl SupportsOrientation for HeadlessContainer {
    fn orientation(&self) -> Orientation {
        self.base.orientation()
    }

    fn set_orientation(&mut self, orientation: Orientation) {
        self.base.set_orientation(orientation);
    }
}

impl ContainerProtocol for HeadlessContainer {
    fn insert_widget(&mut self, position: isize, widget: WidgetId) -> WidgetResult<()> {
        self.base.tree.insert_child(self.base.id, position, widget)
    }

    fn remove_widget(&mut self, widget: WidgetId) -> WidgetResult<()> {
        self.base.tree.remove_child(self.base.id, widget)
    }

    fn remove_index(&mut self, index: isize) -> WidgetResult<WidgetId> {
        self.base.tree.remove_child_at(self.base.id, index)
    }

    fn count(&self) -> usize {
        self.members().len()
    }

    fn index_of(&self, widget: WidgetId) -> Option<usize> {
        self.members().iter().position(|m| *m == widget)
    }

    fn get_index(&self, index: isize) -> Option<WidgetId> {
        let index = usize::try_from(index).ok()?;
        self.members().get(index).copied()
    }

    fn native_layout(&self) -> &dyn Any {
        &self.layout
    }

    fn margins(&self) -> Margins {
        self.base
            .state(|state| match state {
                NativeState::Container(layout) => layout.margins,
                _ => Margins::ZERO,
            })
            .unwrap_or_default()
    }

    fn set_margins(&mut self, margins: Margins) {
        if let Err(err) = self.base.tree.set_margins(self.base.id, margins) {
            tracing::warn!(target: targets::CONTAINER, %err, "margins not applied");
        }
    }

    fn children(&self) -> Vec<WidgetId> {
        self.members()
    }
}

static_assertions::assert_impl_all!(HeadlessSlider: Send);
static_assertions::assert_impl_all!(HeadlessContainer: Send);
