//! The headless native widget tree.
//!
//! [`NativeTree`] plays the role of a native toolkit: it owns every native
//! node in an arena keyed by [`WidgetId`], keeps the parent/child links and
//! the ordered members of each container layout, and queues change
//! notifications on the application's loop core.

use std::path::PathBuf;
use std::sync::Arc;

use panelkit_core::logging::targets;
use panelkit_core::{
    ConnectionId, DebugTree, LoopCore, PerfSpan, Signal, TreeFormatter, WidgetId,
};
use parking_lot::RwLock;
use slotmap::SlotMap;

use crate::bitmap::Bitmap;
use crate::error::{WidgetError, WidgetResult};
use crate::geometry::{Margins, Orientation, Size};
use crate::kind::WidgetKind;
use crate::value::Value;

use super::layout;
use super::paint;
use super::state::{ChoiceModel, LayoutState, NativeState, RangeModel};

pub(crate) type NodeMap = SlotMap<WidgetId, NativeNode>;

/// Layout settings given to new containers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutDefaults {
    pub orientation: Orientation,
    pub margins: Margins,
    pub spacing: u32,
}

impl Default for LayoutDefaults {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            margins: Margins::ZERO,
            spacing: 4,
        }
    }
}

/// One native widget.
pub struct NativeNode {
    pub(crate) kind: WidgetKind,
    pub(crate) visible: bool,
    pub(crate) enabled: bool,
    pub(crate) parent: Option<WidgetId>,
    /// Native children in the order they were parented.
    pub(crate) children: Vec<WidgetId>,
    pub(crate) orientation: Orientation,
    pub(crate) state: NativeState,
    pub(crate) parent_changed: Signal<Option<WidgetId>>,
    pub(crate) value_changed: Signal<Value>,
    pub(crate) visibility_changed: Signal<bool>,
}

impl NativeNode {
    fn new(kind: WidgetKind, defaults: &LayoutDefaults) -> Self {
        let state = match kind {
            WidgetKind::Label
            | WidgetKind::LineEdit
            | WidgetKind::TextEdit => NativeState::Text {
                text: String::new(),
            },
            WidgetKind::FileEdit => NativeState::Path(PathBuf::new()),
            WidgetKind::PushButton | WidgetKind::CheckBox | WidgetKind::RadioButton => {
                NativeState::Button {
                    text: String::new(),
                    checked: false,
                }
            }
            WidgetKind::SpinBox | WidgetKind::FloatSpinBox => {
                NativeState::Range(RangeModel::spin_box(kind.is_integral()))
            }
            WidgetKind::Slider | WidgetKind::FloatSlider => {
                NativeState::Range(RangeModel::slider(kind.is_integral()))
            }
            WidgetKind::ComboBox => NativeState::Choice(ChoiceModel::default()),
            WidgetKind::DateTimeEdit => NativeState::DateTime(Default::default()),
            WidgetKind::Container => NativeState::Container(LayoutState {
                members: Vec::new(),
                margins: defaults.margins,
                spacing: defaults.spacing,
            }),
        };
        let orientation = match kind {
            WidgetKind::Container => defaults.orientation,
            _ => Orientation::Horizontal,
        };
        Self {
            kind,
            visible: true,
            enabled: true,
            parent: None,
            children: Vec::new(),
            orientation,
            state,
            parent_changed: Signal::new(),
            value_changed: Signal::new(),
            visibility_changed: Signal::new(),
        }
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// The node's value as seen through the value protocol.
    pub fn value(&self) -> Value {
        match &self.state {
            NativeState::Path(path) => Value::Path(path.clone()),
            NativeState::Text { text } => Value::Text(text.clone()),
            NativeState::Button { checked, .. } => Value::Bool(*checked),
            NativeState::Range(model) => model.value(),
            NativeState::Choice(model) => model.value(),
            NativeState::DateTime(dt) => Value::DateTime(*dt),
            NativeState::Container(_) => Value::None,
        }
    }

    pub(crate) fn layout(&self) -> Option<&LayoutState> {
        match &self.state {
            NativeState::Container(layout) => Some(layout),
            _ => None,
        }
    }

    fn layout_mut(&mut self) -> Option<&mut LayoutState> {
        match &mut self.state {
            NativeState::Container(layout) => Some(layout),
            _ => None,
        }
    }

    /// Short description used by the debug tree.
    fn summary(&self) -> String {
        match &self.state {
            NativeState::Text { text } | NativeState::Button { text, .. } => text.clone(),
            NativeState::Path(path) => path.display().to_string(),
            NativeState::Range(model) => model.value().to_string(),
            NativeState::Choice(model) => model.current_label().unwrap_or_default().to_owned(),
            NativeState::DateTime(dt) => dt.to_string(),
            NativeState::Container(layout) => format!("{} members", layout.members.len()),
        }
    }

    fn disconnect_all(&self) {
        self.parent_changed.disconnect_all();
        self.value_changed.disconnect_all();
        self.visibility_changed.disconnect_all();
    }
}

/// Arena of native widgets sharing one loop core.
pub struct NativeTree {
    nodes: RwLock<NodeMap>,
    core: Arc<LoopCore>,
    defaults: LayoutDefaults,
    scale: u32,
}

impl NativeTree {
    pub fn new(core: Arc<LoopCore>, defaults: LayoutDefaults, scale: u32) -> Self {
        Self {
            nodes: RwLock::new(SlotMap::with_key()),
            core,
            defaults,
            scale: scale.max(1),
        }
    }

    pub fn core(&self) -> &Arc<LoopCore> {
        &self.core
    }

    /// Pixel scale applied when rendering.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn defaults(&self) -> &LayoutDefaults {
        &self.defaults
    }

    /// Create a native node.
    pub fn create(&self, kind: WidgetKind) -> WidgetId {
        let id = self.nodes.write().insert(NativeNode::new(kind, &self.defaults));
        tracing::debug!(target: targets::WIDGET, ?id, %kind, "native widget created");
        id
    }

    /// Release a native node.
    ///
    /// Its subscribers are disconnected first, so no queued notification of
    /// the node is delivered afterwards. The node leaves its parent, and its
    /// children become top-level widgets.
    pub fn destroy(&self, id: WidgetId) {
        let mut nodes = self.nodes.write();
        let Some(node) = nodes.get(id) else {
            return;
        };
        node.disconnect_all();
        let parent = node.parent;
        let children = node.children.clone();

        if let Some(parent) = parent.and_then(|p| nodes.get_mut(p)) {
            Self::detach(parent, id);
        }
        for child in children {
            if let Some(child_node) = nodes.get_mut(child) {
                child_node.parent = None;
                child_node.parent_changed.emit_queued(None, self.core.as_ref());
            }
        }
        nodes.remove(id);
        tracing::debug!(target: targets::WIDGET, ?id, "native widget destroyed");
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    /// Read a node.
    pub fn with_node<R>(&self, id: WidgetId, f: impl FnOnce(&NativeNode) -> R) -> WidgetResult<R> {
        let nodes = self.nodes.read();
        nodes.get(id).map(f).ok_or(WidgetError::UnknownWidget(id))
    }

    /// Mutate a node's kind-specific state.
    ///
    /// `f` returns whether the node's value changed; if so, the value change
    /// is queued to the node's subscribers.
    pub fn update_state(
        &self,
        id: WidgetId,
        f: impl FnOnce(&mut NativeState) -> WidgetResult<bool>,
    ) -> WidgetResult<()> {
        let mut nodes = self.nodes.write();
        let node = nodes.get_mut(id).ok_or(WidgetError::UnknownWidget(id))?;
        if f(&mut node.state)? {
            let value = node.value();
            tracing::debug!(target: targets::WIDGET, ?id, %value, "value changed");
            node.value_changed.emit_queued(value, self.core.as_ref());
        }
        Ok(())
    }

    /// Mutate a node directly, without value notification.
    pub(crate) fn with_node_mut<R>(
        &self,
        id: WidgetId,
        f: impl FnOnce(&mut NativeNode) -> R,
    ) -> WidgetResult<R> {
        let mut nodes = self.nodes.write();
        nodes.get_mut(id).map(f).ok_or(WidgetError::UnknownWidget(id))
    }

    // -------------------------------------------------------------------------
    // Visibility and enabled state
    // -------------------------------------------------------------------------

    /// Returns whether the visibility actually changed.
    pub fn set_visible(&self, id: WidgetId, visible: bool) -> WidgetResult<bool> {
        let mut nodes = self.nodes.write();
        let node = nodes.get_mut(id).ok_or(WidgetError::UnknownWidget(id))?;
        if node.visible == visible {
            tracing::trace!(target: targets::WIDGET, ?id, visible, "visibility unchanged");
            return Ok(false);
        }
        node.visible = visible;
        node.visibility_changed
            .emit_queued(visible, self.core.as_ref());
        tracing::debug!(target: targets::WIDGET, ?id, visible, "visibility changed");
        Ok(true)
    }

    pub fn set_enabled(&self, id: WidgetId, enabled: bool) -> WidgetResult<()> {
        self.with_node_mut(id, |node| node.enabled = enabled)
    }

    /// `false` if the node or any of its ancestors is disabled.
    pub fn is_effectively_enabled(&self, id: WidgetId) -> WidgetResult<bool> {
        let nodes = self.nodes.read();
        if !nodes.contains_key(id) {
            return Err(WidgetError::UnknownWidget(id));
        }
        Ok(Self::effectively_enabled(&nodes, id))
    }

    pub(crate) fn effectively_enabled(nodes: &NodeMap, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| nodes.get(c)) {
            if !node.enabled {
                return false;
            }
            current = node.parent;
        }
        true
    }

    // -------------------------------------------------------------------------
    // Parentage
    // -------------------------------------------------------------------------

    /// Whether `ancestor` is `id` itself or one of its ancestors.
    fn is_self_or_ancestor(nodes: &NodeMap, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = nodes.get(c).and_then(|n| n.parent);
        }
        false
    }

    fn detach(parent: &mut NativeNode, child: WidgetId) {
        parent.children.retain(|c| *c != child);
        if let Some(layout) = parent.layout_mut() {
            layout.members.retain(|c| *c != child);
        }
    }

    /// Move `id` under `new_parent`. Returns whether the parent changed.
    fn reparent(
        nodes: &mut NodeMap,
        core: &LoopCore,
        id: WidgetId,
        new_parent: Option<WidgetId>,
    ) -> WidgetResult<bool> {
        let old_parent = nodes
            .get(id)
            .ok_or(WidgetError::UnknownWidget(id))?
            .parent;
        if let Some(parent) = new_parent {
            if !nodes.contains_key(parent) {
                return Err(WidgetError::UnknownWidget(parent));
            }
            if Self::is_self_or_ancestor(nodes, id, parent) {
                return Err(WidgetError::CircularParentage);
            }
        }
        if old_parent == new_parent {
            tracing::trace!(target: targets::WIDGET, ?id, "parent unchanged");
            return Ok(false);
        }

        if let Some(old) = old_parent.and_then(|p| nodes.get_mut(p)) {
            Self::detach(old, id);
        }
        if let Some(parent) = new_parent.and_then(|p| nodes.get_mut(p)) {
            parent.children.push(id);
        }
        if let Some(node) = nodes.get_mut(id) {
            node.parent = new_parent;
            node.parent_changed.emit_queued(new_parent, core);
        }
        tracing::debug!(target: targets::WIDGET, ?id, ?old_parent, ?new_parent, "reparented");
        Ok(true)
    }

    /// Set the native parent of `id`. Container membership is left alone,
    /// except that leaving a container also leaves its layout.
    pub fn set_parent(&self, id: WidgetId, parent: Option<WidgetId>) -> WidgetResult<()> {
        let mut nodes = self.nodes.write();
        Self::reparent(&mut nodes, &self.core, id, parent).map(|_| ())
    }

    pub fn parent(&self, id: WidgetId) -> WidgetResult<Option<WidgetId>> {
        self.with_node(id, |node| node.parent)
    }

    // -------------------------------------------------------------------------
    // Container layouts
    // -------------------------------------------------------------------------

    fn require_layout(nodes: &NodeMap, container: WidgetId) -> WidgetResult<&LayoutState> {
        nodes
            .get(container)
            .ok_or(WidgetError::UnknownWidget(container))?
            .layout()
            .ok_or(WidgetError::NotImplemented {
                capability: "container",
            })
    }

    fn members_mut(nodes: &mut NodeMap, container: WidgetId) -> WidgetResult<&mut Vec<WidgetId>> {
        nodes
            .get_mut(container)
            .and_then(|node| node.layout_mut())
            .map(|layout| &mut layout.members)
            .ok_or(WidgetError::UnknownWidget(container))
    }

    /// Insert `child` into the layout of `container` at `position`.
    ///
    /// The position is clamped to `[0, count]`. A child already in this
    /// layout moves; a child of another container leaves it first.
    pub fn insert_child(
        &self,
        container: WidgetId,
        position: isize,
        child: WidgetId,
    ) -> WidgetResult<()> {
        let mut nodes = self.nodes.write();
        Self::require_layout(&nodes, container)?;
        if !nodes.contains_key(child) {
            return Err(WidgetError::UnknownWidget(child));
        }
        if Self::is_self_or_ancestor(&nodes, child, container) {
            return Err(WidgetError::CircularParentage);
        }

        Self::reparent(&mut nodes, &self.core, child, Some(container))?;
        let members = Self::members_mut(&mut nodes, container)?;
        if let Some(existing) = members.iter().position(|m| *m == child) {
            members.remove(existing);
        }
        let index = position.clamp(0, members.len() as isize) as usize;
        members.insert(index, child);
        tracing::debug!(
            target: targets::CONTAINER,
            ?container,
            ?child,
            index,
            count = members.len(),
            "child inserted"
        );
        Ok(())
    }

    /// Remove `child` from the layout of `container` and clear its parent.
    pub fn remove_child(&self, container: WidgetId, child: WidgetId) -> WidgetResult<()> {
        let mut nodes = self.nodes.write();
        let index = Self::require_layout(&nodes, container)?
            .members
            .iter()
            .position(|m| *m == child)
            .ok_or(WidgetError::ChildNotFound(child))?;
        Self::take_member(&mut nodes, &self.core, container, index).map(|_| ())
    }

    /// Remove the member at `index` from the layout of `container`.
    pub fn remove_child_at(&self, container: WidgetId, index: isize) -> WidgetResult<WidgetId> {
        let mut nodes = self.nodes.write();
        let count = Self::require_layout(&nodes, container)?.members.len();
        let index = usize::try_from(index)
            .ok()
            .filter(|i| *i < count)
            .ok_or(WidgetError::IndexOutOfRange { index, count })?;
        Self::take_member(&mut nodes, &self.core, container, index)
    }

    fn take_member(
        nodes: &mut NodeMap,
        core: &LoopCore,
        container: WidgetId,
        index: usize,
    ) -> WidgetResult<WidgetId> {
        let child = Self::members_mut(nodes, container)?.remove(index);
        Self::reparent(nodes, core, child, None)?;
        tracing::debug!(target: targets::CONTAINER, ?container, ?child, index, "child removed");
        Ok(child)
    }

    /// Ordered layout members of `container`.
    pub fn members(&self, container: WidgetId) -> WidgetResult<Vec<WidgetId>> {
        let nodes = self.nodes.read();
        Ok(Self::require_layout(&nodes, container)?.members.clone())
    }

    pub fn set_margins(&self, container: WidgetId, margins: Margins) -> WidgetResult<()> {
        let mut nodes = self.nodes.write();
        Self::require_layout(&nodes, container)?;
        if let Some(layout) = nodes.get_mut(container).and_then(|n| n.layout_mut()) {
            layout.margins = margins;
        }
        Ok(())
    }

    pub fn set_spacing(&self, container: WidgetId, spacing: u32) -> WidgetResult<()> {
        let mut nodes = self.nodes.write();
        Self::require_layout(&nodes, container)?;
        if let Some(layout) = nodes.get_mut(container).and_then(|n| n.layout_mut()) {
            layout.spacing = spacing;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Geometry and rendering
    // -------------------------------------------------------------------------

    /// Displayed size of a node in pixels, after layout.
    pub fn size(&self, id: WidgetId) -> WidgetResult<Size> {
        let nodes = self.nodes.read();
        if !nodes.contains_key(id) {
            return Err(WidgetError::UnknownWidget(id));
        }
        let logical = layout::size_hint(&nodes, id);
        Ok(Size::new(
            logical.width.saturating_mul(self.scale),
            logical.height.saturating_mul(self.scale),
        ))
    }

    /// Lay out and paint a node and its visible layout members.
    #[tracing::instrument(skip(self), target = "panelkit::widget", level = "debug")]
    pub fn render(&self, id: WidgetId) -> WidgetResult<Bitmap> {
        let nodes = self.nodes.read();
        if !nodes.contains_key(id) {
            return Err(WidgetError::UnknownWidget(id));
        }
        let _perf = PerfSpan::new("paint_tree");
        let image = paint::paint_tree(&nodes, id);
        let image = if self.scale > 1 {
            image::imageops::resize(
                &image,
                image.width() * self.scale,
                image.height() * self.scale,
                image::imageops::FilterType::Nearest,
            )
        } else {
            image
        };
        Ok(Bitmap::from_image(image))
    }

    /// A text dump of the whole tree.
    pub fn dump(&self) -> String {
        TreeFormatter::new().format_all(self)
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    pub(crate) fn connect_parent_changed(
        &self,
        id: WidgetId,
        slot: Box<dyn Fn(&Option<WidgetId>) + Send + Sync>,
    ) -> WidgetResult<ConnectionId> {
        self.with_node(id, |node| node.parent_changed.connect_boxed(slot))
    }

    pub(crate) fn disconnect_parent_changed(&self, id: WidgetId, connection: ConnectionId) -> bool {
        self.with_node(id, |node| node.parent_changed.disconnect(connection))
            .unwrap_or(false)
    }

    pub(crate) fn connect_value_changed(
        &self,
        id: WidgetId,
        slot: Box<dyn Fn(&Value) + Send + Sync>,
    ) -> WidgetResult<ConnectionId> {
        self.with_node(id, |node| node.value_changed.connect_boxed(slot))
    }

    pub(crate) fn disconnect_value_changed(&self, id: WidgetId, connection: ConnectionId) -> bool {
        self.with_node(id, |node| node.value_changed.disconnect(connection))
            .unwrap_or(false)
    }

    pub(crate) fn connect_visibility_changed(
        &self,
        id: WidgetId,
        slot: Box<dyn Fn(&bool) + Send + Sync>,
    ) -> WidgetResult<ConnectionId> {
        self.with_node(id, |node| node.visibility_changed.connect_boxed(slot))
    }
}

impl DebugTree for NativeTree {
    type Node = WidgetId;

    fn roots(&self) -> Vec<WidgetId> {
        self.nodes
            .read()
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    fn children(&self, node: WidgetId) -> Vec<WidgetId> {
        self.with_node(node, |n| n.children.clone())
            .unwrap_or_default()
    }

    fn label(&self, node: WidgetId) -> String {
        self.with_node(node, NativeNode::summary)
            .unwrap_or_default()
    }

    fn type_name(&self, node: WidgetId) -> &'static str {
        self.with_node(node, |n| n.kind.name())
            .unwrap_or("?")
    }

    fn node_count(&self) -> usize {
        self.len()
    }
}

static_assertions::assert_impl_all!(NativeTree: Send, Sync);

/// The native object behind a headless widget.
///
/// Returned (as `&dyn Any`) by `native_widget`.
#[derive(Clone)]
pub struct NativeHandle {
    id: WidgetId,
    tree: Arc<NativeTree>,
}

impl NativeHandle {
    pub(crate) fn new(id: WidgetId, tree: Arc<NativeTree>) -> Self {
        Self { id, tree }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn tree(&self) -> &Arc<NativeTree> {
        &self.tree
    }

    pub fn kind(&self) -> WidgetResult<WidgetKind> {
        self.tree.with_node(self.id, |node| node.kind)
    }

    /// Displayed size in pixels.
    pub fn size(&self) -> WidgetResult<Size> {
        self.tree.size(self.id)
    }

    /// Subscribe to native show/hide transitions.
    pub fn on_visibility_changed<F>(&self, f: F) -> WidgetResult<ConnectionId>
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.tree.connect_visibility_changed(self.id, Box::new(f))
    }
}

/// The native layout behind a headless container.
///
/// Returned (as `&dyn Any`) by `native_layout`.
#[derive(Clone)]
pub struct NativeLayout {
    container: WidgetId,
    tree: Arc<NativeTree>,
}

impl NativeLayout {
    pub(crate) fn new(container: WidgetId, tree: Arc<NativeTree>) -> Self {
        Self { container, tree }
    }

    pub fn members(&self) -> Vec<WidgetId> {
        self.tree.members(self.container).unwrap_or_default()
    }

    pub fn spacing(&self) -> u32 {
        self.tree
            .with_node(self.container, |n| n.layout().map(|l| l.spacing))
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    pub fn set_spacing(&self, spacing: u32) -> WidgetResult<()> {
        self.tree.set_spacing(self.container, spacing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn tree() -> NativeTree {
        NativeTree::new(Arc::new(LoopCore::new()), LayoutDefaults::default(), 1)
    }

    #[test]
    fn test_insert_clamps_and_orders() {
        let tree = tree();
        let container = tree.create(WidgetKind::Container);
        let a = tree.create(WidgetKind::Label);
        let b = tree.create(WidgetKind::Label);
        let c = tree.create(WidgetKind::Label);

        tree.insert_child(container, 10, a).unwrap();
        tree.insert_child(container, -3, b).unwrap();
        tree.insert_child(container, 1, c).unwrap();
        assert_eq!(tree.members(container).unwrap(), vec![b, c, a]);
        assert_eq!(tree.parent(a).unwrap(), Some(container));
    }

    #[test]
    fn test_reinsert_moves_within_container() {
        let tree = tree();
        let container = tree.create(WidgetKind::Container);
        let ids: Vec<_> = (0..3).map(|_| tree.create(WidgetKind::Label)).collect();
        for id in &ids {
            tree.insert_child(container, isize::MAX, *id).unwrap();
        }

        tree.insert_child(container, 5, ids[0]).unwrap();
        assert_eq!(tree.members(container).unwrap(), vec![ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn test_adding_to_other_container_moves_child() {
        let tree = tree();
        let first = tree.create(WidgetKind::Container);
        let second = tree.create(WidgetKind::Container);
        let child = tree.create(WidgetKind::CheckBox);

        tree.insert_child(first, 0, child).unwrap();
        tree.insert_child(second, 0, child).unwrap();
        assert!(tree.members(first).unwrap().is_empty());
        assert_eq!(tree.members(second).unwrap(), vec![child]);
    }

    #[test]
    fn test_circular_insert_rejected() {
        let tree = tree();
        let outer = tree.create(WidgetKind::Container);
        let inner = tree.create(WidgetKind::Container);
        tree.insert_child(outer, 0, inner).unwrap();

        assert!(matches!(
            tree.insert_child(inner, 0, outer),
            Err(WidgetError::CircularParentage)
        ));
        assert!(matches!(
            tree.insert_child(outer, 0, outer),
            Err(WidgetError::CircularParentage)
        ));
        assert!(tree.members(inner).unwrap().is_empty());
    }

    #[test]
    fn test_remove_index_out_of_range_keeps_state() {
        let tree = tree();
        let container = tree.create(WidgetKind::Container);
        let a = tree.create(WidgetKind::Label);
        tree.insert_child(container, 0, a).unwrap();

        for index in [1, -1, 7] {
            assert!(matches!(
                tree.remove_child_at(container, index),
                Err(WidgetError::IndexOutOfRange { count: 1, .. })
            ));
        }
        assert_eq!(tree.members(container).unwrap(), vec![a]);
    }

    #[test]
    fn test_set_parent_away_leaves_layout() {
        let tree = tree();
        let container = tree.create(WidgetKind::Container);
        let a = tree.create(WidgetKind::Label);
        tree.insert_child(container, 0, a).unwrap();

        tree.set_parent(a, None).unwrap();
        assert!(tree.members(container).unwrap().is_empty());
    }

    #[test]
    fn test_set_parent_does_not_join_layout() {
        let tree = tree();
        let container = tree.create(WidgetKind::Container);
        let a = tree.create(WidgetKind::Label);

        tree.set_parent(a, Some(container)).unwrap();
        assert_eq!(tree.parent(a).unwrap(), Some(container));
        assert!(tree.members(container).unwrap().is_empty());
    }

    #[test]
    fn test_destroy_orphans_children() {
        let tree = tree();
        let container = tree.create(WidgetKind::Container);
        let a = tree.create(WidgetKind::Label);
        tree.insert_child(container, 0, a).unwrap();

        tree.destroy(container);
        assert!(!tree.contains(container));
        assert_eq!(tree.parent(a).unwrap(), None);
    }

    #[test]
    fn test_destroy_drops_queued_notifications() {
        let tree = tree();
        let a = tree.create(WidgetKind::CheckBox);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        tree.connect_value_changed(a, Box::new(move |v| seen_clone.lock().push(v.clone())))
            .unwrap();

        tree.update_state(a, |state| match state {
            NativeState::Button { checked, .. } => {
                *checked = true;
                Ok(true)
            }
            _ => Ok(false),
        })
        .unwrap();
        tree.destroy(a);
        tree.core().process_pass();
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_effective_enabled_follows_ancestors() {
        let tree = tree();
        let outer = tree.create(WidgetKind::Container);
        let inner = tree.create(WidgetKind::Container);
        let leaf = tree.create(WidgetKind::PushButton);
        tree.insert_child(outer, 0, inner).unwrap();
        tree.insert_child(inner, 0, leaf).unwrap();

        tree.set_enabled(outer, false).unwrap();
        assert!(!tree.is_effectively_enabled(leaf).unwrap());
        tree.set_enabled(outer, true).unwrap();
        assert!(tree.is_effectively_enabled(leaf).unwrap());
    }

    #[test]
    fn test_dump_lists_hierarchy() {
        let tree = tree();
        let container = tree.create(WidgetKind::Container);
        let label = tree.create(WidgetKind::Label);
        tree.update_state(label, |state| {
            if let NativeState::Text { text } = state {
                *text = "hello".into();
            }
            Ok(false)
        })
        .unwrap();
        tree.insert_child(container, 0, label).unwrap();

        let dump = tree.dump();
        assert!(dump.contains("Widget Tree (2 total widgets)"));
        assert!(dump.contains("(Container)"));
        assert!(dump.contains("hello"));
    }
}
