//! Size hints and box layout of headless widgets.
//!
//! Layout is recomputed on every query, so the result always reflects the
//! current members and visibility.

use panelkit_core::WidgetId;

use crate::geometry::{Orientation, Size};
use crate::kind::WidgetKind;

use super::native::NodeMap;
use super::state::{LayoutState, NativeState};

/// Horizontal advance of one character.
pub(crate) const CHAR_WIDTH: u32 = 7;

pub(crate) fn text_width(text: &str) -> u32 {
    text.chars().count() as u32 * CHAR_WIDTH
}

/// Preferred size of a node, including the members of a container.
pub(crate) fn size_hint(nodes: &NodeMap, id: WidgetId) -> Size {
    let Some(node) = nodes.get(id) else {
        return Size::default();
    };
    match (&node.state, node.kind) {
        (NativeState::Container(layout), _) => container_size(nodes, layout, node.orientation),
        (NativeState::Text { text }, WidgetKind::Label) => {
            Size::new((text_width(text) + 8).max(40), 22)
        }
        (NativeState::Text { .. }, WidgetKind::TextEdit) => Size::new(200, 80),
        (NativeState::Text { .. }, _) => Size::new(140, 24),
        (NativeState::Path(_), _) => Size::new(180, 24),
        (NativeState::Button { text, .. }, WidgetKind::PushButton) => {
            Size::new((text_width(text) + 24).max(64), 28)
        }
        (NativeState::Button { text, .. }, _) => Size::new(26 + text_width(text), 22),
        (NativeState::Range(_), WidgetKind::Slider | WidgetKind::FloatSlider) => {
            match node.orientation {
                Orientation::Horizontal => Size::new(160, 22),
                Orientation::Vertical => Size::new(22, 160),
            }
        }
        (NativeState::Range(_), _) => Size::new(96, 24),
        (NativeState::Choice(model), _) => {
            let longest = model.choices().labels().map(text_width).max().unwrap_or(0);
            Size::new((longest + 32).max(96), 24)
        }
        (NativeState::DateTime(_), _) => Size::new(160, 24),
    }
}

fn visible_members<'a>(
    nodes: &'a NodeMap,
    layout: &'a LayoutState,
) -> impl Iterator<Item = WidgetId> + 'a {
    layout
        .members
        .iter()
        .copied()
        .filter(|m| nodes.get(*m).is_some_and(|n| n.visible))
}

fn container_size(nodes: &NodeMap, layout: &LayoutState, orientation: Orientation) -> Size {
    let mut main = 0u32;
    let mut cross = 0u32;
    let mut count = 0u32;
    for member in visible_members(nodes, layout) {
        let size = size_hint(nodes, member);
        let (m, c) = match orientation {
            Orientation::Horizontal => (size.width, size.height),
            Orientation::Vertical => (size.height, size.width),
        };
        main = main.saturating_add(m);
        cross = cross.max(c);
        count += 1;
    }
    main = main.saturating_add(layout.spacing.saturating_mul(count.saturating_sub(1)));

    let (width, height) = match orientation {
        Orientation::Horizontal => (main, cross),
        Orientation::Vertical => (cross, main),
    };
    Size::new(
        width.saturating_add(layout.margins.horizontal()),
        height.saturating_add(layout.margins.vertical()),
    )
}

/// A member placed inside its container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Placement {
    pub id: WidgetId,
    pub x: i64,
    pub y: i64,
    pub size: Size,
}

/// Positions of the visible members of a container, in layout order.
pub(crate) fn arrange(nodes: &NodeMap, container: WidgetId) -> Vec<Placement> {
    let Some(node) = nodes.get(container) else {
        return Vec::new();
    };
    let Some(layout) = node.layout() else {
        return Vec::new();
    };

    let mut x = i64::from(layout.margins.left.max(0));
    let mut y = i64::from(layout.margins.top.max(0));
    let spacing = i64::from(layout.spacing);
    visible_members(nodes, layout)
        .map(|id| {
            let size = size_hint(nodes, id);
            let placement = Placement { id, x, y, size };
            match node.orientation {
                Orientation::Horizontal => x += i64::from(size.width) + spacing,
                Orientation::Vertical => y += i64::from(size.height) + spacing,
            }
            placement
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use panelkit_core::LoopCore;

    use super::*;
    use crate::geometry::Margins;
    use crate::headless::native::{LayoutDefaults, NativeTree};

    fn tree(orientation: Orientation) -> NativeTree {
        let defaults = LayoutDefaults {
            orientation,
            margins: Margins::uniform(2),
            spacing: 4,
        };
        NativeTree::new(Arc::new(LoopCore::new()), defaults, 1)
    }

    #[test]
    fn test_vertical_stack() {
        let tree = tree(Orientation::Vertical);
        let container = tree.create(WidgetKind::Container);
        let a = tree.create(WidgetKind::LineEdit);
        let b = tree.create(WidgetKind::SpinBox);
        tree.insert_child(container, 0, a).unwrap();
        tree.insert_child(container, 1, b).unwrap();

        // width: max(140, 96) + 4, height: 24 + 4 + 24 + 4
        assert_eq!(tree.size(container).unwrap(), Size::new(144, 56));
    }

    #[test]
    fn test_hidden_members_take_no_space() {
        let tree = tree(Orientation::Horizontal);
        let container = tree.create(WidgetKind::Container);
        let a = tree.create(WidgetKind::SpinBox);
        let b = tree.create(WidgetKind::SpinBox);
        tree.insert_child(container, 0, a).unwrap();
        tree.insert_child(container, 1, b).unwrap();
        tree.set_visible(b, false).unwrap();

        assert_eq!(tree.size(container).unwrap(), Size::new(100, 28));
    }

    #[test]
    fn test_extreme_spacing_and_margins_saturate() {
        let tree = tree(Orientation::Horizontal);
        let container = tree.create(WidgetKind::Container);
        let a = tree.create(WidgetKind::SpinBox);
        let b = tree.create(WidgetKind::SpinBox);
        tree.insert_child(container, 0, a).unwrap();
        tree.insert_child(container, 1, b).unwrap();

        tree.set_spacing(container, u32::MAX).unwrap();
        assert_eq!(tree.size(container).unwrap(), Size::new(u32::MAX, 28));

        tree.set_spacing(container, 0).unwrap();
        tree.set_margins(container, Margins::uniform(i32::MAX)).unwrap();
        assert_eq!(tree.size(container).unwrap(), Size::new(u32::MAX, u32::MAX));
    }

    #[test]
    fn test_empty_container_is_margins_only() {
        let tree = tree(Orientation::Vertical);
        let container = tree.create(WidgetKind::Container);
        assert_eq!(tree.size(container).unwrap(), Size::new(4, 4));
    }

    #[test]
    fn test_label_grows_with_text() {
        let tree = tree(Orientation::Vertical);
        let label = tree.create(WidgetKind::Label);
        assert_eq!(tree.size(label).unwrap(), Size::new(40, 22));

        tree.update_state(label, |state| {
            if let NativeState::Text { text } = state {
                *text = "a longer caption".into();
            }
            Ok(false)
        })
        .unwrap();
        assert_eq!(tree.size(label).unwrap(), Size::new(16 * 7 + 8, 22));
    }
}
