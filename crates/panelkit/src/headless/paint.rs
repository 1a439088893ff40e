//! Software painting of headless widgets.
//!
//! Glyphs are drawn as solid blocks, one per non-space character, which is
//! enough to tell content, state and geometry apart in a snapshot.

use image::{Rgba, RgbaImage, imageops};
use panelkit_core::WidgetId;

use crate::geometry::{Orientation, Size};
use crate::kind::WidgetKind;

use super::layout::{self, CHAR_WIDTH};
use super::native::{NativeTree, NodeMap};
use super::state::NativeState;

pub(crate) const PANEL: Rgba<u8> = Rgba([240, 240, 240, 255]);
pub(crate) const FIELD: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub(crate) const FACE: Rgba<u8> = Rgba([225, 225, 225, 255]);
pub(crate) const BORDER: Rgba<u8> = Rgba([160, 160, 160, 255]);
pub(crate) const INK: Rgba<u8> = Rgba([32, 32, 32, 255]);
pub(crate) const DISABLED_INK: Rgba<u8> = Rgba([168, 168, 168, 255]);
pub(crate) const ACCENT: Rgba<u8> = Rgba([48, 112, 208, 255]);

struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    fn new(size: Size, background: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(size.width, size.height, background),
        }
    }

    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    /// Fill a rectangle, clipped to the canvas.
    fn fill(&mut self, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(width)).min(i64::from(self.width()));
        let y1 = (y + i64::from(height)).min(i64::from(self.height()));
        for py in y0..y1 {
            for px in x0..x1 {
                self.image.put_pixel(px as u32, py as u32, color);
            }
        }
    }

    fn border(&mut self, color: Rgba<u8>) {
        let (w, h) = (self.width(), self.height());
        if w == 0 || h == 0 {
            return;
        }
        self.fill(0, 0, w, 1, color);
        self.fill(0, i64::from(h) - 1, w, 1, color);
        self.fill(0, 0, 1, h, color);
        self.fill(i64::from(w) - 1, 0, 1, h, color);
    }

    /// Draw `text` starting at `x`, vertically centred.
    fn text(&mut self, x: i64, text: &str, color: Rgba<u8>) {
        let y = i64::from(self.height() / 2) - 4;
        for (i, c) in text.chars().enumerate() {
            if !c.is_whitespace() {
                self.fill(x + i as i64 * i64::from(CHAR_WIDTH), y, 5, 9, color);
            }
        }
    }
}

/// Paint a node and, for containers, its visible members.
pub(crate) fn paint_tree(nodes: &NodeMap, id: WidgetId) -> RgbaImage {
    let size = layout::size_hint(nodes, id);
    let enabled = NativeTree::effectively_enabled(nodes, id);
    paint_node(nodes, id, size, enabled)
}

fn paint_node(nodes: &NodeMap, id: WidgetId, size: Size, enabled: bool) -> RgbaImage {
    let Some(node) = nodes.get(id) else {
        return RgbaImage::new(size.width, size.height);
    };
    let ink = if enabled { INK } else { DISABLED_INK };

    let canvas = match (&node.state, node.kind) {
        (NativeState::Container(_), _) => {
            let mut canvas = Canvas::new(size, PANEL);
            for placement in layout::arrange(nodes, id) {
                let child_enabled =
                    enabled && nodes.get(placement.id).is_some_and(|n| n.enabled);
                let child = paint_node(nodes, placement.id, placement.size, child_enabled);
                imageops::overlay(&mut canvas.image, &child, placement.x, placement.y);
            }
            canvas
        }
        (NativeState::Text { text }, WidgetKind::Label) => {
            let mut canvas = Canvas::new(size, PANEL);
            canvas.text(4, text, ink);
            canvas
        }
        (NativeState::Text { text }, _) => field(size, text, ink),
        (NativeState::Path(path), _) => field(size, &path.display().to_string(), ink),
        (NativeState::Button { text, .. }, WidgetKind::PushButton) => {
            let mut canvas = Canvas::new(size, FACE);
            canvas.border(BORDER);
            let offset = (i64::from(size.width) - i64::from(layout::text_width(text))) / 2;
            canvas.text(offset.max(4), text, ink);
            canvas
        }
        (NativeState::Button { text, checked }, _) => {
            let mut canvas = Canvas::new(size, PANEL);
            canvas.fill(4, 4, 14, 14, BORDER);
            canvas.fill(5, 5, 12, 12, FIELD);
            if *checked {
                canvas.fill(8, 8, 6, 6, if enabled { ACCENT } else { DISABLED_INK });
            }
            canvas.text(26, text, ink);
            canvas
        }
        (NativeState::Range(model), WidgetKind::Slider | WidgetKind::FloatSlider) => {
            let mut canvas = Canvas::new(size, PANEL);
            let thumb = if enabled { ACCENT } else { DISABLED_INK };
            let fraction = model.fraction();
            match node.orientation {
                Orientation::Horizontal => {
                    let mid = i64::from(size.height / 2);
                    canvas.fill(5, mid - 1, size.width.saturating_sub(10), 3, BORDER);
                    let travel = f64::from(size.width.saturating_sub(10));
                    let x = (fraction * travel).round() as i64;
                    canvas.fill(x, mid - 5, 10, 10, thumb);
                }
                Orientation::Vertical => {
                    let mid = i64::from(size.width / 2);
                    canvas.fill(mid - 1, 5, 3, size.height.saturating_sub(10), BORDER);
                    let travel = f64::from(size.height.saturating_sub(10));
                    // Vertical sliders grow upwards.
                    let y = ((1.0 - fraction) * travel).round() as i64;
                    canvas.fill(mid - 5, y, 10, 10, thumb);
                }
            }
            canvas
        }
        (NativeState::Range(model), _) => field(size, &model.value().to_string(), ink),
        (NativeState::Choice(model), _) => {
            let mut canvas = field(size, model.current_label().unwrap_or_default(), ink);
            let x = i64::from(size.width) - 16;
            let mid = i64::from(size.height / 2);
            for row in 0..4u32 {
                canvas.fill(x + i64::from(row), mid - 2 + i64::from(row), 8 - 2 * row, 1, ink);
            }
            canvas
        }
        (NativeState::DateTime(dt), _) => {
            field(size, &dt.format("%Y-%m-%d %H:%M").to_string(), ink)
        }
    };
    canvas.image
}

fn field(size: Size, text: &str, ink: Rgba<u8>) -> Canvas {
    let mut canvas = Canvas::new(size, FIELD);
    canvas.border(BORDER);
    canvas.text(4, text, ink);
    canvas
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use panelkit_core::LoopCore;

    use super::*;
    use crate::headless::native::LayoutDefaults;

    fn tree() -> NativeTree {
        NativeTree::new(Arc::new(LoopCore::new()), LayoutDefaults::default(), 1)
    }

    #[test]
    fn test_render_has_displayed_size() {
        let tree = tree();
        let spin = tree.create(WidgetKind::SpinBox);
        let bitmap = tree.render(spin).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (96, 24));
        assert_eq!(bitmap.pixel(0, 0), Some(BORDER.0));
        assert_eq!(bitmap.pixel(50, 1), Some(FIELD.0));
    }

    #[test]
    fn test_checked_box_shows_mark() {
        let tree = tree();
        let check = tree.create(WidgetKind::CheckBox);
        assert_eq!(tree.render(check).unwrap().pixel(10, 10), Some(FIELD.0));

        tree.update_state(check, |state| {
            if let NativeState::Button { checked, .. } = state {
                *checked = true;
            }
            Ok(true)
        })
        .unwrap();
        assert_eq!(tree.render(check).unwrap().pixel(10, 10), Some(ACCENT.0));
    }

    #[test]
    fn test_disabled_parent_greys_children() {
        let tree = tree();
        let container = tree.create(WidgetKind::Container);
        let check = tree.create(WidgetKind::CheckBox);
        tree.update_state(check, |state| {
            if let NativeState::Button { checked, .. } = state {
                *checked = true;
            }
            Ok(true)
        })
        .unwrap();
        tree.insert_child(container, 0, check).unwrap();
        tree.set_enabled(container, false).unwrap();

        let bitmap = tree.render(container).unwrap();
        assert_eq!(bitmap.pixel(10, 10), Some(DISABLED_INK.0));
    }

    #[test]
    fn test_scaled_render() {
        let tree = NativeTree::new(Arc::new(LoopCore::new()), LayoutDefaults::default(), 2);
        let slider = tree.create(WidgetKind::Slider);
        let bitmap = tree.render(slider).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (320, 44));
        assert_eq!(tree.size(slider).unwrap(), Size::new(320, 44));
    }
}
