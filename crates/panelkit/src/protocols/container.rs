//! The container contract.

use std::any::Any;

use panelkit_core::WidgetId;

use crate::error::WidgetResult;
use crate::geometry::Margins;

use super::capability::SupportsOrientation;
use super::widget::WidgetProtocol;

/// A widget that lays out an ordered list of child widgets.
///
/// Children occupy the contiguous positions `0..count()`. Every mutation is
/// applied to the native layout immediately, so the next query sees it.
///
/// Lookups never fail: [`index_of`](Self::index_of) and
/// [`get_index`](Self::get_index) return `None` for absent children and
/// out-of-range positions. Removing by index, on the other hand, rejects an
/// out-of-range index.
pub trait ContainerProtocol: WidgetProtocol + SupportsOrientation {
    /// Append a child. Equivalent to inserting at `count()`.
    fn add_widget(&mut self, widget: WidgetId) -> WidgetResult<()> {
        let end = isize::try_from(self.count()).unwrap_or(isize::MAX);
        self.insert_widget(end, widget)
    }

    /// Insert a child at `position`, clamped to `[0, count()]`.
    ///
    /// Children at and after the position move up by one. A widget that is
    /// already a child of this container is moved; one that belongs to another
    /// container is taken out of it first.
    fn insert_widget(&mut self, position: isize, widget: WidgetId) -> WidgetResult<()>;

    /// Remove a child, failing with
    /// [`ChildNotFound`](crate::WidgetError::ChildNotFound) if it is absent.
    fn remove_widget(&mut self, widget: WidgetId) -> WidgetResult<()>;

    /// Remove and return the child at `index`, failing with
    /// [`IndexOutOfRange`](crate::WidgetError::IndexOutOfRange) unless
    /// `0 <= index < count()`.
    fn remove_index(&mut self, index: isize) -> WidgetResult<WidgetId>;

    fn count(&self) -> usize;

    /// Position of a child, or `None` if it is not a child.
    fn index_of(&self, widget: WidgetId) -> Option<usize>;

    /// Child at `index`, or `None` if the index is out of range.
    fn get_index(&self, index: isize) -> Option<WidgetId>;

    /// The backend's native layout object.
    fn native_layout(&self) -> &dyn Any;

    fn margins(&self) -> Margins;

    fn set_margins(&mut self, margins: Margins);

    /// Children in order.
    fn children(&self) -> Vec<WidgetId> {
        (0..self.count())
            .filter_map(|i| isize::try_from(i).ok().and_then(|i| self.get_index(i)))
            .collect()
    }
}
