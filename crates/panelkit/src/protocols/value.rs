//! Value-bearing widget contracts and their structural composites.

use panelkit_core::ConnectionId;

use crate::error::{WidgetError, WidgetResult};
use crate::value::{Value, ValueKind};

use super::capability::{SupportsChoices, SupportsOrientation, SupportsText};
use super::widget::{Callback, WidgetProtocol};

/// A widget with a current value and change notification.
pub trait ValueWidgetProtocol: WidgetProtocol {
    /// The kind of value the widget holds.
    fn value_kind(&self) -> ValueKind;

    fn value(&self) -> Value;

    /// Set the current value.
    ///
    /// Fails with [`WidgetError::TypeMismatch`] when `value` is not
    /// compatible with [`value_kind`](Self::value_kind). Setting the value
    /// the widget already holds changes nothing and notifies nobody.
    fn set_value(&mut self, value: Value) -> WidgetResult<()>;

    /// Call `callback` with the new value after every change.
    fn bind_change_callback(&mut self, callback: Callback<Value>) -> ConnectionId;

    fn unbind_change_callback(&mut self, connection: ConnectionId) -> bool;
}

/// A value widget with numeric bounds and a step.
///
/// `minimum() <= value <= maximum()` holds after every successful call.
pub trait RangedWidgetProtocol: ValueWidgetProtocol {
    fn minimum(&self) -> f64;

    /// Fails with [`WidgetError::InvalidBounds`] if `minimum` exceeds the
    /// current maximum. The value is clamped into the new range.
    fn set_minimum(&mut self, minimum: f64) -> WidgetResult<()>;

    fn maximum(&self) -> f64;

    /// Fails with [`WidgetError::InvalidBounds`] if `maximum` is below the
    /// current minimum. The value is clamped into the new range.
    fn set_maximum(&mut self, maximum: f64) -> WidgetResult<()>;

    fn step(&self) -> f64;

    /// Fails with [`WidgetError::InvalidStep`] unless `step` is positive and finite.
    fn set_step(&mut self, step: f64) -> WidgetResult<()>;

    /// Set both bounds, in whichever order keeps them consistent.
    fn set_range(&mut self, minimum: f64, maximum: f64) -> WidgetResult<()> {
        for bound in [minimum, maximum] {
            if !bound.is_finite() {
                return Err(WidgetError::NonFiniteBound(bound));
            }
        }
        if minimum > maximum {
            return Err(WidgetError::InvalidBounds { minimum, maximum });
        }
        if minimum > self.maximum() {
            self.set_maximum(maximum)?;
            self.set_minimum(minimum)
        } else {
            self.set_minimum(minimum)?;
            self.set_maximum(maximum)
        }
    }
}

/// A checkable button: its checked state is the value, its label the text.
pub trait ButtonWidgetProtocol: ValueWidgetProtocol + SupportsText {}

impl<T: ValueWidgetProtocol + SupportsText + ?Sized> ButtonWidgetProtocol for T {}

/// A ranged value widget with an orientation.
pub trait SliderWidgetProtocol: RangedWidgetProtocol + SupportsOrientation {}

impl<T: RangedWidgetProtocol + SupportsOrientation + ?Sized> SliderWidgetProtocol for T {}

/// A value widget whose value is the data of one of its choices.
pub trait CategoricalWidgetProtocol: ValueWidgetProtocol + SupportsChoices {}

impl<T: ValueWidgetProtocol + SupportsChoices + ?Sized> CategoricalWidgetProtocol for T {}
