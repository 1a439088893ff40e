//! Per-kind state of headless native widgets.
//!
//! The models here hold the rules (clamping, rounding, choice selection);
//! they report whether the visible value changed so the caller can notify.

use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::choices::Choices;
use crate::error::{WidgetError, WidgetResult};
use crate::geometry::Margins;
use crate::value::Value;

/// Bounds, step and value of a spin box or slider.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeModel {
    integral: bool,
    minimum: f64,
    maximum: f64,
    step: f64,
    value: f64,
}

impl RangeModel {
    /// Spin box defaults: `[0, 999]` with step 1 (0.1 for floats).
    pub fn spin_box(integral: bool) -> Self {
        Self {
            integral,
            minimum: 0.0,
            maximum: 999.0,
            step: if integral { 1.0 } else { 0.1 },
            value: 0.0,
        }
    }

    /// Slider defaults: `[0, 100]` with step 1.
    pub fn slider(integral: bool) -> Self {
        Self {
            integral,
            minimum: 0.0,
            maximum: 100.0,
            step: 1.0,
            value: 0.0,
        }
    }

    pub fn is_integral(&self) -> bool {
        self.integral
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn raw_value(&self) -> f64 {
        self.value
    }

    /// The value as [`Value::Int`] or [`Value::Float`].
    pub fn value(&self) -> Value {
        if self.integral {
            Value::Int(self.value as i64)
        } else {
            Value::Float(self.value)
        }
    }

    fn round(&self, x: f64) -> f64 {
        if self.integral { x.round() } else { x }
    }

    /// Position of the value within the range, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        let span = self.maximum - self.minimum;
        if span > 0.0 {
            (self.value - self.minimum) / span
        } else {
            0.0
        }
    }

    /// Store `value`, clamped into the bounds. Returns whether it changed.
    pub fn set_value(&mut self, value: f64) -> WidgetResult<bool> {
        if !value.is_finite() {
            return Err(WidgetError::NonFiniteValue(value));
        }
        let value = self.round(value).clamp(self.minimum, self.maximum);
        Ok(self.replace_value(value))
    }

    fn replace_value(&mut self, value: f64) -> bool {
        if value == self.value {
            false
        } else {
            self.value = value;
            true
        }
    }

    fn check_bound(&self, bound: f64) -> WidgetResult<f64> {
        if bound.is_finite() {
            Ok(self.round(bound))
        } else {
            Err(WidgetError::NonFiniteBound(bound))
        }
    }

    /// Returns whether the value moved to stay within the new bounds.
    pub fn set_minimum(&mut self, minimum: f64) -> WidgetResult<bool> {
        let minimum = self.check_bound(minimum)?;
        if minimum > self.maximum {
            return Err(WidgetError::InvalidBounds {
                minimum,
                maximum: self.maximum,
            });
        }
        self.minimum = minimum;
        Ok(self.replace_value(self.value.clamp(self.minimum, self.maximum)))
    }

    /// Returns whether the value moved to stay within the new bounds.
    pub fn set_maximum(&mut self, maximum: f64) -> WidgetResult<bool> {
        let maximum = self.check_bound(maximum)?;
        if maximum < self.minimum {
            return Err(WidgetError::InvalidBounds {
                minimum: self.minimum,
                maximum,
            });
        }
        self.maximum = maximum;
        Ok(self.replace_value(self.value.clamp(self.minimum, self.maximum)))
    }

    /// Integral models round the step and never go below 1.
    pub fn set_step(&mut self, step: f64) -> WidgetResult<()> {
        if !step.is_finite() || step <= 0.0 {
            return Err(WidgetError::InvalidStep(step));
        }
        self.step = if self.integral {
            step.round().max(1.0)
        } else {
            step
        };
        Ok(())
    }
}

/// Choices and the selected entry of a combo box.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChoiceModel {
    choices: Choices,
    current: Option<usize>,
}

impl ChoiceModel {
    pub fn choices(&self) -> &Choices {
        &self.choices
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Data of the selected choice, or [`Value::None`] without choices.
    pub fn value(&self) -> Value {
        self.current
            .and_then(|i| self.choices.get(i))
            .map(|c| c.data.clone())
            .unwrap_or(Value::None)
    }

    /// Label of the selected choice.
    pub fn current_label(&self) -> Option<&str> {
        self.current
            .and_then(|i| self.choices.get(i))
            .map(|c| c.label.as_str())
    }

    /// Select the choice whose data equals `value`. Returns whether the
    /// selection changed.
    pub fn set_value(&mut self, value: &Value) -> WidgetResult<bool> {
        if value.is_none() && self.choices.is_empty() {
            return Ok(false);
        }
        let index = self
            .choices
            .position_of_data(value)
            .ok_or_else(|| WidgetError::ChoiceMismatch(value.clone()))?;
        if self.current == Some(index) {
            Ok(false)
        } else {
            self.current = Some(index);
            Ok(true)
        }
    }

    /// Replace the choices, keeping the selected data if it survives and
    /// otherwise selecting the first choice. Returns whether the value changed.
    pub fn set_choices(&mut self, choices: Choices) -> bool {
        let previous = self.value();
        let kept = if previous.is_none() {
            None
        } else {
            choices.position_of_data(&previous)
        };
        self.current = kept.or(if choices.is_empty() { None } else { Some(0) });
        self.choices = choices;
        self.value() != previous
    }
}

/// The container part of a native node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutState {
    /// Ordered members of the layout.
    pub members: Vec<panelkit_core::WidgetId>,
    pub margins: Margins,
    pub spacing: u32,
}

/// Kind-specific state of a native node.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeState {
    /// Labels and text inputs.
    Text { text: String },
    /// File edits.
    Path(PathBuf),
    /// Push, check and radio buttons.
    Button { text: String, checked: bool },
    Range(RangeModel),
    Choice(ChoiceModel),
    DateTime(NaiveDateTime),
    Container(LayoutState),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_scenario_bounds() {
        let mut model = RangeModel::slider(true);
        model.set_minimum(0.0).unwrap();
        model.set_maximum(10.0).unwrap();
        model.set_step(1.0).unwrap();
        assert!(model.set_value(5.0).unwrap());
        assert_eq!(model.value(), Value::Int(5));
    }

    #[test]
    fn test_value_clamped_into_bounds() {
        let mut model = RangeModel::spin_box(true);
        model.set_minimum(3.0).unwrap();
        assert_eq!(model.raw_value(), 3.0);

        model.set_value(2.0).unwrap();
        assert_eq!(model.raw_value(), 3.0);
        model.set_value(5000.0).unwrap();
        assert_eq!(model.raw_value(), 999.0);
    }

    #[test]
    fn test_inverted_bounds_rejected_without_change() {
        let mut model = RangeModel::slider(false);
        model.set_maximum(10.0).unwrap();
        let before = model.clone();

        assert!(matches!(
            model.set_minimum(11.0),
            Err(WidgetError::InvalidBounds { .. })
        ));
        assert!(model.set_maximum(-1.0).is_err());
        assert!(model.set_minimum(f64::NAN).is_err());
        assert_eq!(model, before);
    }

    #[test]
    fn test_step_validation() {
        let mut model = RangeModel::spin_box(true);
        assert!(matches!(model.set_step(0.0), Err(WidgetError::InvalidStep(_))));
        assert!(model.set_step(-1.0).is_err());
        assert!(model.set_step(f64::INFINITY).is_err());

        model.set_step(0.4).unwrap();
        assert_eq!(model.step(), 1.0);
        model.set_step(2.6).unwrap();
        assert_eq!(model.step(), 3.0);
    }

    #[test]
    fn test_integral_value_rounds() {
        let mut model = RangeModel::spin_box(true);
        model.set_value(4.6).unwrap();
        assert_eq!(model.value(), Value::Int(5));
        assert!(!model.set_value(5.0).unwrap());
    }

    #[test]
    fn test_nan_value_rejected() {
        let mut model = RangeModel::slider(false);
        assert!(matches!(
            model.set_value(f64::NAN),
            Err(WidgetError::NonFiniteValue(_))
        ));
    }

    fn abc() -> Choices {
        Choices::try_from_iter([("a", 1), ("b", 2), ("c", 3)]).unwrap()
    }

    #[test]
    fn test_first_choice_selected_by_default() {
        let mut model = ChoiceModel::default();
        assert_eq!(model.value(), Value::None);
        assert!(model.set_choices(abc()));
        assert_eq!(model.value(), Value::Int(1));
        assert_eq!(model.current_label(), Some("a"));
    }

    #[test]
    fn test_selection_kept_by_data() {
        let mut model = ChoiceModel::default();
        model.set_choices(abc());
        model.set_value(&Value::Int(3)).unwrap();

        let renamed = Choices::try_from_iter([("x", 3), ("y", 1)]).unwrap();
        assert!(!model.set_choices(renamed));
        assert_eq!(model.value(), Value::Int(3));
        assert_eq!(model.current_label(), Some("x"));
    }

    #[test]
    fn test_selection_falls_back_to_first() {
        let mut model = ChoiceModel::default();
        model.set_choices(abc());
        model.set_value(&Value::Int(2)).unwrap();

        let others = Choices::try_from_iter([("p", 7), ("q", 8)]).unwrap();
        assert!(model.set_choices(others));
        assert_eq!(model.value(), Value::Int(7));

        assert!(model.set_choices(Choices::new()));
        assert_eq!(model.value(), Value::None);
    }

    #[test]
    fn test_unknown_choice_rejected() {
        let mut model = ChoiceModel::default();
        model.set_choices(abc());
        let err = model.set_value(&Value::Int(9)).unwrap_err();
        assert!(matches!(err, WidgetError::ChoiceMismatch(Value::Int(9))));
        assert_eq!(model.value(), Value::Int(1));
    }
}
