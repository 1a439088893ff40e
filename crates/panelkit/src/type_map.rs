//! Choosing a widget kind for a value.

use std::collections::HashMap;

use panelkit_core::logging::targets;

use crate::choices::Choices;
use crate::error::{WidgetError, WidgetResult};
use crate::kind::WidgetKind;
use crate::value::{Value, ValueKind};

/// Options that influence widget selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WidgetOptions {
    /// Explicit widget kind; wins over every other rule.
    pub widget_type: Option<WidgetKind>,
    /// Choices to offer. Their presence selects a combo box.
    pub choices: Option<Choices>,
}

impl WidgetOptions {
    pub fn with_widget_type(mut self, kind: WidgetKind) -> Self {
        self.widget_type = Some(kind);
        self
    }

    pub fn with_choices(mut self, choices: Choices) -> Self {
        self.choices = Some(choices);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Registration {
    widget_type: Option<WidgetKind>,
    choices: Option<Choices>,
}

/// Maps value kinds to widget kinds.
///
/// Resolution order: an explicit `widget_type` option, then a registration
/// for the value kind, then choices present in the options, then the
/// built-in map.
#[derive(Debug, Clone, Default)]
pub struct TypeMap {
    registered: HashMap<ValueKind, Registration>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in widget kind for a value kind.
    pub fn simple_kind(kind: ValueKind) -> Option<WidgetKind> {
        match kind {
            ValueKind::Bool => Some(WidgetKind::CheckBox),
            ValueKind::Int => Some(WidgetKind::SpinBox),
            ValueKind::Float => Some(WidgetKind::FloatSpinBox),
            ValueKind::Text => Some(WidgetKind::LineEdit),
            ValueKind::Path => Some(WidgetKind::FileEdit),
            ValueKind::DateTime => Some(WidgetKind::DateTimeEdit),
            ValueKind::None | ValueKind::Any => None,
        }
    }

    /// Register a widget kind or choices for values of `kind`.
    ///
    /// Choices take precedence: values of `kind` then get a combo box with
    /// those choices, whatever `widget_type` says.
    pub fn register(
        &mut self,
        kind: ValueKind,
        widget_type: Option<WidgetKind>,
        choices: Option<Choices>,
    ) -> WidgetResult<()> {
        let widget_type = match (widget_type, &choices) {
            (None, None) => return Err(WidgetError::EmptyRegistration),
            (Some(requested), Some(_)) if requested != WidgetKind::ComboBox => {
                tracing::warn!(
                    target: targets::BACKEND,
                    %kind,
                    %requested,
                    "choices registered; using ComboBox instead"
                );
                Some(WidgetKind::ComboBox)
            }
            (_, Some(_)) => Some(WidgetKind::ComboBox),
            (Some(requested), None) => Some(requested),
        };
        self.registered.insert(
            kind,
            Registration {
                widget_type,
                choices,
            },
        );
        tracing::debug!(target: targets::BACKEND, %kind, ?widget_type, "type registered");
        Ok(())
    }

    /// Remove a registration. Returns whether one existed.
    pub fn unregister(&mut self, kind: ValueKind) -> bool {
        self.registered.remove(&kind).is_some()
    }

    /// Pick the widget kind for `value`, or for `annotation` when given.
    ///
    /// Returns the kind together with the effective options, which carry
    /// any registered choices.
    pub fn pick(
        &self,
        value: &Value,
        annotation: Option<ValueKind>,
        options: WidgetOptions,
    ) -> WidgetResult<(WidgetKind, WidgetOptions)> {
        let kind = annotation.unwrap_or_else(|| value.kind());
        let mut options = options;

        if let Some(explicit) = options.widget_type {
            return Ok((explicit, options));
        }
        if let Some(registration) = self.registered.get(&kind) {
            if options.choices.is_none() {
                options.choices = registration.choices.clone();
            }
            if let Some(widget_type) = registration.widget_type {
                return Ok((widget_type, options));
            }
        }
        if options.choices.is_some() {
            return Ok((WidgetKind::ComboBox, options));
        }
        Self::simple_kind(kind)
            .map(|widget_type| (widget_type, options))
            .ok_or(WidgetError::NoWidgetForType(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> Choices {
        Choices::try_from_iter([("red", "r"), ("green", "g")]).unwrap()
    }

    #[test]
    fn test_simple_map() {
        let map = TypeMap::new();
        let pick = |value: Value| map.pick(&value, None, WidgetOptions::default()).unwrap().0;
        assert_eq!(pick(Value::Bool(true)), WidgetKind::CheckBox);
        assert_eq!(pick(Value::Int(1)), WidgetKind::SpinBox);
        assert_eq!(pick(Value::Float(1.5)), WidgetKind::FloatSpinBox);
        assert_eq!(pick(Value::from("x")), WidgetKind::LineEdit);
        assert_eq!(pick(Value::Path("a.txt".into())), WidgetKind::FileEdit);
    }

    #[test]
    fn test_annotation_wins_over_value() {
        let map = TypeMap::new();
        let (kind, _) = map
            .pick(&Value::None, Some(ValueKind::Float), WidgetOptions::default())
            .unwrap();
        assert_eq!(kind, WidgetKind::FloatSpinBox);
    }

    #[test]
    fn test_unmappable() {
        let map = TypeMap::new();
        let err = map
            .pick(&Value::None, None, WidgetOptions::default())
            .unwrap_err();
        assert!(matches!(err, WidgetError::NoWidgetForType(ValueKind::None)));
    }

    #[test]
    fn test_explicit_widget_type_first() {
        let mut map = TypeMap::new();
        map.register(ValueKind::Int, Some(WidgetKind::Slider), None)
            .unwrap();
        let options = WidgetOptions::default().with_widget_type(WidgetKind::Label);
        let (kind, _) = map.pick(&Value::Int(3), None, options).unwrap();
        assert_eq!(kind, WidgetKind::Label);

        let (kind, _) = map
            .pick(&Value::Int(3), None, WidgetOptions::default())
            .unwrap();
        assert_eq!(kind, WidgetKind::Slider);
    }

    #[test]
    fn test_choices_select_combo_box() {
        let map = TypeMap::new();
        let options = WidgetOptions::default().with_choices(colors());
        let (kind, options) = map.pick(&Value::from("r"), None, options).unwrap();
        assert_eq!(kind, WidgetKind::ComboBox);
        assert_eq!(options.choices, Some(colors()));
    }

    #[test]
    fn test_registered_choices_override_widget_type() {
        let mut map = TypeMap::new();
        map.register(ValueKind::Text, Some(WidgetKind::TextEdit), Some(colors()))
            .unwrap();
        let (kind, options) = map
            .pick(&Value::from("g"), None, WidgetOptions::default())
            .unwrap();
        assert_eq!(kind, WidgetKind::ComboBox);
        assert_eq!(options.choices, Some(colors()));
    }

    #[test]
    fn test_empty_registration_rejected() {
        let mut map = TypeMap::new();
        assert!(matches!(
            map.register(ValueKind::Int, None, None),
            Err(WidgetError::EmptyRegistration)
        ));
        assert!(!map.unregister(ValueKind::Int));
    }
}
