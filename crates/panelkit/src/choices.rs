//! Ordered (label, data) choices for categorical widgets.

use crate::error::{WidgetError, WidgetResult};
use crate::value::Value;

/// One entry of a categorical widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    /// Text shown to the user.
    pub label: String,
    /// Value the widget takes when this entry is selected.
    pub data: Value,
}

impl Choice {
    pub fn new(label: impl Into<String>, data: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

impl<L: Into<String>, D: Into<Value>> From<(L, D)> for Choice {
    fn from((label, data): (L, D)) -> Self {
        Self::new(label, data)
    }
}

/// An ordered set of choices with unique labels.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Choices {
    items: Vec<Choice>,
}

impl Choices {
    /// An empty choice set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a choice set, rejecting duplicate labels.
    pub fn try_from_iter<I, C>(iter: I) -> WidgetResult<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Choice>,
    {
        let mut items: Vec<Choice> = Vec::new();
        for choice in iter {
            let choice = choice.into();
            if items.iter().any(|c| c.label == choice.label) {
                return Err(WidgetError::DuplicateChoiceLabel(choice.label));
            }
            items.push(choice);
        }
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Choice> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&Choice> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Choice> {
        self.items.iter()
    }

    /// Position of the first choice whose data equals `data`.
    pub fn position_of_data(&self, data: &Value) -> Option<usize> {
        self.items.iter().position(|c| &c.data == data)
    }

    /// Position of the choice with this label.
    pub fn position_of_label(&self, label: &str) -> Option<usize> {
        self.items.iter().position(|c| c.label == label)
    }

    /// Labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|c| c.label.as_str())
    }

    /// The choices as (label, data) pairs.
    pub fn to_pairs(&self) -> Vec<(String, Value)> {
        self.items
            .iter()
            .map(|c| (c.label.clone(), c.data.clone()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Choices {
    type Item = &'a Choice;
    type IntoIter = std::slice::Iter<'a, Choice>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_order() {
        let choices = Choices::try_from_iter([("b", 2), ("a", 1)]).unwrap();
        assert_eq!(choices.labels().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(
            choices.to_pairs(),
            vec![
                ("b".to_string(), Value::Int(2)),
                ("a".to_string(), Value::Int(1))
            ]
        );
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let err = Choices::try_from_iter([("a", 1), ("a", 2)]).unwrap_err();
        assert!(matches!(err, WidgetError::DuplicateChoiceLabel(label) if label == "a"));
    }

    #[test]
    fn test_duplicate_data_allowed() {
        let choices = Choices::try_from_iter([("a", 1), ("b", 1)]).unwrap();
        assert_eq!(choices.position_of_data(&Value::Int(1)), Some(0));
        assert_eq!(choices.position_of_label("b"), Some(1));
    }
}
