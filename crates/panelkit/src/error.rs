//! Error types for widget protocol operations.
//!
//! Every rejected mutation leaves the widget unchanged. [`WidgetError::kind`]
//! groups the variants so callers can branch on the class of failure without
//! matching each variant.

use std::io;

use panelkit_core::{CoreError, WidgetId};
use thiserror::Error;

use crate::value::{Value, ValueKind};

/// Broad class of a [`WidgetError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The backend widget lacks a required capability.
    NotImplemented,
    /// A caller-correctable invalid argument.
    Value,
    /// An index outside the valid range.
    Index,
    /// A referenced widget or child does not exist.
    NotFound,
    /// Runtime, configuration or I/O failure.
    Runtime,
}

/// Errors raised by widget protocols, backends and their configuration.
#[derive(Error, Debug)]
pub enum WidgetError {
    /// The widget does not provide a capability the operation needs.
    #[error("capability `{capability}` is not implemented by this widget")]
    NotImplemented {
        /// Name of the missing capability.
        capability: &'static str,
    },

    /// A value of the wrong type was given to a value setter.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// The kind the widget holds.
        expected: ValueKind,
        /// The kind that was supplied.
        found: ValueKind,
    },

    /// An orientation string other than "horizontal" or "vertical".
    #[error("invalid orientation {0:?}: expected \"horizontal\" or \"vertical\"")]
    InvalidOrientation(String),

    /// Bounds with the minimum above the maximum.
    #[error("invalid bounds: minimum {minimum} is greater than maximum {maximum}")]
    InvalidBounds {
        /// Requested minimum.
        minimum: f64,
        /// Requested maximum.
        maximum: f64,
    },

    /// A NaN or infinite bound.
    #[error("bound must be finite, got {0}")]
    NonFiniteBound(f64),

    /// A NaN or infinite numeric value.
    #[error("value must be finite, got {0}")]
    NonFiniteValue(f64),

    /// A step that is zero, negative or not finite.
    #[error("step must be positive and finite, got {0}")]
    InvalidStep(f64),

    /// A value that is not the data of any available choice.
    #[error("value {0} does not match any choice")]
    ChoiceMismatch(Value),

    /// Two choices share a label.
    #[error("duplicate choice label {0:?}")]
    DuplicateChoiceLabel(String),

    /// An index outside `[0, count)`.
    #[error("index {index} out of range for container with {count} children")]
    IndexOutOfRange {
        /// Requested index.
        index: isize,
        /// Number of children.
        count: usize,
    },

    /// The widget is not a child of the container.
    #[error("widget {0:?} is not a child of this container")]
    ChildNotFound(WidgetId),

    /// The backend does not own a widget with this handle.
    #[error("unknown widget {0:?}")]
    UnknownWidget(WidgetId),

    /// A widget would become its own ancestor.
    #[error("a widget cannot be placed inside itself or one of its descendants")]
    CircularParentage,

    /// A widget type name that no backend knows.
    #[error("unknown widget kind {0:?}")]
    UnknownWidgetKind(String),

    /// No widget is mapped to a value type.
    #[error("no widget registered for values of type {0}")]
    NoWidgetForType(ValueKind),

    /// A type registration without a widget kind or choices.
    #[error("a type registration needs a widget kind or choices")]
    EmptyRegistration,

    /// A backend name that is not registered.
    #[error("unknown backend {0:?}")]
    UnknownBackend(String),

    /// Invalid configuration file contents.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failed to encode a bitmap.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Failure inside the runtime.
    #[error("runtime error: {0}")]
    Core(#[from] CoreError),
}

impl WidgetError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotImplemented { .. } => ErrorKind::NotImplemented,
            Self::TypeMismatch { .. }
            | Self::InvalidOrientation(_)
            | Self::InvalidBounds { .. }
            | Self::NonFiniteBound(_)
            | Self::NonFiniteValue(_)
            | Self::InvalidStep(_)
            | Self::ChoiceMismatch(_)
            | Self::DuplicateChoiceLabel(_)
            | Self::CircularParentage
            | Self::UnknownWidgetKind(_)
            | Self::NoWidgetForType(_)
            | Self::EmptyRegistration => ErrorKind::Value,
            Self::IndexOutOfRange { .. } => ErrorKind::Index,
            Self::ChildNotFound(_) | Self::UnknownWidget(_) | Self::UnknownBackend(_) => {
                ErrorKind::NotFound
            }
            Self::Config(_) | Self::Io(_) | Self::Image(_) | Self::Core(_) => ErrorKind::Runtime,
        }
    }

    pub(crate) fn not_implemented(capability: &'static str) -> Self {
        Self::NotImplemented { capability }
    }
}

/// Result type for widget operations.
pub type WidgetResult<T> = Result<T, WidgetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            WidgetError::not_implemented("ranged").kind(),
            ErrorKind::NotImplemented
        );
        assert_eq!(WidgetError::InvalidStep(0.0).kind(), ErrorKind::Value);
        assert_eq!(
            WidgetError::IndexOutOfRange { index: 3, count: 3 }.kind(),
            ErrorKind::Index
        );
        assert_eq!(
            WidgetError::ChildNotFound(WidgetId::default()).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_messages() {
        let err = WidgetError::TypeMismatch {
            expected: ValueKind::Int,
            found: ValueKind::Text,
        };
        assert_eq!(err.to_string(), "type mismatch: expected int, found text");

        let err = WidgetError::InvalidOrientation("diagonal".into());
        assert!(err.to_string().contains("\"diagonal\""));
    }
}
