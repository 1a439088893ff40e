//! The widget kinds a backend can build, and conformance checks.

use std::fmt;
use std::str::FromStr;

use panelkit_core::logging::targets;

use crate::error::{WidgetError, WidgetResult};
use crate::protocols::{Capabilities, CapabilityExt, WidgetProtocol};
use crate::value::ValueKind;

/// A kind of widget a backend can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Label,
    LineEdit,
    TextEdit,
    FileEdit,
    PushButton,
    CheckBox,
    RadioButton,
    SpinBox,
    FloatSpinBox,
    Slider,
    FloatSlider,
    ComboBox,
    DateTimeEdit,
    Container,
}

impl WidgetKind {
    /// Every kind, in declaration order.
    pub const ALL: [WidgetKind; 14] = [
        Self::Label,
        Self::LineEdit,
        Self::TextEdit,
        Self::FileEdit,
        Self::PushButton,
        Self::CheckBox,
        Self::RadioButton,
        Self::SpinBox,
        Self::FloatSpinBox,
        Self::Slider,
        Self::FloatSlider,
        Self::ComboBox,
        Self::DateTimeEdit,
        Self::Container,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Label => "Label",
            Self::LineEdit => "LineEdit",
            Self::TextEdit => "TextEdit",
            Self::FileEdit => "FileEdit",
            Self::PushButton => "PushButton",
            Self::CheckBox => "CheckBox",
            Self::RadioButton => "RadioButton",
            Self::SpinBox => "SpinBox",
            Self::FloatSpinBox => "FloatSpinBox",
            Self::Slider => "Slider",
            Self::FloatSlider => "FloatSlider",
            Self::ComboBox => "ComboBox",
            Self::DateTimeEdit => "DateTimeEdit",
            Self::Container => "Container",
        }
    }

    /// The kind of value widgets of this kind hold, if any.
    pub fn value_kind(self) -> Option<ValueKind> {
        match self {
            Self::Label | Self::LineEdit | Self::TextEdit => Some(ValueKind::Text),
            Self::FileEdit => Some(ValueKind::Path),
            Self::PushButton | Self::CheckBox | Self::RadioButton => Some(ValueKind::Bool),
            Self::SpinBox | Self::Slider => Some(ValueKind::Int),
            Self::FloatSpinBox | Self::FloatSlider => Some(ValueKind::Float),
            Self::ComboBox => Some(ValueKind::Any),
            Self::DateTimeEdit => Some(ValueKind::DateTime),
            Self::Container => None,
        }
    }

    /// Capabilities a backend widget of this kind must provide.
    pub fn required_capabilities(self) -> Capabilities {
        match self {
            Self::Label | Self::LineEdit | Self::TextEdit | Self::FileEdit => {
                Capabilities::VALUE | Capabilities::TEXT
            }
            Self::PushButton | Self::CheckBox | Self::RadioButton => Capabilities::BUTTON,
            Self::SpinBox | Self::FloatSpinBox => Capabilities::VALUE | Capabilities::RANGED,
            Self::Slider | Self::FloatSlider => Capabilities::SLIDER,
            Self::ComboBox => Capabilities::CATEGORICAL,
            Self::DateTimeEdit => Capabilities::VALUE,
            Self::Container => Capabilities::CONTAINER | Capabilities::ORIENTATION,
        }
    }

    /// Whether the kind holds integers (as opposed to floats) when ranged.
    pub fn is_integral(self) -> bool {
        matches!(self, Self::SpinBox | Self::Slider)
    }

    /// Check that `widget` provides every capability this kind requires.
    ///
    /// The first missing capability is reported as
    /// [`WidgetError::NotImplemented`].
    pub fn check_conformance(self, widget: &dyn WidgetProtocol) -> WidgetResult<()> {
        let missing = widget.capabilities().missing(self.required_capabilities());
        match missing.names().first().copied() {
            None => Ok(()),
            Some(capability) => {
                tracing::warn!(
                    target: targets::BACKEND,
                    kind = self.name(),
                    %capability,
                    "backend widget does not conform"
                );
                Err(WidgetError::NotImplemented { capability })
            }
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WidgetKind {
    type Err = WidgetError;

    /// Case-insensitive; underscores and dashes are ignored (`"push_button"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().to_lowercase() == wanted)
            .ok_or_else(|| WidgetError::UnknownWidgetKind(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("Slider".parse::<WidgetKind>().unwrap(), WidgetKind::Slider);
        assert_eq!("combobox".parse::<WidgetKind>().unwrap(), WidgetKind::ComboBox);
        assert_eq!(
            "float_spin_box".parse::<WidgetKind>().unwrap(),
            WidgetKind::FloatSpinBox
        );
        assert!(matches!(
            "Knob".parse::<WidgetKind>(),
            Err(WidgetError::UnknownWidgetKind(name)) if name == "Knob"
        ));
    }

    #[test]
    fn test_display_round_trip() {
        for kind in WidgetKind::ALL {
            assert_eq!(kind.to_string().parse::<WidgetKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_value_kinds() {
        assert_eq!(WidgetKind::CheckBox.value_kind(), Some(ValueKind::Bool));
        assert_eq!(WidgetKind::FileEdit.value_kind(), Some(ValueKind::Path));
        assert_eq!(WidgetKind::Container.value_kind(), None);
        assert!(WidgetKind::Slider.is_integral());
        assert!(!WidgetKind::FloatSlider.is_integral());
    }
}
