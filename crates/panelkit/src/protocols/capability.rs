//! Capability protocols and capability sets.
//!
//! The capability traits are small and independent: any widget may implement
//! any combination of them. [`Capabilities`] is the bit set a generic layer
//! derives from a widget's probes to ask what it can do.

use bitflags::bitflags;

use crate::choices::Choices;
use crate::error::WidgetResult;
use crate::geometry::Orientation;
use crate::value::Value;

bitflags! {
    /// What a widget can do.
    ///
    /// Never declared by a widget: it is computed from the capability probes
    /// of [`WidgetProtocol`](super::WidgetProtocol).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u32 {
        /// Holds a current value with change notification.
        const VALUE = 1 << 0;
        /// Has numeric bounds and a step.
        const RANGED = 1 << 1;
        /// Offers a set of (label, data) choices.
        const CHOICES = 1 << 2;
        /// Has a text label or content.
        const TEXT = 1 << 3;
        /// Has an orientation.
        const ORIENTATION = 1 << 4;
        /// Manages ordered children.
        const CONTAINER = 1 << 5;

        /// Value plus label text.
        const BUTTON = Self::VALUE.bits() | Self::TEXT.bits();
        /// Ranged value with an orientation.
        const SLIDER = Self::VALUE.bits() | Self::RANGED.bits() | Self::ORIENTATION.bits();
        /// Value chosen among choices.
        const CATEGORICAL = Self::VALUE.bits() | Self::CHOICES.bits();
    }
}

impl Capabilities {
    /// The capabilities of `required` that `self` lacks.
    pub fn missing(self, required: Capabilities) -> Capabilities {
        required.difference(self)
    }

    /// Lowercase names of the single capabilities in the set.
    pub fn names(self) -> Vec<&'static str> {
        [
            (Self::VALUE, "value"),
            (Self::RANGED, "ranged"),
            (Self::CHOICES, "choices"),
            (Self::TEXT, "text"),
            (Self::ORIENTATION, "orientation"),
            (Self::CONTAINER, "container"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect()
    }
}

/// A widget with label text or text content.
pub trait SupportsText {
    fn text(&self) -> String;

    fn set_text(&mut self, text: &str);
}

/// A widget with a horizontal or vertical orientation.
pub trait SupportsOrientation {
    fn orientation(&self) -> Orientation;

    fn set_orientation(&mut self, orientation: Orientation);

    /// Set the orientation from its name.
    ///
    /// Only `"horizontal"` and `"vertical"` are accepted; anything else fails
    /// with [`InvalidOrientation`](crate::WidgetError::InvalidOrientation)
    /// and leaves the orientation unchanged.
    fn set_orientation_named(&mut self, name: &str) -> WidgetResult<()> {
        let orientation = name.parse()?;
        self.set_orientation(orientation);
        Ok(())
    }
}

/// A widget offering an ordered set of (label, data) choices.
pub trait SupportsChoices {
    fn choices(&self) -> Choices;

    /// Replace the choice set.
    ///
    /// The selection is kept when its data is still among the new choices
    /// (compared by equality); otherwise the first choice becomes selected,
    /// or no value at all when the new set is empty.
    fn set_choices(&mut self, choices: Choices) -> WidgetResult<()>;

    /// Replace the choice set from (label, data) pairs.
    fn set_choice_pairs(&mut self, pairs: Vec<(String, Value)>) -> WidgetResult<()> {
        self.set_choices(Choices::try_from_iter(pairs)?)
    }
}
