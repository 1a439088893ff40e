//! Orientation, margins and sizes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

/// Direction along which a slider moves or a container stacks its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The name used by [`FromStr`] and [`Display`](fmt::Display).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = WidgetError;

    /// Accepts exactly `"horizontal"` or `"vertical"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            other => Err(WidgetError::InvalidOrientation(other.to_owned())),
        }
    }
}

impl TryFrom<&str> for Orientation {
    type Error = WidgetError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Four-sided inset of a container's layout, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Margins {
    pub const ZERO: Margins = Margins::uniform(0);

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Total horizontal inset; negative margins count as zero.
    pub fn horizontal(&self) -> u32 {
        self.left.max(0).unsigned_abs() + self.right.max(0).unsigned_abs()
    }

    /// Total vertical inset; negative margins count as zero.
    pub fn vertical(&self) -> u32 {
        self.top.max(0).unsigned_abs() + self.bottom.max(0).unsigned_abs()
    }
}

impl From<(i32, i32, i32, i32)> for Margins {
    fn from((left, top, right, bottom): (i32, i32, i32, i32)) -> Self {
        Self::new(left, top, right, bottom)
    }
}

impl From<Margins> for (i32, i32, i32, i32) {
    fn from(m: Margins) -> Self {
        (m.left, m.top, m.right, m.bottom)
    }
}

/// A size in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_parse() {
        assert_eq!("vertical".parse::<Orientation>().unwrap(), Orientation::Vertical);
        assert_eq!(
            Orientation::try_from("horizontal").unwrap(),
            Orientation::Horizontal
        );
        assert!(matches!(
            "Vertical".parse::<Orientation>(),
            Err(WidgetError::InvalidOrientation(s)) if s == "Vertical"
        ));
        assert!("".parse::<Orientation>().is_err());
    }

    #[test]
    fn test_orientation_display_round_trip() {
        for o in [Orientation::Horizontal, Orientation::Vertical] {
            assert_eq!(o.to_string().parse::<Orientation>().unwrap(), o);
        }
    }

    #[test]
    fn test_margins() {
        let m: Margins = (1, 2, 3, 4).into();
        assert_eq!(m, Margins::new(1, 2, 3, 4));
        assert_eq!(m.horizontal(), 4);
        assert_eq!(m.vertical(), 6);
        assert_eq!(Margins::new(-5, 0, 2, 0).horizontal(), 2);
    }
}
