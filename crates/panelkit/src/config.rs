//! Configuration for backend selection and headless defaults.
//!
//! ```toml
//! backend = "headless"
//!
//! [layout]
//! orientation = "horizontal"
//! margins = { left = 4, top = 4, right = 4, bottom = 4 }
//! spacing = 6
//!
//! [headless]
//! scale = 2
//! ```

use std::path::Path;

use panelkit_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::WidgetResult;
use crate::geometry::{Margins, Orientation};

/// Environment variable overriding [`PanelkitConfig::backend`].
pub const BACKEND_ENV: &str = "PANELKIT_BACKEND";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelkitConfig {
    /// Name of the backend to select.
    pub backend: String,
    pub layout: LayoutConfig,
    pub headless: HeadlessConfig,
}

impl Default for PanelkitConfig {
    fn default() -> Self {
        Self {
            backend: "headless".to_owned(),
            layout: LayoutConfig::default(),
            headless: HeadlessConfig::default(),
        }
    }
}

/// Layout defaults for new containers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub orientation: Orientation,
    pub margins: Margins,
    pub spacing: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            margins: Margins::ZERO,
            spacing: 4,
        }
    }
}

/// Options of the headless backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessConfig {
    /// Pixel scale applied to rendered bitmaps. Values below 1 count as 1.
    pub scale: u32,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self { scale: 1 }
    }
}

impl PanelkitConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> WidgetResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load a TOML file.
    pub fn load(path: impl AsRef<Path>) -> WidgetResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(target: targets::BACKEND, path = %path.display(), backend = %config.backend, "configuration loaded");
        Ok(config)
    }

    /// Defaults, with the backend taken from `PANELKIT_BACKEND` when set.
    pub fn from_env() -> Self {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(backend) = lookup(BACKEND_ENV).filter(|b| !b.trim().is_empty()) {
            tracing::debug!(target: targets::BACKEND, %backend, "backend overridden from environment");
            self.backend = backend.trim().to_owned();
        }
        self
    }

    /// The render scale, at least 1.
    pub fn scale(&self) -> u32 {
        self.headless.scale.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WidgetError;

    #[test]
    fn test_defaults() {
        let config = PanelkitConfig::from_toml_str("").unwrap();
        assert_eq!(config, PanelkitConfig::default());
        assert_eq!(config.backend, "headless");
        assert_eq!(config.layout.spacing, 4);
        assert_eq!(config.scale(), 1);
    }

    #[test]
    fn test_parse_sections() {
        let config = PanelkitConfig::from_toml_str(
            r#"
            backend = "other"

            [layout]
            orientation = "horizontal"
            margins = { left = 1, top = 2, right = 3, bottom = 4 }

            [headless]
            scale = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.backend, "other");
        assert_eq!(config.layout.orientation, Orientation::Horizontal);
        assert_eq!(config.layout.margins, Margins::new(1, 2, 3, 4));
        assert_eq!(config.layout.spacing, 4);
        assert_eq!(config.scale(), 1);
    }

    #[test]
    fn test_bad_orientation_is_config_error() {
        let err = PanelkitConfig::from_toml_str("[layout]\norientation = \"diagonal\"").unwrap_err();
        assert!(matches!(err, WidgetError::Config(_)));
    }

    #[test]
    fn test_env_override() {
        let config = PanelkitConfig::default().with_env(|key| {
            (key == BACKEND_ENV).then(|| " custom ".to_owned())
        });
        assert_eq!(config.backend, "custom");

        let config = PanelkitConfig::default().with_env(|_| Some(String::new()));
        assert_eq!(config.backend, "headless");
    }
}
