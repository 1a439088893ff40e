//! Backend factories and selection.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use panelkit_core::logging::targets;

use crate::config::PanelkitConfig;
use crate::error::{WidgetError, WidgetResult};
use crate::headless::HeadlessBackend;
use crate::kind::WidgetKind;
use crate::protocols::{ApplicationBackend, WidgetProtocol};

/// A GUI toolkit binding: an application plus a widget factory.
pub trait Backend: Send + Sync {
    /// Registry name of the backend.
    fn name(&self) -> &str;

    /// The application driving this backend's widgets.
    fn application(&self) -> &dyn ApplicationBackend;

    /// Build a widget of `kind` without checking it.
    fn build_widget(&self, kind: WidgetKind) -> WidgetResult<Box<dyn WidgetProtocol>>;

    /// Build a widget of `kind` and check that it provides every capability
    /// the kind requires.
    fn create_widget(&self, kind: WidgetKind) -> WidgetResult<Box<dyn WidgetProtocol>> {
        let widget = self.build_widget(kind)?;
        kind.check_conformance(widget.as_ref())?;
        tracing::debug!(
            target: targets::BACKEND,
            backend = self.name(),
            %kind,
            id = ?widget.widget_id(),
            "widget created"
        );
        Ok(widget)
    }
}

/// Builds a backend from the configuration.
pub type BackendFactory =
    Box<dyn Fn(&PanelkitConfig) -> WidgetResult<Arc<dyn Backend>> + Send + Sync + 'static>;

/// Named backend factories.
pub struct BackendRegistry {
    factories: BTreeMap<String, BackendFactory>,
}

impl BackendRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// A registry with the built-in backends (`headless`).
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register("headless", |config| {
            Ok(Arc::new(HeadlessBackend::from_config(config)) as Arc<dyn Backend>)
        });
        #[cfg(all(
            feature = "native",
            any(target_os = "windows", target_os = "macos", target_os = "linux")
        ))]
        registry.register("headless-native", |config| {
            Ok(Arc::new(HeadlessBackend::native(config)?) as Arc<dyn Backend>)
        });
        registry
    }

    /// Register a factory, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&PanelkitConfig) -> WidgetResult<Arc<dyn Backend>> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Box::new(factory)).is_some() {
            tracing::warn!(target: targets::BACKEND, %name, "backend factory replaced");
        }
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Build the backend registered as `name`.
    pub fn create(&self, name: &str, config: &PanelkitConfig) -> WidgetResult<Arc<dyn Backend>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| WidgetError::UnknownBackend(name.to_owned()))?;
        tracing::info!(target: targets::BACKEND, backend = name, "backend selected");
        factory(config)
    }

    /// Build the backend named by `config.backend`.
    pub fn select(&self, config: &PanelkitConfig) -> WidgetResult<Arc<dyn Backend>> {
        self.create(&config.backend, config)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("backends", &self.names())
            .finish()
    }
}
