//! Panelkit - toolkit-neutral widget protocols.
//!
//! A GUI form layer talks to widgets only through the protocols defined
//! here; a backend binds them to a concrete toolkit. This crate provides:
//!
//! - **Protocols**: [`WidgetProtocol`] and its value, ranged, button, slider,
//!   categorical and container refinements, plus the independent
//!   [`SupportsText`], [`SupportsOrientation`] and [`SupportsChoices`]
//!   capabilities
//! - **Application backend**: [`ApplicationBackend`] for the event loop,
//!   quitting and the single application timer
//! - **Data model**: [`Value`], [`Choices`], [`Orientation`], [`Margins`] and
//!   [`Bitmap`]
//! - **Backends**: the [`Backend`] factory trait, [`BackendRegistry`] and the
//!   [`headless`] reference backend
//! - **Configuration**: [`PanelkitConfig`] loaded from TOML or the environment
//! - **Type map**: [`TypeMap`] picks a widget kind for a value
//!
//! # Example
//!
//! ```
//! use panelkit::{Backend, BackendRegistry, CapabilityExt, PanelkitConfig, Value, WidgetKind};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = BackendRegistry::with_builtin().select(&PanelkitConfig::default())?;
//!     let mut check = backend.create_widget(WidgetKind::CheckBox)?;
//!     check.require_value_mut()?.set_value(Value::Bool(true))?;
//!     backend.application().process_events()?;
//!     assert_eq!(check.require_value()?.value(), Value::Bool(true));
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod bitmap;
pub mod choices;
pub mod config;
pub mod error;
pub mod geometry;
pub mod headless;
pub mod kind;
pub mod protocols;
pub mod type_map;
pub mod value;

pub use backend::{Backend, BackendFactory, BackendRegistry};
pub use bitmap::Bitmap;
pub use choices::{Choice, Choices};
pub use config::{HeadlessConfig, LayoutConfig, PanelkitConfig};
pub use error::{ErrorKind, WidgetError, WidgetResult};
pub use geometry::{Margins, Orientation, Size};
pub use kind::WidgetKind;
pub use protocols::{
    ApplicationBackend, ButtonWidgetProtocol, Callback, Capabilities, CapabilityExt,
    CategoricalWidgetProtocol, ContainerProtocol, RangedWidgetProtocol, SliderWidgetProtocol,
    SupportsChoices, SupportsOrientation, SupportsText, TimeoutCallback, ValueWidgetProtocol,
    WidgetProtocol,
};
pub use type_map::{TypeMap, WidgetOptions};
pub use value::{Value, ValueKind};

pub use panelkit_core::{ConnectionId, PassSummary, WidgetId};

static_assertions::assert_impl_all!(WidgetError: Send, Sync);
static_assertions::assert_impl_all!(BackendRegistry: Send, Sync);
static_assertions::assert_impl_all!(Value: Send, Sync);
