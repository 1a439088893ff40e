//! The toolkit-neutral widget protocols.
//!
//! Conformance is structural. A backend widget implements
//! [`WidgetProtocol`] plus whichever capability traits it supports, and
//! overrides the matching `as_*` probes. The composite contracts
//! ([`ButtonWidgetProtocol`], [`SliderWidgetProtocol`],
//! [`CategoricalWidgetProtocol`]) have blanket implementations, so any type
//! with the constituent traits satisfies them without declaring anything.
//!
//! ```text
//! WidgetProtocol
//! ├── ValueWidgetProtocol
//! │   ├── RangedWidgetProtocol ── + SupportsOrientation = SliderWidgetProtocol
//! │   ├── + SupportsText       = ButtonWidgetProtocol
//! │   └── + SupportsChoices    = CategoricalWidgetProtocol
//! └── ContainerProtocol (+ SupportsOrientation)
//! ```

mod application;
mod capability;
mod container;
mod value;
mod widget;

pub use application::{ApplicationBackend, TimeoutCallback};
pub use capability::{Capabilities, SupportsChoices, SupportsOrientation, SupportsText};
pub use container::ContainerProtocol;
pub use value::{
    ButtonWidgetProtocol, CategoricalWidgetProtocol, RangedWidgetProtocol, SliderWidgetProtocol,
    ValueWidgetProtocol,
};
pub use widget::{Callback, CapabilityExt, WidgetProtocol};
