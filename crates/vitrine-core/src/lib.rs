//! Vitrine Core Library
//!
//! Platform-agnostic data model and interaction logic for the Vitrine
//! advertising-display editor.

pub mod articles;
pub mod color;
pub mod components;
pub mod display;
pub mod drag;
pub mod geometry;
pub mod ids;
pub mod input;
pub mod presentation;
pub mod properties;
pub mod relay;
pub mod selection;
pub mod shapes;
pub mod studio;
pub mod templates;

pub use articles::{Article, ArticleMirror, NewArticle, RelayEvent};
pub use color::HexColor;
pub use components::{Component, ComponentId, ComponentKind};
pub use display::{AdvertisingDisplay, DisplayError};
pub use drag::{DragController, DragState, DragTarget, DragUpdate, EditorTab};
pub use geometry::{Percent, PercentPoint, PercentSize};
pub use input::{MouseButton, PointerEvent};
pub use presentation::{PresentationCapability, PresentationConnection, PresentationError, Presenter};
pub use properties::WebProperties;
pub use relay::{ClientEvent, ConnectionState, RelayConfig, RelayError};
pub use selection::Selection;
pub use shapes::{BackgroundShape, ShapeId, ShapeKind};
pub use studio::{Studio, StudioError, View};
pub use templates::{Template, TemplateError, TemplateId, TemplateStore};

#[cfg(not(target_arch = "wasm32"))]
pub use relay::RelayClient;
