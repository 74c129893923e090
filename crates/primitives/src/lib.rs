//! Core vocabulary for the statusline: component slots, editor modes, surfaces, and markup.

/// Statusline component slots.
pub mod component;
/// Editor-level event kinds the pipeline subscribes to.
pub mod event;
/// Statusline markup: highlight groups, stretch markers, plain-text painting.
pub mod markup;
/// Editor mode definitions.
pub mod mode;
/// Non-editing surface kinds (tree browsers, pickers, dashboards).
pub mod surface;

pub use component::{ComponentId, UnknownComponent};
pub use event::EventKind;
pub use mode::{EditorMode, ModeFamily};
pub use surface::SurfaceKind;
