//! Incremental statusline render pipeline.
//!
//! A [`Statusline`] owns the render state for one editor window:
//!
//! - [`cache::RenderCache`]: last fragment and dirty flag per component
//! - [`progress::ProgressRegistry`]: per-client progress entries with spinner
//! - [`scheduler::UpdateScheduler`]: throttle/debounce bookkeeping and the
//!   fallback watchdog
//! - [`compose`]: width-dependent assembly of the final line
//!
//! Everything the pipeline needs from the editor goes through the [`Host`]
//! trait: value sources, viewport queries, publishing, and timer primitives.
//! The pipeline never sleeps; timers fire by the host calling
//! [`Statusline::on_timer`] with the handle it returned from
//! [`Host::schedule_timer`].

pub mod cache;
pub mod compose;
pub mod config;
pub mod error;
pub mod event;
pub mod host;
pub mod progress;
pub mod scheduler;
mod source;
pub mod stats;
mod statusline;
pub mod timer;

pub use config::StatuslineConfig;
pub use error::{ConfigError, SourceError, TimerError};
pub use event::{EditorEvent, Route};
pub use host::{Host, TimerHandle};
pub use progress::{ClientId, ProgressEvent};
pub use scheduler::Strategy;
pub use stats::PipelineStats;
pub use statusline::{ApplyOutcome, Statusline, StatuslineOutput, UpdateOutcome};
pub use stratus_primitives::{ComponentId, EditorMode, EventKind, SurfaceKind};
