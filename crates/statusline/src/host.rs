//! Seam between the pipeline and the host editor.

use std::fmt;
use std::time::Duration;

use stratus_primitives::{ComponentId, EventKind, SurfaceKind};

use crate::error::{SourceError, TimerError};

/// Opaque, host-assigned identity of a scheduled timer.
///
/// The pipeline remembers which purpose each handle serves; the host only has
/// to hand the same value back to [`crate::Statusline::on_timer`] when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

impl fmt::Display for TimerHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "timer#{}", self.0)
	}
}

/// Everything the pipeline consumes from the editor.
///
/// All calls happen on the host's single event-loop thread.
pub trait Host {
	/// Renders one component fragment from current editor state.
	///
	/// Returning `Ok("")` means "nothing to show". Errors and panics are
	/// contained by the pipeline and degrade the component to empty.
	fn read_component(&mut self, component: ComponentId) -> Result<String, SourceError>;

	/// Width of the window the statusline belongs to, in columns.
	fn viewport_width(&self) -> u16;

	/// Kind of surface the window shows.
	fn surface_kind(&self) -> SurfaceKind;

	/// Stores a newly composed line as the current statusline.
	fn publish(&mut self, line: &str);

	/// Asks the host to repaint using the last published line.
	fn request_redraw(&mut self);

	/// Schedules a timer `delay` from now; repeating timers re-fire every `delay`.
	fn schedule_timer(&mut self, delay: Duration, repeating: bool) -> Result<TimerHandle, TimerError>;

	/// Cancels a pending timer. Unknown or already-fired handles are ignored.
	fn cancel_timer(&mut self, handle: TimerHandle);

	/// Registers interest in an editor event kind.
	fn subscribe(&mut self, event: EventKind);
}
