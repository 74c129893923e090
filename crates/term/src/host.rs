//! [`Host`] implementation backing a replay: snapshot-driven sources, a
//! virtual-time timer queue and a line sink.

use std::io::Write;
use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;
use stratus_primitives::{ComponentId, EventKind, SurfaceKind, markup};
use stratus_statusline::timer::TimerQueue;
use stratus_statusline::{Host, SourceError, TimerError, TimerHandle};
use tracing::{trace, warn};

use crate::snapshot::EditorSnapshot;
use crate::sources;

pub struct ReplayHost<'a, W: Write> {
	pub snapshot: EditorSnapshot,
	pub timers: TimerQueue,
	/// Current virtual time.
	pub clock: Instant,
	started: Instant,
	sink: &'a mut W,
	raw: bool,
	subscriptions: FxHashSet<EventKind>,
	/// Lines written to the sink.
	pub published: usize,
}

impl<'a, W: Write> ReplayHost<'a, W> {
	pub fn new(snapshot: EditorSnapshot, started: Instant, sink: &'a mut W, raw: bool) -> Self {
		Self {
			snapshot,
			timers: TimerQueue::new(),
			clock: started,
			started,
			sink,
			raw,
			subscriptions: FxHashSet::default(),
			published: 0,
		}
	}

	pub fn is_subscribed(&self, kind: EventKind) -> bool {
		self.subscriptions.contains(&kind)
	}

	pub fn flush(&mut self) -> std::io::Result<()> {
		self.sink.flush()
	}

	fn elapsed_ms(&self) -> u128 {
		self.clock.saturating_duration_since(self.started).as_millis()
	}
}

impl<W: Write> Host for ReplayHost<'_, W> {
	fn read_component(&mut self, component: ComponentId) -> Result<String, SourceError> {
		sources::render(&mut self.snapshot, component)
	}

	fn viewport_width(&self) -> u16 {
		self.snapshot.width
	}

	fn surface_kind(&self) -> SurfaceKind {
		self.snapshot.surface
	}

	fn publish(&mut self, line: &str) {
		let rendered = if self.raw {
			line.to_owned()
		} else {
			markup::justify(line, usize::from(self.snapshot.width))
		};
		let at = self.elapsed_ms();
		if let Err(error) = writeln!(self.sink, "[{at:>7}ms] {rendered}") {
			warn!(%error, "replay.publish.write_failed");
			return;
		}
		self.published += 1;
	}

	fn request_redraw(&mut self) {
		trace!(at_ms = self.elapsed_ms() as u64, "replay.redraw");
	}

	fn schedule_timer(&mut self, delay: Duration, repeating: bool) -> Result<TimerHandle, TimerError> {
		let handle = self.timers.schedule(self.clock, delay, repeating);
		trace!(%handle, delay_ms = delay.as_millis() as u64, repeating, "replay.timer.schedule");
		Ok(handle)
	}

	fn cancel_timer(&mut self, handle: TimerHandle) {
		self.timers.cancel(handle);
	}

	fn subscribe(&mut self, event: EventKind) {
		self.subscriptions.insert(event);
	}
}
