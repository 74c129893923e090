//! Common utilities for statusline integration tests.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use stratus_statusline::timer::TimerQueue;
use stratus_statusline::{
	ComponentId, EditorEvent, EventKind, Host, SourceError, Statusline, StatuslineConfig, SurfaceKind,
	TimerError, TimerHandle,
};

/// In-memory host backed by a virtual clock and a [`TimerQueue`].
#[derive(Debug)]
pub struct FakeHost {
	pub clock: Instant,
	pub timers: TimerQueue,
	pub width: u16,
	pub surface: SurfaceKind,
	pub values: HashMap<ComponentId, Result<String, SourceError>>,
	pub panic_on: Option<ComponentId>,
	pub reject_timers: bool,
	pub reads: Vec<ComponentId>,
	pub published: Vec<String>,
	pub redraws: usize,
	pub subscriptions: Vec<EventKind>,
	pub cancelled: Vec<TimerHandle>,
}

impl FakeHost {
	pub fn new(clock: Instant) -> Self {
		let values = ComponentId::all()
			.filter(|c| c.is_sourced())
			.map(|c| (c, Ok(format!("<{c}>"))))
			.collect();
		Self {
			clock,
			timers: TimerQueue::new(),
			width: 120,
			surface: SurfaceKind::Editor,
			values,
			panic_on: None,
			reject_timers: false,
			reads: Vec::new(),
			published: Vec::new(),
			redraws: 0,
			subscriptions: Vec::new(),
			cancelled: Vec::new(),
		}
	}

	pub fn set_value(&mut self, component: ComponentId, text: &str) {
		self.values.insert(component, Ok(text.to_owned()));
	}

	/// Number of reads of `component` so far.
	pub fn reads_of(&self, component: ComponentId) -> usize {
		self.reads.iter().filter(|c| **c == component).count()
	}
}

impl Host for FakeHost {
	fn read_component(&mut self, component: ComponentId) -> Result<String, SourceError> {
		self.reads.push(component);
		if self.panic_on == Some(component) {
			panic!("{component} source exploded");
		}
		self.values.get(&component).cloned().unwrap_or_else(|| Ok(String::new()))
	}

	fn viewport_width(&self) -> u16 {
		self.width
	}

	fn surface_kind(&self) -> SurfaceKind {
		self.surface
	}

	fn publish(&mut self, line: &str) {
		self.published.push(line.to_owned());
	}

	fn request_redraw(&mut self) {
		self.redraws += 1;
	}

	fn schedule_timer(&mut self, delay: Duration, repeating: bool) -> Result<TimerHandle, TimerError> {
		if self.reject_timers {
			return Err(TimerError::Rejected("test host refuses timers".into()));
		}
		Ok(self.timers.schedule(self.clock, delay, repeating))
	}

	fn cancel_timer(&mut self, handle: TimerHandle) {
		self.timers.cancel(handle);
		self.cancelled.push(handle);
	}

	fn subscribe(&mut self, event: EventKind) {
		self.subscriptions.push(event);
	}
}

/// A started statusline session driven in virtual time.
pub struct Harness {
	pub host: FakeHost,
	pub line: Statusline,
	pub t0: Instant,
}

impl Harness {
	pub fn new() -> Self {
		Self::with_config(StatuslineConfig::default())
	}

	pub fn with_config(config: StatuslineConfig) -> Self {
		let _ = tracing_subscriber::fmt().with_test_writer().try_init();
		let t0 = Instant::now();
		let mut host = FakeHost::new(t0);
		let mut line = Statusline::new(config);
		line.start(&mut host, t0);
		Self { host, line, t0 }
	}

	/// Virtual time elapsed since the session started.
	pub fn elapsed_ms(&self) -> u64 {
		self.host.clock.duration_since(self.t0).as_millis() as u64
	}

	/// Delivers an editor event at the current virtual time.
	pub fn event(&mut self, event: EditorEvent) {
		let now = self.host.clock;
		self.line.handle_event(&mut self.host, event, now);
	}

	/// Moves the clock forward by `ms`, firing every timer that comes due in
	/// deadline order. Returns the handles fired.
	pub fn advance(&mut self, ms: u64) -> Vec<TimerHandle> {
		let target = self.host.clock + Duration::from_millis(ms);
		let mut fired = Vec::new();
		while let Some((handle, deadline)) = self.host.timers.pop_due(target) {
			self.host.clock = deadline;
			self.line.on_timer(&mut self.host, handle, deadline);
			fired.push(handle);
		}
		self.host.clock = target;
		fired
	}

	/// Moves the clock to `ms` after the session start.
	pub fn advance_to(&mut self, ms: u64) -> Vec<TimerHandle> {
		let delta = ms.saturating_sub(self.elapsed_ms());
		self.advance(delta)
	}

	/// Last published line.
	pub fn last(&self) -> &str {
		self.host.published.last().map_or("", String::as_str)
	}

	pub fn apply(&mut self) -> stratus_statusline::ApplyOutcome {
		let now = self.host.clock;
		self.line.apply(&mut self.host, now)
	}
}
