//! The statusline session: render state for one window wired to a [`Host`].

use std::time::{Duration, Instant};

use smallvec::SmallVec;
use stratus_primitives::{ComponentId, EventKind};
use tracing::{debug, trace, warn};

use crate::cache::RenderCache;
use crate::compose::{self, Breakpoint};
use crate::config::StatuslineConfig;
use crate::error::TimerError;
use crate::event::{self, EditorEvent};
use crate::host::{Host, TimerHandle};
use crate::progress::{ProgressEvent, ProgressRegistry};
use crate::scheduler::{PendingDebounce, Strategy, UpdateScheduler};
use crate::stats::PipelineStats;

/// The last line handed to [`Host::publish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatuslineOutput {
	pub line: String,
	pub pushed_at: Instant,
}

/// Result of one [`Statusline::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
	/// A changed line was published and a redraw requested.
	Pushed,
	/// The composed line matched the last published one; the host was not
	/// touched.
	Unchanged,
}

/// Result of a strategy-gated component update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
	Applied(ApplyOutcome),
	/// Throttled call inside its window; nothing happened.
	Dropped,
	/// Debounce timer armed; the component applies at `due_at` unless
	/// superseded.
	Scheduled { due_at: Instant },
	/// The debounce timer could not be armed. The component is dirty and
	/// will be picked up by the next apply of any kind.
	Deferred,
}

/// Render state for one editor window.
///
/// All entry points take the host and the current time explicitly; the
/// session never reads a clock or sleeps. Timers armed through the host are
/// identified on [`Statusline::on_timer`] by comparing the fired handle with
/// the handles this session holds.
#[derive(Debug)]
pub struct Statusline {
	config: StatuslineConfig,
	cache: RenderCache,
	progress: ProgressRegistry,
	scheduler: UpdateScheduler,
	output: Option<StatuslineOutput>,
	last_width: Option<u16>,
	stats: PipelineStats,
	shut_down: bool,
}

impl Statusline {
	pub fn new(config: StatuslineConfig) -> Self {
		let progress = ProgressRegistry::new(config.progress.clone());
		Self {
			config,
			cache: RenderCache::new(),
			progress,
			scheduler: UpdateScheduler::new(),
			output: None,
			last_width: None,
			stats: PipelineStats::default(),
			shut_down: false,
		}
	}

	/// Subscribes to every editor event, arms the fallback watchdog and
	/// publishes the initial line.
	pub fn start(&mut self, host: &mut dyn Host, now: Instant) -> ApplyOutcome {
		for kind in EventKind::all() {
			host.subscribe(kind);
		}
		debug!(
			fallback_ms = self.config.fallback_interval_ms,
			"statusline.start"
		);
		self.apply(host, now)
	}

	/// Brings the published line up to date.
	///
	/// Sweeps expired progress, invalidates everything if the viewport width
	/// changed, recomputes the dirty components the current layout shows,
	/// composes, and publishes only if the line changed. Also re-arms the
	/// spinner and fallback timers when they are missing. Never fails.
	pub fn apply(&mut self, host: &mut dyn Host, now: Instant) -> ApplyOutcome {
		if self.shut_down {
			trace!("statusline.apply.after_shutdown");
			return ApplyOutcome::Unchanged;
		}
		self.stats.applies += 1;

		let live = self.progress.len();
		for handle in self.progress.sweep(now) {
			host.cancel_timer(handle);
		}
		if self.progress.len() != live {
			self.cache.mark_dirty(ComponentId::Progress);
		}

		let width = host.viewport_width();
		let surface = host.surface_kind();
		if self.last_width != Some(width) {
			if let Some(previous) = self.last_width {
				debug!(previous, width, "statusline.width_changed");
			}
			self.last_width = Some(width);
			self.cache.mark_all_dirty();
		}

		let mut refreshed = 0usize;
		if !surface.is_special() {
			let breakpoint = Breakpoint::for_width(width, &self.config.breakpoints);
			let dirty: SmallVec<[ComponentId; ComponentId::SLOTS]> = self
				.cache
				.dirty_components()
				.filter(|c| compose::is_visible(*c, breakpoint))
				.collect();
			for component in dirty {
				if component.is_sourced() {
					self.cache.get(component, |c| host.read_component(c));
				} else {
					let progress = &self.progress;
					self.cache.get(component, |_| Ok(progress.render(now, width)));
				}
				refreshed += 1;
			}
		}

		let line = compose::compose(&self.cache, width, surface, &self.config);
		let outcome = if self.output.as_ref().is_some_and(|o| o.line == line) {
			self.stats.unchanged += 1;
			ApplyOutcome::Unchanged
		} else {
			host.publish(&line);
			host.request_redraw();
			self.stats.pushes += 1;
			self.output = Some(StatuslineOutput { line, pushed_at: now });
			ApplyOutcome::Pushed
		};

		self.sync_spinner(host);
		self.ensure_fallback(host);
		trace!(width, ?surface, refreshed, ?outcome, "statusline.apply");
		outcome
	}

	/// Marks `component` dirty and applies synchronously.
	pub fn update_immediate(&mut self, host: &mut dyn Host, component: ComponentId, now: Instant) -> ApplyOutcome {
		self.cache.mark_dirty(component);
		self.apply(host, now)
	}

	/// Applies `component` unless it was already applied within `interval`.
	///
	/// Dropped calls leave no trace: no dirty mark and no trailing replay.
	pub fn update_throttled(
		&mut self,
		host: &mut dyn Host,
		component: ComponentId,
		interval: Duration,
		now: Instant,
	) -> UpdateOutcome {
		if !self.admit_throttled(component, interval, now) {
			return UpdateOutcome::Dropped;
		}
		self.cache.mark_dirty(component);
		UpdateOutcome::Applied(self.apply(host, now))
	}

	/// Re-arms the debounce timer of `component`; only the trailing call of a
	/// burst applies, `delay` after it was made.
	pub fn update_debounced(
		&mut self,
		host: &mut dyn Host,
		component: ComponentId,
		delay: Duration,
		now: Instant,
	) -> UpdateOutcome {
		if self.shut_down {
			return UpdateOutcome::Dropped;
		}
		if let Some(previous) = self.scheduler.take_debounce(component) {
			host.cancel_timer(previous.handle);
			self.stats.debounce_coalesced += 1;
		}
		match host.schedule_timer(delay, false) {
			Ok(handle) => {
				let due_at = now + delay;
				self.scheduler.replace_debounce(component, PendingDebounce { handle, due_at });
				trace!(%component, %handle, delay_ms = delay.as_millis(), "statusline.debounce");
				UpdateOutcome::Scheduled { due_at }
			}
			Err(error) => {
				self.timer_failed("debounce", &error);
				self.cache.mark_dirty(component);
				UpdateOutcome::Deferred
			}
		}
	}

	/// Routes an editor event onto component updates.
	///
	/// Immediate and admitted throttled updates of one event share a single
	/// apply.
	pub fn handle_event(&mut self, host: &mut dyn Host, event: EditorEvent, now: Instant) {
		if self.shut_down {
			trace!(kind = event.kind().name(), "statusline.event.after_shutdown");
			return;
		}
		trace!(kind = event.kind().name(), "statusline.event");

		match &event {
			EditorEvent::WindowResized => {
				self.cache.mark_all_dirty();
				self.apply(host, now);
				return;
			}
			EditorEvent::LspDetached(client) => {
				if let Some(handle) = self.progress.detach(client) {
					host.cancel_timer(handle);
				}
				self.cache.mark_dirty(ComponentId::Progress);
			}
			EditorEvent::Progress(progress) => self.record_progress(host, progress.clone(), now),
			_ => {}
		}

		let mut needs_apply = false;
		for route in event::routes(&event, &self.config.updates) {
			match route.strategy {
				Strategy::Immediate => {
					self.cache.mark_dirty(route.component);
					needs_apply = true;
				}
				Strategy::Throttled(interval) => {
					if self.admit_throttled(route.component, interval, now) {
						self.cache.mark_dirty(route.component);
						needs_apply = true;
					}
				}
				Strategy::Debounced(delay) => {
					self.update_debounced(host, route.component, delay, now);
				}
			}
		}
		if needs_apply {
			self.apply(host, now);
		}
	}

	/// Dispatches a fired timer. Returns `false` for handles this session does
	/// not own, which are ignored.
	pub fn on_timer(&mut self, host: &mut dyn Host, handle: TimerHandle, now: Instant) -> bool {
		if self.shut_down {
			return false;
		}

		if self.scheduler.fallback() == Some(handle) {
			self.stats.fallback_resyncs += 1;
			debug!(%handle, "statusline.fallback");
			self.cache.mark_all_dirty();
			self.apply(host, now);
			return true;
		}

		if self.progress.spinner().timer() == Some(handle) {
			if self.progress.has_active() {
				self.progress.spinner_mut().advance();
				self.stats.spinner_ticks += 1;
			}
			self.update_immediate(host, ComponentId::Progress, now);
			return true;
		}

		if let Some(component) = self.scheduler.debounce_owner(handle) {
			self.scheduler.take_debounce(component);
			trace!(%component, %handle, "statusline.debounce.fire");
			self.update_immediate(host, component, now);
			return true;
		}

		if self.progress.finish_grace(handle).is_some() {
			self.update_immediate(host, ComponentId::Progress, now);
			return true;
		}

		trace!(%handle, "statusline.timer.unknown");
		false
	}

	/// Cancels every timer the session holds and stops reacting to input.
	///
	/// Returns the number of timer handles released.
	pub fn shutdown(&mut self, host: &mut dyn Host) -> usize {
		if self.shut_down {
			return 0;
		}
		let mut handles = self.scheduler.drain_timers();
		handles.extend(self.progress.spinner_mut().take_timer());
		handles.extend(self.progress.take_grace_timers());
		for handle in &handles {
			host.cancel_timer(*handle);
		}
		self.shut_down = true;

		self.stats().log_summary();
		debug!(released = handles.len(), "statusline.shutdown");
		handles.len()
	}

	/// Marks a component dirty by name without applying. Unknown names are
	/// ignored and return `false`.
	pub fn mark_dirty_by_name(&mut self, name: &str) -> bool {
		self.cache.mark_dirty_by_name(name)
	}

	pub fn config(&self) -> &StatuslineConfig {
		&self.config
	}

	pub fn cache(&self) -> &RenderCache {
		&self.cache
	}

	pub fn progress(&self) -> &ProgressRegistry {
		&self.progress
	}

	pub fn scheduler(&self) -> &UpdateScheduler {
		&self.scheduler
	}

	/// Last published line, if any.
	pub fn output(&self) -> Option<&StatuslineOutput> {
		self.output.as_ref()
	}

	pub fn stats(&self) -> PipelineStats {
		PipelineStats {
			source_failures: self.cache.total_failures(),
			..self.stats
		}
	}

	pub fn is_shut_down(&self) -> bool {
		self.shut_down
	}

	fn admit_throttled(&mut self, component: ComponentId, interval: Duration, now: Instant) -> bool {
		let admitted = self.scheduler.admit_throttled(component, interval, now);
		if !admitted {
			self.stats.throttle_drops += 1;
			trace!(%component, "statusline.throttle.drop");
		}
		admitted
	}

	fn record_progress(&mut self, host: &mut dyn Host, event: ProgressEvent, now: Instant) {
		match event {
			ProgressEvent::Begin {
				client,
				client_name,
				title,
				message,
				percentage,
			} => {
				if let Some(grace) = self.progress.begin(client, client_name, title, message, percentage, now) {
					host.cancel_timer(grace);
				}
			}
			ProgressEvent::Report {
				client,
				title,
				message,
				percentage,
			} => {
				self.progress.report(&client, title, message, percentage, now);
			}
			ProgressEvent::End { client, message } => {
				if !self.progress.end(&client, message, now) {
					return;
				}
				match host.schedule_timer(self.config.progress.grace(), false) {
					Ok(handle) => self.progress.set_grace_timer(&client, handle),
					// The next sweep after the grace window removes the entry.
					Err(error) => self.timer_failed("grace", &error),
				}
			}
		}
	}

	/// Keeps the spinner timer armed exactly while some entry is active.
	fn sync_spinner(&mut self, host: &mut dyn Host) {
		let active = self.progress.has_active();
		let running = self.progress.spinner().is_running();
		if active && !running {
			match host.schedule_timer(self.config.progress.spinner_interval(), true) {
				Ok(handle) => {
					self.progress.spinner_mut().set_timer(handle);
					debug!(%handle, "progress.spinner.start");
				}
				Err(error) => self.timer_failed("spinner", &error),
			}
		} else if !active && let Some(handle) = self.progress.spinner_mut().take_timer() {
			host.cancel_timer(handle);
			debug!(%handle, "progress.spinner.stop");
		}
	}

	fn ensure_fallback(&mut self, host: &mut dyn Host) {
		if self.scheduler.fallback().is_some() {
			return;
		}
		match host.schedule_timer(self.config.fallback_interval(), true) {
			Ok(handle) => self.scheduler.set_fallback(handle),
			Err(error) => self.timer_failed("fallback", &error),
		}
	}

	fn timer_failed(&mut self, purpose: &'static str, error: &TimerError) {
		self.stats.timer_failures += 1;
		warn!(purpose, %error, "statusline.timer_failed");
	}
}
