//! Update strategy bookkeeping.
//!
//! The scheduler only records *when* a channel may be applied next; it never
//! talks to the host itself. [`crate::Statusline`] consults it before marking a
//! component dirty and hands it the handles returned by the host's timer
//! primitives:
//!
//! - **Immediate**: always admitted.
//! - **Throttled**: admitted at most once per interval; calls inside the
//!   window are dropped, not queued.
//! - **Debounced**: every call replaces the channel's pending timer, so only
//!   the trailing call runs once the delay elapses quietly.
//!
//! A single repeating fallback timer resyncs everything periodically.

use std::time::{Duration, Instant};

use stratus_primitives::ComponentId;

use crate::host::TimerHandle;

/// How a component update is admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
	/// Mark dirty and apply synchronously.
	Immediate,
	/// Apply at most once per interval, dropping calls inside the window.
	Throttled(Duration),
	/// Apply once the channel has been quiet for the delay.
	Debounced(Duration),
}

/// A debounce timer waiting to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDebounce {
	pub handle: TimerHandle,
	pub due_at: Instant,
}

#[derive(Debug, Default, Clone, Copy)]
struct Channel {
	last_applied_at: Option<Instant>,
	pending: Option<PendingDebounce>,
}

/// Per-channel timer records plus the session's fallback handle.
#[derive(Debug, Default)]
pub struct UpdateScheduler {
	channels: [Channel; ComponentId::SLOTS],
	fallback: Option<TimerHandle>,
}

impl UpdateScheduler {
	pub fn new() -> Self {
		Self::default()
	}

	/// Decides whether a throttled call for `component` may proceed at `now`.
	///
	/// An admitted call records `now` as the start of the next window.
	pub fn admit_throttled(&mut self, component: ComponentId, interval: Duration, now: Instant) -> bool {
		let channel = &mut self.channels[component.index()];
		if let Some(last) = channel.last_applied_at
			&& now.saturating_duration_since(last) < interval
		{
			return false;
		}
		channel.last_applied_at = Some(now);
		true
	}

	/// Last time a throttled call for `component` was admitted.
	pub fn last_applied_at(&self, component: ComponentId) -> Option<Instant> {
		self.channels[component.index()].last_applied_at
	}

	/// Records a newly armed debounce timer, returning the one it replaces.
	///
	/// The caller must cancel the returned handle with the host.
	pub fn replace_debounce(&mut self, component: ComponentId, pending: PendingDebounce) -> Option<TimerHandle> {
		self.channels[component.index()]
			.pending
			.replace(pending)
			.map(|p| p.handle)
	}

	/// Clears and returns the pending debounce of `component`.
	pub fn take_debounce(&mut self, component: ComponentId) -> Option<PendingDebounce> {
		self.channels[component.index()].pending.take()
	}

	/// Channel whose pending debounce timer is `handle`.
	pub fn debounce_owner(&self, handle: TimerHandle) -> Option<ComponentId> {
		ComponentId::all().find(|c| self.channels[c.index()].pending.is_some_and(|p| p.handle == handle))
	}

	pub fn pending(&self, component: ComponentId) -> Option<PendingDebounce> {
		self.channels[component.index()].pending
	}

	/// Number of channels with a debounce timer in flight.
	pub fn pending_count(&self) -> usize {
		self.channels.iter().filter(|c| c.pending.is_some()).count()
	}

	pub fn fallback(&self) -> Option<TimerHandle> {
		self.fallback
	}

	pub fn set_fallback(&mut self, handle: TimerHandle) {
		self.fallback = Some(handle);
	}

	/// Clears every timer record and returns the handles to cancel.
	pub fn drain_timers(&mut self) -> Vec<TimerHandle> {
		let mut handles: Vec<TimerHandle> = self.fallback.take().into_iter().collect();
		for channel in &mut self.channels {
			if let Some(pending) = channel.pending.take() {
				handles.push(pending.handle);
			}
		}
		handles
	}
}
