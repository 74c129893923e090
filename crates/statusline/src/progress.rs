//! Multi-client progress tracking.
//!
//! Each client moves through `absent → active → draining → absent`:
//!
//! - `begin` creates (or revives) an active entry
//! - `report` updates the fields present in the event; the rest are sticky
//! - `end` marks the entry inactive; it keeps rendering for a grace window so
//!   the completion is visible, then it is removed
//!
//! Independently, any entry not updated within the staleness window is pruned
//! on the next read, which guards against clients that never send `end`.

mod spinner;

use std::fmt;
use std::time::Instant;

use indexmap::IndexMap;
use stratus_primitives::markup::escape;
use tracing::debug;

pub use self::spinner::Spinner;
use crate::config::ProgressConfig;
use crate::host::TimerHandle;

/// Opaque identity of a progress-reporting client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(String);

impl ClientId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for ClientId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<String> for ClientId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

impl fmt::Display for ClientId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// A long-running operation event reported by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
	Begin {
		client: ClientId,
		client_name: String,
		title: String,
		message: Option<String>,
		percentage: Option<u32>,
	},
	/// Fields left as `None` keep their previous value.
	Report {
		client: ClientId,
		title: Option<String>,
		message: Option<String>,
		percentage: Option<u32>,
	},
	End {
		client: ClientId,
		message: Option<String>,
	},
}

/// Lifecycle state of one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
	Absent,
	Active,
	/// Ended, still rendering until the grace window closes.
	Draining,
}

/// One client's in-flight operation.
#[derive(Debug, Clone)]
pub struct ProgressEntry {
	pub client_id: ClientId,
	pub client_name: String,
	pub title: String,
	pub message: Option<String>,
	/// Completion percentage, clamped to 0..=100.
	pub percentage: Option<u32>,
	pub active: bool,
	pub started_at: Instant,
	pub last_update: Instant,
	pub ended_at: Option<Instant>,
	grace: Option<TimerHandle>,
}

impl ProgressEntry {
	pub fn state(&self) -> ProgressState {
		if self.active {
			ProgressState::Active
		} else {
			ProgressState::Draining
		}
	}

	/// Grace timer pending for this entry, if it is draining.
	pub fn grace_timer(&self) -> Option<TimerHandle> {
		self.grace
	}

	fn is_expired(&self, now: Instant, config: &ProgressConfig) -> bool {
		if now.saturating_duration_since(self.last_update) > config.stale_timeout() {
			return true;
		}
		match self.ended_at {
			Some(ended) if !self.active => now.saturating_duration_since(ended) >= config.grace(),
			_ => false,
		}
	}

	/// Client-supplied text is escaped so it cannot inject markup.
	fn render_item(&self, config: &ProgressConfig) -> String {
		let mut item = String::new();
		if config.show_client_name && !self.client_name.is_empty() {
			item.push('[');
			item.push_str(&escape(&self.client_name));
			item.push_str("] ");
		}
		item.push_str(&escape(&self.title));
		if config.show_message
			&& let Some(message) = self.message.as_deref().filter(|m| !m.is_empty())
		{
			item.push_str(": ");
			item.push_str(&escape(message));
		}
		if let Some(pct) = self.percentage {
			item.push_str(&format!(" ({pct}%%)"));
		}
		item
	}
}

/// Progress entries keyed by client, in begin order, plus the shared spinner.
#[derive(Debug)]
pub struct ProgressRegistry {
	entries: IndexMap<ClientId, ProgressEntry>,
	spinner: Spinner,
	config: ProgressConfig,
}

impl ProgressRegistry {
	pub fn new(config: ProgressConfig) -> Self {
		Self {
			entries: IndexMap::new(),
			spinner: Spinner::new(config.spinner_frames.clone()),
			config,
		}
	}

	/// Starts (or restarts) an operation for `client`.
	///
	/// Returns the grace timer of a draining entry that was revived; the
	/// caller must cancel it.
	pub fn begin(
		&mut self,
		client: ClientId,
		client_name: String,
		title: String,
		message: Option<String>,
		percentage: Option<u32>,
		now: Instant,
	) -> Option<TimerHandle> {
		debug!(%client, %title, ?percentage, "progress.begin");
		let previous = self.entries.get(&client).and_then(|e| e.grace);
		let entry = ProgressEntry {
			client_id: client.clone(),
			client_name,
			title,
			message,
			percentage: percentage.map(clamp_pct),
			active: true,
			started_at: now,
			last_update: now,
			ended_at: None,
			grace: None,
		};
		self.entries.insert(client, entry);
		previous
	}

	/// Applies a report to an active entry. Returns `false` if the client has
	/// no active entry.
	pub fn report(
		&mut self,
		client: &ClientId,
		title: Option<String>,
		message: Option<String>,
		percentage: Option<u32>,
		now: Instant,
	) -> bool {
		let Some(entry) = self.entries.get_mut(client).filter(|e| e.active) else {
			debug!(%client, "progress.report.unknown");
			return false;
		};
		if let Some(title) = title {
			entry.title = title;
		}
		if message.is_some() {
			entry.message = message;
		}
		if let Some(pct) = percentage {
			entry.percentage = Some(clamp_pct(pct));
		}
		entry.last_update = now;
		true
	}

	/// Moves an active entry to draining. Returns `false` if the client has no
	/// active entry.
	pub fn end(&mut self, client: &ClientId, message: Option<String>, now: Instant) -> bool {
		let Some(entry) = self.entries.get_mut(client).filter(|e| e.active) else {
			debug!(%client, "progress.end.unknown");
			return false;
		};
		if message.is_some() {
			entry.message = message;
		}
		entry.active = false;
		entry.ended_at = Some(now);
		entry.last_update = now;
		debug!(
			%client,
			title = %entry.title,
			elapsed_ms = now.saturating_duration_since(entry.started_at).as_millis(),
			"progress.end"
		);
		true
	}

	/// Records the grace timer armed for a draining entry.
	pub fn set_grace_timer(&mut self, client: &ClientId, handle: TimerHandle) {
		if let Some(entry) = self.entries.get_mut(client) {
			entry.grace = Some(handle);
		}
	}

	/// Handles a fired grace timer. Returns the removed client, or `None` if
	/// the handle does not belong to a draining entry.
	pub fn finish_grace(&mut self, handle: TimerHandle) -> Option<ClientId> {
		let index = self
			.entries
			.values()
			.position(|e| !e.active && e.grace == Some(handle))?;
		let (client, _) = self.entries.shift_remove_index(index)?;
		debug!(%client, "progress.drained");
		Some(client)
	}

	/// Drops every entry of a client that went away. Returns its pending grace
	/// timer, which the caller must cancel.
	pub fn detach(&mut self, client: &ClientId) -> Option<TimerHandle> {
		let entry = self.entries.shift_remove(client)?;
		debug!(%client, "progress.detach");
		entry.grace
	}

	/// Prunes stale entries and draining entries whose grace window elapsed.
	///
	/// Returns the grace timers of pruned entries so the caller can cancel them.
	pub fn sweep(&mut self, now: Instant) -> Vec<TimerHandle> {
		let mut orphaned = Vec::new();
		let config = &self.config;
		self.entries.retain(|client, entry| {
			if !entry.is_expired(now, config) {
				return true;
			}
			debug!(%client, active = entry.active, "progress.pruned");
			orphaned.extend(entry.grace);
			false
		});
		orphaned
	}

	/// Clears every pending grace timer, returning the handles to cancel.
	pub fn take_grace_timers(&mut self) -> Vec<TimerHandle> {
		self.entries.values_mut().filter_map(|e| e.grace.take()).collect()
	}

	pub fn state(&self, client: &ClientId) -> ProgressState {
		self.entries
			.get(client)
			.map_or(ProgressState::Absent, ProgressEntry::state)
	}

	pub fn get(&self, client: &ClientId) -> Option<&ProgressEntry> {
		self.entries.get(client)
	}

	/// Entries in begin order.
	pub fn entries(&self) -> impl Iterator<Item = &ProgressEntry> {
		self.entries.values()
	}

	pub fn has_active(&self) -> bool {
		self.entries.values().any(|e| e.active)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn spinner(&self) -> &Spinner {
		&self.spinner
	}

	pub fn spinner_mut(&mut self) -> &mut Spinner {
		&mut self.spinner
	}

	/// Renders the progress fragment for a viewport `width` columns wide.
	///
	/// Entries that a sweep at `now` would prune are skipped, so the output is
	/// correct even if the caller has not swept yet.
	pub fn render(&self, now: Instant, width: u16) -> String {
		if width < self.config.min_width {
			return String::new();
		}
		let live: Vec<&ProgressEntry> = self
			.entries
			.values()
			.filter(|e| !e.is_expired(now, &self.config))
			.collect();
		if live.is_empty() {
			return String::new();
		}

		let active = live.iter().filter(|e| e.active);
		let draining = live.iter().filter(|e| !e.active);
		let items: Vec<String> = active
			.chain(draining)
			.map(|e| e.render_item(&self.config))
			.collect();

		let glyph = if live.iter().any(|e| e.active) {
			self.spinner.frame()
		} else {
			self.config.done_glyph.as_str()
		};
		format!("{glyph} {}", items.join(self.config.separator.as_str()))
	}
}

fn clamp_pct(pct: u32) -> u32 {
	pct.min(100)
}
