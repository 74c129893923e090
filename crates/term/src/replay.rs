//! Drives a [`Statusline`] through a parsed script.
//!
//! Time is virtual: the replay jumps from one deadline to the next, firing
//! timers in order, so a ten-minute session replays instantly and the output
//! is reproducible. With `realtime` the driver sleeps until each deadline
//! instead.

use std::io::Write;
use std::time::{Duration, Instant};

use stratus_statusline::{PipelineStats, Statusline, StatuslineConfig};
use tracing::{debug, trace};

use crate::host::ReplayHost;
use crate::script::ScriptLine;
use crate::snapshot::{Dispatch, EditorSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayOptions {
	/// Initial viewport width.
	pub width: u16,
	pub realtime: bool,
	/// Print markup instead of justified plain text.
	pub raw: bool,
	/// Time to keep firing timers after the last event.
	pub settle_ms: u64,
}

impl Default for ReplayOptions {
	fn default() -> Self {
		Self {
			width: 120,
			realtime: false,
			raw: false,
			settle_ms: 1_500,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplaySummary {
	/// Lines written to the sink.
	pub published: usize,
	/// Timer handles released at shutdown.
	pub released: usize,
	pub stats: PipelineStats,
}

/// Replays `lines` and writes every published statusline to `sink`.
pub async fn run<W: Write>(
	lines: &[ScriptLine],
	config: StatuslineConfig,
	options: &ReplayOptions,
	sink: &mut W,
) -> anyhow::Result<ReplaySummary> {
	let started = Instant::now();
	let mut host = ReplayHost::new(EditorSnapshot::new(options.width), started, sink, options.raw);
	let mut statusline = Statusline::new(config);
	statusline.start(&mut host, started);

	let mut last_ms = 0;
	for line in lines {
		let at = started + Duration::from_millis(line.at_ms);
		advance(&mut statusline, &mut host, at, options.realtime).await;
		last_ms = line.at_ms;

		match host.snapshot.apply(line.event.clone()) {
			Dispatch::Event(event) => {
				let kind = event.kind();
				if host.is_subscribed(kind) {
					statusline.handle_event(&mut host, event, at);
				} else {
					debug!(kind = kind.name(), "replay.event.unsubscribed");
				}
			}
			Dispatch::Refresh(component) => {
				trace!(%component, "replay.refresh");
				statusline.mark_dirty_by_name(component.name());
				statusline.apply(&mut host, at);
			}
		}
	}

	let end = started + Duration::from_millis(last_ms.saturating_add(options.settle_ms));
	advance(&mut statusline, &mut host, end, options.realtime).await;

	let released = statusline.shutdown(&mut host);
	host.flush()?;
	Ok(ReplaySummary {
		published: host.published,
		released,
		stats: statusline.stats(),
	})
}

/// Fires every timer due up to `until`, in deadline order, then parks the
/// clock at `until`.
async fn advance<W: Write>(statusline: &mut Statusline, host: &mut ReplayHost<'_, W>, until: Instant, realtime: bool) {
	while let Some(deadline) = host.timers.next_deadline().filter(|d| *d <= until) {
		if realtime {
			tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
		}
		host.clock = deadline;
		while let Some((handle, _)) = host.timers.pop_due(deadline) {
			statusline.on_timer(host, handle, deadline);
		}
	}
	if realtime {
		tokio::time::sleep_until(tokio::time::Instant::from_std(until)).await;
	}
	host.clock = until;
}
