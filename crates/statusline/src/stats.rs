//! Pipeline counters.
//!
//! The session is single-threaded, so these are plain integers rather than
//! atomics. A snapshot is returned by [`crate::Statusline::stats`] and logged
//! on shutdown.

use tracing::info;

/// Counters accumulated over the lifetime of one statusline session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
	/// Calls to `apply`, from any trigger.
	pub applies: u64,
	/// Applies that published a changed line.
	pub pushes: u64,
	/// Applies whose composed line matched the last published one.
	pub unchanged: u64,
	/// Throttled updates dropped inside their window.
	pub throttle_drops: u64,
	/// Pending debounce timers cancelled by a newer call.
	pub debounce_coalesced: u64,
	/// Timer requests the host rejected.
	pub timer_failures: u64,
	/// Fallback watchdog resyncs.
	pub fallback_resyncs: u64,
	/// Spinner frames advanced.
	pub spinner_ticks: u64,
	/// Value-source reads that failed or panicked.
	pub source_failures: u64,
}

impl PipelineStats {
	/// Share of applies that ended up publishing, in `0.0..=1.0`.
	pub fn push_ratio(&self) -> f64 {
		if self.applies == 0 {
			0.0
		} else {
			self.pushes as f64 / self.applies as f64
		}
	}

	pub(crate) fn log_summary(&self) {
		info!(
			applies = self.applies,
			pushes = self.pushes,
			push_ratio = self.push_ratio(),
			unchanged = self.unchanged,
			throttle_drops = self.throttle_drops,
			debounce_coalesced = self.debounce_coalesced,
			timer_failures = self.timer_failures,
			fallback_resyncs = self.fallback_resyncs,
			spinner_ticks = self.spinner_ticks,
			source_failures = self.source_failures,
			"statusline.stats"
		);
	}
}
