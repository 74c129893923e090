//! Pipeline configuration.
//!
//! Every table is optional in the TOML file; missing keys fall back to the
//! defaults below.
//!
//! ```toml
//! fallback_interval_ms = 10000
//! separator = " "
//!
//! [breakpoints]
//! narrow = 40
//! normal = 80
//! wide = 120
//!
//! [progress]
//! spinner_interval_ms = 100
//! grace_ms = 500
//! stale_timeout_ms = 30000
//! min_width = 90
//!
//! [updates]
//! git_debounce_ms = 1000
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Braille spinner used when no frames are configured.
pub const DEFAULT_SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Top-level statusline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatuslineConfig {
	/// Period of the full-resync watchdog.
	pub fallback_interval_ms: u64,
	/// Joins non-empty fragments within a section.
	pub separator: String,
	pub breakpoints: Breakpoints,
	pub progress: ProgressConfig,
	pub updates: UpdateConfig,
}

/// Minimum viewport widths of each layout tier.
///
/// Anything narrower than `narrow` is ultra-narrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Breakpoints {
	pub narrow: u16,
	pub normal: u16,
	pub wide: u16,
}

/// Progress registry and spinner settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgressConfig {
	/// Spinner frame cadence.
	pub spinner_interval_ms: u64,
	/// How long an ended entry keeps rendering before removal.
	pub grace_ms: u64,
	/// Entries without updates for this long are pruned.
	pub stale_timeout_ms: u64,
	/// Progress renders empty below this viewport width.
	pub min_width: u16,
	/// Joins individual progress items.
	pub separator: String,
	pub spinner_frames: Vec<String>,
	/// Shown instead of a spinner frame once every entry has ended.
	pub done_glyph: String,
	/// Prefix each item with the reporting client's name.
	pub show_client_name: bool,
	/// Append the latest message to each item.
	pub show_message: bool,
}

/// Intervals used by the editor-event routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateConfig {
	pub cursor_throttle_ms: u64,
	pub modified_throttle_ms: u64,
	pub git_debounce_ms: u64,
	pub diagnostics_debounce_ms: u64,
}

impl Default for StatuslineConfig {
	fn default() -> Self {
		Self {
			fallback_interval_ms: 10_000,
			separator: " ".into(),
			breakpoints: Breakpoints::default(),
			progress: ProgressConfig::default(),
			updates: UpdateConfig::default(),
		}
	}
}

impl Default for Breakpoints {
	fn default() -> Self {
		Self {
			narrow: 40,
			normal: 80,
			wide: 120,
		}
	}
}

impl Default for ProgressConfig {
	fn default() -> Self {
		Self {
			spinner_interval_ms: 100,
			grace_ms: 500,
			stale_timeout_ms: 30_000,
			min_width: 90,
			separator: " | ".into(),
			spinner_frames: DEFAULT_SPINNER_FRAMES.iter().map(|f| (*f).to_owned()).collect(),
			done_glyph: "✓".into(),
			show_client_name: false,
			show_message: false,
		}
	}
}

impl Default for UpdateConfig {
	fn default() -> Self {
		Self {
			cursor_throttle_ms: 100,
			modified_throttle_ms: 200,
			git_debounce_ms: 1_000,
			diagnostics_debounce_ms: 150,
		}
	}
}

impl StatuslineConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(text: &str) -> Result<Self> {
		let config: Self = toml::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads, parses and validates a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&text)
	}

	/// Checks cross-field constraints serde cannot express.
	pub fn validate(&self) -> Result<()> {
		let nonzero = [
			("fallback_interval_ms", self.fallback_interval_ms),
			("progress.spinner_interval_ms", self.progress.spinner_interval_ms),
			("progress.stale_timeout_ms", self.progress.stale_timeout_ms),
			("updates.cursor_throttle_ms", self.updates.cursor_throttle_ms),
			("updates.modified_throttle_ms", self.updates.modified_throttle_ms),
			("updates.git_debounce_ms", self.updates.git_debounce_ms),
			("updates.diagnostics_debounce_ms", self.updates.diagnostics_debounce_ms),
		];
		for (key, value) in nonzero {
			if value == 0 {
				return Err(ConfigError::Invalid(format!("{key} must be greater than zero")));
			}
		}

		let bp = self.breakpoints;
		if !(bp.narrow < bp.normal && bp.normal < bp.wide) {
			return Err(ConfigError::Invalid(format!(
				"breakpoints must ascend strictly (narrow {} < normal {} < wide {})",
				bp.narrow, bp.normal, bp.wide
			)));
		}

		if self.progress.spinner_frames.is_empty() {
			return Err(ConfigError::Invalid("progress.spinner_frames must not be empty".into()));
		}
		if self.progress.grace_ms >= self.progress.stale_timeout_ms {
			return Err(ConfigError::Invalid(
				"progress.grace_ms must be shorter than progress.stale_timeout_ms".into(),
			));
		}
		Ok(())
	}

	pub fn fallback_interval(&self) -> Duration {
		Duration::from_millis(self.fallback_interval_ms)
	}
}

impl ProgressConfig {
	pub fn spinner_interval(&self) -> Duration {
		Duration::from_millis(self.spinner_interval_ms)
	}

	pub fn grace(&self) -> Duration {
		Duration::from_millis(self.grace_ms)
	}

	pub fn stale_timeout(&self) -> Duration {
		Duration::from_millis(self.stale_timeout_ms)
	}
}

impl UpdateConfig {
	pub fn cursor_throttle(&self) -> Duration {
		Duration::from_millis(self.cursor_throttle_ms)
	}

	pub fn modified_throttle(&self) -> Duration {
		Duration::from_millis(self.modified_throttle_ms)
	}

	pub fn git_debounce(&self) -> Duration {
		Duration::from_millis(self.git_debounce_ms)
	}

	pub fn diagnostics_debounce(&self) -> Duration {
		Duration::from_millis(self.diagnostics_debounce_ms)
	}
}
