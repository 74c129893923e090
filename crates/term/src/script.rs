//! Replay script format.
//!
//! One JSON object per line:
//!
//! ```text
//! {"at_ms": 0, "event": {"type": "buf_enter", "path": "src/main.rs", "filetype": "rust"}}
//! {"at_ms": 120, "event": {"type": "mode", "mode": "i"}}
//! {"at_ms": 900, "event": {"type": "progress_begin", "client": "1", "title": "Indexing", "percentage": 0}}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Timestamps are
//! milliseconds since the start of the replay and must not decrease.

use serde::Deserialize;
use stratus_primitives::{ComponentId, EditorMode, SurfaceKind};
use thiserror::Error;

/// One timed event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptLine {
	pub at_ms: u64,
	pub event: ScriptEvent,
}

/// Editor state change recorded in a script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
	Mode {
		mode: EditorMode,
	},
	BufEnter {
		path: String,
		#[serde(default)]
		filetype: Option<String>,
		#[serde(default)]
		modified: bool,
	},
	BufWritten,
	Modified {
		#[serde(default = "yes")]
		modified: bool,
	},
	Filetype {
		filetype: String,
	},
	Diagnostics {
		#[serde(default)]
		errors: u32,
		#[serde(default)]
		warnings: u32,
		#[serde(default)]
		info: u32,
		#[serde(default)]
		hints: u32,
	},
	Git {
		#[serde(default)]
		branch: Option<String>,
		#[serde(default)]
		added: u32,
		#[serde(default)]
		changed: u32,
		#[serde(default)]
		removed: u32,
	},
	Cursor {
		line: u32,
		col: u32,
	},
	CursorIdle,
	Resize {
		width: u16,
	},
	Recording {
		#[serde(default)]
		register: Option<char>,
	},
	SearchWrap {
		current: u32,
		total: u32,
	},
	Surface {
		surface: SurfaceKind,
	},
	LspAttach {
		client: String,
		name: String,
	},
	LspDetach {
		client: String,
	},
	ProgressBegin {
		client: String,
		title: String,
		#[serde(default)]
		message: Option<String>,
		#[serde(default)]
		percentage: Option<u32>,
	},
	ProgressReport {
		client: String,
		#[serde(default)]
		title: Option<String>,
		#[serde(default)]
		message: Option<String>,
		#[serde(default)]
		percentage: Option<u32>,
	},
	ProgressEnd {
		client: String,
		#[serde(default)]
		message: Option<String>,
	},
	/// Makes the next read of `component` fail.
	SourceFailure {
		component: ComponentId,
		#[serde(default)]
		reason: Option<String>,
		/// Panic instead of returning an error.
		#[serde(default)]
		panic: bool,
	},
}

fn yes() -> bool {
	true
}

/// Errors that can occur when parsing a script.
#[derive(Debug, Error)]
pub enum ScriptError {
	#[error("line {line}: {source}")]
	Json {
		line: usize,
		source: serde_json::Error,
	},

	#[error("line {line}: at_ms {at_ms} is earlier than the previous event ({previous})")]
	OutOfOrder { line: usize, at_ms: u64, previous: u64 },
}

/// Parses a whole script, checking that timestamps never decrease.
pub fn parse_script(text: &str) -> Result<Vec<ScriptLine>, ScriptError> {
	let mut lines = Vec::new();
	let mut previous = 0;
	for (index, raw) in text.lines().enumerate() {
		let line = index + 1;
		let raw = raw.trim();
		if raw.is_empty() || raw.starts_with('#') {
			continue;
		}
		let parsed: ScriptLine = serde_json::from_str(raw).map_err(|source| ScriptError::Json { line, source })?;
		if parsed.at_ms < previous {
			return Err(ScriptError::OutOfOrder {
				line,
				at_ms: parsed.at_ms,
				previous,
			});
		}
		previous = parsed.at_ms;
		lines.push(parsed);
	}
	Ok(lines)
}
