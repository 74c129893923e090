//! Editor mode state as reported by the host.
//!
//! Hosts report modes either by name (`"visual_line"`) or by the short mode
//! codes vim-like editors expose (`"V"`, `"no"`, `"Rv"`). Both spellings map
//! onto the same closed set so every consumer matches exhaustively.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};

/// Editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, IntoStaticStr, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EditorMode {
	#[default]
	#[serde(alias = "n")]
	Normal,
	/// Waiting for a motion after an operator (`d`, `c`, `y`).
	#[serde(alias = "no")]
	OperatorPending,
	#[serde(alias = "v")]
	Visual,
	#[serde(alias = "V")]
	VisualLine,
	#[serde(alias = "\u{16}")]
	VisualBlock,
	#[serde(alias = "s")]
	Select,
	#[serde(alias = "S")]
	SelectLine,
	#[serde(alias = "\u{13}")]
	SelectBlock,
	#[serde(alias = "i")]
	Insert,
	#[serde(alias = "R")]
	Replace,
	#[serde(alias = "Rv")]
	VirtualReplace,
	#[serde(alias = "c")]
	Command,
	/// Hit-enter and confirmation prompts.
	#[serde(alias = "r")]
	Prompt,
	/// External command running in the foreground.
	#[serde(alias = "!")]
	Shell,
	#[serde(alias = "t")]
	Terminal,
}

/// Coarse grouping of modes that share a highlight group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeFamily {
	Normal,
	Visual,
	Insert,
	Replace,
	Command,
	Terminal,
}

impl EditorMode {
	/// Parses a host mode code.
	///
	/// Only the prefix that identifies the mode is significant, so `"niI"`,
	/// `"ic"` and `"cv"` resolve to their base modes.
	pub fn from_code(code: &str) -> Option<Self> {
		let mut chars = code.chars();
		let first = chars.next()?;
		let second = chars.next();
		Some(match (first, second) {
			('n', Some('o')) => Self::OperatorPending,
			('n', _) => Self::Normal,
			('v', _) => Self::Visual,
			('V', _) => Self::VisualLine,
			('\u{16}', _) => Self::VisualBlock,
			('s', _) => Self::Select,
			('S', _) => Self::SelectLine,
			('\u{13}', _) => Self::SelectBlock,
			('i', _) => Self::Insert,
			('R', Some('v')) => Self::VirtualReplace,
			('R', _) => Self::Replace,
			('c', _) => Self::Command,
			('r', _) => Self::Prompt,
			('!', _) => Self::Shell,
			('t', _) => Self::Terminal,
			_ => return None,
		})
	}

	/// Returns a simple string identifier for the mode.
	pub fn name(self) -> &'static str {
		self.into()
	}

	/// Full uppercase label.
	pub const fn label(self) -> &'static str {
		match self {
			Self::Normal => "NORMAL",
			Self::OperatorPending => "O-PENDING",
			Self::Visual => "VISUAL",
			Self::VisualLine => "V-LINE",
			Self::VisualBlock => "V-BLOCK",
			Self::Select => "SELECT",
			Self::SelectLine => "S-LINE",
			Self::SelectBlock => "S-BLOCK",
			Self::Insert => "INSERT",
			Self::Replace => "REPLACE",
			Self::VirtualReplace => "V-REPLACE",
			Self::Command => "COMMAND",
			Self::Prompt => "PROMPT",
			Self::Shell => "SHELL",
			Self::Terminal => "TERMINAL",
		}
	}

	/// Abbreviated label for narrow layouts.
	pub const fn short_label(self) -> &'static str {
		match self {
			Self::Normal => "N",
			Self::OperatorPending => "O",
			Self::Visual => "V",
			Self::VisualLine => "VL",
			Self::VisualBlock => "VB",
			Self::Select => "S",
			Self::SelectLine => "SL",
			Self::SelectBlock => "SB",
			Self::Insert => "I",
			Self::Replace => "R",
			Self::VirtualReplace => "VR",
			Self::Command => "C",
			Self::Prompt => "P",
			Self::Shell => "!",
			Self::Terminal => "T",
		}
	}

	pub const fn family(self) -> ModeFamily {
		match self {
			Self::Normal | Self::OperatorPending => ModeFamily::Normal,
			Self::Visual
			| Self::VisualLine
			| Self::VisualBlock
			| Self::Select
			| Self::SelectLine
			| Self::SelectBlock => ModeFamily::Visual,
			Self::Insert => ModeFamily::Insert,
			Self::Replace | Self::VirtualReplace => ModeFamily::Replace,
			Self::Command | Self::Prompt => ModeFamily::Command,
			Self::Shell | Self::Terminal => ModeFamily::Terminal,
		}
	}
}

impl ModeFamily {
	/// Highlight group used to paint the mode indicator.
	pub const fn highlight_group(self) -> &'static str {
		match self {
			Self::Normal => "StratusModeNormal",
			Self::Visual => "StratusModeVisual",
			Self::Insert => "StratusModeInsert",
			Self::Replace => "StratusModeReplace",
			Self::Command => "StratusModeCommand",
			Self::Terminal => "StratusModeTerminal",
		}
	}
}
