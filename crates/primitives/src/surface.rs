use serde::{Deserialize, Serialize};

/// Kind of surface the focused window shows.
///
/// Anything other than [`SurfaceKind::Editor`] gets a simplified statusline
/// that bypasses the component pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
	/// A regular text buffer.
	#[default]
	Editor,
	/// File tree browser.
	FileTree,
	/// Fuzzy picker prompt.
	Picker,
	/// Start screen / dashboard.
	Dashboard,
	/// Help page.
	Help,
	/// Quickfix or location list.
	QuickFix,
	/// Embedded terminal.
	Terminal,
}

impl SurfaceKind {
	/// Whether this surface bypasses the normal section pipeline.
	pub const fn is_special(self) -> bool {
		!matches!(self, Self::Editor)
	}

	/// Label shown by the simplified layout.
	pub const fn label(self) -> &'static str {
		match self {
			Self::Editor => "",
			Self::FileTree => "Files",
			Self::Picker => "Picker",
			Self::Dashboard => "Dashboard",
			Self::Help => "Help",
			Self::QuickFix => "Quickfix",
			Self::Terminal => "Terminal",
		}
	}

	/// Classifies a buffer file type reported by the host.
	pub fn from_filetype(filetype: &str) -> Self {
		match filetype {
			"NvimTree" | "neo-tree" | "oil" | "netrw" | "fern" => Self::FileTree,
			"TelescopePrompt" | "fzf" | "snacks_picker_input" => Self::Picker,
			"alpha" | "dashboard" | "starter" | "ministarter" => Self::Dashboard,
			"help" | "man" => Self::Help,
			"qf" => Self::QuickFix,
			"toggleterm" | "terminal" => Self::Terminal,
			_ => Self::Editor,
		}
	}
}
