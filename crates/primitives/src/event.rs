use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

/// Editor-level event the statusline subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
	ModeChanged,
	BufEnter,
	BufWritten,
	BufModified,
	FileTypeSet,
	DiagnosticsChanged,
	/// Version-control signs or branch changed.
	VcsUpdated,
	CursorMoved,
	CursorIdle,
	WindowResized,
	/// Macro recording started or stopped.
	RecordingToggled,
	/// Search wrapped around the buffer end.
	SearchWrapped,
	LspAttached,
	LspDetached,
	ProgressBegin,
	ProgressReport,
	ProgressEnd,
}

impl EventKind {
	pub fn name(self) -> &'static str {
		self.into()
	}

	/// Every subscribable event kind.
	pub fn all() -> impl Iterator<Item = Self> {
		Self::iter()
	}
}
