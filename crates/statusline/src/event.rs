//! Editor events and the table routing them onto component updates.

use smallvec::SmallVec;
use stratus_primitives::{ComponentId, EventKind};

use crate::config::UpdateConfig;
use crate::progress::{ClientId, ProgressEvent};
use crate::scheduler::Strategy;

/// An editor-level notification delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
	ModeChanged,
	BufEnter,
	BufWritten,
	BufModified,
	FileTypeSet,
	DiagnosticsChanged,
	VcsUpdated,
	CursorMoved,
	CursorIdle,
	/// Viewport width may have changed; everything is re-rendered.
	WindowResized,
	RecordingToggled,
	SearchWrapped,
	LspAttached(ClientId),
	/// The client went away; its progress entries are dropped.
	LspDetached(ClientId),
	Progress(ProgressEvent),
}

impl EditorEvent {
	pub fn kind(&self) -> EventKind {
		match self {
			Self::ModeChanged => EventKind::ModeChanged,
			Self::BufEnter => EventKind::BufEnter,
			Self::BufWritten => EventKind::BufWritten,
			Self::BufModified => EventKind::BufModified,
			Self::FileTypeSet => EventKind::FileTypeSet,
			Self::DiagnosticsChanged => EventKind::DiagnosticsChanged,
			Self::VcsUpdated => EventKind::VcsUpdated,
			Self::CursorMoved => EventKind::CursorMoved,
			Self::CursorIdle => EventKind::CursorIdle,
			Self::WindowResized => EventKind::WindowResized,
			Self::RecordingToggled => EventKind::RecordingToggled,
			Self::SearchWrapped => EventKind::SearchWrapped,
			Self::LspAttached(_) => EventKind::LspAttached,
			Self::LspDetached(_) => EventKind::LspDetached,
			Self::Progress(ProgressEvent::Begin { .. }) => EventKind::ProgressBegin,
			Self::Progress(ProgressEvent::Report { .. }) => EventKind::ProgressReport,
			Self::Progress(ProgressEvent::End { .. }) => EventKind::ProgressEnd,
		}
	}
}

/// One component update triggered by an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
	pub component: ComponentId,
	pub strategy: Strategy,
}

impl Route {
	const fn immediate(component: ComponentId) -> Self {
		Self {
			component,
			strategy: Strategy::Immediate,
		}
	}
}

/// Component updates an event triggers, in the order they run.
///
/// [`EditorEvent::WindowResized`] routes nowhere: it invalidates every slot
/// instead of scheduling individual components.
pub fn routes(event: &EditorEvent, updates: &UpdateConfig) -> SmallVec<[Route; 6]> {
	use ComponentId::*;

	let immediate = |components: &[ComponentId]| -> SmallVec<[Route; 6]> {
		components.iter().copied().map(Route::immediate).collect()
	};
	match event {
		EditorEvent::ModeChanged => immediate(&[Mode]),
		EditorEvent::BufEnter => immediate(&[File, Git, Diagnostics, Lsp, Position, RightInfo]),
		EditorEvent::BufWritten => SmallVec::from_slice(&[
			Route::immediate(File),
			Route {
				component: Git,
				strategy: Strategy::Debounced(updates.git_debounce()),
			},
		]),
		EditorEvent::BufModified => SmallVec::from_slice(&[Route {
			component: File,
			strategy: Strategy::Throttled(updates.modified_throttle()),
		}]),
		EditorEvent::FileTypeSet => immediate(&[File, Lsp, RightInfo]),
		EditorEvent::DiagnosticsChanged => SmallVec::from_slice(&[Route {
			component: Diagnostics,
			strategy: Strategy::Debounced(updates.diagnostics_debounce()),
		}]),
		EditorEvent::VcsUpdated => SmallVec::from_slice(&[Route {
			component: Git,
			strategy: Strategy::Debounced(updates.git_debounce()),
		}]),
		EditorEvent::CursorMoved => SmallVec::from_slice(&[Route {
			component: Position,
			strategy: Strategy::Throttled(updates.cursor_throttle()),
		}]),
		EditorEvent::CursorIdle => immediate(&[Position]),
		EditorEvent::WindowResized => SmallVec::new(),
		EditorEvent::RecordingToggled => immediate(&[Mode, RightInfo]),
		EditorEvent::SearchWrapped => immediate(&[RightInfo]),
		EditorEvent::LspAttached(_) | EditorEvent::LspDetached(_) => immediate(&[Lsp]),
		EditorEvent::Progress(_) => immediate(&[Progress]),
	}
}
