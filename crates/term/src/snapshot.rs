//! Editor state the reference value sources render from.

use stratus_primitives::{ComponentId, EditorMode, SurfaceKind};
use stratus_statusline::{ClientId, EditorEvent, ProgressEvent};

use crate::script::ScriptEvent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticCounts {
	pub errors: u32,
	pub warnings: u32,
	pub info: u32,
	pub hints: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitStatus {
	pub branch: String,
	pub added: u32,
	pub changed: u32,
	pub removed: u32,
}

/// A failure armed for the next read of one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedFailure {
	pub component: ComponentId,
	pub reason: String,
	pub panic: bool,
}

/// Mutable model of the editor a replay script describes.
#[derive(Debug, Clone)]
pub struct EditorSnapshot {
	pub mode: EditorMode,
	pub path: Option<String>,
	pub filetype: Option<String>,
	pub modified: bool,
	pub diagnostics: DiagnosticCounts,
	pub git: Option<GitStatus>,
	/// One-based line and column.
	pub cursor: (u32, u32),
	pub recording: Option<char>,
	pub search: Option<(u32, u32)>,
	pub surface: SurfaceKind,
	pub width: u16,
	/// Attached language-server clients with their display names.
	pub lsp_clients: Vec<(ClientId, String)>,
	pub failures: Vec<InjectedFailure>,
}

/// What the driver forwards to the pipeline after updating the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
	Event(EditorEvent),
	/// Invalidate one component and apply, without an editor event.
	Refresh(ComponentId),
}

impl EditorSnapshot {
	pub fn new(width: u16) -> Self {
		Self {
			mode: EditorMode::Normal,
			path: None,
			filetype: None,
			modified: false,
			diagnostics: DiagnosticCounts::default(),
			git: None,
			cursor: (1, 1),
			recording: None,
			search: None,
			surface: SurfaceKind::Editor,
			width,
			lsp_clients: Vec::new(),
			failures: Vec::new(),
		}
	}

	pub fn client_name(&self, client: &ClientId) -> Option<&str> {
		self.lsp_clients
			.iter()
			.find(|(id, _)| id == client)
			.map(|(_, name)| name.as_str())
	}

	/// Removes and returns the failure armed for `component`, if any.
	pub fn take_failure(&mut self, component: ComponentId) -> Option<InjectedFailure> {
		let index = self.failures.iter().position(|f| f.component == component)?;
		Some(self.failures.remove(index))
	}

	/// Applies a script event and returns what to tell the pipeline.
	pub fn apply(&mut self, event: ScriptEvent) -> Dispatch {
		match event {
			ScriptEvent::Mode { mode } => {
				self.mode = mode;
				Dispatch::Event(EditorEvent::ModeChanged)
			}
			ScriptEvent::BufEnter {
				path,
				filetype,
				modified,
			} => {
				self.surface = filetype
					.as_deref()
					.map_or(SurfaceKind::Editor, SurfaceKind::from_filetype);
				self.path = Some(path);
				self.filetype = filetype;
				self.modified = modified;
				self.search = None;
				Dispatch::Event(EditorEvent::BufEnter)
			}
			ScriptEvent::BufWritten => {
				self.modified = false;
				Dispatch::Event(EditorEvent::BufWritten)
			}
			ScriptEvent::Modified { modified } => {
				self.modified = modified;
				Dispatch::Event(EditorEvent::BufModified)
			}
			ScriptEvent::Filetype { filetype } => {
				self.surface = SurfaceKind::from_filetype(&filetype);
				self.filetype = Some(filetype);
				Dispatch::Event(EditorEvent::FileTypeSet)
			}
			ScriptEvent::Diagnostics {
				errors,
				warnings,
				info,
				hints,
			} => {
				self.diagnostics = DiagnosticCounts {
					errors,
					warnings,
					info,
					hints,
				};
				Dispatch::Event(EditorEvent::DiagnosticsChanged)
			}
			ScriptEvent::Git {
				branch,
				added,
				changed,
				removed,
			} => {
				self.git = branch.map(|branch| GitStatus {
					branch,
					added,
					changed,
					removed,
				});
				Dispatch::Event(EditorEvent::VcsUpdated)
			}
			ScriptEvent::Cursor { line, col } => {
				self.cursor = (line, col);
				Dispatch::Event(EditorEvent::CursorMoved)
			}
			ScriptEvent::CursorIdle => Dispatch::Event(EditorEvent::CursorIdle),
			ScriptEvent::Resize { width } => {
				self.width = width;
				Dispatch::Event(EditorEvent::WindowResized)
			}
			ScriptEvent::Recording { register } => {
				self.recording = register;
				Dispatch::Event(EditorEvent::RecordingToggled)
			}
			ScriptEvent::SearchWrap { current, total } => {
				self.search = Some((current, total));
				Dispatch::Event(EditorEvent::SearchWrapped)
			}
			ScriptEvent::Surface { surface } => {
				self.surface = surface;
				Dispatch::Event(EditorEvent::BufEnter)
			}
			ScriptEvent::LspAttach { client, name } => {
				let client = ClientId::from(client);
				self.lsp_clients.retain(|(id, _)| *id != client);
				self.lsp_clients.push((client.clone(), name));
				Dispatch::Event(EditorEvent::LspAttached(client))
			}
			ScriptEvent::LspDetach { client } => {
				let client = ClientId::from(client);
				self.lsp_clients.retain(|(id, _)| *id != client);
				Dispatch::Event(EditorEvent::LspDetached(client))
			}
			ScriptEvent::ProgressBegin {
				client,
				title,
				message,
				percentage,
			} => {
				let client = ClientId::from(client);
				let client_name = self.client_name(&client).unwrap_or(client.as_str()).to_owned();
				Dispatch::Event(EditorEvent::Progress(ProgressEvent::Begin {
					client,
					client_name,
					title,
					message,
					percentage,
				}))
			}
			ScriptEvent::ProgressReport {
				client,
				title,
				message,
				percentage,
			} => Dispatch::Event(EditorEvent::Progress(ProgressEvent::Report {
				client: client.into(),
				title,
				message,
				percentage,
			})),
			ScriptEvent::ProgressEnd { client, message } => Dispatch::Event(EditorEvent::Progress(ProgressEvent::End {
				client: client.into(),
				message,
			})),
			ScriptEvent::SourceFailure {
				component,
				reason,
				panic,
			} => {
				self.failures.push(InjectedFailure {
					component,
					reason: reason.unwrap_or_else(|| "injected failure".into()),
					panic,
				});
				Dispatch::Refresh(component)
			}
		}
	}
}
