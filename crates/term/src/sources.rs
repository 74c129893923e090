//! Reference value sources: one fragment per component from an [`EditorSnapshot`].

use stratus_primitives::markup::{escape, highlight};
use stratus_primitives::ComponentId;
use stratus_statusline::SourceError;

use crate::snapshot::{EditorSnapshot, InjectedFailure};

/// Renders `component` from the snapshot, honouring any injected failure.
pub fn render(snapshot: &mut EditorSnapshot, component: ComponentId) -> Result<String, SourceError> {
	if let Some(InjectedFailure { reason, panic, .. }) = snapshot.take_failure(component) {
		if panic {
			panic!("{component} source: {reason}");
		}
		return Err(SourceError::malformed(component, reason));
	}

	let snapshot = &*snapshot;
	Ok(match component {
		ComponentId::Mode => mode(snapshot),
		ComponentId::Git => git(snapshot),
		ComponentId::File => file(snapshot),
		ComponentId::Diagnostics => diagnostics(snapshot),
		ComponentId::Lsp => lsp(snapshot),
		ComponentId::Position => {
			let (line, col) = snapshot.cursor;
			highlight("StratusPosition", &format!("{line}:{col}"))
		}
		ComponentId::RightInfo => right_info(snapshot),
		ComponentId::Progress => {
			return Err(SourceError::unavailable(component, "rendered by the progress registry"));
		}
	})
}

fn mode(snapshot: &EditorSnapshot) -> String {
	let label = if snapshot.width < 60 {
		snapshot.mode.short_label()
	} else {
		snapshot.mode.label()
	};
	highlight(snapshot.mode.family().highlight_group(), &format!(" {label} "))
}

fn git(snapshot: &EditorSnapshot) -> String {
	let Some(git) = &snapshot.git else {
		return String::new();
	};
	let mut text = format!(" {}", escape(&git.branch));
	for (sign, count) in [('+', git.added), ('~', git.changed), ('-', git.removed)] {
		if count > 0 {
			text.push_str(&format!(" {sign}{count}"));
		}
	}
	highlight("StratusGit", &text)
}

fn file(snapshot: &EditorSnapshot) -> String {
	let name = snapshot
		.path
		.as_deref()
		.map(|path| path.rsplit('/').next().unwrap_or(path))
		.filter(|name| !name.is_empty())
		.unwrap_or("[No Name]");
	let mut text = escape(name).into_owned();
	if snapshot.modified {
		text.push_str(" [+]");
	}
	highlight("StratusFile", &text)
}

fn diagnostics(snapshot: &EditorSnapshot) -> String {
	let d = snapshot.diagnostics;
	let parts: Vec<String> = [
		("StratusDiagError", 'E', d.errors),
		("StratusDiagWarn", 'W', d.warnings),
		("StratusDiagInfo", 'I', d.info),
		("StratusDiagHint", 'H', d.hints),
	]
	.into_iter()
	.filter(|(_, _, count)| *count > 0)
	.map(|(group, letter, count)| highlight(group, &format!("{letter}{count}")))
	.collect();
	parts.join(" ")
}

fn lsp(snapshot: &EditorSnapshot) -> String {
	if snapshot.lsp_clients.is_empty() {
		return String::new();
	}
	let names: Vec<&str> = snapshot.lsp_clients.iter().map(|(_, name)| name.as_str()).collect();
	highlight("StratusLsp", &escape(&names.join(",")))
}

fn right_info(snapshot: &EditorSnapshot) -> String {
	let mut parts = Vec::new();
	if let Some(register) = snapshot.recording {
		parts.push(highlight("StratusRecording", &format!("@{register}")));
	}
	if let Some((current, total)) = snapshot.search {
		parts.push(format!("[{current}/{total}]"));
	}
	if let Some(filetype) = snapshot.filetype.as_deref().filter(|ft| !ft.is_empty()) {
		parts.push(escape(filetype).into_owned());
	}
	parts.join(" ")
}
