use pretty_assertions::assert_eq;
use stratus_statusline::{ApplyOutcome, ComponentId, EditorEvent, EventKind, SourceError, SurfaceKind};

use crate::common::Harness;

const WIDE_LINE: &str = "<mode> <git> <file>%=<diagnostics> <lsp> <right_info> <position>";

#[test]
fn start_subscribes_and_publishes_once() {
	let h = Harness::new();
	assert_eq!(h.host.subscriptions, EventKind::all().collect::<Vec<_>>());
	assert_eq!(h.host.published, [WIDE_LINE]);
	assert_eq!(h.host.redraws, 1);
	assert!(h.line.scheduler().fallback().is_some());
	assert_eq!(h.host.timers.len(), 1);
}

/// Must not touch value sources or the host when nothing is dirty.
///
/// - Enforced in: `Statusline::apply`, `RenderCache::get`
/// - Failure symptom: Redundant repaints on every timer tick.
#[test]
fn apply_is_idempotent() {
	let mut h = Harness::new();
	let reads = h.host.reads.len();
	for _ in 0..3 {
		assert_eq!(h.apply(), ApplyOutcome::Unchanged);
	}
	assert_eq!(h.host.reads.len(), reads);
	assert_eq!(h.host.published.len(), 1);
	assert_eq!(h.host.redraws, 1);
	assert_eq!(h.line.stats().unchanged, 3);
}

#[test]
fn immediate_event_recomputes_only_its_component() {
	let mut h = Harness::new();
	h.host.set_value(ComponentId::Mode, "<insert>");
	h.event(EditorEvent::ModeChanged);

	assert_eq!(h.last(), "<insert> <git> <file>%=<diagnostics> <lsp> <right_info> <position>");
	assert_eq!(h.host.reads_of(ComponentId::Mode), 2);
	assert_eq!(h.host.reads_of(ComponentId::Git), 1);
	assert_eq!(h.line.cache().recomputes(ComponentId::Mode), 2);
}

#[test]
fn unchanged_fragment_does_not_republish() {
	let mut h = Harness::new();
	h.event(EditorEvent::ModeChanged);
	assert_eq!(h.host.reads_of(ComponentId::Mode), 2);
	assert_eq!(h.host.published.len(), 1);
}

#[test]
fn one_event_applies_once() {
	let mut h = Harness::new();
	let applies = h.line.stats().applies;
	h.host.set_value(ComponentId::File, "<other.rs>");
	h.host.set_value(ComponentId::Git, "<feature>");
	h.event(EditorEvent::BufEnter);

	assert_eq!(h.line.stats().applies, applies + 1);
	assert_eq!(h.host.published.len(), 2);
	assert_eq!(
		h.last(),
		"<mode> <feature> <other.rs>%=<diagnostics> <lsp> <right_info> <position>"
	);
}

#[test]
fn resize_reflows_and_recomputes_visible_components() {
	let mut h = Harness::new();
	h.host.width = 60;
	h.event(EditorEvent::WindowResized);

	assert_eq!(h.last(), "<mode> <file>%=<diagnostics> <position>");
	assert_eq!(h.host.reads_of(ComponentId::File), 2);
	assert_eq!(h.host.reads_of(ComponentId::Git), 1, "hidden components are not read");
	assert!(h.line.cache().is_dirty(ComponentId::Git));
}

#[test]
fn width_change_is_detected_without_resize_event() {
	let mut h = Harness::new();
	h.host.width = 30;
	assert_eq!(h.apply(), ApplyOutcome::Pushed);
	assert_eq!(h.last(), "<mode>%=<position>");
	assert_eq!(h.host.reads_of(ComponentId::Mode), 2);
}

#[test]
fn hidden_updates_surface_when_widened() {
	let mut h = Harness::new();
	h.host.width = 60;
	h.event(EditorEvent::WindowResized);

	h.host.set_value(ComponentId::Git, "<dev>");
	h.event(EditorEvent::VcsUpdated);
	h.advance(1_000);
	assert_eq!(h.host.reads_of(ComponentId::Git), 1);

	h.host.width = 120;
	h.event(EditorEvent::WindowResized);
	assert_eq!(h.last(), "<mode> <dev> <file>%=<diagnostics> <lsp> <right_info> <position>");
}

#[test]
fn special_surfaces_bypass_value_sources() {
	let mut h = Harness::new();
	let reads = h.host.reads.len();
	h.host.surface = SurfaceKind::Picker;
	h.event(EditorEvent::FileTypeSet);

	assert_eq!(h.last(), "%=Picker%=");
	assert_eq!(h.host.reads.len(), reads);

	h.host.surface = SurfaceKind::Editor;
	h.host.set_value(ComponentId::File, "<main.rs>");
	h.event(EditorEvent::FileTypeSet);
	assert_eq!(
		h.last(),
		"<mode> <git> <main.rs>%=<diagnostics> <lsp> <right_info> <position>"
	);
}

/// Must degrade a failing value source to an empty fragment.
///
/// - Enforced in: `source::call_guarded`, `RenderCache::get`
/// - Failure symptom: One broken source blanks or crashes the whole line.
#[test]
fn source_errors_degrade_to_empty() {
	let mut h = Harness::new();
	h.host.values.insert(
		ComponentId::Diagnostics,
		Err(SourceError::unavailable(ComponentId::Diagnostics, "no client")),
	);
	h.event(EditorEvent::DiagnosticsChanged);
	h.advance(150);

	assert_eq!(h.last(), "<mode> <git> <file>%=<lsp> <right_info> <position>");
	assert_eq!(h.line.stats().source_failures, 1);
}

#[test]
fn source_panics_are_contained() {
	let mut h = Harness::new();
	h.host.panic_on = Some(ComponentId::Lsp);
	h.event(EditorEvent::FileTypeSet);
	assert_eq!(h.last(), "<mode> <git> <file>%=<diagnostics> <right_info> <position>");

	h.host.panic_on = None;
	h.event(EditorEvent::LspAttached("ra".into()));
	assert_eq!(h.last(), WIDE_LINE);
	assert_eq!(h.line.stats().source_failures, 1);
}

#[test]
fn worst_case_keeps_mode_and_position() {
	let mut h = Harness::new();
	for c in ComponentId::all().filter(|c| !matches!(c, ComponentId::Mode | ComponentId::Position)) {
		h.host.values.insert(c, Err(SourceError::malformed(c, "garbage")));
	}
	h.event(EditorEvent::BufEnter);
	assert_eq!(h.last(), "<mode>%=<position>");
}

#[test]
fn mark_dirty_by_name() {
	let mut h = Harness::new();
	assert!(!h.line.mark_dirty_by_name("clock"));
	assert_eq!(h.apply(), ApplyOutcome::Unchanged);

	h.host.set_value(ComponentId::RightInfo, "<rec @q>");
	assert!(h.line.mark_dirty_by_name("right_info"));
	assert_eq!(h.apply(), ApplyOutcome::Pushed);
	assert_eq!(h.last(), "<mode> <git> <file>%=<diagnostics> <lsp> <rec @q> <position>");
}
