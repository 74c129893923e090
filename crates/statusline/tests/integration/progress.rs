use pretty_assertions::assert_eq;
use stratus_primitives::markup;
use stratus_statusline::progress::ProgressState;
use stratus_statusline::{ClientId, ComponentId, EditorEvent, ProgressEvent};

use crate::common::Harness;

const BASE: &str = "<mode> <git> <file>%=<diagnostics> <lsp> <right_info> <position>";

fn with_middle(middle: &str) -> String {
	format!("<mode> <git> <file>%={middle}%=<diagnostics> <lsp> <right_info> <position>")
}

fn begin(client: &str, title: &str, percentage: Option<u32>) -> EditorEvent {
	EditorEvent::Progress(ProgressEvent::Begin {
		client: ClientId::from(client),
		client_name: format!("{client}-server"),
		title: title.into(),
		message: None,
		percentage,
	})
}

fn report(client: &str, percentage: u32) -> EditorEvent {
	EditorEvent::Progress(ProgressEvent::Report {
		client: ClientId::from(client),
		title: None,
		message: None,
		percentage: Some(percentage),
	})
}

fn end(client: &str) -> EditorEvent {
	EditorEvent::Progress(ProgressEvent::End {
		client: ClientId::from(client),
		message: None,
	})
}

#[test]
fn lsp_indexing_lifecycle() {
	let mut h = Harness::new();
	let lsp1 = ClientId::from("lsp1");

	h.event(begin("lsp1", "Indexing", Some(0)));
	assert_eq!(h.last(), with_middle("⠋ Indexing (0%%)"));
	assert!(h.line.progress().spinner().is_running());

	h.advance(100);
	h.event(report("lsp1", 57));
	assert_eq!(h.last(), with_middle("⠙ Indexing (57%%)"));

	h.event(end("lsp1"));
	assert_eq!(h.last(), with_middle("✓ Indexing (57%%)"));
	assert_eq!(h.line.progress().state(&lsp1), ProgressState::Draining);
	assert!(!h.line.progress().spinner().is_running());

	h.advance(499);
	assert_eq!(h.last(), with_middle("✓ Indexing (57%%)"));
	h.advance(1);
	assert_eq!(h.last(), BASE);
	assert_eq!(h.line.progress().state(&lsp1), ProgressState::Absent);
}

/// Must advance the spinner exactly one frame per tick while work is active.
///
/// - Enforced in: `Statusline::on_timer`, `Spinner::advance`
/// - Failure symptom: Spinner skips frames or keeps animating after completion.
#[test]
fn spinner_ticks_redraw_progress() {
	let mut h = Harness::new();
	h.event(begin("ra", "Building", None));
	let published = h.host.published.len();

	h.advance(300);
	assert_eq!(h.line.stats().spinner_ticks, 3);
	assert_eq!(h.host.published.len(), published + 3);
	assert_eq!(h.last(), with_middle("⠸ Building"));
	assert_eq!(h.line.cache().recomputes(ComponentId::Mode), 1);
}

#[test]
fn stale_entries_are_pruned_without_end() {
	let mut h = Harness::new();
	h.event(begin("ra", "Indexing", Some(10)));

	h.advance(30_000);
	// 300 ticks wrap the ten-frame spinner back to its first frame.
	assert_eq!(h.last(), with_middle("⠋ Indexing (10%%)"));
	h.advance(100);
	assert_eq!(h.last(), BASE);
	assert!(h.line.progress().is_empty());
	assert!(!h.line.progress().spinner().is_running());

	let ticks = h.line.stats().spinner_ticks;
	h.advance(1_000);
	assert_eq!(h.line.stats().spinner_ticks, ticks);
}

#[test]
fn progress_hidden_below_min_width() {
	let mut h = Harness::new();
	h.host.width = 85;
	h.event(EditorEvent::WindowResized);
	h.event(begin("ra", "Indexing", None));

	assert_eq!(h.last(), "<mode> <git> <file>%=<diagnostics> <lsp> <position>");
	assert!(h.line.progress().spinner().is_running());
}

#[test]
fn multiple_clients_render_in_begin_order() {
	let mut h = Harness::new();
	h.event(begin("ra", "Indexing", Some(20)));
	h.event(begin("ts", "Loading", None));
	assert_eq!(h.last(), with_middle("⠋ Indexing (20%%) | Loading"));

	h.event(end("ra"));
	assert_eq!(h.last(), with_middle("⠋ Loading | Indexing (20%%)"));
	assert!(h.line.progress().spinner().is_running());
}

#[test]
fn detached_client_drops_its_progress() {
	let mut h = Harness::new();
	h.event(begin("ra", "Indexing", None));
	h.event(begin("ts", "Loading", None));
	h.event(end("ra"));
	let grace = h
		.line
		.progress()
		.get(&ClientId::from("ra"))
		.and_then(|e| e.grace_timer())
		.unwrap();

	h.event(EditorEvent::LspDetached("ra".into()));
	assert_eq!(h.last(), with_middle("⠋ Loading"));
	assert!(h.host.cancelled.contains(&grace));
	assert!(!h.host.timers.is_scheduled(grace));
}

#[test]
fn begin_during_grace_revives_entry() {
	let mut h = Harness::new();
	h.event(begin("ra", "Indexing", None));
	h.event(end("ra"));
	let grace = h
		.line
		.progress()
		.get(&ClientId::from("ra"))
		.and_then(|e| e.grace_timer())
		.unwrap();

	h.advance(200);
	h.event(begin("ra", "Reindexing", Some(5)));
	assert!(h.host.cancelled.contains(&grace));
	assert_eq!(h.last(), with_middle("⠋ Reindexing (5%%)"));

	h.advance(400);
	assert_eq!(
		h.line.progress().state(&ClientId::from("ra")),
		ProgressState::Active
	);
}

#[test]
fn reports_for_unknown_clients_change_nothing() {
	let mut h = Harness::new();
	h.event(report("ghost", 50));
	assert_eq!(h.host.published.len(), 1);
	assert!(h.line.progress().is_empty());
	assert!(!h.line.progress().spinner().is_running());
}

/// Must keep client-supplied progress text inside the middle section.
///
/// - Enforced in: `ProgressEntry::render_item`
/// - Failure symptom: a title containing `%=` or `%#Group#` splits the line
///   into extra sections or leaks a highlight group.
#[test]
fn progress_title_markup_is_escaped() {
	let mut h = Harness::new();
	h.event(begin("lsp1", "Build %=stage %#Error#x", Some(10)));

	let sections = markup::sections(h.last());
	assert_eq!(sections.len(), 3, "{sections:?}");
	assert_eq!(sections[1], "⠋ Build %=stage %#Error#x (10%)");
}
