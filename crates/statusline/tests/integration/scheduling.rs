use std::time::Duration;

use pretty_assertions::assert_eq;
use stratus_statusline::progress::ProgressState;
use stratus_statusline::{
	ApplyOutcome, ClientId, ComponentId, EditorEvent, ProgressEvent, Statusline, StatuslineConfig, TimerHandle,
	UpdateOutcome,
};

use crate::common::{FakeHost, Harness};

/// Must coalesce a burst of debounced calls into one recompute, timed from the
/// last call.
///
/// - Enforced in: `Statusline::update_debounced`, `UpdateScheduler::replace_debounce`
/// - Failure symptom: Git status is recomputed once per save during a burst.
#[test]
fn git_debounce_burst() {
	let mut h = Harness::new();
	h.host.set_value(ComponentId::Git, "<main +1>");
	for i in 0..5 {
		h.advance_to(i * 100);
		h.event(EditorEvent::VcsUpdated);
	}
	assert_eq!(h.line.stats().debounce_coalesced, 4);
	assert_eq!(h.line.scheduler().pending_count(), 1);

	h.advance_to(1_399);
	assert_eq!(h.host.reads_of(ComponentId::Git), 1);
	h.advance_to(1_400);
	assert_eq!(h.host.reads_of(ComponentId::Git), 2);
	assert_eq!(h.line.scheduler().pending(ComponentId::Git), None);
	assert_eq!(
		h.last(),
		"<mode> <main +1> <file>%=<diagnostics> <lsp> <right_info> <position>"
	);

	h.advance(5_000);
	assert_eq!(h.host.reads_of(ComponentId::Git), 2, "no trailing replays");
}

#[test]
fn buf_written_updates_file_now_and_git_later() {
	let mut h = Harness::new();
	h.host.set_value(ComponentId::File, "<saved.rs>");
	h.host.set_value(ComponentId::Git, "<main ~1>");
	h.event(EditorEvent::BufWritten);

	assert_eq!(
		h.last(),
		"<mode> <git> <saved.rs>%=<diagnostics> <lsp> <right_info> <position>"
	);
	h.advance(1_000);
	assert_eq!(
		h.last(),
		"<mode> <main ~1> <saved.rs>%=<diagnostics> <lsp> <right_info> <position>"
	);
}

#[test]
fn debounce_channels_are_independent() {
	let mut h = Harness::new();
	h.event(EditorEvent::VcsUpdated);
	h.event(EditorEvent::DiagnosticsChanged);
	assert_eq!(h.line.scheduler().pending_count(), 2);
	assert_eq!(h.line.stats().debounce_coalesced, 0);

	h.advance(150);
	assert_eq!(h.host.reads_of(ComponentId::Diagnostics), 2);
	assert_eq!(h.host.reads_of(ComponentId::Git), 1);
}

/// Must drop throttled calls inside the window instead of replaying them.
///
/// - Enforced in: `UpdateScheduler::admit_throttled`
/// - Failure symptom: Cursor position renders lag behind and keep updating
///   after motion stops.
#[test]
fn cursor_throttle_drops_without_replay() {
	let mut h = Harness::new();
	for i in 0..10 {
		h.advance_to(i * 30);
		h.event(EditorEvent::CursorMoved);
	}
	// Initial render plus admissions at 0, 120 and 240 ms.
	assert_eq!(h.host.reads_of(ComponentId::Position), 4);
	assert_eq!(h.line.stats().throttle_drops, 7);

	h.advance(2_000);
	assert_eq!(h.host.reads_of(ComponentId::Position), 4);
}

#[test]
fn cursor_idle_catches_up_after_throttle() {
	let mut h = Harness::new();
	h.event(EditorEvent::CursorMoved);
	h.host.set_value(ComponentId::Position, "<12:4>");
	h.advance(10);
	h.event(EditorEvent::CursorMoved);
	assert!(h.last().ends_with("<position>"));

	h.event(EditorEvent::CursorIdle);
	assert!(h.last().ends_with("<12:4>"));
}

#[test]
fn throttled_update_reports_drops() {
	let mut h = Harness::new();
	let now = h.host.clock;
	let interval = Duration::from_millis(200);
	assert_eq!(
		h.line.update_throttled(&mut h.host, ComponentId::File, interval, now),
		UpdateOutcome::Applied(ApplyOutcome::Unchanged)
	);
	assert_eq!(
		h.line.update_throttled(&mut h.host, ComponentId::File, interval, now),
		UpdateOutcome::Dropped
	);
	assert!(!h.line.cache().is_dirty(ComponentId::File));
}

/// Must resync everything on the fallback period even without events.
///
/// - Enforced in: `Statusline::on_timer`, `Statusline::ensure_fallback`
/// - Failure symptom: A missed event leaves a stale fragment on screen forever.
#[test]
fn fallback_watchdog_bounds_staleness() {
	let mut h = Harness::new();
	h.host.set_value(ComponentId::Git, "<changed upstream>");

	h.advance_to(9_999);
	assert!(!h.last().contains("changed upstream"));
	h.advance_to(10_000);
	assert!(h.last().contains("<changed upstream>"));
	assert_eq!(h.line.stats().fallback_resyncs, 1);

	h.advance_to(30_000);
	assert_eq!(h.line.stats().fallback_resyncs, 3);
	assert_eq!(h.host.published.len(), 2, "resyncs with no change do not republish");
}

#[test]
fn failed_debounce_marks_dirty_without_applying() {
	let mut h = Harness::new();
	h.host.reject_timers = true;
	h.host.set_value(ComponentId::Git, "<rebased>");
	let now = h.host.clock;
	let outcome = h.line.update_debounced(&mut h.host, ComponentId::Git, Duration::from_secs(1), now);

	assert_eq!(outcome, UpdateOutcome::Deferred);
	assert!(h.line.cache().is_dirty(ComponentId::Git));
	assert_eq!(h.line.stats().timer_failures, 1);
	assert_eq!(h.host.reads_of(ComponentId::Git), 1);

	h.event(EditorEvent::ModeChanged);
	assert!(h.last().contains("<rebased>"));
}

#[test]
fn failed_fallback_is_retried_on_next_apply() {
	let t0 = std::time::Instant::now();
	let mut host = FakeHost::new(t0);
	host.reject_timers = true;
	let mut line = Statusline::new(StatuslineConfig::default());
	line.start(&mut host, t0);

	assert_eq!(line.scheduler().fallback(), None);
	assert_eq!(line.stats().timer_failures, 1);
	assert_eq!(host.published.len(), 1);

	host.reject_timers = false;
	line.apply(&mut host, t0);
	assert!(line.scheduler().fallback().is_some());
}

fn begin_indexing() -> EditorEvent {
	EditorEvent::Progress(ProgressEvent::Begin {
		client: ClientId::from("lsp1"),
		client_name: "lsp1".into(),
		title: "Indexing".into(),
		message: None,
		percentage: None,
	})
}

#[test]
fn failed_spinner_is_retried_on_next_apply() {
	let mut h = Harness::new();
	h.host.reject_timers = true;
	h.event(begin_indexing());

	assert!(!h.line.progress().spinner().is_running());
	assert_eq!(h.line.stats().timer_failures, 1);
	assert!(h.last().contains("Indexing"));

	h.host.reject_timers = false;
	h.apply();
	assert!(h.line.progress().spinner().is_running());

	h.advance(100);
	assert_eq!(h.line.stats().spinner_ticks, 1);
	assert!(h.last().contains("⠙ Indexing"), "{}", h.last());
}

/// Must remove a draining entry once its grace window has passed even when
/// the grace timer could not be armed.
///
/// - Enforced in: `ProgressRegistry::sweep`, `Statusline::apply`
/// - Failure symptom: a finished task lingers until the staleness timeout.
#[test]
fn failed_grace_timer_falls_back_to_sweep() {
	let mut h = Harness::new();
	let lsp1 = ClientId::from("lsp1");
	h.event(begin_indexing());
	h.advance(100);

	h.host.reject_timers = true;
	h.event(EditorEvent::Progress(ProgressEvent::End {
		client: lsp1.clone(),
		message: None,
	}));
	assert_eq!(h.line.stats().timer_failures, 1);
	assert_eq!(h.line.progress().get(&lsp1).and_then(|e| e.grace_timer()), None);
	assert!(h.last().contains("✓ Indexing"), "{}", h.last());
	h.host.reject_timers = false;

	h.advance(499);
	assert_eq!(h.apply(), ApplyOutcome::Unchanged);
	assert_eq!(h.line.progress().state(&lsp1), ProgressState::Draining);

	h.advance(1);
	assert_eq!(h.apply(), ApplyOutcome::Pushed);
	assert_eq!(h.line.progress().state(&lsp1), ProgressState::Absent);
	assert!(!h.last().contains("Indexing"), "{}", h.last());
}

#[test]
fn unknown_timers_are_ignored() {
	let mut h = Harness::new();
	let now = h.host.clock;
	assert!(!h.line.on_timer(&mut h.host, TimerHandle(9_999), now));
	assert_eq!(h.host.published.len(), 1);
}

/// Must release every timer handle on shutdown.
///
/// - Enforced in: `Statusline::shutdown`
/// - Failure symptom: Timers keep firing into a torn-down window.
#[test]
fn shutdown_releases_every_handle() {
	let mut h = Harness::new();
	h.event(EditorEvent::VcsUpdated);
	h.event(EditorEvent::DiagnosticsChanged);
	for (client, title) in [("ra", "Indexing"), ("ts", "Loading")] {
		h.event(EditorEvent::Progress(ProgressEvent::Begin {
			client: ClientId::from(client),
			client_name: client.into(),
			title: title.into(),
			message: None,
			percentage: None,
		}));
	}
	h.event(EditorEvent::Progress(ProgressEvent::End {
		client: "ts".into(),
		message: None,
	}));
	// fallback, git + diagnostics debounce, spinner, one grace timer
	assert_eq!(h.host.timers.len(), 5);

	let released = h.line.shutdown(&mut h.host);
	assert_eq!(released, 5);
	assert!(h.host.timers.is_empty());
	assert!(h.line.is_shut_down());

	let published = h.host.published.len();
	h.event(EditorEvent::ModeChanged);
	assert_eq!(h.advance(60_000), Vec::new());
	assert_eq!(h.host.published.len(), published);
	assert_eq!(h.line.shutdown(&mut h.host), 0);
}
