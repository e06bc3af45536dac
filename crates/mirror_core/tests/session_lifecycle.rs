use std::sync::Once;

use chrono::{Duration, TimeZone, Utc};
use mirror_core::{
    ConfigPatch, CrawlEvent, EventKind, MirrorConfig, SessionError, SessionState, SessionStatus,
    Severity, TerminalStatus, Timestamp,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(mirror_logging::initialize_for_tests);
}

fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
}

fn usable_config() -> MirrorConfig {
    let mut config = MirrorConfig::create_default();
    config.apply(ConfigPatch {
        url: Some("https://example.com".into()),
        output_path: Some("/tmp/out".into()),
        ..Default::default()
    });
    config
}

fn download(downloaded: u64, errors: u64, url: &str) -> CrawlEvent {
    CrawlEvent::new(EventKind::Download, downloaded, errors).with_url(url)
}

#[test]
fn start_enters_downloading_with_zeroed_progress() {
    init_logging();
    let mut session = SessionState::new();
    session.start(&usable_config(), t0()).unwrap();

    assert_eq!(session.status(), SessionStatus::Downloading);
    assert_eq!(session.downloaded_count(), 0);
    assert_eq!(session.error_count(), 0);
    assert_eq!(session.current_url(), "https://example.com");
    assert!(session.log().is_empty());
}

#[test]
fn events_replace_counters_and_append_one_log_line_each() {
    init_logging();
    let mut session = SessionState::new();
    session.start(&usable_config(), t0()).unwrap();

    session
        .apply_event(download(3, 0, "https://example.com/a.css"), t0())
        .unwrap();
    assert_eq!(session.downloaded_count(), 3);
    assert_eq!(session.current_url(), "https://example.com/a.css");
    assert_eq!(session.log().len(), 1);

    // Non-monotonic totals surface as given.
    session
        .apply_event(download(2, 5, "https://example.com/b.js"), t0())
        .unwrap();
    assert_eq!(session.downloaded_count(), 2);
    assert_eq!(session.error_count(), 5);
    assert_eq!(session.log().len(), 2);
}

#[test]
fn event_without_url_keeps_current_url() {
    init_logging();
    let mut session = SessionState::new();
    session.start(&usable_config(), t0()).unwrap();
    session
        .apply_event(download(1, 0, "https://example.com/a.css"), t0())
        .unwrap();
    session
        .apply_event(CrawlEvent::new(EventKind::Download, 2, 0), t0())
        .unwrap();

    assert_eq!(session.current_url(), "https://example.com/a.css");
}

#[test]
fn per_url_error_does_not_end_the_session() {
    init_logging();
    let mut session = SessionState::new();
    session.start(&usable_config(), t0()).unwrap();

    let finished = session
        .apply_event(
            CrawlEvent::new(EventKind::Error, 4, 1)
                .with_url("https://example.com/broken")
                .with_message("404"),
            t0(),
        )
        .unwrap();

    assert!(finished.is_none());
    assert_eq!(session.status(), SessionStatus::Downloading);
    assert_eq!(session.error_count(), 1);
    assert_eq!(session.log()[0].severity(), Severity::Error);
}

#[test]
fn complete_event_ends_session_and_yields_history() {
    init_logging();
    let mut session = SessionState::new();
    let config = usable_config();
    session.start(&config, t0()).unwrap();
    let finished_at = t0() + Duration::minutes(3);

    let entry = session
        .apply_event(CrawlEvent::new(EventKind::Complete, 10, 2), finished_at)
        .unwrap()
        .expect("history entry on completion");

    assert_eq!(session.status(), SessionStatus::Completed);
    assert_eq!(session.log().len(), 1);
    assert_eq!(session.log()[0].severity(), Severity::Success);
    assert_eq!(entry.terminal_status, TerminalStatus::Completed);
    assert_eq!(entry.downloaded_count, 10);
    assert_eq!(entry.error_count, 2);
    assert_eq!(entry.started_at, t0());
    assert_eq!(entry.completed_at, Some(finished_at));
    assert_eq!(entry.domain, "https://example.com");
    assert_eq!(entry.config, config);
}

#[test]
fn fatal_signal_ends_in_error() {
    init_logging();
    let mut session = SessionState::new();
    session.start(&usable_config(), t0()).unwrap();
    session
        .apply_event(download(3, 0, "https://example.com/a.css"), t0())
        .unwrap();

    let entry = session.fail("disk full", t0()).unwrap();

    assert_eq!(session.status(), SessionStatus::Error);
    assert_eq!(entry.terminal_status, TerminalStatus::Error);
    assert_eq!(entry.downloaded_count, 3);
    assert_eq!(session.log().last().unwrap().message(), "Crawl failed: disk full");
}

#[test]
fn stop_ends_in_stopped() {
    init_logging();
    let mut session = SessionState::new();
    session.start(&usable_config(), t0()).unwrap();

    let entry = session.stop(t0()).unwrap();

    assert_eq!(session.status(), SessionStatus::Stopped);
    assert_eq!(entry.terminal_status, TerminalStatus::Stopped);
    assert_eq!(session.log().last().unwrap().severity(), Severity::Warning);
}

#[test]
fn second_start_while_downloading_is_rejected() {
    init_logging();
    let mut session = SessionState::new();
    session.start(&usable_config(), t0()).unwrap();
    session
        .apply_event(download(1, 0, "https://example.com/a"), t0())
        .unwrap();
    let before = session.clone();

    assert_eq!(
        session.start(&usable_config(), t0()),
        Err(SessionError::AlreadyDownloading)
    );
    assert_eq!(session, before);
}

#[test]
fn start_with_unusable_config_is_rejected() {
    init_logging();
    let mut session = SessionState::new();
    assert_eq!(
        session.start(&MirrorConfig::create_default(), t0()),
        Err(SessionError::ConfigUnusable)
    );
    assert_eq!(session.status(), SessionStatus::Idle);
}

#[test]
fn events_outside_a_session_are_rejected() {
    init_logging();
    let mut session = SessionState::new();
    assert_eq!(
        session.apply_event(download(1, 0, "https://example.com"), t0()),
        Err(SessionError::NotDownloading {
            status: SessionStatus::Idle
        })
    );

    session.start(&usable_config(), t0()).unwrap();
    session.stop(t0()).unwrap();
    assert_eq!(
        session.apply_event(download(1, 0, "https://example.com"), t0()),
        Err(SessionError::NotDownloading {
            status: SessionStatus::Stopped
        })
    );
    assert_eq!(session.log().len(), 1);
}

#[test]
fn terminating_without_start_is_reported() {
    init_logging();
    let mut session = SessionState::new();
    assert_eq!(session.stop(t0()), Err(SessionError::NotStarted));
    assert_eq!(session.fail("boom", t0()), Err(SessionError::NotStarted));
    assert!(session.log().is_empty());
}

#[test]
fn terminating_twice_is_reported() {
    init_logging();
    let mut session = SessionState::new();
    session.start(&usable_config(), t0()).unwrap();
    session.stop(t0()).unwrap();

    assert_eq!(
        session.fail("late", t0()),
        Err(SessionError::NotDownloading {
            status: SessionStatus::Stopped
        })
    );
}

#[test]
fn reset_clears_progress_only_when_not_downloading() {
    init_logging();
    let mut session = SessionState::new();
    session.start(&usable_config(), t0()).unwrap();
    session
        .apply_event(download(3, 1, "https://example.com/a"), t0())
        .unwrap();

    assert_eq!(session.reset(), Err(SessionError::ResetWhileDownloading));
    assert_eq!(session.downloaded_count(), 3);

    session
        .apply_event(CrawlEvent::new(EventKind::Complete, 3, 1), t0())
        .unwrap();
    session.reset().unwrap();

    assert_eq!(session.status(), SessionStatus::Idle);
    assert_eq!(session.downloaded_count(), 0);
    assert_eq!(session.error_count(), 0);
    assert_eq!(session.current_url(), "");
    assert!(session.log().is_empty());
}

#[test]
fn restart_from_terminal_state_zeroes_previous_progress() {
    init_logging();
    let mut session = SessionState::new();
    session.start(&usable_config(), t0()).unwrap();
    session
        .apply_event(download(8, 2, "https://example.com/a"), t0())
        .unwrap();
    session.fail("network down", t0()).unwrap();

    session.start(&usable_config(), t0()).unwrap();

    assert_eq!(session.status(), SessionStatus::Downloading);
    assert_eq!(session.downloaded_count(), 0);
    assert_eq!(session.error_count(), 0);
    assert!(session.log().is_empty());
}

#[test]
fn log_ids_are_unique() {
    init_logging();
    let mut session = SessionState::new();
    session.start(&usable_config(), t0()).unwrap();
    for n in 1..=20 {
        session
            .apply_event(download(n, 0, "https://example.com/x"), t0())
            .unwrap();
    }

    let mut ids: Vec<_> = session.log().iter().map(|entry| entry.id()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);
}
