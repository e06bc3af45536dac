use std::fs;
use std::sync::Once;
use std::time::Duration;

use mirror_app::{ReplayCrawler, SessionController};
use mirror_core::{ConfigPatch, Msg, SessionStatus, Severity, TerminalStatus};
use mirror_store::JsonStore;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(mirror_logging::initialize_for_tests);
}

const COMPLETE_RUN: &str = r#"{"type":"start","url":"https://example.com","downloaded":0,"errors":0}
{"type":"download","url":"https://example.com/","filePath":"index.html","downloaded":1,"errors":0}
{"type":"download","url":"https://example.com/site.css","filePath":"site.css","downloaded":2,"errors":0}
{"type":"error","url":"https://example.com/missing.js","downloaded":2,"errors":1,"message":"404 Not Found"}
{"type":"complete","downloaded":2,"errors":1}
"#;

fn controller_for(dir: &TempDir, recording: &str) -> SessionController {
    init_logging();
    let path = dir.path().join("recording.jsonl");
    fs::write(&path, recording).unwrap();
    let crawler = ReplayCrawler::from_path(&path).unwrap();
    let mut controller =
        SessionController::new(JsonStore::new(dir.path())).with_crawler(Box::new(crawler));
    controller
        .dispatch(Msg::ConfigEdited(ConfigPatch {
            url: Some("https://example.com".into()),
            output_path: Some(dir.path().join("site").display().to_string()),
            ..Default::default()
        }))
        .unwrap();
    controller
}

#[test]
fn recording_plays_to_completion() {
    let dir = TempDir::new().unwrap();
    let mut controller = controller_for(&dir, COMPLETE_RUN);

    controller.dispatch(Msg::StartClicked).unwrap();
    let view = controller.wait_for_terminal().unwrap();

    assert_eq!(view.status, SessionStatus::Completed);
    assert_eq!(view.downloaded_count, 2);
    assert_eq!(view.error_count, 1);
    assert_eq!(view.log.len(), 5);
    assert_eq!(view.log[3].severity(), Severity::Error);
    assert_eq!(view.log[3].message(), "404 Not Found");
    assert_eq!(view.history.len(), 1);
    assert_eq!(view.history[0].terminal_status, TerminalStatus::Completed);
}

#[test]
fn fatal_line_ends_the_run_in_error() {
    let dir = TempDir::new().unwrap();
    let recording = r#"{"type":"start","url":"https://example.com","downloaded":0,"errors":0}
{"type":"download","url":"https://example.com/","filePath":"index.html","downloaded":1,"errors":0}
{"fatal":"disk full"}
"#;
    let mut controller = controller_for(&dir, recording);

    controller.dispatch(Msg::StartClicked).unwrap();
    let view = controller.wait_for_terminal().unwrap();

    assert_eq!(view.status, SessionStatus::Error);
    assert_eq!(view.downloaded_count, 1);
    assert!(view.log.last().unwrap().message().contains("disk full"));
    assert_eq!(view.history[0].terminal_status, TerminalStatus::Error);
}

#[test]
fn truncated_recording_is_reported_as_a_failure() {
    let dir = TempDir::new().unwrap();
    let recording = r#"{"type":"start","url":"https://example.com","downloaded":0,"errors":0}
"#;
    let mut controller = controller_for(&dir, recording);

    controller.dispatch(Msg::StartClicked).unwrap();
    let view = controller.wait_for_terminal().unwrap();

    assert_eq!(view.status, SessionStatus::Error);
}

#[test]
fn stop_interrupts_a_slow_replay() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recording.jsonl");
    fs::write(&path, COMPLETE_RUN).unwrap();
    let crawler = ReplayCrawler::from_path(&path)
        .unwrap()
        .with_delay(Duration::from_millis(200));
    let mut controller =
        SessionController::new(JsonStore::new(dir.path())).with_crawler(Box::new(crawler));
    controller
        .dispatch(Msg::ConfigEdited(ConfigPatch {
            url: Some("https://example.com".into()),
            output_path: Some("out".into()),
            ..Default::default()
        }))
        .unwrap();

    controller.dispatch(Msg::StartClicked).unwrap();
    controller.dispatch(Msg::StopClicked).unwrap();

    let view = controller.snapshot();
    assert_eq!(view.status, SessionStatus::Stopped);
    assert_eq!(view.history[0].terminal_status, TerminalStatus::Stopped);
}

#[test]
fn history_written_by_a_replayed_run_survives_restart() {
    let dir = TempDir::new().unwrap();
    let mut controller = controller_for(&dir, COMPLETE_RUN);
    controller.dispatch(Msg::StartClicked).unwrap();
    controller.wait_for_terminal().unwrap();

    let mut restarted = SessionController::new(JsonStore::new(dir.path()));
    restarted.restore();
    let view = restarted.snapshot();

    assert_eq!(view.history.len(), 1);
    assert_eq!(view.history[0].url, "https://example.com");
    assert_eq!(view.history[0].downloaded_count, 2);
}
