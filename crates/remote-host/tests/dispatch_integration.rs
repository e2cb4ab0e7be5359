//! Integration tests for command dispatch through the crate's public API.
//!
//! These tests wire a [`Dispatcher`] exactly the way the server does —
//! recording mocks standing in for the platform controls, a mock display
//! behind the screen session — and drive it with raw wire frames. They
//! pin the protocol's observable properties:
//!
//! - media/input/system commands reach their collaborator and report
//!   success;
//! - unknown command types produce the canonical error reply;
//! - unknown actions inside a known type are successful no-ops that make
//!   no platform call;
//! - screen start/stop keep at most one producer armed, with one ack per
//!   start and idempotent stop;
//! - a file sent out and fed back in survives byte-for-byte.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tokio::sync::mpsc;

use remote_core::{decode, InputAction, MediaAction, ServerMessage, Status, SystemAction};
use remote_host::application::{
    Dispatcher, FileTransfer, InputControl, MediaControl, Outcome, OutboundSink, ScreenSession,
    SystemControl,
};
use remote_host::infrastructure::controls::RecordingControls;
use remote_host::infrastructure::display::MockDisplay;

// ── Fixture ───────────────────────────────────────────────────────────────────

struct Fixture {
    controls: Arc<RecordingControls>,
    dispatcher: Dispatcher,
    screen: ScreenSession,
    sink: OutboundSink,
    rx: mpsc::Receiver<ServerMessage>,
    // Keeps the save directory alive for the test's duration.
    save_dir: tempfile::TempDir,
}

fn make_fixture() -> Fixture {
    let controls = Arc::new(RecordingControls::new());
    let save_dir = tempfile::tempdir().expect("tempdir");
    let dispatcher = Dispatcher::new(
        Arc::clone(&controls) as Arc<dyn MediaControl>,
        Arc::clone(&controls) as Arc<dyn InputControl>,
        Arc::clone(&controls) as Arc<dyn SystemControl>,
        FileTransfer::new(save_dir.path().to_path_buf()),
    );
    let screen = ScreenSession::new(
        Arc::new(MockDisplay::solid(32, 24)),
        Duration::from_millis(100),
    );
    let (sink, rx) = OutboundSink::channel(8);
    Fixture {
        controls,
        dispatcher,
        screen,
        sink,
        rx,
        save_dir,
    }
}

async fn route(fixture: &mut Fixture, raw: &str) -> Outcome {
    let command = decode(raw).expect("test frames must decode");
    fixture
        .dispatcher
        .route(&command, &fixture.sink, &mut fixture.screen)
        .await
}

fn success() -> Outcome {
    Outcome::Reply {
        status: Status::Success,
        message: None,
    }
}

// ── Fire-and-forget families ──────────────────────────────────────────────────

/// Every recognized media action reports success and reaches the
/// collaborator exactly once.
#[tokio::test]
async fn test_all_media_actions_dispatch_and_succeed() {
    let mut fx = make_fixture();

    for action in ["play_pause", "next", "previous", "volume", "mute"] {
        let outcome = route(&mut fx, &format!(r#"{{"type":"media","action":"{action}"}}"#)).await;
        assert_eq!(outcome, success(), "media.{action} must succeed");
    }

    let calls = fx.controls.media.lock().unwrap();
    assert_eq!(
        calls.iter().map(|(a, _)| *a).collect::<Vec<_>>(),
        vec![
            MediaAction::PlayPause,
            MediaAction::Next,
            MediaAction::Previous,
            MediaAction::Volume,
            MediaAction::Mute,
        ]
    );
}

/// The volume value travels through the forgiving field accessor.
#[tokio::test]
async fn test_media_volume_value_reaches_collaborator() {
    let mut fx = make_fixture();

    route(&mut fx, r#"{"type":"media","action":"volume","value":85}"#).await;

    assert_eq!(
        *fx.controls.media.lock().unwrap(),
        vec![(MediaAction::Volume, 85)]
    );
}

/// Input commands carry their deltas and detail strings.
#[tokio::test]
async fn test_input_commands_carry_their_fields() {
    let mut fx = make_fixture();

    route(
        &mut fx,
        r#"{"type":"input","action":"mouse_move","deltaX":5,"deltaY":-9}"#,
    )
    .await;
    route(
        &mut fx,
        r#"{"type":"input","action":"mouse_click","button":"right"}"#,
    )
    .await;

    let calls = fx.controls.input.lock().unwrap();
    assert_eq!(calls[0], (InputAction::MouseMove, 5, -9, String::new()));
    assert_eq!(
        calls[1],
        (InputAction::MouseClick, 0, 0, "right".to_string())
    );
}

/// A mouse move with no deltas degrades to a zero move — the forgiving
/// extraction contract at work end to end.
#[tokio::test]
async fn test_mouse_move_without_deltas_is_zero_move_not_error() {
    let mut fx = make_fixture();

    let outcome = route(&mut fx, r#"{"type":"input","action":"mouse_move"}"#).await;

    assert_eq!(outcome, success());
    assert_eq!(
        *fx.controls.input.lock().unwrap(),
        vec![(InputAction::MouseMove, 0, 0, String::new())]
    );
}

/// System commands reach the collaborator; the recorder stands in for the
/// real control, which would power the machine down.
#[tokio::test]
async fn test_system_commands_dispatch_and_succeed() {
    let mut fx = make_fixture();

    for action in ["shutdown", "restart", "sleep", "lock"] {
        let outcome = route(&mut fx, &format!(r#"{{"type":"system","action":"{action}"}}"#)).await;
        assert_eq!(outcome, success(), "system.{action} must succeed");
    }

    assert_eq!(
        *fx.controls.system.lock().unwrap(),
        vec![
            SystemAction::Shutdown,
            SystemAction::Restart,
            SystemAction::Sleep,
            SystemAction::Lock,
        ]
    );
}

// ── Permissive dispatch ───────────────────────────────────────────────────────

/// Unknown command type: canonical error reply.
#[tokio::test]
async fn test_unknown_type_produces_canonical_error() {
    let mut fx = make_fixture();

    let outcome = route(&mut fx, r#"{"type":"bogus","action":"anything","id":7}"#).await;

    assert_eq!(
        outcome,
        Outcome::Reply {
            status: Status::Error,
            message: Some("Unknown command type".to_string()),
        }
    );
}

/// Unknown action in a known type: success, and no collaborator call.
#[tokio::test]
async fn test_unknown_action_is_successful_no_op_without_platform_call() {
    let mut fx = make_fixture();

    let outcome = route(&mut fx, r#"{"type":"media","action":"foobar"}"#).await;

    assert_eq!(outcome, success());
    assert!(fx.controls.media.lock().unwrap().is_empty());
    assert!(fx.controls.input.lock().unwrap().is_empty());
    assert!(fx.controls.system.lock().unwrap().is_empty());
}

// ── Screen lifecycle ──────────────────────────────────────────────────────────

/// Two starts in a row leave exactly one armed producer, with exactly one
/// ack per start call.
#[tokio::test]
async fn test_double_screen_start_keeps_one_producer() {
    let mut fx = make_fixture();

    route(&mut fx, r#"{"type":"screen","action":"start"}"#).await;
    route(&mut fx, r#"{"type":"screen","action":"start"}"#).await;

    assert!(fx.screen.is_streaming());
    assert_eq!(fx.rx.try_recv(), Ok(ServerMessage::ScreenStreaming));
    assert_eq!(fx.rx.try_recv(), Ok(ServerMessage::ScreenStreaming));
    assert!(fx.rx.try_recv().is_err(), "exactly one ack per start call");
}

/// Stop is idempotent: stopping an idle screen neither errors nor emits.
#[tokio::test]
async fn test_screen_stop_is_idempotent() {
    let mut fx = make_fixture();

    route(&mut fx, r#"{"type":"screen","action":"stop"}"#).await;
    route(&mut fx, r#"{"type":"screen","action":"stop"}"#).await;

    assert!(!fx.screen.is_streaming());
    assert!(fx.rx.try_recv().is_err());
}

/// Start, stop, start again: the lifecycle is fully reusable.
#[tokio::test]
async fn test_screen_restarts_after_stop() {
    let mut fx = make_fixture();

    route(&mut fx, r#"{"type":"screen","action":"start"}"#).await;
    route(&mut fx, r#"{"type":"screen","action":"stop"}"#).await;
    assert!(!fx.screen.is_streaming());

    route(&mut fx, r#"{"type":"screen","action":"start"}"#).await;
    assert!(fx.screen.is_streaming());
}

// ── File round-trip ───────────────────────────────────────────────────────────

/// A file sent to the client and fed back through receive lands with
/// identical bytes and a size field matching its length.
#[tokio::test]
async fn test_file_round_trip_preserves_bytes() {
    let mut fx = make_fixture();
    let content: Vec<u8> = (0u16..1000).map(|i| (i % 241) as u8).collect();
    let source = fx.save_dir.path().join("outgoing.bin");
    std::fs::write(&source, &content).unwrap();

    // Host → client.
    route(
        &mut fx,
        &format!(
            r#"{{"type":"file","action":"send","path":"{}"}}"#,
            source.display()
        ),
    )
    .await;
    let Ok(ServerMessage::FileData {
        filename,
        size,
        data_base64,
    }) = fx.rx.try_recv()
    else {
        panic!("expected a file data frame");
    };
    assert_eq!(filename, "outgoing.bin");
    assert_eq!(size as usize, content.len());
    assert_eq!(BASE64.decode(&data_base64).unwrap(), content);

    // Client → host, echoing the payload back under a new name.
    route(
        &mut fx,
        &format!(
            r#"{{"type":"file","action":"receive","filename":"echoed.bin","data":"{data_base64}"}}"#
        ),
    )
    .await;
    assert_eq!(
        fx.rx.try_recv(),
        Ok(ServerMessage::FileResult {
            status: Status::Success,
            message: "File received".to_string(),
        })
    );
    assert_eq!(
        std::fs::read(fx.save_dir.path().join("echoed.bin")).unwrap(),
        content
    );
}

/// Sending a nonexistent path is answered with the open-failure reply and
/// nothing else.
#[tokio::test]
async fn test_file_send_failure_reports_error_reply() {
    let mut fx = make_fixture();

    let outcome = route(
        &mut fx,
        r#"{"type":"file","action":"send","path":"/no/such/file.bin"}"#,
    )
    .await;

    assert_eq!(outcome, Outcome::Delegated);
    assert_eq!(
        fx.rx.try_recv(),
        Ok(ServerMessage::FileResult {
            status: Status::Error,
            message: "Failed to open file".to_string(),
        })
    );
    assert!(fx.rx.try_recv().is_err());
}
