//! Criterion benchmarks for the PC Remote JSON codec.
//!
//! Input commands arrive at touchpad rates (every few milliseconds during a
//! drag) and screen frames are encoded ten times per second, so decode and
//! encode sit on the hot path of every session.
//!
//! Run with:
//! ```bash
//! cargo bench --package remote-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use remote_core::{decode, encode, ServerMessage, Status};
use serde_json::json;

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn inbound_fixtures() -> Vec<(&'static str, String)> {
    vec![
        (
            "mouse_move",
            r#"{"type":"input","action":"mouse_move","deltaX":12,"deltaY":-3}"#.to_string(),
        ),
        (
            "media_volume",
            r#"{"type":"media","action":"volume","value":40,"id":7}"#.to_string(),
        ),
        (
            "system_lock",
            r#"{"type":"system","action":"lock","id":"a1"}"#.to_string(),
        ),
        (
            "screen_start",
            r#"{"type":"screen","action":"start"}"#.to_string(),
        ),
        (
            "file_receive_1k",
            format!(
                r#"{{"type":"file","action":"receive","filename":"f.bin","data":"{}"}}"#,
                "QUJDRA==".repeat(128)
            ),
        ),
    ]
}

fn make_success_ack() -> ServerMessage {
    ServerMessage::Ack {
        id: Some(json!(7)),
        status: Status::Success,
        message: None,
    }
}

fn make_screen_frame_30k() -> ServerMessage {
    // A base64 payload in the ballpark of one 1280x720 JPEG at quality 75.
    ServerMessage::ScreenFrame {
        data_base64: "QUJDRA==".repeat(4096),
    }
}

// ── Benchmark groups ──────────────────────────────────────────────────────────

/// Benchmarks `decode` across representative inbound commands.
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for (name, raw) in inbound_fixtures() {
        group.bench_with_input(BenchmarkId::new("cmd", name), &raw, |b, raw| {
            b.iter(|| decode(black_box(raw)).expect("fixture must decode"))
        });
    }
    group.finish();
}

/// Benchmarks `encode` for the two outbound messages that dominate traffic:
/// the per-command ack and the screen frame.
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    let ack = make_success_ack();
    group.bench_function("ack", |b| b.iter(|| encode(black_box(&ack))));

    let frame = make_screen_frame_30k();
    group.bench_function("screen_frame_30k", |b| b.iter(|| encode(black_box(&frame))));

    group.finish();
}

criterion_group!(benches, bench_decode, bench_encode);
criterion_main!(benches);
