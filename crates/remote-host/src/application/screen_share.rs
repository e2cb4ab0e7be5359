//! Screen sharing: the per-session capture producer.
//!
//! While a session is streaming, the host grabs the primary display on a
//! fixed cadence (10 fps), downscales it to at most 1280x720 preserving
//! aspect ratio, JPEG-compresses it at quality 75, and pushes the encoded
//! bytes onto the session's outbound queue as one frame message. Frames
//! carry no sequence number — ordering comes entirely from the transport.
//!
//! # Lifecycle
//!
//! [`ScreenSession`] is the screen sub-state of one session: `Idle` or
//! `Streaming`, held as an `Option` of the armed producer. The producer's
//! timer is polled by the owning session task itself (see
//! `infrastructure::session`), never by a separate task. That single-task
//! shape is what makes the lifecycle rules cheap to uphold:
//!
//! - at most one producer per session — `start` during `Streaming` tears
//!   the old producer down before arming a fresh one;
//! - `stop` is idempotent and synchronous — once it returns, no further
//!   tick can fire, so the session can be dropped immediately after;
//! - a failed grab or encode skips that tick silently and never disarms.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageBuffer, RgbImage};
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, info};

use remote_core::ServerMessage;

use crate::application::outbound::OutboundSink;

/// Largest frame edge sent to clients; captures are scaled down to fit.
pub const MAX_FRAME_WIDTH: u32 = 1280;
pub const MAX_FRAME_HEIGHT: u32 = 720;

/// Fixed JPEG quality factor for outgoing frames.
pub const JPEG_QUALITY: u8 = 75;

// ── Display collaborator ──────────────────────────────────────────────────────

/// One raw capture of the display, as BGRA rows of `stride` bytes each.
/// The stride may exceed `width * 4` when the platform pads rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub stride: usize,
    pub bgra: Vec<u8>,
}

/// The display the producer reads from.
///
/// `grab` returns `None` whenever a frame cannot be produced — no display
/// attached, capture permission missing, transient platform error. The
/// producer treats every `None` as a skipped tick.
pub trait DisplaySource: Send + Sync {
    fn grab(&self) -> Option<RawFrame>;
}

// ── Screen sub-state ──────────────────────────────────────────────────────────

/// An armed capture producer: just the cadence timer. The pixels flow
/// through [`ScreenSession::capture_and_send`] on each tick.
struct CaptureProducer {
    ticker: Interval,
}

/// The screen-share sub-state of one session: `Idle` when `producer` is
/// `None`, `Streaming` otherwise.
pub struct ScreenSession {
    display: Arc<dyn DisplaySource>,
    frame_interval: Duration,
    producer: Option<CaptureProducer>,
}

impl ScreenSession {
    /// Creates the sub-state in `Idle`.
    pub fn new(display: Arc<dyn DisplaySource>, frame_interval: Duration) -> Self {
        Self {
            display,
            frame_interval,
            producer: None,
        }
    }

    /// Arms the producer and acknowledges with the streaming message.
    ///
    /// Starting while already streaming restarts: the existing producer is
    /// disarmed first, so two producers are never armed concurrently.
    /// Every call sends exactly one ack.
    pub async fn start(&mut self, sink: &OutboundSink) {
        if self.producer.is_some() {
            self.stop();
        }

        let mut ticker = interval(self.frame_interval);
        // A slow grab must not cause a burst of catch-up frames afterwards.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.producer = Some(CaptureProducer { ticker });

        sink.send(ServerMessage::ScreenStreaming).await;
        info!("screen sharing started");
    }

    /// Disarms the producer. Idempotent: stopping while `Idle` is a no-op.
    pub fn stop(&mut self) {
        if self.producer.take().is_some() {
            info!("screen sharing stopped");
        }
    }

    /// Whether a producer is currently armed.
    pub fn is_streaming(&self) -> bool {
        self.producer.is_some()
    }

    /// Waits for the next capture instant. Pends forever while `Idle`, so
    /// it can sit in the session's `select!` unconditionally. Cancel-safe:
    /// the timer lives in `self`, not in the returned future.
    pub async fn next_tick(&mut self) {
        match self.producer.as_mut() {
            Some(producer) => {
                producer.ticker.tick().await;
            }
            None => std::future::pending().await,
        }
    }

    /// Grabs, encodes, and enqueues one frame.
    ///
    /// Any failure — no display, bad pixel buffer, encoder error — skips
    /// this tick and leaves the producer armed; the next tick retries.
    pub async fn capture_and_send(&self, sink: &OutboundSink) {
        let Some(raw) = self.display.grab() else {
            debug!("no display frame available; skipping tick");
            return;
        };

        match encode_frame(&raw) {
            Ok(jpeg) => {
                sink.send(ServerMessage::ScreenFrame {
                    data_base64: BASE64.encode(&jpeg),
                })
                .await;
            }
            Err(e) => debug!("frame encode failed; skipping tick: {e}"),
        }
    }
}

// ── Frame encoding ────────────────────────────────────────────────────────────

/// Scales (width, height) down to fit within the frame bounds, preserving
/// aspect ratio. Frames already within bounds pass through unchanged.
fn bounded_dimensions(width: u32, height: u32) -> (u32, u32) {
    if width <= MAX_FRAME_WIDTH && height <= MAX_FRAME_HEIGHT {
        return (width, height);
    }
    let scale = f64::min(
        MAX_FRAME_WIDTH as f64 / width as f64,
        MAX_FRAME_HEIGHT as f64 / height as f64,
    );
    let out_w = ((width as f64 * scale).round() as u32).max(1);
    let out_h = ((height as f64 * scale).round() as u32).max(1);
    (out_w, out_h)
}

/// Converts a BGRA capture to RGB at the target size using nearest-neighbor
/// sampling. Out-of-range source offsets produce black pixels rather than
/// a panic — padded strides vary by platform.
fn bgra_to_rgb_scaled(raw: &RawFrame, dst_w: u32, dst_h: u32) -> Vec<u8> {
    let src_w = raw.width as usize;
    let src_h = raw.height as usize;
    let mut rgb = Vec::with_capacity((dst_w * dst_h * 3) as usize);

    for y in 0..dst_h {
        let src_y = (y as usize * src_h) / dst_h as usize;
        for x in 0..dst_w {
            let src_x = (x as usize * src_w) / dst_w as usize;
            let offset = src_y * raw.stride + src_x * 4;
            if offset + 2 < raw.bgra.len() {
                rgb.push(raw.bgra[offset + 2]); // R
                rgb.push(raw.bgra[offset + 1]); // G
                rgb.push(raw.bgra[offset]); // B
            } else {
                rgb.extend_from_slice(&[0, 0, 0]);
            }
        }
    }

    rgb
}

/// Downscales and JPEG-encodes one raw frame.
fn encode_frame(raw: &RawFrame) -> anyhow::Result<Vec<u8>> {
    let (out_w, out_h) = bounded_dimensions(raw.width, raw.height);
    let rgb = bgra_to_rgb_scaled(raw, out_w, out_h);

    let mut buf = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    let img: RgbImage = ImageBuffer::from_raw(out_w, out_h, rgb)
        .ok_or_else(|| anyhow::anyhow!("pixel buffer does not match {out_w}x{out_h}"))?;
    img.write_with_encoder(encoder)?;

    Ok(buf.into_inner())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
