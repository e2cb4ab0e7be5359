//! The outbound sink: a send-only capability over a session's output queue.
//!
//! The original design handed the raw socket to every sub-handler, which
//! meant a file or screen handler could also close or reconfigure the
//! connection. Here handlers receive an [`OutboundSink`] instead: they can
//! enqueue wire messages for *their* session and nothing else. The session
//! task owns the other end of the queue and is the only code that ever
//! touches the socket.

use remote_core::ServerMessage;
use tokio::sync::mpsc;
use tracing::debug;

/// Send-only handle onto one session's outbound message queue.
///
/// Clones share the same queue. Messages are drained and written to the
/// socket by the owning session task in FIFO order, which is what gives
/// replies their in-order delivery guarantee.
#[derive(Clone)]
pub struct OutboundSink {
    tx: mpsc::Sender<ServerMessage>,
}

impl OutboundSink {
    /// Wraps an existing queue sender.
    pub fn new(tx: mpsc::Sender<ServerMessage>) -> Self {
        Self { tx }
    }

    /// Creates a fresh queue and its sink. The session task keeps the
    /// receiver; tests inspect it directly.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Enqueues one message for transmission.
    ///
    /// If the session is already tearing down (receiver dropped) the
    /// message has nowhere to go and is silently discarded — by then the
    /// client is gone anyway.
    pub async fn send(&self, message: ServerMessage) {
        if self.tx.send(message).await.is_err() {
            debug!("outbound queue closed; dropping message");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
