//! The per-connection session task.
//!
//! One Tokio task per client runs the whole session lifecycle:
//!
//! 1. Complete the WebSocket upgrade handshake (`Connecting`).
//! 2. Send the `welcome` message and enter `Active`.
//! 3. Loop over a single `select!`: inbound frames are decoded and routed
//!    in arrival order; the outbound queue is drained to the socket in
//!    FIFO order; the capture producer's timer ticks here too, so frames
//!    are grabbed and sent on the same task as everything else.
//! 4. On any exit — client close frame, transport error, server shutdown —
//!    disarm the screen producer, then report closure to the server loop.
//!
//! Running the capture tick on the session task (rather than a timer task
//! of its own) is what makes teardown safe: once the loop exits, no code
//! path exists that could produce another frame, so the session state can
//! be dropped immediately. The original design armed the timer on a
//! separately-destroyed object and could fire into a freed connection.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::{accept_async, WebSocketStream};
use tracing::{debug, info, warn};

use remote_core::{decode, encode, ServerMessage, PROTOCOL_VERSION};

use crate::application::dispatch::{Dispatcher, Outcome};
use crate::application::outbound::OutboundSink;
use crate::application::screen_share::{DisplaySource, ScreenSession};
use crate::domain::HostConfig;
use crate::infrastructure::registry::SessionId;

/// Events emitted by session tasks back to the server loop, which owns the
/// registry.
#[derive(Debug)]
pub enum SessionEvent {
    /// The session ended (cleanly or not) and can be dropped from the
    /// registry.
    Closed { id: SessionId },
}

/// Outbound queue depth. Routing one command enqueues at most two messages
/// before the loop drains again, so this never applies backpressure in
/// practice; it only bounds memory if the socket stalls.
const OUTBOUND_QUEUE_DEPTH: usize = 32;

type Socket = WebSocketStream<TcpStream>;

/// Entry point for one session task. Reports closure on every path so the
/// registry never leaks an entry.
#[allow(clippy::too_many_arguments)]
pub async fn run_session(
    id: SessionId,
    stream: TcpStream,
    peer: SocketAddr,
    config: Arc<HostConfig>,
    dispatcher: Arc<Dispatcher>,
    display: Arc<dyn DisplaySource>,
    shutdown: watch::Receiver<bool>,
    events: mpsc::Sender<SessionEvent>,
) {
    match serve(stream, peer, config, dispatcher, display, shutdown).await {
        Ok(()) => info!("session {peer} closed"),
        Err(e) => warn!("session {peer} closed with error: {e:#}"),
    }
    let _ = events.send(SessionEvent::Closed { id }).await;
}

/// Runs the complete lifecycle of one session.
///
/// # Errors
///
/// Returns an error if the WebSocket handshake fails or the transport dies
/// mid-write. Either way the caller tears the session down; there is no
/// retry.
async fn serve(
    stream: TcpStream,
    peer: SocketAddr,
    config: Arc<HostConfig>,
    dispatcher: Arc<Dispatcher>,
    display: Arc<dyn DisplaySource>,
    shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let socket = accept_async(stream)
        .await
        .with_context(|| format!("WebSocket handshake failed with {peer}"))?;
    info!("session established: {peer}");

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (sink, mut outbound) = OutboundSink::channel(OUTBOUND_QUEUE_DEPTH);
    let mut screen = ScreenSession::new(display, config.frame_interval);

    // Active: the client learns the protocol version before anything else.
    sink.send(ServerMessage::Welcome {
        version: PROTOCOL_VERSION.to_string(),
    })
    .await;

    let result = drive(
        peer,
        &mut ws_rx,
        &mut ws_tx,
        &mut outbound,
        &dispatcher,
        &sink,
        &mut screen,
        shutdown,
    )
    .await;

    // Teardown order is the invariant: the producer is disarmed before the
    // session state is discarded, on success and error paths alike.
    screen.stop();
    let _ = ws_tx.send(WsMessage::Close(None)).await;

    result
}

/// The session's single event loop. Returns when the client disconnects,
/// the server shuts down, or the transport fails.
#[allow(clippy::too_many_arguments)]
async fn drive(
    peer: SocketAddr,
    ws_rx: &mut SplitStream<Socket>,
    ws_tx: &mut SplitSink<Socket, WsMessage>,
    outbound: &mut mpsc::Receiver<ServerMessage>,
    dispatcher: &Dispatcher,
    sink: &OutboundSink,
    screen: &mut ScreenSession,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            // ── Inbound: decode → route → reply, strictly in arrival order ──
            inbound = ws_rx.next() => match inbound {
                Some(Ok(WsMessage::Text(text))) => {
                    match decode(&text) {
                        Ok(command) => {
                            debug!(
                                "session {peer}: command type={:?} action={:?}",
                                command.kind, command.action
                            );
                            match dispatcher.route(&command, sink, screen).await {
                                Outcome::Reply { status, message } => {
                                    sink.send(ServerMessage::Ack {
                                        id: command.id.clone(),
                                        status,
                                        message,
                                    })
                                    .await;
                                }
                                Outcome::Delegated => {}
                            }
                        }
                        // One malformed frame is dropped; the session stays
                        // Active for the next one.
                        Err(e) => warn!("session {peer}: dropping message: {e}"),
                    }
                }
                Some(Ok(WsMessage::Binary(_))) => {
                    // The protocol is text-only.
                    warn!("session {peer}: unexpected binary frame (ignored)");
                }
                Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_))) => {
                    // tungstenite answers pings itself on the next write.
                }
                Some(Ok(WsMessage::Close(_))) => {
                    debug!("session {peer}: close frame received");
                    return Ok(());
                }
                Some(Ok(WsMessage::Frame(_))) => {}
                Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) => {
                    debug!("session {peer}: connection closed");
                    return Ok(());
                }
                Some(Err(e)) => {
                    return Err(e).context("transport read failed");
                }
                None => return Ok(()),
            },

            // ── Outbound: drain the queue to the socket in FIFO order ──
            Some(message) = outbound.recv() => {
                ws_tx
                    .send(WsMessage::Text(encode(&message)))
                    .await
                    .context("transport write failed")?;
            }

            // ── Capture tick: pends forever while the screen is idle ──
            _ = screen.next_tick() => {
                screen.capture_and_send(sink).await;
            }

            // ── Server shutdown ──
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("session {peer}: closing for server shutdown");
                    return Ok(());
                }
            }
        }
    }
}
