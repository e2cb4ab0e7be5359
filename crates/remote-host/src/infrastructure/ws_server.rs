//! WebSocket server: accept loop, session registry, graceful shutdown.
//!
//! [`HostServer::bind`] claims the TCP port (a bind failure is reported
//! once, at startup); [`HostServer::run`] then accepts connections until
//! the shared `running` flag is cleared. Each accepted connection gets a
//! dedicated session task, so one slow client never blocks others.
//!
//! The accept call uses a short timeout so the loop observes the shutdown
//! flag even when nobody is connecting. On shutdown, the server flips a
//! `watch` signal every session listens on, then joins every live session —
//! all capture producers are disarmed by their sessions' own teardown
//! before `run` returns.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio::time::timeout;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::application::dispatch::{Dispatcher, InputControl, MediaControl, SystemControl};
use crate::application::file_transfer::FileTransfer;
use crate::application::screen_share::DisplaySource;
use crate::domain::HostConfig;
use crate::infrastructure::controls::{
    input::PlatformInputControl, media::PlatformMediaControl, system::PlatformSystemControl,
};
use crate::infrastructure::display::PrimaryDisplay;
use crate::infrastructure::registry::{SessionHandle, SessionRegistry};
use crate::infrastructure::session::{run_session, SessionEvent};

/// Errors reported at server startup.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("bind failed on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// How long one `accept` attempt may block before the loop re-checks the
/// shutdown flag.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// The collaborator set wired into every session: the three stateless
/// platform controls plus the display source for screen sharing.
///
/// Tests substitute recording mocks here; production uses
/// [`Controls::platform`].
pub struct Controls {
    pub media: Arc<dyn MediaControl>,
    pub input: Arc<dyn InputControl>,
    pub system: Arc<dyn SystemControl>,
    pub display: Arc<dyn DisplaySource>,
}

impl Controls {
    /// The real platform implementations.
    pub fn platform() -> Self {
        Self {
            media: Arc::new(PlatformMediaControl),
            input: Arc::new(PlatformInputControl),
            system: Arc::new(PlatformSystemControl),
            display: Arc::new(PrimaryDisplay),
        }
    }
}

/// A bound, not-yet-running host server.
pub struct HostServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    config: Arc<HostConfig>,
    dispatcher: Arc<Dispatcher>,
    display: Arc<dyn DisplaySource>,
    registry: SessionRegistry,
    shutdown_tx: watch::Sender<bool>,
    events_tx: mpsc::Sender<SessionEvent>,
    events_rx: mpsc::Receiver<SessionEvent>,
}

impl HostServer {
    /// Binds the listener and wires up the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::BindFailed`] when the port is taken or the
    /// process may not bind the address.
    pub async fn bind(config: HostConfig, controls: Controls) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(config.bind_addr)
            .await
            .map_err(|source| ServerError::BindFailed {
                addr: config.bind_addr,
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::BindFailed {
                addr: config.bind_addr,
                source,
            })?;

        let dispatcher = Arc::new(Dispatcher::new(
            controls.media,
            controls.input,
            controls.system,
            FileTransfer::new(config.save_dir.clone()),
        ));

        let (shutdown_tx, _) = watch::channel(false);
        let (events_tx, events_rx) = mpsc::channel(64);

        Ok(Self {
            listener,
            local_addr,
            config: Arc::new(config),
            dispatcher,
            display: controls.display,
            registry: SessionRegistry::new(),
            shutdown_tx,
            events_tx,
            events_rx,
        })
    }

    /// The address actually bound — differs from the configured one when
    /// port 0 was requested (tests bind ephemeral ports this way).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accepts connections until `running` is cleared, then closes every
    /// live session before returning.
    pub async fn run(mut self, running: Arc<AtomicBool>) -> anyhow::Result<()> {
        info!("PC Remote host listening on {}", self.local_addr);

        loop {
            if !running.load(Ordering::Relaxed) {
                info!("shutdown flag set; stopping accept loop");
                break;
            }

            tokio::select! {
                // Accept with a timeout so the running flag is re-checked
                // even while the network is quiet.
                accepted = timeout(ACCEPT_POLL_INTERVAL, self.listener.accept()) => match accepted {
                    Ok(Ok((stream, peer))) => {
                        let id = Uuid::new_v4();
                        info!("new client connection from {peer}");
                        let task = tokio::spawn(run_session(
                            id,
                            stream,
                            peer,
                            Arc::clone(&self.config),
                            Arc::clone(&self.dispatcher),
                            Arc::clone(&self.display),
                            self.shutdown_tx.subscribe(),
                            self.events_tx.clone(),
                        ));
                        self.registry.insert(id, SessionHandle { peer, task });
                    }
                    Ok(Err(e)) => {
                        // Transient accept error (e.g. fd exhaustion); the
                        // server keeps serving existing sessions.
                        error!("accept error: {e}");
                    }
                    Err(_) => {} // timeout — loop back to the flag check
                },

                // Registry removals happen only here, on the owning loop.
                Some(event) = self.events_rx.recv() => match event {
                    SessionEvent::Closed { id } => {
                        if let Some(handle) = self.registry.remove(id) {
                            debug!(
                                "session {id} ({}) removed; {} live",
                                handle.peer,
                                self.registry.len()
                            );
                        }
                    }
                }
            }
        }

        // Tell every session to close, release their closed-events so none
        // of them blocks reporting, then join them all. Each session disarms
        // its own capture producer on the way out.
        let _ = self.shutdown_tx.send(true);
        drop(self.events_rx);
        for handle in self.registry.drain() {
            if let Err(e) = handle.task.await {
                debug!("session task join error: {e}");
            }
        }

        info!("server stopped");
        Ok(())
    }
}

/// Binds and runs in one call — the binary's entry point into the server.
///
/// # Errors
///
/// Returns an error when the listener cannot be bound.
pub async fn run_server(
    config: HostConfig,
    controls: Controls,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    HostServer::bind(config, controls).await?.run(running).await
}
