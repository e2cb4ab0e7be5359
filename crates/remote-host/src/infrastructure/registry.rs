//! The live-session registry.
//!
//! One entry per connected client, keyed by session id. The registry is a
//! plain map with no interior locking on purpose: it is owned by the server
//! loop and mutated only from there — inserts on accept, removals when a
//! session task reports it closed. Session tasks never touch the registry
//! directly; they report through an mpsc channel back to the owning loop
//! (single-writer discipline).

use std::collections::HashMap;
use std::net::SocketAddr;

use tokio::task::JoinHandle;
use uuid::Uuid;

/// Identifier of one live session.
pub type SessionId = Uuid;

/// Bookkeeping for one live session task.
#[derive(Debug)]
pub struct SessionHandle {
    /// The client's socket address, for logs.
    pub peer: SocketAddr,
    /// The spawned session task, joined during server shutdown.
    pub task: JoinHandle<()>,
}

/// The set of live sessions for one listening server.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, SessionHandle>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a newly accepted session.
    pub fn insert(&mut self, id: SessionId, handle: SessionHandle) {
        self.sessions.insert(id, handle);
    }

    /// Removes a session that reported closure. Returns its handle, or
    /// `None` if the id is unknown (already removed).
    pub fn remove(&mut self, id: SessionId) -> Option<SessionHandle> {
        self.sessions.remove(&id)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether any session is live.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Empties the registry, yielding every remaining handle. Used at
    /// server shutdown to join all session tasks.
    pub fn drain(&mut self) -> Vec<SessionHandle> {
        self.sessions.drain().map(|(_, handle)| handle).collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
