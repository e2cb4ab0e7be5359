//! Host configuration types.
//!
//! [`HostConfig`] is the single source of truth for all runtime settings.
//! It can be constructed from CLI arguments (production) or from defaults
//! (local development and tests). Keeping configuration as a plain struct —
//! no global state, no environment reads inside the domain — makes the
//! server easy to embed in tests; `main.rs` is responsible for populating
//! it from CLI args and environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// All runtime configuration for the host server.
///
/// Build this once at startup and wrap it in an `Arc` so it can be shared
/// cheaply across all session tasks.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// The address and port the server binds to.
    ///
    /// `0.0.0.0:8765` accepts connections from any interface on the LAN;
    /// set the IP to `127.0.0.1` to accept only local connections.
    pub bind_addr: SocketAddr,

    /// Destination directory for files received from clients. Incoming
    /// filenames are joined onto this directory as-is.
    pub save_dir: PathBuf,

    /// Time between screen captures while a session is streaming.
    /// 100 ms ⇒ 10 frames per second.
    pub frame_interval: Duration,
}

/// The directory received files land in when `--save-dir` is not given:
/// the user's home directory, falling back to the working directory when
/// the platform exposes neither `HOME` nor `USERPROFILE`.
pub fn default_save_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Default for HostConfig {
    /// Returns a `HostConfig` suitable for local development.
    ///
    /// | Field          | Default        |
    /// |----------------|----------------|
    /// | bind_addr      | `0.0.0.0:8765` |
    /// | save_dir       | home directory |
    /// | frame_interval | 100 ms (10 fps)|
    fn default() -> Self {
        Self {
            // Compile-time-known valid socket address string.
            bind_addr: "0.0.0.0:8765".parse().unwrap(),
            save_dir: default_save_dir(),
            frame_interval: Duration::from_millis(100),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
