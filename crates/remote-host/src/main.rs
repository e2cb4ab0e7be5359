//! PC Remote host — entry point.
//!
//! Runs the always-on server that lets a phone or another computer on the
//! LAN control this machine: media keys, mouse/keyboard input, file
//! transfer, power commands, and live screen mirroring.
//!
//! # Usage
//!
//! ```text
//! remote-host [OPTIONS]
//!
//! Options:
//!   --port     <PORT>  Listening port [default: 8765]
//!   --bind     <IP>    Bind address [default: 0.0.0.0]
//!   --save-dir <DIR>   Directory received files land in [default: home]
//!   --fps      <N>     Screen-share frame rate [default: 10]
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable          | Default   | Description                      |
//! |-------------------|-----------|----------------------------------|
//! | `REMOTE_PORT`     | `8765`    | Listening port                   |
//! | `REMOTE_BIND`     | `0.0.0.0` | Bind address                     |
//! | `REMOTE_SAVE_DIR` | home      | Destination for received files   |
//! | `REMOTE_FPS`      | `10`      | Screen-share frame rate          |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use remote_host::domain::config::{default_save_dir, HostConfig};
use remote_host::infrastructure::{run_server, Controls};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// PC Remote host server.
///
/// Accepts WebSocket connections from PC Remote clients on the local
/// network and executes their media/input/file/system/screen commands.
#[derive(Debug, Parser)]
#[command(
    name = "remote-host",
    about = "PC Remote host — control this machine from a phone over the LAN",
    version
)]
struct Cli {
    /// TCP port to listen on.
    #[arg(long, default_value_t = 8765, env = "REMOTE_PORT")]
    port: u16,

    /// IP address to bind.
    ///
    /// `0.0.0.0` accepts connections from any interface (LAN + localhost);
    /// `127.0.0.1` accepts only local connections.
    #[arg(long, default_value = "0.0.0.0", env = "REMOTE_BIND")]
    bind: String,

    /// Directory received files are written into. Defaults to the user's
    /// home directory.
    #[arg(long, env = "REMOTE_SAVE_DIR")]
    save_dir: Option<PathBuf>,

    /// Screen-share frame rate in frames per second.
    #[arg(long, default_value_t = 10, env = "REMOTE_FPS")]
    fps: u32,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`HostConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--bind` is not a valid IP address.
    fn into_host_config(self) -> anyhow::Result<HostConfig> {
        let bind_addr: SocketAddr = format!("{}:{}", self.bind, self.port)
            .parse()
            .with_context(|| format!("invalid bind address: '{}:{}'", self.bind, self.port))?;

        Ok(HostConfig {
            bind_addr,
            save_dir: self.save_dir.unwrap_or_else(default_save_dir),
            frame_interval: Duration::from_millis(1000 / u64::from(self.fps.max(1))),
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging; level overridden by `RUST_LOG`, default `info`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_host_config()?;
    info!(
        "PC Remote host starting — addr={}, save_dir={}",
        config.bind_addr,
        config.save_dir.display()
    );

    // Graceful-shutdown flag, cleared by Ctrl+C. The accept loop polls it
    // every 200 ms and then closes every live session before returning.
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C — initiating graceful shutdown");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_server(config, Controls::platform(), running).await?;

    info!("PC Remote host stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
