//! Infrastructure layer for remote-host.
//!
//! Everything that touches a socket, a file descriptor, or an OS API lives
//! here:
//!
//! - Binding the TCP listener and accepting connections
//! - The WebSocket upgrade handshake and per-session tasks
//! - The live-session registry
//! - Platform implementations of the media/input/system collaborators
//! - The scrap-backed display source
//!
//! Protocol types belong to `remote-core`; routing logic and the capture
//! pipeline belong to the application layer.

pub mod controls;
pub mod display;
pub mod registry;
pub mod session;
pub mod ws_server;

// Re-export the primary entry points so `main.rs` can call them concisely.
pub use ws_server::{run_server, Controls, HostServer, ServerError};
