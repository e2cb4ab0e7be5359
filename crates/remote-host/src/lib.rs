//! remote-host library crate.
//!
//! The host side of PC Remote: a small always-on server that lets a phone
//! or another computer on the LAN drive this machine — media keys,
//! mouse/keyboard input, file transfer, power commands, and live screen
//! mirroring — over a JSON-per-frame WebSocket protocol (see `remote-core`).
//!
//! # Architecture
//!
//! ```text
//! Client (JSON over WebSocket, port 8765)
//!         ↕
//! [remote-host]
//!   ├── domain/          HostConfig (pure settings struct)
//!   ├── application/     Dispatcher + collaborator traits, file transfer,
//!   │                    screen share producer, OutboundSink capability
//!   └── infrastructure/
//!         ├── ws_server/  Accept loop + session registry
//!         ├── session/    Per-connection task (decode → route → reply)
//!         ├── controls/   Platform media/input/system implementations
//!         └── display/    scrap-backed screen source
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O, no async, no frameworks.
//! - `application` depends on `domain` and `remote-core`; its collaborator
//!   traits are implemented by `infrastructure`.
//! - `infrastructure` owns every socket, file handle, and OS call.

/// Domain layer: runtime configuration.
pub mod domain;

/// Application layer: command routing, file transfer, screen share.
pub mod application;

/// Infrastructure layer: WebSocket server, sessions, platform controls.
pub mod infrastructure;
