//! # remote-core
//!
//! Shared library for PC Remote containing the wire protocol message types
//! and the JSON codec. This crate is used by the host daemon and by any
//! future native client; it has zero dependencies on OS APIs, UI
//! frameworks, or network sockets.
//!
//! # Wire protocol overview
//!
//! PC Remote lets a phone or another computer control this machine over the
//! local network: media keys, mouse/keyboard input, file transfer, power
//! commands, and live screen mirroring. Every message is one JSON object
//! sent as a WebSocket text frame. Inbound commands carry a `"type"`
//! discriminant plus a per-type `"action"`:
//!
//! ```json
//! {"type":"media","action":"volume","value":40,"id":7}
//! ```
//!
//! Outbound traffic is a mix of correlated replies (`{"id":7,"status":
//! "success"}`) and uncorrelated frames (screen captures, file payloads).
//!
//! The decoder is deliberately forgiving: a message only fails to decode
//! when it is not a JSON object at all. Missing or wrong-typed fields
//! default to `""`/`0` so that a sloppy client degrades to no-ops rather
//! than dropped connections — see [`protocol::messages::Fields`].

pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `remote_core::Command` instead of `remote_core::protocol::messages::Command`.
pub use protocol::codec::{decode, encode, DecodeError};
pub use protocol::messages::{
    Command, CommandKind, Fields, FileAction, InputAction, MediaAction, ScreenAction,
    ServerMessage, Status, SystemAction, DEFAULT_PORT, PROTOCOL_VERSION,
};
