//! Message types for the PC Remote wire protocol.
//!
//! # Inbound commands
//!
//! Every command from a client is one JSON object with a `"type"` field
//! selecting the command family and, for most families, an `"action"` field
//! selecting the operation. All remaining fields sit at the top level of
//! the same object — the envelope *is* the payload:
//!
//! ```json
//! {"type":"input","action":"mouse_move","deltaX":12,"deltaY":-3}
//! {"type":"file","action":"send","path":"/tmp/report.pdf","id":"a1"}
//! ```
//!
//! The `"id"` field is an opaque correlation token: when present it is
//! echoed verbatim in the reply, and when absent the reply carries no `id`
//! key at all.
//!
//! # Closed enums, open strings
//!
//! [`CommandKind`] and the per-kind action enums are closed: the dispatcher
//! matches on them exhaustively. The *parsing* side is open: an unknown
//! `"type"` string is answered with an error reply, and an unknown
//! `"action"` within a known type is a deliberate no-op that still reports
//! success. Clients running a newer protocol revision therefore degrade
//! gracefully against an older host.

use serde::Serialize;
use serde_json::{json, Map, Value};

/// Protocol version string carried in the `welcome` message.
pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Default TCP port the host listens on.
pub const DEFAULT_PORT: u16 = 8765;

// ── Command kinds ─────────────────────────────────────────────────────────────

/// The command families a client can send, i.e. the recognized values of
/// the wire-level `"type"` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Media-key emulation: play/pause, track skip, volume, mute.
    Media,
    /// Mouse and keyboard injection.
    Input,
    /// Whole-file transfer in either direction.
    File,
    /// Power-state changes: shutdown, restart, sleep, lock.
    System,
    /// Screen mirroring: start/stop the frame stream.
    Screen,
}

impl CommandKind {
    /// Parses a wire-level `"type"` value. Returns `None` for anything
    /// unrecognized (including the empty string a missing field defaults
    /// to); the caller answers those with an error reply.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "media" => Some(Self::Media),
            "input" => Some(Self::Input),
            "file" => Some(Self::File),
            "system" => Some(Self::System),
            "screen" => Some(Self::Screen),
            _ => None,
        }
    }

    /// The wire spelling of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Media => "media",
            Self::Input => "input",
            Self::File => "file",
            Self::System => "system",
            Self::Screen => "screen",
        }
    }
}

// ── Per-kind actions ──────────────────────────────────────────────────────────

/// Actions within `"type":"media"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaAction {
    PlayPause,
    Next,
    Previous,
    /// Set absolute volume; reads the `value` field (int).
    Volume,
    Mute,
}

impl MediaAction {
    /// Parses a media `"action"` value; `None` means permissive no-op.
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "play_pause" => Some(Self::PlayPause),
            "next" => Some(Self::Next),
            "previous" => Some(Self::Previous),
            "volume" => Some(Self::Volume),
            "mute" => Some(Self::Mute),
            _ => None,
        }
    }
}

/// Actions within `"type":"input"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Relative cursor movement; reads `deltaX`/`deltaY` (int).
    MouseMove,
    /// Button click; reads `button` (string).
    MouseClick,
    /// Single key press; reads `key` (string).
    Key,
    /// Literal text entry; reads `text` (string).
    Text,
}

impl InputAction {
    /// Parses an input `"action"` value; `None` means permissive no-op.
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "mouse_move" => Some(Self::MouseMove),
            "mouse_click" => Some(Self::MouseClick),
            "key" => Some(Self::Key),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Actions within `"type":"system"`. These carry no extra fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemAction {
    Shutdown,
    Restart,
    Sleep,
    Lock,
}

impl SystemAction {
    /// Parses a system `"action"` value; `None` means permissive no-op.
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "shutdown" => Some(Self::Shutdown),
            "restart" => Some(Self::Restart),
            "sleep" => Some(Self::Sleep),
            "lock" => Some(Self::Lock),
            _ => None,
        }
    }
}

/// Actions within `"type":"file"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// Host → client: read `path` and emit a `data` frame.
    Send,
    /// Client → host: decode `data` (base64) and write under `filename`.
    Receive,
}

impl FileAction {
    /// Parses a file `"action"` value; `None` means permissive no-op.
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "send" => Some(Self::Send),
            "receive" => Some(Self::Receive),
            _ => None,
        }
    }
}

/// Actions within `"type":"screen"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenAction {
    Start,
    Stop,
}

impl ScreenAction {
    /// Parses a screen `"action"` value; `None` means permissive no-op.
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "start" => Some(Self::Start),
            "stop" => Some(Self::Stop),
            _ => None,
        }
    }
}

// ── Forgiving field access ────────────────────────────────────────────────────

/// The fields of a decoded command object, with forgiving typed accessors.
///
/// Absent or wrong-typed fields default to `""`/`0` instead of erroring.
/// This matches what every deployed client already relies on: a request
/// missing its `deltaX` moves the mouse by zero, it does not kill the
/// connection. Field access is never fatal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Map<String, Value>);

impl Fields {
    /// Wraps a decoded JSON object.
    pub fn from_object(object: Map<String, Value>) -> Self {
        Self(object)
    }

    /// Raw access to one field, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// String field; `""` when absent or not a JSON string.
    pub fn str_field(&self, name: &str) -> String {
        self.0
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// Integer field; `0` when absent, not a number, or not integral.
    pub fn int_field(&self, name: &str) -> i64 {
        self.0.get(name).and_then(Value::as_i64).unwrap_or(0)
    }
}

// ── Inbound envelope ──────────────────────────────────────────────────────────

/// One decoded inbound command.
///
/// `kind` and `action` hold the raw wire strings (empty when the field was
/// missing); the dispatcher parses them into the closed enums above. `id`
/// is the correlation token to echo, `None` when the request carried none.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Raw `"type"` tag, preserved so error replies can name it in logs.
    pub kind: String,
    /// Raw `"action"` value.
    pub action: String,
    /// Correlation token echoed in the reply, verbatim.
    pub id: Option<Value>,
    /// The full command object, for per-action field extraction.
    pub fields: Fields,
}

// ── Outbound messages ─────────────────────────────────────────────────────────

/// Reply status discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl Status {
    /// The wire spelling of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Every message the host sends to a client.
///
/// Each variant serializes to one of the fixed wire shapes below. The
/// shapes are uneven on purpose — they are the exact objects existing
/// clients parse, so none of them may grow or lose a key:
///
/// | variant           | wire shape                                              |
/// |-------------------|---------------------------------------------------------|
/// | `Welcome`         | `{"type":"welcome","version":…}`                        |
/// | `Ack`             | `{"id"?,"status":…,"message"?}`                         |
/// | `FileData`        | `{"type":"file","action":"data","filename","size","data"}` |
/// | `FileResult`      | `{"type":"file","status":…,"message":…}`                |
/// | `ScreenStreaming` | `{"type":"screen","status":"streaming"}`                |
/// | `ScreenFrame`     | `{"type":"screen","action":"frame","data":…}`           |
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// Sent once, immediately after the handshake completes.
    Welcome { version: String },
    /// Per-command reply for the media/input/system families and for
    /// unknown command types. `id` is omitted from the wire when `None`.
    Ack {
        id: Option<Value>,
        status: Status,
        message: Option<String>,
    },
    /// A whole file travelling host → client, base64-encoded.
    FileData {
        filename: String,
        size: u64,
        data_base64: String,
    },
    /// Outcome of a file send failure or a file receive attempt.
    FileResult { status: Status, message: String },
    /// Acknowledges a `screen.start`, one per start call.
    ScreenStreaming,
    /// One encoded screen capture, uncorrelated with any request.
    ScreenFrame { data_base64: String },
}

impl ServerMessage {
    /// Builds the JSON object for this message.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Welcome { version } => json!({
                "type": "welcome",
                "version": version,
            }),
            Self::Ack { id, status, message } => {
                // Built by hand: `id` and `message` must be *absent*, not
                // null, when unset.
                let mut reply = Map::new();
                if let Some(id) = id {
                    reply.insert("id".to_string(), id.clone());
                }
                reply.insert("status".to_string(), json!(status));
                if let Some(message) = message {
                    reply.insert("message".to_string(), Value::String(message.clone()));
                }
                Value::Object(reply)
            }
            Self::FileData {
                filename,
                size,
                data_base64,
            } => json!({
                "type": "file",
                "action": "data",
                "filename": filename,
                "size": size,
                "data": data_base64,
            }),
            Self::FileResult { status, message } => json!({
                "type": "file",
                "status": status,
                "message": message,
            }),
            Self::ScreenStreaming => json!({
                "type": "screen",
                "status": "streaming",
            }),
            Self::ScreenFrame { data_base64 } => json!({
                "type": "screen",
                "action": "frame",
                "data": data_base64,
            }),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
