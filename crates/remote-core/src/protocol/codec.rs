//! JSON codec for encoding and decoding PC Remote wire messages.
//!
//! The transport delivers one JSON object per WebSocket text frame, so the
//! codec works on complete strings — there is no incremental framing here.
//!
//! Decoding is a two-step affair: parse the text into a JSON value, then
//! lift the object into a [`Command`] envelope with forgiving field
//! extraction. Only the first step can fail. A decode failure is terminal
//! for that single message — the caller logs it and keeps the connection
//! open for the next frame.

use serde_json::Value;
use thiserror::Error;

use crate::protocol::messages::{Command, Fields, ServerMessage};

/// Errors that can occur while decoding an inbound message.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// The raw text is not a well-formed JSON object.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Decodes one inbound text frame into a [`Command`].
///
/// The only hard requirement is that the frame is a JSON object. The
/// `type`, `action`, and `id` fields are extracted with the same forgiving
/// rules as every other field: a missing `type` yields an empty kind tag,
/// which the dispatcher answers with its unknown-command error reply.
///
/// # Errors
///
/// Returns [`DecodeError::MalformedPayload`] when the text is not valid
/// JSON or is valid JSON but not an object (array, string, number, …).
pub fn decode(raw: &str) -> Result<Command, DecodeError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| DecodeError::MalformedPayload(e.to_string()))?;

    let Value::Object(object) = value else {
        return Err(DecodeError::MalformedPayload(
            "expected a JSON object".to_string(),
        ));
    };

    let fields = Fields::from_object(object);
    Ok(Command {
        kind: fields.str_field("type"),
        action: fields.str_field("action"),
        id: fields.get("id").cloned(),
        fields,
    })
}

/// Encodes one outbound message as a compact JSON text frame.
pub fn encode(message: &ServerMessage) -> String {
    message.to_value().to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
