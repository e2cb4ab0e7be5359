//! Command dispatch: routes one decoded command to its handler.
//!
//! The routing key is the parsed [`CommandKind`]; within the media, input,
//! and system families a second parsed action enum selects the operation.
//! Matching is exhaustive over the closed kind enum, with two deliberate
//! escape hatches at the string boundary:
//!
//! - an unknown `"type"` is answered with the canonical error reply, id
//!   preserved;
//! - an unknown `"action"` within a known type is a silent no-op that still
//!   reports success. This permissive dispatch is intentional protocol
//!   behavior, not a defect — newer clients stay connected to older hosts.
//!
//! The media/input/system collaborators are fire-and-forget: they return
//! nothing, and the session reports success regardless of what the platform
//! call actually did. The file and screen families bypass the generic reply
//! path entirely ([`Outcome::Delegated`]) and write their own wire output
//! through the [`OutboundSink`].

use std::sync::Arc;

use tracing::debug;

use remote_core::{
    Command, CommandKind, Fields, FileAction, InputAction, MediaAction, ScreenAction, Status,
    SystemAction,
};

use crate::application::file_transfer::FileTransfer;
use crate::application::outbound::OutboundSink;
use crate::application::screen_share::ScreenSession;

// ── Collaborator traits ───────────────────────────────────────────────────────

/// Media-key emulation. One platform call per action; no result reported.
pub trait MediaControl: Send + Sync {
    fn handle(&self, action: MediaAction, fields: &Fields);
}

/// Mouse and keyboard injection. One platform call per action.
pub trait InputControl: Send + Sync {
    fn handle(&self, action: InputAction, fields: &Fields);
}

/// Power-state changes. Actions carry no extra fields.
pub trait SystemControl: Send + Sync {
    fn handle(&self, action: SystemAction);
}

// ── Routing outcome ───────────────────────────────────────────────────────────

/// What the session should do after routing one command.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// Send a generic reply tagged with the command's id.
    Reply {
        status: Status,
        message: Option<String>,
    },
    /// The handler already produced its own wire output (or deliberately
    /// none); the session sends nothing further for this command.
    Delegated,
}

impl Outcome {
    fn success() -> Self {
        Self::Reply {
            status: Status::Success,
            message: None,
        }
    }

    fn unknown_command() -> Self {
        Self::Reply {
            status: Status::Error,
            message: Some("Unknown command type".to_string()),
        }
    }
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

/// Routes decoded commands to the shared handler set.
///
/// One dispatcher serves every session: the three control collaborators are
/// stateless process-wide singletons, and the file service only carries its
/// destination directory. The per-session screen state is passed in by the
/// owning session on each call.
pub struct Dispatcher {
    media: Arc<dyn MediaControl>,
    input: Arc<dyn InputControl>,
    system: Arc<dyn SystemControl>,
    files: FileTransfer,
}

impl Dispatcher {
    pub fn new(
        media: Arc<dyn MediaControl>,
        input: Arc<dyn InputControl>,
        system: Arc<dyn SystemControl>,
        files: FileTransfer,
    ) -> Self {
        Self {
            media,
            input,
            system,
            files,
        }
    }

    /// Routes one command.
    ///
    /// `sink` is the calling session's outbound capability and `screen` its
    /// screen sub-state; both stay under the session's ownership.
    pub async fn route(
        &self,
        command: &Command,
        sink: &OutboundSink,
        screen: &mut ScreenSession,
    ) -> Outcome {
        let Some(kind) = CommandKind::parse(&command.kind) else {
            debug!("unknown command type {:?}", command.kind);
            return Outcome::unknown_command();
        };

        match kind {
            CommandKind::Media => {
                if let Some(action) = MediaAction::parse(&command.action) {
                    self.media.handle(action, &command.fields);
                }
                Outcome::success()
            }
            CommandKind::Input => {
                if let Some(action) = InputAction::parse(&command.action) {
                    self.input.handle(action, &command.fields);
                }
                Outcome::success()
            }
            CommandKind::System => {
                if let Some(action) = SystemAction::parse(&command.action) {
                    self.system.handle(action);
                }
                Outcome::success()
            }
            CommandKind::File => {
                match FileAction::parse(&command.action) {
                    Some(FileAction::Send) => {
                        self.files
                            .send(&command.fields.str_field("path"), sink)
                            .await;
                    }
                    Some(FileAction::Receive) => {
                        self.files
                            .receive(
                                &command.fields.str_field("filename"),
                                &command.fields.str_field("data"),
                                sink,
                            )
                            .await;
                    }
                    None => {}
                }
                Outcome::Delegated
            }
            CommandKind::Screen => {
                match ScreenAction::parse(&command.action) {
                    Some(ScreenAction::Start) => screen.start(sink).await,
                    Some(ScreenAction::Stop) => screen.stop(),
                    None => {}
                }
                Outcome::Delegated
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
