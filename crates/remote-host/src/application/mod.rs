//! Application layer for remote-host.
//!
//! Holds the command dispatcher and the per-command services (file
//! transfer, screen share), plus the collaborator traits the dispatcher
//! calls into. Platform implementations of those traits live in the
//! infrastructure layer; everything here is testable with in-memory mocks
//! and an inspectable outbound channel.

pub mod dispatch;
pub mod file_transfer;
pub mod outbound;
pub mod screen_share;

pub use dispatch::{Dispatcher, InputControl, MediaControl, Outcome, SystemControl};
pub use file_transfer::FileTransfer;
pub use outbound::OutboundSink;
pub use screen_share::{DisplaySource, RawFrame, ScreenSession};
