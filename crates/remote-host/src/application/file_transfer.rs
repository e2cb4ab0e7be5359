//! Whole-file transfer between host and client.
//!
//! Files travel fully materialized in memory, base64-encoded inside one
//! JSON message — there is no chunking and no resume, by design. Both
//! directions are synchronous from the session's point of view: a transfer
//! blocks that one session's message processing (never other sessions')
//! until the reply is enqueued.
//!
//! The file handler sends its own wire output through the [`OutboundSink`]
//! instead of returning a generic ack, because a successful send produces a
//! data frame rather than a status reply.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{info, warn};

use remote_core::{ServerMessage, Status};

use crate::application::outbound::OutboundSink;

/// The file-transfer service shared by all sessions. Stateless apart from
/// the destination directory for received files.
pub struct FileTransfer {
    save_dir: PathBuf,
}

impl FileTransfer {
    /// Creates the service. `save_dir` is the fixed trusted directory
    /// received files are written under.
    pub fn new(save_dir: PathBuf) -> Self {
        Self { save_dir }
    }

    /// Host → client: reads `path` and emits either a data frame or the
    /// open-failure reply.
    pub async fn send(&self, path: &str, sink: &OutboundSink) {
        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(e) => {
                warn!("file send: cannot open {path}: {e}");
                sink.send(ServerMessage::FileResult {
                    status: Status::Error,
                    message: "Failed to open file".to_string(),
                })
                .await;
                return;
            }
        };

        let filename = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let size = data.len() as u64;

        sink.send(ServerMessage::FileData {
            filename,
            size,
            data_base64: BASE64.encode(&data),
        })
        .await;
        info!("file sent: {path} ({size} bytes)");
    }

    /// Client → host: decodes the base64 payload and writes it under the
    /// save directory as `filename`, then reports the outcome.
    ///
    /// The filename is joined onto the save directory as supplied — the
    /// protocol trusts clients on the local network (see DESIGN.md).
    pub async fn receive(&self, filename: &str, data_base64: &str, sink: &OutboundSink) {
        let Ok(data) = BASE64.decode(data_base64) else {
            warn!("file receive: payload for {filename:?} is not valid base64");
            sink.send(ServerMessage::FileResult {
                status: Status::Error,
                message: "Failed to save file".to_string(),
            })
            .await;
            return;
        };

        let destination = self.save_dir.join(filename);
        match tokio::fs::write(&destination, &data).await {
            Ok(()) => {
                info!("file received: {}", destination.display());
                sink.send(ServerMessage::FileResult {
                    status: Status::Success,
                    message: "File received".to_string(),
                })
                .await;
            }
            Err(e) => {
                warn!("file receive: cannot write {}: {e}", destination.display());
                sink.send(ServerMessage::FileResult {
                    status: Status::Error,
                    message: "Failed to save file".to_string(),
                })
                .await;
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_transfer(dir: &tempfile::TempDir) -> FileTransfer {
        FileTransfer::new(dir.path().to_path_buf())
    }

    // ── send ──────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_send_emits_data_frame_with_exact_content() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello there").unwrap();
        let transfer = make_transfer(&dir);
        let (sink, mut rx) = OutboundSink::channel(8);

        // Act
        transfer.send(path.to_str().unwrap(), &sink).await;

        // Assert
        let Some(ServerMessage::FileData {
            filename,
            size,
            data_base64,
        }) = rx.try_recv().ok()
        else {
            panic!("expected a file data frame");
        };
        assert_eq!(filename, "notes.txt");
        assert_eq!(size, 11);
        assert_eq!(BASE64.decode(data_base64).unwrap(), b"hello there");
    }

    #[tokio::test]
    async fn test_send_missing_file_reports_open_failure() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let transfer = make_transfer(&dir);
        let (sink, mut rx) = OutboundSink::channel(8);

        // Act
        transfer.send("/definitely/not/a/real/file", &sink).await;

        // Assert — error reply, connection-level nothing happens
        assert_eq!(
            rx.try_recv(),
            Ok(ServerMessage::FileResult {
                status: Status::Error,
                message: "Failed to open file".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_send_empty_file_reports_zero_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        std::fs::write(&path, b"").unwrap();
        let transfer = make_transfer(&dir);
        let (sink, mut rx) = OutboundSink::channel(8);

        transfer.send(path.to_str().unwrap(), &sink).await;

        let Some(ServerMessage::FileData { size, data_base64, .. }) = rx.try_recv().ok() else {
            panic!("expected a file data frame");
        };
        assert_eq!(size, 0);
        assert_eq!(data_base64, "");
    }

    // ── receive ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_receive_writes_decoded_bytes_under_save_dir() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let transfer = make_transfer(&dir);
        let (sink, mut rx) = OutboundSink::channel(8);

        // Act
        transfer
            .receive("incoming.bin", &BASE64.encode(b"payload bytes"), &sink)
            .await;

        // Assert
        assert_eq!(
            rx.try_recv(),
            Ok(ServerMessage::FileResult {
                status: Status::Success,
                message: "File received".to_string(),
            })
        );
        let written = std::fs::read(dir.path().join("incoming.bin")).unwrap();
        assert_eq!(written, b"payload bytes");
    }

    #[tokio::test]
    async fn test_receive_invalid_base64_reports_save_failure() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let transfer = make_transfer(&dir);
        let (sink, mut rx) = OutboundSink::channel(8);

        // Act
        transfer.receive("garbled.bin", "!!! not base64 !!!", &sink).await;

        // Assert — error reply, nothing written
        assert_eq!(
            rx.try_recv(),
            Ok(ServerMessage::FileResult {
                status: Status::Error,
                message: "Failed to save file".to_string(),
            })
        );
        assert!(!dir.path().join("garbled.bin").exists());
    }

    #[tokio::test]
    async fn test_receive_unwritable_destination_reports_save_failure() {
        // Arrange — an empty filename resolves to the save directory itself,
        // which cannot be written as a file.
        let dir = tempfile::tempdir().unwrap();
        let transfer = make_transfer(&dir);
        let (sink, mut rx) = OutboundSink::channel(8);

        // Act
        transfer.receive("", &BASE64.encode(b"x"), &sink).await;

        // Assert
        assert_eq!(
            rx.try_recv(),
            Ok(ServerMessage::FileResult {
                status: Status::Error,
                message: "Failed to save file".to_string(),
            })
        );
    }

    /// Round-trip: bytes sent out and received back land identical.
    #[tokio::test]
    async fn test_send_then_receive_round_trips_content() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let content: Vec<u8> = (0u16..512).map(|i| (i % 251) as u8).collect();
        let path = dir.path().join("roundtrip.dat");
        std::fs::write(&path, &content).unwrap();
        let transfer = make_transfer(&dir);
        let (sink, mut rx) = OutboundSink::channel(8);

        // Act — send, then feed the emitted payload back into receive
        transfer.send(path.to_str().unwrap(), &sink).await;
        let Some(ServerMessage::FileData { size, data_base64, .. }) = rx.try_recv().ok() else {
            panic!("expected a file data frame");
        };
        transfer.receive("returned.dat", &data_base64, &sink).await;

        // Assert
        assert_eq!(size as usize, content.len());
        let written = std::fs::read(dir.path().join("returned.dat")).unwrap();
        assert_eq!(written, content);
    }
}
