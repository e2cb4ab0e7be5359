//! Mouse and keyboard injection.
//!
//! Relative cursor movement is implemented on Windows via
//! `GetCursorPos`/`SetCursorPos`. Clicks, key presses, and text entry are
//! logged stubs pending per-platform event synthesis (clicks need
//! `SendInput` mouse events on Windows and XTest on Linux; text needs a
//! keyboard-layout-aware translation table).

use tracing::{debug, info};

use remote_core::{Fields, InputAction};

use crate::application::dispatch::InputControl;

/// The real input-injection collaborator.
pub struct PlatformInputControl;

impl InputControl for PlatformInputControl {
    fn handle(&self, action: InputAction, fields: &Fields) {
        match action {
            InputAction::MouseMove => {
                let dx = fields.int_field("deltaX") as i32;
                let dy = fields.int_field("deltaY") as i32;
                move_cursor_by(dx, dy);
                debug!("input: mouse moved by ({dx}, {dy})");
            }
            InputAction::MouseClick => {
                info!("input: mouse click {:?}", fields.str_field("button"));
            }
            InputAction::Key => {
                info!("input: key press {:?}", fields.str_field("key"));
            }
            InputAction::Text => {
                info!(
                    "input: text entry ({} chars)",
                    fields.str_field("text").chars().count()
                );
            }
        }
    }
}

/// Moves the cursor relative to its current position.
#[cfg(target_os = "windows")]
fn move_cursor_by(dx: i32, dy: i32) {
    use windows::Win32::Foundation::POINT;
    use windows::Win32::UI::WindowsAndMessaging::{GetCursorPos, SetCursorPos};

    let mut pos = POINT::default();
    unsafe {
        if GetCursorPos(&mut pos).is_ok() {
            let _ = SetCursorPos(pos.x + dx, pos.y + dy);
        }
    }
}

/// Cursor movement is Windows-only; other platforms only log.
#[cfg(not(target_os = "windows"))]
fn move_cursor_by(_dx: i32, _dy: i32) {}
