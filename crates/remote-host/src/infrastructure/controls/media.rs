//! Media-key emulation.
//!
//! Play/pause, track skip, and mute are delivered as synthesized media-key
//! taps on Windows. Other platforms log the action only; absolute volume is
//! a logged stub everywhere (there is no portable media-key for "set volume
//! to N" — it needs a per-platform mixer API).

use tracing::info;

use remote_core::{Fields, MediaAction};

use crate::application::dispatch::MediaControl;

/// The real media-key collaborator.
pub struct PlatformMediaControl;

impl MediaControl for PlatformMediaControl {
    fn handle(&self, action: MediaAction, fields: &Fields) {
        match action {
            MediaAction::PlayPause => {
                tap_media_key(MediaKey::PlayPause);
                info!("media: play/pause");
            }
            MediaAction::Next => {
                tap_media_key(MediaKey::NextTrack);
                info!("media: next track");
            }
            MediaAction::Previous => {
                tap_media_key(MediaKey::PreviousTrack);
                info!("media: previous track");
            }
            MediaAction::Volume => {
                info!("media: set volume to {}", fields.int_field("value"));
            }
            MediaAction::Mute => {
                tap_media_key(MediaKey::Mute);
                info!("media: mute toggle");
            }
        }
    }
}

/// The media keys the host can synthesize.
#[derive(Debug, Clone, Copy)]
enum MediaKey {
    PlayPause,
    NextTrack,
    PreviousTrack,
    Mute,
}

/// Taps (press + release) one media key.
#[cfg(target_os = "windows")]
fn tap_media_key(key: MediaKey) {
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP,
        VIRTUAL_KEY, VK_MEDIA_NEXT_TRACK, VK_MEDIA_PLAY_PAUSE, VK_MEDIA_PREV_TRACK, VK_VOLUME_MUTE,
    };

    let vk: VIRTUAL_KEY = match key {
        MediaKey::PlayPause => VK_MEDIA_PLAY_PAUSE,
        MediaKey::NextTrack => VK_MEDIA_NEXT_TRACK,
        MediaKey::PreviousTrack => VK_MEDIA_PREV_TRACK,
        MediaKey::Mute => VK_VOLUME_MUTE,
    };

    let keybd = |flags: KEYBD_EVENT_FLAGS| INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: vk,
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };
    let taps = [keybd(KEYBD_EVENT_FLAGS(0)), keybd(KEYEVENTF_KEYUP)];

    unsafe {
        SendInput(&taps, std::mem::size_of::<INPUT>() as i32);
    }
}

/// Media-key synthesis is Windows-only; other platforms only log.
#[cfg(not(target_os = "windows"))]
fn tap_media_key(_key: MediaKey) {}
