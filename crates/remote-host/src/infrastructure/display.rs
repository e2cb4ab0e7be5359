//! Display sources: the real primary display and a test double.

use std::time::Duration;

use tracing::debug;

use crate::application::screen_share::{DisplaySource, RawFrame};

/// How many times one grab polls for a frame before giving up. scrap
/// reports `WouldBlock` until the compositor publishes the next frame.
const GRAB_ATTEMPTS: usize = 5;
const GRAB_RETRY_DELAY: Duration = Duration::from_millis(5);

/// The machine's primary display, captured through `scrap`.
///
/// Holds no capture state: scrap's `Capturer` is not `Send` on X11, so it
/// cannot live across ticks inside the session task — a capturer is opened
/// per grab instead. Every failure mode (headless machine, missing capture
/// permission, transient platform error) collapses to `None`, which the
/// producer treats as a skipped tick.
pub struct PrimaryDisplay;

impl DisplaySource for PrimaryDisplay {
    fn grab(&self) -> Option<RawFrame> {
        let display = match scrap::Display::primary() {
            Ok(display) => display,
            Err(e) => {
                debug!("no primary display: {e}");
                return None;
            }
        };
        let (width, height) = (display.width(), display.height());
        if width == 0 || height == 0 {
            return None;
        }

        let mut capturer = match scrap::Capturer::new(display) {
            Ok(capturer) => capturer,
            Err(e) => {
                debug!("cannot open capturer: {e}");
                return None;
            }
        };

        for _ in 0..GRAB_ATTEMPTS {
            match capturer.frame() {
                Ok(frame) => {
                    // Row stride may include platform padding beyond width*4.
                    return Some(RawFrame {
                        width: width as u32,
                        height: height as u32,
                        stride: frame.len() / height,
                        bgra: frame.to_vec(),
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(GRAB_RETRY_DELAY);
                }
                Err(e) => {
                    debug!("frame capture failed: {e}");
                    return None;
                }
            }
        }
        None
    }
}

/// Test double serving one fixed frame (or none, for headless scenarios).
pub struct MockDisplay {
    frame: Option<RawFrame>,
}

impl MockDisplay {
    /// A display producing solid mid-gray frames of the given size.
    pub fn solid(width: u32, height: u32) -> Self {
        Self {
            frame: Some(RawFrame {
                width,
                height,
                stride: width as usize * 4,
                bgra: vec![0x80; (width * height * 4) as usize],
            }),
        }
    }

    /// A display with nothing attached: every grab fails.
    pub fn headless() -> Self {
        Self { frame: None }
    }
}

impl DisplaySource for MockDisplay {
    fn grab(&self) -> Option<RawFrame> {
        self.frame.clone()
    }
}
