//! Platform implementations of the media/input/system collaborators.
//!
//! Each module compiles on every platform; the OS-specific calls inside are
//! selected with `#[cfg(target_os = ...)]`. Where a platform has no real
//! implementation, actions are logged and otherwise ignored — the protocol
//! reports success for these families regardless, so clients behave
//! identically everywhere.

pub mod input;
pub mod media;
pub mod mock;
pub mod system;

pub use input::PlatformInputControl;
pub use media::PlatformMediaControl;
pub use mock::RecordingControls;
pub use system::PlatformSystemControl;
