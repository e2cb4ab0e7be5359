//! Power-state changes.
//!
//! Each action launches the platform's own power utility as a detached
//! process — the same commands an administrator would type. The child is
//! not waited on: for shutdown/restart this process is about to die anyway,
//! and lock/sleep return immediately.

use tracing::{error, info};

use remote_core::SystemAction;

use crate::application::dispatch::SystemControl;

/// The real power-action collaborator.
pub struct PlatformSystemControl;

impl SystemControl for PlatformSystemControl {
    fn handle(&self, action: SystemAction) {
        let (program, args) = power_command(action);
        info!("system: {action:?} via {program}");
        if let Err(e) = std::process::Command::new(program).args(args).spawn() {
            error!("system: failed to launch {program}: {e}");
        }
    }
}

/// The platform command behind each power action.
#[cfg(target_os = "windows")]
fn power_command(action: SystemAction) -> (&'static str, &'static [&'static str]) {
    match action {
        SystemAction::Shutdown => ("shutdown", &["/s", "/t", "0"]),
        SystemAction::Restart => ("shutdown", &["/r", "/t", "0"]),
        SystemAction::Sleep => ("rundll32.exe", &["powrprof.dll,SetSuspendState", "0,1,0"]),
        SystemAction::Lock => ("rundll32.exe", &["user32.dll,LockWorkStation"]),
    }
}

#[cfg(target_os = "macos")]
fn power_command(action: SystemAction) -> (&'static str, &'static [&'static str]) {
    match action {
        SystemAction::Shutdown => ("shutdown", &["-h", "now"]),
        SystemAction::Restart => ("shutdown", &["-r", "now"]),
        SystemAction::Sleep => ("pmset", &["sleepnow"]),
        SystemAction::Lock => (
            "/System/Library/CoreServices/Menu Extras/User.menu/Contents/Resources/CGSession",
            &["-suspend"],
        ),
    }
}

/// Linux and other systemd/logind platforms.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn power_command(action: SystemAction) -> (&'static str, &'static [&'static str]) {
    match action {
        SystemAction::Shutdown => ("shutdown", &["-h", "now"]),
        SystemAction::Restart => ("shutdown", &["-r", "now"]),
        SystemAction::Sleep => ("systemctl", &["suspend"]),
        SystemAction::Lock => ("loginctl", &["lock-session"]),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // The command tables only; actually spawning a power action from a test
    // would shut the test machine down.

    #[test]
    fn test_every_action_maps_to_a_command() {
        for action in [
            SystemAction::Shutdown,
            SystemAction::Restart,
            SystemAction::Sleep,
            SystemAction::Lock,
        ] {
            let (program, _args) = power_command(action);
            assert!(!program.is_empty(), "{action:?} must name a program");
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_shutdown_command_halts_now() {
        assert_eq!(
            power_command(SystemAction::Shutdown),
            ("shutdown", &["-h", "now"][..])
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_sleep_uses_systemd_suspend() {
        assert_eq!(
            power_command(SystemAction::Sleep),
            ("systemctl", &["suspend"][..])
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_lock_uses_logind() {
        assert_eq!(
            power_command(SystemAction::Lock),
            ("loginctl", &["lock-session"][..])
        );
    }
}
