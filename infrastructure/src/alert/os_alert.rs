//! [`DesktopAlert`] backed by the platform notifier.
//!
//! `osascript` on macOS, `notify-send` elsewhere. The command is spawned on a
//! detached thread that only reaps it, so `alert` never blocks.

use conductor_application::ports::alert::DesktopAlert;
use std::process::{Command, Stdio};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notifier {
    AppleScript,
    NotifySend,
}

#[derive(Debug, Clone)]
pub struct OsDesktopAlert {
    notifier: Notifier,
}

impl OsDesktopAlert {
    pub fn new() -> Self {
        let notifier = if cfg!(target_os = "macos") {
            Notifier::AppleScript
        } else {
            Notifier::NotifySend
        };
        Self { notifier }
    }

    fn command(&self, title: &str, body: &str) -> Command {
        match self.notifier {
            Notifier::AppleScript => {
                let script = format!(
                    r#"display notification "{}" with title "{}""#,
                    escape_applescript(body),
                    escape_applescript(title)
                );
                let mut cmd = Command::new("osascript");
                cmd.arg("-e").arg(script);
                cmd
            }
            Notifier::NotifySend => {
                let mut cmd = Command::new("notify-send");
                cmd.arg("--app-name=conductor").arg(title).arg(body);
                cmd
            }
        }
    }
}

impl Default for OsDesktopAlert {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopAlert for OsDesktopAlert {
    fn alert(&self, title: &str, body: &str) {
        let mut cmd = self.command(title, body);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        std::thread::spawn(move || match cmd.status() {
            Ok(status) if !status.success() => debug!(?status, "Desktop notifier exited with error"),
            Ok(_) => {}
            Err(e) => debug!("Desktop notifier unavailable: {}", e),
        });
    }
}

fn escape_applescript(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}
