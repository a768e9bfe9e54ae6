//! External URL opening.

use jot_core::platform::Platform;
use jot_core::services::UrlOpener;
use std::process::Command;

/// Opens URLs with the platform's default handler.
pub struct SystemShell {
    platform: Platform,
}

impl SystemShell {
    /// Shell for the current platform.
    pub fn new() -> Self {
        Self::for_platform(Platform::current())
    }

    /// Shell for an explicit platform.
    pub fn for_platform(platform: Platform) -> Self {
        Self { platform }
    }
}

impl Default for SystemShell {
    fn default() -> Self {
        Self::new()
    }
}

fn opener_command(platform: Platform, url: &str) -> Command {
    match platform {
        Platform::MacOs => {
            let mut command = Command::new("open");
            command.arg(url);
            command
        }
        Platform::Windows => {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", "", url]);
            command
        }
        Platform::Linux => {
            let mut command = Command::new("xdg-open");
            command.arg(url);
            command
        }
    }
}

impl UrlOpener for SystemShell {
    fn open(&self, url: &str) {
        let platform = self.platform;
        let url = url.to_string();
        // The opener runs off-thread and is waited on so it never
        // lingers as a zombie.
        smol::spawn(async move {
            let mut command = opener_command(platform, &url);
            match smol::unblock(move || command.status()).await {
                Ok(status) if !status.success() => {
                    log::warn!("Opener for {} exited with {}", url, status);
                }
                Ok(_) => {}
                Err(e) => {
                    log::error!("Failed to open {}: {}", url, e);
                }
            }
        })
        .detach();
    }
}
