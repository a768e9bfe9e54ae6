//! Platform detection for platform-conditional menu items.

/// The desktop platform the menu is being assembled for.
///
/// Assembly is platform-parametric rather than `cfg`-gated so that the
/// full matrix stays testable from any host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// macOS, which gets the app-identity root menu.
    MacOs,
    /// Windows.
    Windows,
    /// Linux and other unixes.
    Linux,
}

impl Platform {
    /// Detect the platform of the running process.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    /// Whether this platform uses the macOS menu conventions.
    pub fn is_mac(self) -> bool {
        matches!(self, Platform::MacOs)
    }
}
