//! Dialog primitives used by the import flow.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Host-provided modal dialog surface.
///
/// The pickers resolve to `None` when the user cancels. `set_busy` is
/// synchronous so the [`BusyGuard`] can clear it from `Drop`.
#[async_trait]
pub trait DialogService: Send + Sync {
    /// Open a file picker filtered to the given extensions.
    async fn open_file(&self, extensions: &[String]) -> Option<PathBuf>;

    /// Open a directory picker.
    async fn open_directory(&self) -> Option<PathBuf>;

    /// Show a blocking error dialog.
    async fn show_error(&self, message: &str);

    /// Engage or clear the modal busy indicator.
    fn set_busy(&self, busy: bool);
}

/// Holds the busy indicator engaged for a scope.
///
/// Dropping the guard clears the indicator on success, failure and
/// cancellation alike.
pub struct BusyGuard {
    dialogs: Arc<dyn DialogService>,
}

impl BusyGuard {
    /// Engage the busy indicator until the guard is dropped.
    pub fn engage(dialogs: Arc<dyn DialogService>) -> Self {
        dialogs.set_busy(true);
        Self { dialogs }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.dialogs.set_busy(false);
    }
}
