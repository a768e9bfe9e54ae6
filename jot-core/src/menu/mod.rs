//! Menu synthesis and state synchronization.
//!
//! The assembler composes a platform-correct descriptor template from
//! the static skeleton and the dynamic section builders; the reconciler
//! pushes live enabled/checked flags onto the installed native menu
//! without rebuilding it. [`sync::MenuSync`] orchestrates both and owns
//! the single installed handle.

pub mod assembler;
pub mod descriptor;
pub mod factory;
pub mod reconcile;
pub mod sections;
pub mod sync;
pub mod watchers;

pub use assembler::TemplateAssembler;
pub use descriptor::{Gated, ItemKind, MenuAction, MenuItemDescriptor, RootId, RootMenu};
pub use factory::ItemFactory;
pub use reconcile::StateReconciler;
pub use sync::MenuSync;

use thiserror::Error;

/// Errors raised by menu assembly.
///
/// Only programming errors surface here; configuration errors from
/// extensions are logged and dropped so assembly can continue, and
/// reconciliation races are silent no-ops.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    /// A static command id has no registered metadata. This indicates a
    /// build-time inconsistency, not a runtime condition.
    #[error("no command metadata registered for menu item `{0}`")]
    UnknownCommand(String),
}
