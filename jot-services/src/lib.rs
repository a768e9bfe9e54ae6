#![warn(missing_docs)]

//! Concrete in-process collaborators for the Jot menu engine.
//!
//! `jot-core` talks to the application through trait seams; this crate
//! provides the production implementations: the command registry, the
//! keymap service, the settings registry, the import/export format
//! service, the plugin store and the dialog primitives used by the
//! import flow.

pub mod commands;
pub mod dialogs;
pub mod interop;
pub mod keymap;
pub mod plugins;
pub mod settings;
pub mod shell;
