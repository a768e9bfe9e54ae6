#![warn(missing_docs)]

//! Core menu engine for Jot. See the `jot-menubar` crate for the
//! facade and the production services.
//!
//! Contains the menu descriptor model, the template assembler and the
//! state reconciler that keep the native application menu in sync with
//! live application state.

/// Contains platform detection for platform-conditional menu items.
pub mod platform;

/// Contains the application state snapshot consumed by the engine.
pub mod state;

/// Contains the service interfaces the menu engine consumes.
pub mod services;

/// Contains the host menu toolkit seam and the in-memory backend.
pub mod toolkit;

pub mod menu;

#[cfg(test)]
pub(crate) mod testutil;
