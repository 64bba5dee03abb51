// Library crate: exposes testable modules for integration tests and scripted editing.
// GUI-specific modules (app, ui, viewport painting) remain in the binary crate.

pub mod assets;
pub mod command;
pub mod error;
pub mod export;
pub mod factory;
pub mod fixtures;
pub mod geometry;
pub mod harness;
pub mod state;
