//! rotlab - interactive 3D rotation workbench
//!
//! The engine lives in `rotlab_core`; this crate adds the pieces around it:
//! layered configuration, the command driver that feeds edits to the engine, and
//! text rendering of the resulting views.

pub mod config;
pub mod commands;
pub mod display;
