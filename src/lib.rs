//! Folio CLI - a terminal portfolio with a streaming project-pitch generator.
//!
//! This library exposes the core modules for testing and reuse.

pub mod app;
pub mod config;
pub mod input;
pub mod markdown;
pub mod pitch;
pub mod profile;
pub mod theme;
pub mod ui;
