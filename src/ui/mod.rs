//! UI module for folio-cli.
//!
//! This module contains all UI rendering logic including:
//! - Main layout with section tabs and footer
//! - Pitch view with status, error banner, and input box
//! - Portfolio and markdown line builders

pub mod gradient;
pub mod markdown;
pub mod portfolio;
mod render;
pub mod text;

pub use render::ui;
