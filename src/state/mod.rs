/// State management module
///
/// This module handles all grid state, including:
/// - The grid state manager, sole writer of images and layout (grid.rs)
/// - Shared data structures (data.rs)
/// - Global slider parameters (settings.rs)
/// - Upload batch assembly (batch.rs)
/// - Session-unique ids (ids.rs)
/// - Record shapes for the presentation layer (wire.rs)

pub mod batch;
pub mod data;
pub mod grid;
pub mod ids;
pub mod settings;
pub mod wire;

pub use grid::{GridError, GridState};
