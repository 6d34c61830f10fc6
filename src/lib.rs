//! Image grid engine
//!
//! Keeps a batch-loaded set of images and their masonry grid placements in
//! lockstep across asynchronous uploads, removals, layout feedback and
//! global parameter changes. Packing itself is delegated to a
//! [`engine::PlacementEngine`].

pub mod decode;
pub mod engine;
pub mod state;

pub use decode::{decode_batch, DataUriDecoder, DecodeError, FileHandle, ImageDecoder};
pub use engine::{Breakpoint, GridMetrics, PlacementEngine, VerticalCompactor};
pub use state::data::{ImageItem, ImageSource, LayoutItem, LayoutUpdate, Placement, Tile};
pub use state::settings::GridSettings;
pub use state::{GridError, GridState};
