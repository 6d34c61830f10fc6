/// Shared data structures for the grid state
///
/// These structs represent the data model that flows between
/// the grid state manager, the placement engine and the UI layer.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

/// Upper bound for any cell coordinate or span accepted from feedback
pub const MAX_GRID_CELLS: u32 = 4096;

/// Immutable in-memory content of a decoded file.
///
/// Cloning is cheap: the bytes are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageSource {
    mime: String,
    bytes: Arc<[u8]>,
}

impl ImageSource {
    pub fn new(mime: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// MIME type sniffed from the file contents (e.g. "image/png")
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Raw file bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Render as a `data:<mime>;base64,<payload>` URI
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

// The payload can be megabytes; only show its size.
impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSource")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A single loaded image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageItem {
    /// Session-unique id (e.g. "img-7-1718031234567-2")
    pub id: String,
    /// Decoded file content
    pub src: ImageSource,
}

/// Where a tile sits in the grid, in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Explicit cell coordinates
    Fixed { x: u32, y: u32 },
    /// Below all existing content, column 0. Resolved by the placement engine.
    AppendAtEnd,
}

impl Placement {
    /// Column of the tile; `AppendAtEnd` starts at column 0
    pub fn x(&self) -> u32 {
        match self {
            Placement::Fixed { x, .. } => *x,
            Placement::AppendAtEnd => 0,
        }
    }

    /// Row of the tile, or `None` while it is still waiting for the engine
    pub fn y(&self) -> Option<u32> {
        match self {
            Placement::Fixed { y, .. } => Some(*y),
            Placement::AppendAtEnd => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Placement::AppendAtEnd)
    }
}

/// Grid placement of one image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutItem<'a> {
    pub id: &'a str,
    pub placement: Placement,
    /// Width in grid columns
    pub w: u32,
    /// Height in grid rows
    pub h: u32,
    pub is_draggable: Option<bool>,
    pub is_resizable: Option<bool>,
}

/// Owned counterpart of [`LayoutItem`], used for engine output and
/// layout feedback from the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutUpdate {
    pub id: String,
    pub placement: Placement,
    pub w: u32,
    pub h: u32,
    pub is_draggable: Option<bool>,
    pub is_resizable: Option<bool>,
}

impl LayoutUpdate {
    /// Convenience constructor for a fixed rectangle
    pub fn fixed(id: impl Into<String>, x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            id: id.into(),
            placement: Placement::Fixed { x, y },
            w,
            h,
            is_draggable: None,
            is_resizable: None,
        }
    }
}

impl From<LayoutItem<'_>> for LayoutUpdate {
    fn from(item: LayoutItem<'_>) -> Self {
        Self {
            id: item.id.to_string(),
            placement: item.placement,
            w: item.w,
            h: item.h,
            is_draggable: item.is_draggable,
            is_resizable: item.is_resizable,
        }
    }
}

/// An image joined with its placement.
///
/// The grid stores tiles rather than two parallel lists, so an image can
/// never exist without a placement or the other way around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub image: ImageItem,
    pub placement: Placement,
    pub w: u32,
    pub h: u32,
    pub is_draggable: Option<bool>,
    pub is_resizable: Option<bool>,
}

impl Tile {
    /// A freshly ingested tile: `w x h` span, waiting for the engine
    pub fn placeholder(image: ImageItem, w: u32, h: u32) -> Self {
        Self {
            image,
            placement: Placement::AppendAtEnd,
            w,
            h,
            is_draggable: None,
            is_resizable: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.image.id
    }

    /// Layout projection of this tile
    pub fn layout(&self) -> LayoutItem<'_> {
        LayoutItem {
            id: &self.image.id,
            placement: self.placement,
            w: self.w,
            h: self.h,
            is_draggable: self.is_draggable,
            is_resizable: self.is_resizable,
        }
    }

    /// Overwrite the placement fields from a feedback entry.
    /// Coordinates are capped at [`MAX_GRID_CELLS`], spans at least 1.
    /// Flags are only replaced when the update carries them.
    pub(crate) fn apply(&mut self, update: &LayoutUpdate) {
        self.placement = match update.placement {
            Placement::Fixed { x, y } => Placement::Fixed {
                x: x.min(MAX_GRID_CELLS),
                y: y.min(MAX_GRID_CELLS),
            },
            Placement::AppendAtEnd => Placement::AppendAtEnd,
        };
        self.w = update.w.clamp(1, MAX_GRID_CELLS);
        self.h = update.h.clamp(1, MAX_GRID_CELLS);
        if update.is_draggable.is_some() {
            self.is_draggable = update.is_draggable;
        }
        if update.is_resizable.is_some() {
            self.is_resizable = update.is_resizable;
        }
    }
}
