/// Global grid parameters
///
/// These are the three slider values shown in the toolbar plus the fixed
/// geometry the grid is rendered with. They live for the session only and
/// reset to their defaults on restart.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Allowed tile widths in grid columns
pub const IMAGE_SIZE_RANGE: RangeInclusive<u32> = 1..=12;
/// Allowed gap between tiles, in pixels
pub const GAP_RANGE: RangeInclusive<u32> = 0..=30;
/// Allowed corner radius, in pixels
pub const CORNER_RADIUS_RANGE: RangeInclusive<u32> = 0..=40;

/// Span given to freshly uploaded tiles, in grid cells (w, h)
pub const NEW_TILE_SPAN: (u32, u32) = (2, 2);

/// All global grid parameters
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GridSettings {
    /// Width applied to every tile by the size slider (1 to 12 columns)
    pub image_size_units: u32,

    /// Margin between tiles and around the grid (0 to 30 px)
    pub gap_pixels: u32,

    /// Tile corner rounding (0 to 40 px)
    pub corner_radius_pixels: u32,

    /// Height of one grid row in pixels. Not user adjustable.
    pub row_height_pixels: u32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            image_size_units: 4,
            gap_pixels: 10,
            corner_radius_pixels: 8,
            row_height_pixels: 100,
        }
    }
}

impl GridSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a tile width, clamped to [`IMAGE_SIZE_RANGE`]. Returns the stored value.
    pub fn set_image_size_units(&mut self, units: i64) -> u32 {
        self.image_size_units = clamp(units, &IMAGE_SIZE_RANGE);
        self.image_size_units
    }

    /// Store a gap, clamped to [`GAP_RANGE`]. Returns the stored value.
    pub fn set_gap(&mut self, px: i64) -> u32 {
        self.gap_pixels = clamp(px, &GAP_RANGE);
        self.gap_pixels
    }

    /// Store a corner radius, clamped to [`CORNER_RADIUS_RANGE`]. Returns the stored value.
    pub fn set_corner_radius(&mut self, px: i64) -> u32 {
        self.corner_radius_pixels = clamp(px, &CORNER_RADIUS_RANGE);
        self.corner_radius_pixels
    }

    /// Reset all parameters to the session defaults
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn clamp(value: i64, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(i64::from(*range.start()), i64::from(*range.end())) as u32
}
