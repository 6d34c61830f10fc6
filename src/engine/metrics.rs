use crate::state::data::MAX_GRID_CELLS;

/// Pixel geometry of a rendered grid.
///
/// Converts between cell coordinates and pixels so pointer gestures can be
/// turned back into layout entries. Cells are `col_width` by `row_height`
/// pixels, separated and surrounded by `gap`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub cols: u32,
    pub col_width: f32,
    pub row_height: f32,
    pub gap: f32,
}

impl GridMetrics {
    /// Columns share `container_width` after the gaps are taken out.
    pub fn new(container_width: f32, cols: u32, row_height: f32, gap: f32) -> Self {
        let cols = cols.max(1);
        let col_width = ((container_width - gap * (cols as f32 + 1.0)) / cols as f32).max(1.0);
        Self {
            cols,
            col_width,
            row_height: row_height.max(1.0),
            gap: gap.max(0.0),
        }
    }

    /// Left edge of column `x`
    pub fn left(&self, x: u32) -> f32 {
        self.gap + x as f32 * (self.col_width + self.gap)
    }

    /// Top edge of row `y`
    pub fn top(&self, y: u32) -> f32 {
        self.gap + y as f32 * (self.row_height + self.gap)
    }

    /// Pixel width of a tile `w` columns wide, inner gaps included
    pub fn width(&self, w: u32) -> f32 {
        span(w, self.col_width, self.gap)
    }

    /// Pixel height of a tile `h` rows tall, inner gaps included
    pub fn height(&self, h: u32) -> f32 {
        span(h, self.row_height, self.gap)
    }

    /// Nearest cell for a tile `w` columns wide whose top-left corner sits
    /// at pixel (`left`, `top`). The tile is kept inside the columns.
    pub fn cell_at(&self, left: f32, top: f32, w: u32) -> (u32, u32) {
        let max_x = self.cols - w.clamp(1, self.cols);
        let x = to_cells(left - self.gap, self.col_width + self.gap).min(max_x);
        let y = to_cells(top - self.gap, self.row_height + self.gap).min(MAX_GRID_CELLS);
        (x, y)
    }

    /// Span (w, h) closest to a tile of `width` by `height` pixels
    pub fn span_for(&self, width: f32, height: f32) -> (u32, u32) {
        let w = to_cells(width + self.gap, self.col_width + self.gap).clamp(1, self.cols);
        let h = to_cells(height + self.gap, self.row_height + self.gap).clamp(1, MAX_GRID_CELLS);
        (w, h)
    }
}

fn span(cells: u32, unit: f32, gap: f32) -> f32 {
    cells as f32 * unit + cells.saturating_sub(1) as f32 * gap
}

/// Rounded cell count; negative and NaN inputs give 0
fn to_cells(px: f32, pitch: f32) -> u32 {
    (px / pitch).round().max(0.0) as u32
}
