use crate::state::data::{LayoutItem, LayoutUpdate, Placement, MAX_GRID_CELLS};

use super::PlacementEngine;

/// Masonry packing: no overlaps, everything pulled as far up as it can go.
///
/// Items are visited top to bottom, left to right. Pending items
/// ([`Placement::AppendAtEnd`]) are visited last, starting below all fixed
/// content at column 0. Each item first rises until it would hit something,
/// then drops below whatever it still overlaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticalCompactor;

#[derive(Debug, Clone, Copy)]
struct Cell {
    index: usize,
    pending: bool,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl Cell {
    fn overlaps(&self, other: &Cell) -> bool {
        self.x < other.x.saturating_add(other.w)
            && other.x < self.x.saturating_add(self.w)
            && self.y < other.y.saturating_add(other.h)
            && other.y < self.y.saturating_add(self.h)
    }

    fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }
}

fn bottom(cells: &[Cell]) -> u32 {
    cells.iter().map(Cell::bottom).max().unwrap_or(0)
}

impl PlacementEngine for VerticalCompactor {
    fn place(&self, items: &[LayoutItem<'_>], cols: u32) -> Vec<LayoutUpdate> {
        let cols = cols.max(1);

        let mut cells: Vec<Cell> = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let w = item.w.clamp(1, cols);
                Cell {
                    index,
                    pending: item.placement.is_pending(),
                    x: item.placement.x().min(cols - w),
                    y: item.placement.y().unwrap_or(0).min(MAX_GRID_CELLS),
                    w,
                    h: item.h.clamp(1, MAX_GRID_CELLS),
                }
            })
            .collect();

        let fixed: Vec<Cell> = cells.iter().filter(|c| !c.pending).copied().collect();
        let fixed_bottom = bottom(&fixed);
        for cell in cells.iter_mut().filter(|c| c.pending) {
            cell.y = fixed_bottom;
        }

        cells.sort_by_key(|c| (c.pending, c.y, c.x, c.index));

        let mut placed: Vec<Cell> = Vec::with_capacity(cells.len());
        for mut cell in cells {
            cell.y = cell.y.min(bottom(&placed));

            while cell.y > 0 {
                let above = Cell { y: cell.y - 1, ..cell };
                if placed.iter().any(|p| p.overlaps(&above)) {
                    break;
                }
                cell.y -= 1;
            }

            while let Some(hit) = placed.iter().find(|p| p.overlaps(&cell)) {
                cell.y = hit.bottom();
            }

            placed.push(cell);
        }

        placed.sort_by_key(|c| c.index);
        placed
            .into_iter()
            .map(|cell| {
                let item = &items[cell.index];
                LayoutUpdate {
                    id: item.id.to_string(),
                    placement: Placement::Fixed { x: cell.x, y: cell.y },
                    w: cell.w,
                    h: cell.h,
                    is_draggable: item.is_draggable,
                    is_resizable: item.is_resizable,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, placement: Placement, w: u32, h: u32) -> LayoutItem<'_> {
        LayoutItem {
            id,
            placement,
            w,
            h,
            is_draggable: None,
            is_resizable: None,
        }
    }

    fn fixed(x: u32, y: u32) -> Placement {
        Placement::Fixed { x, y }
    }

    fn assert_no_overlaps(out: &[LayoutUpdate]) {
        for (i, a) in out.iter().enumerate() {
            for b in &out[i + 1..] {
                let (ax, ay) = (a.placement.x(), a.placement.y().unwrap());
                let (bx, by) = (b.placement.x(), b.placement.y().unwrap());
                let overlap = ax < bx + b.w && bx < ax + a.w && ay < by + b.h && by < ay + a.h;
                assert!(!overlap, "{} overlaps {}", a.id, b.id);
            }
        }
    }

    #[test]
    fn test_floats_items_up() {
        let items = [item("a", fixed(0, 5), 2, 2), item("b", fixed(4, 9), 2, 3)];
        let out = VerticalCompactor.place(&items, 12);

        assert_eq!(out[0].placement, fixed(0, 0));
        assert_eq!(out[1].placement, fixed(4, 0));
    }

    #[test]
    fn test_stacks_items_in_same_column() {
        let items = [item("a", fixed(0, 0), 4, 2), item("b", fixed(2, 0), 4, 3)];
        let out = VerticalCompactor.place(&items, 12);

        assert_eq!(out[0].placement, fixed(0, 0));
        assert_eq!(out[1].placement, fixed(2, 2));
        assert_no_overlaps(&out);
    }

    #[test]
    fn test_pending_items_go_below_content() {
        let items = [
            item("new", Placement::AppendAtEnd, 2, 2),
            item("a", fixed(0, 0), 12, 3),
        ];
        let out = VerticalCompactor.place(&items, 12);

        // Input order is kept
        assert_eq!(out[0].id, "new");
        assert_eq!(out[0].placement, fixed(0, 3));
        assert_eq!(out[1].placement, fixed(0, 0));
    }

    #[test]
    fn test_pending_items_rise_into_free_space() {
        let items = [
            item("a", fixed(4, 0), 2, 6),
            item("new", Placement::AppendAtEnd, 2, 2),
        ];
        let out = VerticalCompactor.place(&items, 12);

        assert_eq!(out[1].placement, fixed(0, 0));
    }

    #[test]
    fn test_several_pending_items_keep_submission_order() {
        let items = [
            item("p0", Placement::AppendAtEnd, 2, 2),
            item("p1", Placement::AppendAtEnd, 2, 2),
            item("p2", Placement::AppendAtEnd, 2, 2),
        ];
        let out = VerticalCompactor.place(&items, 12);

        assert_eq!(out[0].placement, fixed(0, 0));
        assert_eq!(out[1].placement, fixed(0, 2));
        assert_eq!(out[2].placement, fixed(0, 4));
    }

    #[test]
    fn test_widths_clamped_to_columns() {
        let items = [item("wide", fixed(3, 0), 12, 2)];
        let out = VerticalCompactor.place(&items, 4);

        assert_eq!(out[0].w, 4);
        assert_eq!(out[0].placement, fixed(0, 0));
    }

    #[test]
    fn test_keeps_id_set() {
        let items = [
            item("a", fixed(0, 0), 3, 1),
            item("b", fixed(1, 0), 3, 2),
            item("c", Placement::AppendAtEnd, 2, 2),
            item("d", fixed(0, 7), 5, 1),
        ];
        let out = VerticalCompactor.place(&items, 6);

        let ids: Vec<&str> = out.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_no_overlaps(&out);
    }

    #[test]
    fn test_extreme_coordinates_are_capped() {
        let items = [
            item("tall", fixed(u32::MAX, u32::MAX), u32::MAX, u32::MAX),
            item("a", fixed(0, 0), 2, 2),
            item("new", Placement::AppendAtEnd, 2, 2),
        ];
        let out = VerticalCompactor.place(&items, 12);

        assert_eq!(out[1].placement, fixed(0, 0));
        assert_eq!(out[0].placement, fixed(0, 2));
        assert_eq!((out[0].w, out[0].h), (12, MAX_GRID_CELLS));
        assert_eq!(out[2].placement, fixed(0, 2 + MAX_GRID_CELLS));
        assert_no_overlaps(&out);
    }

    #[test]
    fn test_zero_columns_does_not_panic() {
        let items = [item("a", fixed(5, 5), 0, 0)];
        let out = VerticalCompactor.place(&items, 0);

        assert_eq!(out[0].placement, fixed(0, 0));
        assert_eq!((out[0].w, out[0].h), (1, 1));
    }
}
