//! Property-based invariant tests for the grid state manager.
//!
//! Random sequences of uploads, removals, layout feedback, compaction
//! passes and slider changes must keep:
//!
//! 1. Every image paired with exactly one placement (same id sets).
//! 2. Ids unique across the whole session.
//! 3. Uploads visible all at once, in a single transition.
//! 4. Removed ids absent even when stale feedback still mentions them.
//! 5. Tile widths equal to the size slider right after it moves.
//! 6. Compaction output free of overlaps.

use std::collections::HashSet;

use image_grid::state::batch::{BatchAssembler, DecodedBatch};
use image_grid::{
    DecodeError, GridState, ImageSource, LayoutUpdate, Placement, VerticalCompactor,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    /// Upload `size` files; bit i of `fail_mask` fails file i
    Upload { size: usize, fail_mask: u16 },
    /// Remove the tile at `pick % len`, or an unknown id when empty
    Remove { pick: usize },
    /// Feed back the current layout plus entries for removed ids
    Feedback { shift: u32 },
    Relayout { cols: u32 },
    Size { units: i64 },
    Gap { px: i64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..5, any::<u16>()).prop_map(|(size, fail_mask)| Op::Upload { size, fail_mask }),
        any::<usize>().prop_map(|pick| Op::Remove { pick }),
        (0u32..4).prop_map(|shift| Op::Feedback { shift }),
        (0u32..14).prop_map(|cols| Op::Relayout { cols }),
        (-5i64..20).prop_map(|units| Op::Size { units }),
        (-10i64..50).prop_map(|px| Op::Gap { px }),
    ]
}

/// Completions arrive last file first. Only the first 16 files can be
/// marked as failing.
fn reverse_batch(size: usize, fail_mask: u16) -> DecodedBatch {
    let mut assembler = BatchAssembler::new(size);
    let mut done = None;
    for position in (0..size).rev() {
        let outcome = if position < 16 && fail_mask & (1u16 << position) != 0 {
            Err(DecodeError::Join("simulated failure".to_string()))
        } else {
            Ok(ImageSource::new("image/png", vec![position as u8]))
        };
        let result = assembler.record(position, outcome);
        if position > 0 {
            assert!(result.is_none(), "batch delivered before every file reported");
        }
        done = result;
    }
    done.unwrap_or_default()
}

fn assert_paired(grid: &GridState) -> Result<(), TestCaseError> {
    let images: Vec<&str> = grid.images().map(|i| i.id.as_str()).collect();
    let layout: Vec<&str> = grid.layout().map(|l| l.id).collect();

    let image_set: HashSet<&str> = images.iter().copied().collect();
    let layout_set: HashSet<&str> = layout.iter().copied().collect();

    prop_assert_eq!(image_set.len(), images.len(), "duplicate image id");
    prop_assert_eq!(layout_set.len(), layout.len(), "duplicate layout id");
    prop_assert_eq!(image_set, layout_set);
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// Pairing, uniqueness and atomicity over random operation sequences
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut grid = GridState::new();
        let mut every_id: HashSet<String> = HashSet::new();
        let mut removed: Vec<String> = Vec::new();

        for op in ops {
            match op {
                Op::Upload { size, fail_mask } => {
                    let before_len = grid.len();
                    let before_rev = grid.revision();
                    let batch = reverse_batch(size, fail_mask);
                    let expected = batch.entries().len();

                    let added = grid.commit_batch(batch);

                    prop_assert_eq!(added.len(), expected);
                    prop_assert_eq!(grid.len(), before_len + expected);
                    let transitions = if expected > 0 { 1 } else { 0 };
                    prop_assert_eq!(grid.revision(), before_rev + transitions);
                    for id in added {
                        let tile = grid.tile(&id).unwrap();
                        prop_assert_eq!(tile.placement, Placement::AppendAtEnd);
                        prop_assert_eq!((tile.w, tile.h), (2, 2));
                        prop_assert!(every_id.insert(id), "id reused");
                    }
                }
                Op::Remove { pick } => {
                    if grid.is_empty() {
                        prop_assert!(!grid.remove_image("img-missing"));
                    } else {
                        let id = grid.tiles()[pick % grid.len()].id().to_string();
                        prop_assert!(grid.remove_image(&id));
                        prop_assert!(!grid.remove_image(&id));
                        removed.push(id);
                    }
                }
                Op::Feedback { shift } => {
                    let mut snapshot: Vec<LayoutUpdate> = grid
                        .layout()
                        .map(|l| LayoutUpdate::fixed(l.id, l.placement.x() + shift, shift, l.w, l.h))
                        .collect();
                    snapshot.extend(removed.iter().map(|id| LayoutUpdate::fixed(id.clone(), 0, 0, 1, 1)));

                    let applied = grid.apply_layout_update(snapshot);

                    prop_assert_eq!(applied, grid.len());
                    for id in &removed {
                        prop_assert!(grid.layout().all(|l| l.id != id.as_str()));
                    }
                }
                Op::Relayout { cols } => {
                    grid.relayout(&VerticalCompactor, cols);
                    prop_assert!(!grid.has_pending_placements());
                }
                Op::Size { units } => {
                    let heights: Vec<u32> = grid.layout().map(|l| l.h).collect();
                    let w = grid.set_image_size_units(units);

                    prop_assert!((1..=12).contains(&w));
                    prop_assert!(grid.layout().all(|l| l.w == w));
                    let after: Vec<u32> = grid.layout().map(|l| l.h).collect();
                    prop_assert_eq!(heights, after);
                }
                Op::Gap { px } => {
                    let gap = grid.set_gap(px);
                    prop_assert!(gap <= 30);
                }
            }
            assert_paired(&grid)?;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Compaction never leaves overlapping tiles
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn relayout_leaves_no_overlaps(
        rects in prop::collection::vec((0u32..12, 0u32..20, 1u32..6, 1u32..6), 1..15),
        pending in 0usize..4,
        cols in 1u32..13,
    ) {
        let mut grid = GridState::new();
        let ids = grid.commit_batch(reverse_batch(rects.len(), 0));
        let snapshot: Vec<LayoutUpdate> = ids
            .iter()
            .zip(&rects)
            .map(|(id, &(x, y, w, h))| LayoutUpdate::fixed(id.clone(), x, y, w, h))
            .collect();
        grid.apply_layout_update(snapshot);
        grid.commit_batch(reverse_batch(pending, 0));

        grid.relayout(&VerticalCompactor, cols);

        let cells: Vec<(u32, u32, u32, u32)> = grid
            .layout()
            .map(|l| (l.placement.x(), l.placement.y().unwrap(), l.w, l.h))
            .collect();
        for (i, a) in cells.iter().enumerate() {
            prop_assert!(a.0 + a.2 <= cols, "tile exceeds column count: {:?}", a);
            for b in &cells[i + 1..] {
                let overlap = a.0 < b.0 + b.2 && b.0 < a.0 + a.2 && a.1 < b.1 + b.3 && b.1 < a.1 + a.3;
                prop_assert!(!overlap, "{:?} overlaps {:?}", a, b);
            }
        }
        assert_paired(&grid)?;
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Two same-millisecond uploads of three files
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn back_to_back_uploads_get_distinct_ids() {
    let mut grid = GridState::new();
    let mut ids = grid.commit_batch(reverse_batch(3, 0));
    ids.extend(grid.commit_batch(reverse_batch(3, 0)));

    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), 6);
}
