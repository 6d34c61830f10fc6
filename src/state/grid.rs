/// The grid state manager
///
/// `GridState` is the only writer of the image and layout collections.
/// Both are projections of one list of [`Tile`]s, so every image always has
/// exactly one placement and ids stay unique. Every committed change bumps
/// the revision counter, which makes "one transition per upload" observable.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::batch::DecodedBatch;
use super::data::{ImageItem, LayoutItem, LayoutUpdate, Tile};
use super::ids::IdAllocator;
use super::settings::{GridSettings, NEW_TILE_SPAN};
use super::wire::{ImageRecord, LayoutRecord};
use crate::decode::{decode_batch, FileHandle, ImageDecoder};
use crate::engine::PlacementEngine;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("malformed layout snapshot: {0}")]
    MalformedSnapshot(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
pub struct GridState {
    tiles: Vec<Tile>,
    settings: GridSettings,
    ids: IdAllocator,
    revision: u64,
}

impl GridState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    /// Number of committed state transitions so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tiles.iter().any(|t| t.id() == id)
    }

    pub fn tile(&self, id: &str) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id() == id)
    }

    /// Tiles in insertion order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Image projection, in insertion order
    pub fn images(&self) -> impl Iterator<Item = &ImageItem> + '_ {
        self.tiles.iter().map(|t| &t.image)
    }

    /// Layout projection, in insertion order
    pub fn layout(&self) -> impl Iterator<Item = LayoutItem<'_>> + '_ {
        self.tiles.iter().map(Tile::layout)
    }

    pub fn image_records(&self) -> Vec<ImageRecord> {
        self.images().map(ImageRecord::from).collect()
    }

    pub fn layout_records(&self) -> Vec<LayoutRecord> {
        self.layout().map(LayoutRecord::from).collect()
    }

    /// True while some tile still waits for the placement engine
    pub fn has_pending_placements(&self) -> bool {
        self.tiles.iter().any(|t| t.placement.is_pending())
    }

    /// Decode an upload and commit it as one batch.
    pub async fn ingest_batch<D: ImageDecoder>(
        &mut self,
        decoder: Arc<D>,
        files: Vec<FileHandle>,
    ) -> Vec<String> {
        let batch = decode_batch(decoder, files).await;
        self.commit_batch(batch)
    }

    /// Append every decoded image of `batch` in a single transition.
    ///
    /// Each image gets a fresh id and a placeholder placement below all
    /// content. Returns the new ids in submission order. A batch where
    /// nothing decoded leaves the state untouched.
    pub fn commit_batch(&mut self, batch: DecodedBatch) -> Vec<String> {
        if batch.failed() > 0 {
            warn!(
                failed = batch.failed(),
                submitted = batch.submitted(),
                "⚠️  Some files could not be decoded"
            );
        }
        if batch.is_empty() {
            debug!(submitted = batch.submitted(), "Upload produced no images");
            return Vec::new();
        }

        let (w, h) = NEW_TILE_SPAN;
        let mut added = Vec::with_capacity(batch.entries().len());
        for (position, src) in batch.into_entries() {
            let id = self.ids.allocate(position);
            added.push(id.clone());
            self.tiles.push(Tile::placeholder(ImageItem { id, src }, w, h));
        }
        self.revision += 1;

        info!(
            "📥 Added {} images with initial size w:{}, h:{}.",
            added.len(),
            w,
            h
        );
        added
    }

    /// Remove an image and its placement together.
    ///
    /// Returns false (and changes nothing) if the id is unknown.
    pub fn remove_image(&mut self, id: &str) -> bool {
        let Some(index) = self.tiles.iter().position(|t| t.id() == id) else {
            debug!(id, "Remove ignored, id not present");
            return false;
        };
        self.tiles.remove(index);
        self.revision += 1;
        info!(id, "🗑️  Removed image");
        true
    }

    /// Take a layout snapshot from the UI or the placement engine.
    ///
    /// Entries for ids that are no longer present are dropped; when an id
    /// appears twice the first entry wins. Tiles the snapshot does not
    /// mention keep their current placement. Image order never changes.
    /// Coordinates and spans are capped at
    /// [`MAX_GRID_CELLS`](super::data::MAX_GRID_CELLS).
    /// Returns the number of entries applied; a snapshot that matches no
    /// tile is not a transition.
    pub fn apply_layout_update<I>(&mut self, snapshot: I) -> usize
    where
        I: IntoIterator<Item = LayoutUpdate>,
    {
        let index: HashMap<&str, usize> = self
            .tiles
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id(), i))
            .collect();

        let mut seen = HashSet::new();
        let mut accepted = Vec::new();
        let mut stale = 0usize;
        for update in snapshot {
            match index.get(update.id.as_str()) {
                Some(&i) if seen.insert(i) => accepted.push((i, update)),
                Some(_) => debug!(id = %update.id, "Duplicate layout entry ignored"),
                None => {
                    stale += 1;
                    debug!(id = %update.id, "Dropping layout entry for removed image");
                }
            }
        }

        let missing = self.tiles.len() - accepted.len();
        if missing > 0 {
            debug!(missing, "Layout snapshot did not cover every tile");
        }

        if accepted.is_empty() {
            debug!(stale, "Layout snapshot matched no tile");
            return 0;
        }
        for (i, update) in &accepted {
            self.tiles[*i].apply(update);
        }
        self.revision += 1;

        debug!(applied = accepted.len(), stale, "Layout updated");
        accepted.len()
    }

    /// Same as [`apply_layout_update`](Self::apply_layout_update), taking a
    /// JSON array of `{ i, x, y, w, h, isDraggable?, isResizable? }` records.
    pub fn apply_layout_json(&mut self, json: &str) -> Result<usize, GridError> {
        let records: Vec<LayoutRecord> = serde_json::from_str(json)?;
        Ok(self.apply_layout_update(records.into_iter().map(LayoutUpdate::from)))
    }

    /// Drop a dragged tile at cell (x, y), keeping its span.
    ///
    /// Returns false for unknown ids and tiles marked not draggable.
    pub fn move_tile(&mut self, id: &str, x: u32, y: u32) -> bool {
        let Some(tile) = self.tile(id) else {
            debug!(id, "Move ignored, id not present");
            return false;
        };
        if tile.is_draggable == Some(false) {
            debug!(id, "Move ignored, tile is not draggable");
            return false;
        }
        let update = LayoutUpdate::fixed(id, x, y, tile.w, tile.h);
        self.apply_layout_update([update]) == 1
    }

    /// Give a tile a new span from its resize handle, keeping its position.
    ///
    /// Returns false for unknown ids and tiles marked not resizable.
    pub fn resize_tile(&mut self, id: &str, w: u32, h: u32) -> bool {
        let Some(tile) = self.tile(id) else {
            debug!(id, "Resize ignored, id not present");
            return false;
        };
        if tile.is_resizable == Some(false) {
            debug!(id, "Resize ignored, tile is not resizable");
            return false;
        }
        let update = LayoutUpdate {
            id: id.to_string(),
            placement: tile.placement,
            w,
            h,
            is_draggable: None,
            is_resizable: None,
        };
        self.apply_layout_update([update]) == 1
    }

    /// Run a compaction pass over the current layout and commit the result.
    pub fn relayout<E: PlacementEngine + ?Sized>(&mut self, engine: &E, cols: u32) -> usize {
        let placed = {
            let items: Vec<LayoutItem<'_>> = self.layout().collect();
            engine.place(&items, cols)
        };

        if placed.len() != self.tiles.len() {
            warn!(
                expected = self.tiles.len(),
                returned = placed.len(),
                "⚠️  Placement engine changed the number of items"
            );
        }
        self.apply_layout_update(placed)
    }

    /// Set the tile width and apply it to every tile. Heights are kept.
    ///
    /// The value is clamped to 1..=12. Returns the stored value.
    pub fn set_image_size_units(&mut self, units: i64) -> u32 {
        let w = self.settings.set_image_size_units(units);
        for tile in &mut self.tiles {
            tile.w = w;
        }
        self.revision += 1;
        debug!(w, tiles = self.tiles.len(), "Tile width updated");
        w
    }

    /// Set the gap between tiles (clamped to 0..=30 px)
    pub fn set_gap(&mut self, px: i64) -> u32 {
        let gap = self.settings.set_gap(px);
        self.revision += 1;
        gap
    }

    /// Set the tile corner radius (clamped to 0..=40 px)
    pub fn set_corner_radius(&mut self, px: i64) -> u32 {
        let radius = self.settings.set_corner_radius(px);
        self.revision += 1;
        radius
    }
}
