/// Upload batch assembly
///
/// Decodes of one upload complete independently and in any order. The
/// assembler counts completions (success or failure) and only hands out the
/// batch once every file has reported, so the grid can append the whole
/// batch in a single transition.

use tracing::{debug, warn};

use super::data::ImageSource;
use crate::decode::DecodeError;

/// Successfully decoded files of one upload, in submission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedBatch {
    /// (position in the upload, decoded content)
    entries: Vec<(usize, ImageSource)>,
    /// Number of files submitted
    submitted: usize,
}

impl DecodedBatch {
    /// A batch with no files at all
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[(usize, ImageSource)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(usize, ImageSource)> {
        self.entries
    }

    /// Number of files that were submitted
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Number of files that failed to decode
    pub fn failed(&self) -> usize {
        self.submitted - self.entries.len()
    }

    /// True when no file decoded successfully
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects per-file decode completions for one upload
#[derive(Debug)]
pub struct BatchAssembler {
    /// `None` until the file at that position has reported
    slots: Vec<Option<Option<ImageSource>>>,
    completed: usize,
    delivered: bool,
}

impl BatchAssembler {
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
            completed: 0,
            delivered: false,
        }
    }

    /// Number of files that have reported so far
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Record the outcome for the file at `position`.
    ///
    /// Returns the finished batch exactly once, on the completion that brings
    /// the count up to the batch size. Failures are logged and excluded.
    /// A second report for the same position is ignored.
    pub fn record(
        &mut self,
        position: usize,
        outcome: Result<ImageSource, DecodeError>,
    ) -> Option<DecodedBatch> {
        let size = self.slots.len();
        let Some(slot) = self.slots.get_mut(position) else {
            warn!(position, size, "⚠️  Decode completion for unknown batch position");
            return None;
        };
        if slot.is_some() {
            warn!(position, "⚠️  Duplicate decode completion ignored");
            return None;
        }

        *slot = Some(match outcome {
            Ok(src) => Some(src),
            Err(e) => {
                warn!(position, error = %e, "❌ Decode failed, excluding file from batch");
                None
            }
        });
        self.completed += 1;
        debug!(completed = self.completed, size = self.slots.len(), "Decode completed");

        if self.completed == self.slots.len() && !self.delivered {
            self.delivered = true;
            Some(self.take_batch())
        } else {
            None
        }
    }

    /// Report every position that has not completed yet as failed and
    /// return the batch, unless it was already handed out.
    pub fn fail_remaining(&mut self, reason: &str) -> DecodedBatch {
        let missing: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(position, _)| position)
            .collect();

        for position in missing {
            if let Some(batch) = self.record(position, Err(DecodeError::Join(reason.to_string()))) {
                return batch;
            }
        }
        if self.delivered {
            DecodedBatch::default()
        } else {
            self.delivered = true;
            self.take_batch()
        }
    }

    fn take_batch(&mut self) -> DecodedBatch {
        let submitted = self.slots.len();
        let entries = self
            .slots
            .iter_mut()
            .enumerate()
            .filter_map(|(position, slot)| slot.take().flatten().map(|src| (position, src)))
            .collect();
        DecodedBatch { entries, submitted }
    }
}
