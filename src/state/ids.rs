/// Session-unique image ids
///
/// Ids look like `img-<seq>-<millis>-<position>`. Uniqueness comes from the
/// monotonic `seq`; the timestamp and batch position only make ids readable
/// in logs.

use chrono::Utc;

#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the id for the item at `position` within its upload batch
    pub fn allocate(&mut self, position: usize) -> String {
        let seq = self.next;
        self.next += 1;
        format!("img-{}-{}-{}", seq, Utc::now().timestamp_millis(), position)
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.next
    }
}
