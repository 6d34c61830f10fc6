/// Placement engine module
///
/// The grid state never computes positions itself. It hands the current
/// layout to a [`PlacementEngine`] and takes the result as authoritative,
/// checking only that the ids still line up.
///
/// - Vertical compaction (compact.rs)
/// - Pixel/cell conversion for pointer gestures (metrics.rs)
/// - Responsive column counts (breakpoints below)

pub mod compact;
pub mod metrics;

pub use compact::VerticalCompactor;
pub use metrics::GridMetrics;

use crate::state::data::{LayoutItem, LayoutUpdate};

/// Resolves a layout into non-overlapping fixed rectangles.
///
/// Contract: the output contains exactly the ids of the input, every
/// placement is [`Placement::Fixed`](crate::state::data::Placement::Fixed),
/// and no two rectangles overlap.
pub trait PlacementEngine {
    fn place(&self, items: &[LayoutItem<'_>], cols: u32) -> Vec<LayoutUpdate>;
}

/// A responsive layout breakpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub name: &'static str,
    /// Smallest container width (px) that uses this breakpoint
    pub min_width: f32,
    /// Grid columns at this breakpoint
    pub columns: u32,
}

/// Breakpoints from widest to narrowest
pub const BREAKPOINTS: [Breakpoint; 5] = [
    Breakpoint { name: "lg", min_width: 1200.0, columns: 12 },
    Breakpoint { name: "md", min_width: 996.0, columns: 10 },
    Breakpoint { name: "sm", min_width: 768.0, columns: 6 },
    Breakpoint { name: "xs", min_width: 480.0, columns: 4 },
    Breakpoint { name: "xxs", min_width: 0.0, columns: 2 },
];

impl Breakpoint {
    /// Breakpoint for a container `width` pixels wide
    pub fn for_width(width: f32) -> &'static Breakpoint {
        BREAKPOINTS
            .iter()
            .find(|bp| width >= bp.min_width)
            .unwrap_or(&BREAKPOINTS[BREAKPOINTS.len() - 1])
    }
}
