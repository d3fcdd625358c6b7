use crate::Float;
use std::ops::RangeInclusive;

pub const FIELD_OF_VIEW_RANGE: RangeInclusive<Float> = 10.0..=90.0;
pub const MAX_DEPTH_RANGE: RangeInclusive<u16> = 1..=5;
pub const PARTITION_RANGE: RangeInclusive<usize> = 1..=12;

/// User-tunable render parameters. Copied into a trace when it launches, so edits made
/// while a pass is running take effect on the next one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    /// Vertical field of view, in degrees.
    pub field_of_view: Float,

    /// Deepest mirror bounce.
    pub max_depth: u16,

    /// Number of row-interleaved partitions (and worker threads) per pass.
    pub partitions: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            field_of_view: 60.0,
            max_depth: 3,
            partitions: 2,
        }
    }
}

impl RenderSettings {
    /// The same settings with every field forced into its supported range.
    pub fn clamped(self) -> Self {
        Self {
            field_of_view: self.field_of_view
                .clamp(*FIELD_OF_VIEW_RANGE.start(), *FIELD_OF_VIEW_RANGE.end()),
            max_depth: self.max_depth
                .clamp(*MAX_DEPTH_RANGE.start(), *MAX_DEPTH_RANGE.end()),
            partitions: self.partitions
                .clamp(*PARTITION_RANGE.start(), *PARTITION_RANGE.end()),
        }
    }
}
