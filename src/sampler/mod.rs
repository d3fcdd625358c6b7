use crate::Point2f;

pub mod random;

pub use random::RandomSampler;

/// Supplies the sub-pixel offset added to every pixel coordinate for one trace pass.
/// Averaging passes with different offsets anti-aliases the accumulated image.
pub trait DitherSampler: Send {
    /// Offset in `[0, 1)²` for the next pass.
    fn next_offset(&mut self) -> Point2f;
}

/// Always the same offset. Makes successive passes identical, which is what tests of the
/// accumulation want.
#[derive(Clone, Copy, Debug)]
pub struct FixedSampler(pub Point2f);

impl Default for FixedSampler {
    /// Pixel centres.
    fn default() -> Self {
        Self(Point2f::new(0.5, 0.5))
    }
}

impl DitherSampler for FixedSampler {
    fn next_offset(&mut self) -> Point2f {
        self.0
    }
}
