use crate::spectrum::Spectrum;
use crate::Float;

/// Running per-pixel mean of every pass traced since the last reset.
///
/// A pass blends its sample into a pixel as `(old * k + sample) / (k + 1)`, where `k` is
/// the number of passes already accumulated.
pub struct AccumulationBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Spectrum>,
    sample_count: u32,
}

/// Blend factors for the pass currently being traced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccumulateWeights {
    /// Weight of the existing mean (`k`).
    pub prior: Float,
    /// `1 / (k + 1)`.
    pub inv_total: Float,
}

impl AccumulateWeights {
    #[inline]
    pub fn blend(&self, old: Spectrum, sample: Spectrum) -> Spectrum {
        (old * self.prior + sample) * self.inv_total
    }
}

impl AccumulationBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Spectrum::black(); width * height],
            sample_count: 0,
        }
    }

    /// Resize to a new viewport. Always clears, even if the size is unchanged.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, Spectrum::black());
        self.sample_count = 0;
    }

    /// Zero every pixel and forget all accumulated passes.
    pub fn reset(&mut self) {
        self.pixels.iter_mut().for_each(|p| *p = Spectrum::black());
        self.sample_count = 0;
    }

    pub fn accumulate_weights(&self) -> AccumulateWeights {
        let prior = self.sample_count as Float;
        AccumulateWeights { prior, inv_total: 1.0 / (prior + 1.0) }
    }

    /// Record that a complete pass has been blended in.
    pub fn finish_pass(&mut self) {
        self.sample_count += 1;
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Spectrum {
        self.pixels[y * self.width + x]
    }

    pub fn pixels(&self) -> &[Spectrum] {
        &self.pixels
    }

    /// Rows in order, each `width` pixels long. Rows are disjoint, so they can be handed
    /// to different threads.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [Spectrum]> {
        // chunks_mut panics on a zero chunk size
        self.pixels.chunks_mut(self.width.max(1))
    }
}
