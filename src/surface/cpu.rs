use crate::imageio::{spectrum_to_image, write_png, DISPLAY_GAMMA};
use crate::spectrum::Spectrum;
use crate::surface::Surface;
use crate::Float;
use std::path::Path;

/// Keeps the most recently presented frame in memory as a linear copy, tone mapping only
/// when an 8-bit image is asked for.
pub struct CpuSurface {
    gamma: Float,
    size: (usize, usize),
    pixels: Vec<Spectrum>,
    presents: usize,
}

impl CpuSurface {
    pub fn new() -> CpuSurface {
        Self::with_gamma(DISPLAY_GAMMA)
    }

    pub fn with_gamma(gamma: Float) -> CpuSurface {
        CpuSurface { gamma, size: (0, 0), pixels: Vec::new(), presents: 0 }
    }

    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    pub fn pixels(&self) -> &[Spectrum] {
        &self.pixels
    }

    /// How many frames have been presented so far.
    pub fn presents(&self) -> usize {
        self.presents
    }

    pub fn to_image(&self) -> anyhow::Result<image::RgbImage> {
        spectrum_to_image(&self.pixels, self.size, self.gamma)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        write_png(path, &self.to_image()?)
    }
}

impl Default for CpuSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for CpuSurface {
    fn present(&mut self, width: usize, height: usize, pixels: &[Spectrum]) {
        self.size = (width, height);
        self.pixels.clear();
        self.pixels.extend_from_slice(pixels);
        self.presents += 1;
    }
}
