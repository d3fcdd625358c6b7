pub mod cpu;

pub use cpu::CpuSurface;

use crate::spectrum::Spectrum;

/// Where finished passes are shown. The frame controller hands over the accumulated
/// linear RGB image; the surface owns the conversion to its display format.
pub trait Surface {
    /// `pixels` is row-major, `width * height` long.
    fn present(&mut self, width: usize, height: usize, pixels: &[Spectrum]);
}
