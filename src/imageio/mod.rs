use crate::spectrum::{spectrum_into_rgb8, Spectrum};
use crate::Float;
use std::path::Path;

/// Exponent of the power curve applied when a linear image is shown.
pub const DISPLAY_GAMMA: Float = 2.2;

/// Clamp to `[0, 1]`, apply `v^gamma` and quantize to 8 bits.
pub fn tonemap_rgb8(s: Spectrum, gamma: Float) -> [u8; 3] {
    spectrum_into_rgb8(s.clamp(0.0, 1.0).powf(gamma))
}

pub fn spectrum_to_image(img: &[Spectrum], (w, h): (usize, usize), gamma: Float) -> anyhow::Result<image::RgbImage> {
    anyhow::ensure!(img.len() == w * h, "{} pixels do not fill a {}x{} image", img.len(), w, h);
    let rgb_buf: Vec<u8> = img.iter()
        .flat_map(|s| tonemap_rgb8(*s, gamma))
        .collect();
    image::RgbImage::from_raw(w as u32, h as u32, rgb_buf)
        .ok_or_else(|| anyhow::anyhow!("could not build a {}x{} image", w, h))
}

pub fn write_png(path: impl AsRef<Path>, img: &image::RgbImage) -> anyhow::Result<()> {
    let path = path.as_ref();
    img.save(path)?;
    tracing::info!(path = %path.display(), width = img.width(), height = img.height(), "wrote image");
    Ok(())
}
