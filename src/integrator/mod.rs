use crate::scene::Scene;
use crate::spectrum::Spectrum;
use crate::Ray;

pub mod whitted;

pub use whitted::WhittedIntegrator;

/// Radiance seen by a ray in the background (rays that leave the scene).
pub fn background() -> Spectrum {
    Spectrum::uniform(0.1)
}

pub trait IntegratorRadiance: Sync + Send {
    /// Returns the radiance arriving at the origin of the given ray, `depth` bounces away
    /// from the camera.
    fn incident_radiance(&self, ray: &Ray, scene: &Scene, depth: u16) -> Spectrum;
}
