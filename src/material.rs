use crate::spectrum::Spectrum;
use crate::Float;

/// Surface response used by the Whitted-style shading in
/// [`WhittedIntegrator`](crate::integrator::whitted::WhittedIntegrator).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Material {
    /// Diffuse reflectance.
    pub albedo: Spectrum,

    /// Tint of the Phong highlight.
    pub specular: Spectrum,

    /// Fraction of the mirror-reflected contribution, in `[0, 1]`.
    pub reflectance: Float,

    /// Self-emission. Anything non-black makes the surface a light source.
    pub emissive: Spectrum,
}

impl Material {
    pub fn new(albedo: Spectrum, specular: Spectrum, reflectance: Float, emissive: Spectrum) -> Self {
        Self { albedo, specular, reflectance, emissive }
    }

    /// A non-reflective, non-emissive surface.
    pub fn diffuse(albedo: Spectrum) -> Self {
        Self { albedo, ..Self::default() }
    }

    /// A light source that also has a (dark) surface colour of its own.
    pub fn emitter(emissive: Spectrum) -> Self {
        Self { emissive, ..Self::default() }
    }

    pub fn is_emissive(&self) -> bool {
        !self.emissive.is_black()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.reflectance),
            "material reflectance {} is outside [0, 1]", self.reflectance
        );
        anyhow::ensure!(
            !(self.albedo.has_nans() || self.specular.has_nans() || self.emissive.has_nans()),
            "material has NaN colour channels: {:?}", self
        );
        Ok(())
    }
}
