use crate::material::Material;
use crate::shapes::SceneObject;
use crate::{Float, Point3f, Ray, Vec3f};
use cgmath::InnerSpace;

/// Rays closer to parallel than this never hit a plane.
const PARALLEL_EPSILON: Float = 1.0e-6;

/// The infinite plane through `origin` with unit `normal`.
#[derive(Debug, Clone, Copy)]
struct PlaneGeometry {
    origin: Point3f,
    normal: Vec3f,
}

impl PlaneGeometry {
    fn new(origin: Point3f, normal: Vec3f) -> anyhow::Result<Self> {
        let len = normal.magnitude();
        anyhow::ensure!(
            len.is_finite() && len > PARALLEL_EPSILON,
            "plane at {:?} has a degenerate normal {:?}", origin, normal
        );
        Ok(Self { origin, normal: normal / len })
    }

    fn intersect(&self, ray: &Ray) -> Option<Float> {
        let dir = ray.dir.normalize();
        let denom = dir.dot(self.normal);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.origin - ray.origin).dot(self.normal) / denom;
        if t > 0.0 { Some(t) } else { None }
    }
}

/// A plane with a single material.
#[derive(Debug, Clone)]
pub struct Plane {
    geom: PlaneGeometry,
    material: Material,
}

impl Plane {
    pub fn new(origin: Point3f, normal: Vec3f, material: Material) -> anyhow::Result<Self> {
        material.validate()?;
        Ok(Self { geom: PlaneGeometry::new(origin, normal)?, material })
    }
}

impl SceneObject for Plane {
    fn intersect(&self, ray: &Ray) -> Option<Float> {
        self.geom.intersect(ray)
    }

    fn surface_normal(&self, _p: Point3f) -> Vec3f {
        self.geom.normal
    }

    fn material(&self, _p: Point3f) -> &Material {
        &self.material
    }

    fn ray_from(&self, from: Point3f) -> Vec3f {
        (self.geom.origin - from).normalize()
    }

    fn is_emitter(&self) -> bool {
        self.material.is_emissive()
    }
}

/// A plane tiled in a unit checkerboard over world X/Z.
#[derive(Debug, Clone)]
pub struct TiledPlane {
    geom: PlaneGeometry,
    white: Material,
    black: Material,
}

impl TiledPlane {
    /// Glossy white and black tiles, both 60% mirror.
    pub fn new(origin: Point3f, normal: Vec3f) -> anyhow::Result<Self> {
        let white = Material::new(rgb!(1, 1, 1), rgb!(1, 1, 1), 0.6, rgb!(0, 0, 0));
        let black = Material::new(rgb!(0, 0, 0), rgb!(0, 0, 0), 0.6, rgb!(0, 0, 0));
        Self::with_materials(origin, normal, white, black)
    }

    pub fn with_materials(
        origin: Point3f,
        normal: Vec3f,
        white: Material,
        black: Material,
    ) -> anyhow::Result<Self> {
        white.validate()?;
        black.validate()?;
        Ok(Self { geom: PlaneGeometry::new(origin, normal)?, white, black })
    }

    fn is_white(p: Point3f) -> bool {
        ((p.x.floor() + p.z.floor()) as i64) & 1 == 0
    }
}

impl SceneObject for TiledPlane {
    fn intersect(&self, ray: &Ray) -> Option<Float> {
        self.geom.intersect(ray)
    }

    fn surface_normal(&self, _p: Point3f) -> Vec3f {
        self.geom.normal
    }

    fn material(&self, p: Point3f) -> &Material {
        if Self::is_white(p) { &self.white } else { &self.black }
    }

    fn ray_from(&self, from: Point3f) -> Vec3f {
        (self.geom.origin - from).normalize()
    }

    fn is_emitter(&self) -> bool {
        self.white.is_emissive() || self.black.is_emissive()
    }
}
