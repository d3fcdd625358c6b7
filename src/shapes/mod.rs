use crate::material::Material;
use crate::{Float, Point3f, Ray, Vec3f};

pub mod sphere;
pub mod plane;

pub use plane::{Plane, TiledPlane};
pub use sphere::Sphere;

/// A geometric primitive in the scene. Implementations are immutable once the scene is
/// built and are shared read-only between all render workers.
pub trait SceneObject: std::fmt::Debug + Send + Sync {
    /// Distance along `ray` to the nearest surface point in front of the origin.
    /// Hits at `t <= 0` are never reported.
    fn intersect(&self, ray: &Ray) -> Option<Float>;

    /// Unit surface normal at a point on the surface.
    fn surface_normal(&self, p: Point3f) -> Vec3f;

    /// Material at a point on the surface.
    fn material(&self, p: Point3f) -> &Material;

    /// Unit direction from `from` toward the object's representative point
    /// (a sphere's centre, a plane's origin).
    fn ray_from(&self, from: Point3f) -> Vec3f;

    /// Whether any part of the surface emits light.
    fn is_emitter(&self) -> bool;
}
