use crate::material::Material;
use crate::shapes::SceneObject;
use crate::{Float, Point3f, Ray, Vec3f};
use cgmath::InnerSpace;

#[derive(Debug, Clone)]
pub struct Sphere {
    pub center: Point3f,
    pub radius: Float,
    material: Material,
}

impl Sphere {
    pub fn new(center: Point3f, radius: Float, material: Material) -> anyhow::Result<Self> {
        anyhow::ensure!(
            radius.is_finite() && radius > 0.0,
            "sphere at {:?} has degenerate radius {}", center, radius
        );
        material.validate()?;
        Ok(Self { center, radius, material })
    }
}

impl SceneObject for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<Float> {
        let dir = ray.dir.normalize();
        let oc = ray.origin - self.center;
        let b = oc.dot(dir);
        let c = oc.magnitude2() - self.radius * self.radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let t0 = -b - root;
        let t1 = -b + root;

        // origin inside the sphere only hits the far side
        if t0 > 0.0 {
            Some(t0)
        } else if t1 > 0.0 {
            Some(t1)
        } else {
            None
        }
    }

    fn surface_normal(&self, p: Point3f) -> Vec3f {
        (p - self.center).normalize()
    }

    fn material(&self, _p: Point3f) -> &Material {
        &self.material
    }

    fn ray_from(&self, from: Point3f) -> Vec3f {
        (self.center - from).normalize()
    }

    fn is_emitter(&self) -> bool {
        self.material.is_emissive()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_sphere() -> Sphere {
        Sphere::new(point3f!(0, 0, 0), 1.0, Material::default()).unwrap()
    }

    #[test]
    fn test_hit_from_outside() {
        let ray = Ray::new(point3f!(0, 0, -5), vec3f!(0, 0, 1));
        let t = unit_sphere().intersect(&ray).unwrap();
        assert_abs_diff_eq!(t, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_hit_from_inside_returns_far_side() {
        let ray = Ray::new(point3f!(0, 0, 0), vec3f!(1, 0, 0));
        let t = unit_sphere().intersect(&ray).unwrap();
        assert_abs_diff_eq!(t, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_behind_origin_is_a_miss() {
        let ray = Ray::new(point3f!(0, 0, 5), vec3f!(0, 0, 1));
        assert_eq!(unit_sphere().intersect(&ray), None);
    }

    #[test]
    fn test_unnormalized_direction_reports_world_distance() {
        let ray = Ray::new(point3f!(0, 0, -5), vec3f!(0, 0, 3));
        let t = unit_sphere().intersect(&ray).unwrap();
        assert_abs_diff_eq!(t, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_degenerate_radius_rejected() {
        assert!(Sphere::new(point3f!(0, 0, 0), 0.0, Material::default()).is_err());
        assert!(Sphere::new(point3f!(0, 0, 0), -1.0, Material::default()).is_err());
        assert!(Sphere::new(point3f!(0, 0, 0), Float::NAN, Material::default()).is_err());
    }

    #[test]
    fn test_normal_and_direction() {
        let s = unit_sphere();
        assert_abs_diff_eq!(s.surface_normal(point3f!(0, 2, 0)), vec3f!(0, 1, 0));
        assert_abs_diff_eq!(s.ray_from(point3f!(0, 0, 3)), vec3f!(0, 0, -1));
    }
}
