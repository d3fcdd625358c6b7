use crate::{Float, Point3f, Vec3f};
use cgmath::InnerSpace;

/// Distance a spawned ray's origin is pushed along its direction so that it does not
/// immediately re-hit the surface it leaves. Larger than float error at scene scale, much
/// smaller than any object in it.
pub const RAY_EPSILON: Float = 1.0e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3f,
    pub dir: Vec3f,
}

impl Ray {
    pub fn new(origin: Point3f, dir: Vec3f) -> Self {
        Self { origin, dir }
    }

    /// A ray leaving a surface point, offset by `RAY_EPSILON` along `dir`.
    pub fn spawn(p: Point3f, dir: Vec3f) -> Self {
        Self::new(p + dir * RAY_EPSILON, dir)
    }

    pub fn at(&self, t: Float) -> Point3f {
        self.origin + (self.dir * t)
    }
}

/// Mirror `d` about the normal `n`.
pub fn reflect(d: Vec3f, n: Vec3f) -> Vec3f {
    d - n * (2.0 * d.dot(n))
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_reflect_about_up() {
        let d = vec3f!(1, -1, 0).normalize();
        let r = reflect(d, vec3f!(0, 1, 0));
        assert_abs_diff_eq!(r, vec3f!(1, 1, 0).normalize(), epsilon = 1e-6);
    }

    #[test]
    fn test_spawn_offsets_along_direction() {
        let ray = Ray::spawn(point3f!(0, 0, 0), vec3f!(0, 1, 0));
        assert_abs_diff_eq!(ray.origin.y, RAY_EPSILON);
        assert_abs_diff_eq!(ray.at(1.0).y, 1.0 + RAY_EPSILON);
    }
}
