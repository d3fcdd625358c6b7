use crate::integrator::{background, IntegratorRadiance};
use crate::scene::{Hit, Scene};
use crate::spectrum::Spectrum;
use crate::{reflect, Float, Point3f, Ray, Vec3f};
use cgmath::InnerSpace;

const PHONG_EXPONENT: i32 = 10;

/// Recursive mirror reflection plus direct lighting from every emissive object.
pub struct WhittedIntegrator {
    pub max_depth: u16,
}

impl WhittedIntegrator {
    pub fn new(max_depth: u16) -> Self {
        Self { max_depth }
    }

    /// Shades one ray. Reflection rays are handed to `trace` rather than recursing
    /// directly, so callers can observe the recursion.
    pub fn shade<F>(&self, ray: &Ray, scene: &Scene, depth: u16, trace: &F) -> Spectrum
        where F: Fn(&Ray, u16) -> Spectrum
    {
        let ray = Ray::new(ray.origin, ray.dir.normalize());
        let hit = match scene.find_nearest(&ray) {
            Some(hit) => hit,
            None => return background(),
        };

        let pos = ray.at(hit.dist);
        let normal = hit.object.surface_normal(pos);
        let material = hit.object.material(pos);
        let reflect_dir = reflect(ray.dir, normal);

        let mut radiance = Spectrum::black();

        if depth < self.max_depth && material.reflectance > 0.0 {
            let reflected = trace(&Ray::spawn(pos, reflect_dir), depth + 1);
            radiance = reflected * material.reflectance;
        }

        for &emitter in scene.emitters() {
            let emitter_obj = scene.object(emitter);
            let light_dir = emitter_obj.ray_from(pos);
            let emissive = match visible_emission(scene, emitter, pos, light_dir) {
                Some(e) => e,
                None => continue,
            };

            let (diffuse, spec) = phong_terms(normal, reflect_dir, light_dir);
            radiance += emissive * material.albedo * diffuse + material.specular * spec;
        }

        // The reflected light is weighted by (1 - reflectance) a second time here, along
        // with the direct light. Kept for compatibility with existing renders.
        radiance *= 1.0 - material.reflectance;
        radiance + material.emissive
    }
}

impl IntegratorRadiance for WhittedIntegrator {
    fn incident_radiance(&self, ray: &Ray, scene: &Scene, depth: u16) -> Spectrum {
        self.shade(ray, scene, depth, &|r: &Ray, d| self.incident_radiance(r, scene, d))
    }
}

/// Emission reaching `pos` from the object at `emitter`, or `None` if the shadow ray hits
/// something else first, misses entirely, or lands on a non-emissive part of the emitter.
fn visible_emission(scene: &Scene, emitter: usize, pos: Point3f, light_dir: Vec3f) -> Option<Spectrum> {
    let shadow_ray = Ray::spawn(pos, light_dir);
    let Hit { index, object, dist } = scene.find_nearest(&shadow_ray)?;
    if index != emitter {
        return None;
    }

    let material = object.material(shadow_ray.at(dist));
    if material.is_emissive() { Some(material.emissive) } else { None }
}

/// Lambert and Phong intensities. The highlight only shows on lit faces.
fn phong_terms(normal: Vec3f, reflect_dir: Vec3f, light_dir: Vec3f) -> (Float, Float) {
    let diffuse = normal.dot(light_dir);
    if diffuse <= 0.0 {
        return (0.0, 0.0);
    }

    let spec = reflect_dir.dot(light_dir);
    let spec = if spec > 0.0 { spec.powi(PHONG_EXPONENT) } else { 0.0 };
    (diffuse, spec)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::material::Material;
    use crate::shapes::{Plane, SceneObject, Sphere};
    use approx::assert_abs_diff_eq;
    use std::cell::Cell;

    fn mirror() -> Material {
        Material::new(rgb!(0.5, 0.5, 0.5), rgb!(0, 0, 0), 1.0, rgb!(0, 0, 0))
    }

    /// Two facing mirrors, so a ray between them would bounce forever.
    fn hall_of_mirrors() -> Scene {
        let objects: Vec<Box<dyn SceneObject>> = vec![
            Box::new(Plane::new(point3f!(0, 0, 0), vec3f!(0, 1, 0), mirror()).unwrap()),
            Box::new(Plane::new(point3f!(0, 4, 0), vec3f!(0, -1, 0), mirror()).unwrap()),
        ];
        Scene::new(objects)
    }

    #[test]
    fn test_miss_is_background() {
        let scene = hall_of_mirrors();
        let integrator = WhittedIntegrator::new(3);
        let ray = Ray::new(point3f!(0, 2, 0), vec3f!(1, 0, 0));
        assert_eq!(integrator.incident_radiance(&ray, &scene, 0), background());
    }

    #[test]
    fn test_recursion_bounded_by_max_depth() {
        let scene = hall_of_mirrors();
        for max_depth in 0..6 {
            let integrator = WhittedIntegrator::new(max_depth);
            let calls = Cell::new(0u32);
            let deepest = Cell::new(0u16);

            fn counted(
                integrator: &WhittedIntegrator,
                scene: &Scene,
                ray: &Ray,
                depth: u16,
                calls: &Cell<u32>,
                deepest: &Cell<u16>,
            ) -> Spectrum {
                calls.set(calls.get() + 1);
                deepest.set(deepest.get().max(depth));
                integrator.shade(ray, scene, depth, &|r: &Ray, d| counted(integrator, scene, r, d, calls, deepest))
            }

            let ray = Ray::new(point3f!(0, 2, 0), vec3f!(0.3, 1, 0.1));
            counted(&integrator, &scene, &ray, 0, &calls, &deepest);
            assert_eq!(calls.get(), max_depth as u32 + 1);
            assert_eq!(deepest.get(), max_depth);
        }
    }

    #[test]
    fn test_emitter_lights_itself_only_by_emission() {
        let light = Material::new(rgb!(0.3, 0.3, 0.3), rgb!(1, 1, 1), 0.0, rgb!(1.0, 0.5, 0.25));
        let objects: Vec<Box<dyn SceneObject>> = vec![
            Box::new(Sphere::new(point3f!(0, 0, 5), 1.0, light).unwrap()),
        ];
        let scene = Scene::new(objects);
        let ray = Ray::new(point3f!(0, 0, 0), vec3f!(0, 0, 1));
        let color = WhittedIntegrator::new(1).incident_radiance(&ray, &scene, 0);
        assert_eq!(color, rgb!(1.0, 0.5, 0.25));
    }

    #[test]
    fn test_occluded_light_contributes_nothing() {
        let floor = Material::diffuse(rgb!(1, 1, 1));
        let objects: Vec<Box<dyn SceneObject>> = vec![
            Box::new(Plane::new(point3f!(0, 0, 0), vec3f!(0, 1, 0), floor).unwrap()),
            Box::new(Sphere::new(point3f!(0, 2, 0), 0.5, Material::default()).unwrap()),
            Box::new(Sphere::new(point3f!(0, 5, 0), 1.0, Material::emitter(rgb!(1, 1, 1))).unwrap()),
        ];
        let scene = Scene::new(objects);
        let ray = Ray::new(point3f!(0.01, 1, -1), vec3f!(-0.01, -1, 1));
        let color = WhittedIntegrator::new(1).incident_radiance(&ray, &scene, 0);
        assert_eq!(color, Spectrum::black());
    }

    #[test]
    fn test_phong_terms() {
        let n = vec3f!(0, 1, 0);
        let (d, s) = phong_terms(n, n, n);
        assert_abs_diff_eq!(d, 1.0);
        assert_abs_diff_eq!(s, 1.0);

        // light below the surface contributes neither term
        let (d, s) = phong_terms(n, n, -n);
        assert_eq!((d, s), (0.0, 0.0));
    }
}
