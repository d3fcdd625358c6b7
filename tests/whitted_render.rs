use approx::assert_abs_diff_eq;
use pretty_assertions::assert_eq;
use progressive_tracer::camera::{Camera, PerspectiveCamera};
use progressive_tracer::film::AccumulationBuffer;
use progressive_tracer::integrator::{background, IntegratorRadiance, WhittedIntegrator};
use progressive_tracer::material::Material;
use progressive_tracer::renderer::PartitionedRenderer;
use progressive_tracer::scene::demo::demo_scene;
use progressive_tracer::scene::Scene;
use progressive_tracer::shapes::{SceneObject, Sphere, TiledPlane};
use progressive_tracer::spectrum::Spectrum;
use progressive_tracer::{point3f, rgb, vec3f, Float, Point2f, Point3f, Ray, Vec3f};
use cgmath::InnerSpace;
use std::sync::atomic::AtomicBool;

/// An all-white glossy floor with a single white light hanging above the origin.
fn lit_floor() -> anyhow::Result<Scene> {
    let tile = Material::new(rgb!(1, 1, 1), rgb!(1, 1, 1), 0.6, rgb!(0, 0, 0));
    let objects: Vec<Box<dyn SceneObject>> = vec![
        Box::new(TiledPlane::with_materials(point3f!(0, 0, 0), vec3f!(0, 1, 0), tile, tile)?),
        Box::new(Sphere::new(point3f!(0, 5, 0), 1.0, Material::emitter(rgb!(1, 1, 1)))?),
    ];
    Ok(Scene::new(objects))
}

fn small_camera(width: usize, height: usize) -> PerspectiveCamera {
    let mut camera = PerspectiveCamera::default();
    camera.set_film_size(width, height);
    camera.update();
    camera
}

#[test]
fn floor_lit_from_above() -> anyhow::Result<()> {
    let scene = lit_floor()?;
    let integrator = WhittedIntegrator::new(1);
    let ray = Ray::new(point3f!(0, 2, -5), vec3f!(0, -2, 5).normalize());

    let l = integrator.incident_radiance(&ray, &scene, 0);

    // mirror bounce sees the background, the light is straight overhead (full Lambert
    // term) and the highlight is (2/sqrt(29))^10
    let spec = (2.0 / (29.0 as Float).sqrt()).powi(10);
    let expected = (0.1 * 0.6 + 1.0 + spec) * (1.0 - 0.6);
    for c in 0..3 {
        assert_abs_diff_eq!(l[c], expected, epsilon = 1e-3);
    }
    Ok(())
}

#[test]
fn ray_leaving_scene_sees_background() -> anyhow::Result<()> {
    let scene = lit_floor()?;
    let integrator = WhittedIntegrator::new(3);
    let ray = Ray::new(point3f!(0, 2, -5), vec3f!(0, 0, -1));
    assert_eq!(integrator.incident_radiance(&ray, &scene, 0), background());

    let empty = Scene::default();
    assert_eq!(integrator.incident_radiance(&ray, &empty, 0), background());
    Ok(())
}

#[test]
fn light_seen_directly_is_its_emission() -> anyhow::Result<()> {
    let scene = lit_floor()?;
    let integrator = WhittedIntegrator::new(3);
    let ray = Ray::new(point3f!(0, 5, -10), vec3f!(0, 0, 1));
    assert_eq!(integrator.incident_radiance(&ray, &scene, 0), Spectrum::uniform(1.0));
    Ok(())
}

#[test]
fn fixed_offset_passes_converge_to_single_evaluation() -> anyhow::Result<()> {
    let (w, h) = (16, 12);
    let scene = demo_scene()?;
    let camera = small_camera(w, h);
    let integrator = WhittedIntegrator::new(3);
    let sample = Point2f::new(0.5, 0.5);
    let cancel = AtomicBool::new(false);

    let mut renderer = PartitionedRenderer::new();
    let mut buffer = AccumulationBuffer::new(w, h);
    for pass in 1..=4 {
        let report = renderer.render_pass(&scene, &camera, &integrator, &mut buffer, 3, sample, &cancel)?;
        assert_eq!(report.samples, pass);
        assert_eq!(report.rows_traced, h);
        assert!(!report.cancelled);
        assert_eq!(report.failed_partitions, 0);
    }

    for y in 0..h {
        for x in 0..w {
            let ray = camera.generate_ray(Point2f::new(x as Float + 0.5, y as Float + 0.5));
            let expected = integrator.incident_radiance(&ray, &scene, 0);
            let actual = buffer.pixel(x, y);
            for c in 0..3 {
                assert_abs_diff_eq!(actual[c], expected[c], epsilon = 1e-4);
            }
        }
    }
    Ok(())
}

#[test]
fn partition_count_does_not_change_the_image() -> anyhow::Result<()> {
    let (w, h) = (20, 13);
    let scene = demo_scene()?;
    let camera = small_camera(w, h);
    let integrator = WhittedIntegrator::new(2);
    let cancel = AtomicBool::new(false);
    let sample = Point2f::new(0.25, 0.75);

    let mut renderer = PartitionedRenderer::new();
    let mut single = AccumulationBuffer::new(w, h);
    renderer.render_pass(&scene, &camera, &integrator, &mut single, 1, sample, &cancel)?;

    for &partitions in &[2, 5, 12] {
        let mut split = AccumulationBuffer::new(w, h);
        renderer.render_pass(&scene, &camera, &integrator, &mut split, partitions, sample, &cancel)?;
        assert_eq!(split.pixels(), single.pixels());
    }
    Ok(())
}

#[test]
fn cancelled_pass_is_not_counted() -> anyhow::Result<()> {
    let (w, h) = (8, 6);
    let scene = demo_scene()?;
    let camera = small_camera(w, h);
    let integrator = WhittedIntegrator::new(3);
    let cancel = AtomicBool::new(true);

    let mut renderer = PartitionedRenderer::new();
    let mut buffer = AccumulationBuffer::new(w, h);
    let report = renderer.render_pass(&scene, &camera, &integrator, &mut buffer, 2, Point2f::new(0.5, 0.5), &cancel)?;

    assert!(report.cancelled);
    assert_eq!(report.rows_traced, 0);
    assert_eq!(buffer.sample_count(), 0);
    assert!(buffer.pixels().iter().all(|p| p.is_black()));
    Ok(())
}

/// Blows up on every intersection test.
#[derive(Debug)]
struct Faulty(Material);

impl SceneObject for Faulty {
    fn intersect(&self, _ray: &Ray) -> Option<Float> {
        panic!("corrupt object");
    }

    fn surface_normal(&self, _p: Point3f) -> Vec3f {
        vec3f!(0, 1, 0)
    }

    fn material(&self, _p: Point3f) -> &Material {
        &self.0
    }

    fn ray_from(&self, _from: Point3f) -> Vec3f {
        vec3f!(0, 1, 0)
    }

    fn is_emitter(&self) -> bool {
        false
    }
}

#[test]
fn panicking_worker_is_contained() -> anyhow::Result<()> {
    let (w, h) = (4, 4);
    let objects: Vec<Box<dyn SceneObject>> = vec![Box::new(Faulty(Material::default()))];
    let scene = Scene::new(objects);
    let camera = small_camera(w, h);
    let integrator = WhittedIntegrator::new(1);
    let cancel = AtomicBool::new(false);

    let mut renderer = PartitionedRenderer::new();
    let mut buffer = AccumulationBuffer::new(w, h);
    let report = renderer.render_pass(&scene, &camera, &integrator, &mut buffer, 2, Point2f::new(0.5, 0.5), &cancel)?;

    assert_eq!(report.failed_partitions, 2);
    assert_eq!(report.rows_traced, 0);
    assert!(!report.cancelled);
    assert_eq!(report.samples, 0);
    assert_eq!(buffer.sample_count(), 0);
    Ok(())
}
