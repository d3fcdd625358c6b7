//! The built-in scene: a handful of coloured spheres, two lights and a glossy
//! checkerboard floor.

use crate::material::Material;
use crate::scene::Scene;
use crate::shapes::{SceneObject, Sphere, TiledPlane};

pub fn demo_scene() -> anyhow::Result<Scene> {
    let red = Material::new(rgb!(0.7, 0.1, 0.1), rgb!(0.9, 0.1, 0.1), 0.5, rgb!(0, 0, 0));
    let purple = Material::new(rgb!(0.7, 0.0, 0.7), rgb!(0.9, 0.9, 0.8), 0.5, rgb!(0, 0, 0));
    let blue = Material::new(rgb!(0.0, 0.3, 1.0), rgb!(0.0, 0.0, 1.0), 0.0, rgb!(0, 0, 0));
    let yellow_light = Material::new(rgb!(1, 1, 1), rgb!(0, 0, 0), 0.0, rgb!(1.2, 1.2, 0.0));
    let white_light = Material::new(rgb!(0.0, 0.8, 0.0), rgb!(0, 0, 0), 0.0, rgb!(1.2, 1.2, 1.2));

    let objects: Vec<Box<dyn SceneObject>> = vec![
        Box::new(Sphere::new(point3f!(0.0, 2.0, 0.0), 2.0, red)?),
        Box::new(Sphere::new(point3f!(-2.5, 1.0, -2.0), 1.0, purple)?),
        Box::new(Sphere::new(point3f!(0.0, 0.5, -3.0), 0.5, blue)?),
        Box::new(Sphere::new(point3f!(2.8, 0.8, -2.0), 0.8, yellow_light)?),
        Box::new(Sphere::new(point3f!(-10.8, 8.4, -10.0), 0.4, white_light)?),
        Box::new(TiledPlane::new(point3f!(0, 0, 0), vec3f!(0, 1, 0))?),
    ];

    let scene = Scene::new(objects);
    tracing::debug!(objects = scene.len(), emitters = scene.emitters().len(), "built demo scene");
    Ok(scene)
}
