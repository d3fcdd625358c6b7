use crate::shapes::SceneObject;
use crate::{Float, Ray};

pub mod demo;

/// The nearest surface along a ray.
#[derive(Clone, Copy)]
pub struct Hit<'s> {
    /// Position of the object in the scene's insertion order.
    pub index: usize,
    pub object: &'s dyn SceneObject,
    pub dist: Float,
}

#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<Box<dyn SceneObject>>,
    emitters: Vec<usize>,
}

impl Scene {
    pub fn new(objects: Vec<Box<dyn SceneObject>>) -> Self {
        let emitters = objects.iter()
            .enumerate()
            .filter(|(_, obj)| obj.is_emitter())
            .map(|(i, _)| i)
            .collect();

        Self { objects, emitters }
    }

    /// Linear scan over every object. On exactly equal distances the earlier object wins.
    pub fn find_nearest(&self, ray: &Ray) -> Option<Hit<'_>> {
        let mut nearest: Option<Hit> = None;
        for (index, obj) in self.objects.iter().enumerate() {
            match obj.intersect(ray) {
                Some(dist) if nearest.map_or(true, |n| dist < n.dist) => {
                    nearest = Some(Hit { index, object: obj.as_ref(), dist });
                }
                _ => {}
            }
        }
        nearest
    }

    pub fn object(&self, index: usize) -> &dyn SceneObject {
        self.objects[index].as_ref()
    }

    /// Indices of the objects that can emit light.
    pub fn emitters(&self) -> &[usize] {
        &self.emitters
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
