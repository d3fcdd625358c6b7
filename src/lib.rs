#[macro_use] pub mod macros; // must stay at the top
pub mod geometry;
pub mod spectrum;
pub mod material;
pub mod shapes;
pub mod scene;
pub mod integrator;
pub mod camera;
pub mod sampler;
pub mod film;
pub mod settings;
pub mod renderer;
pub mod controller;
pub mod surface;
pub mod imageio;

pub use geometry::*;

use cgmath::{Point2, Point3, Vector2, Vector3};

pub type Float = f32;

pub type Point2f = Point2<Float>;
pub type Point3f = Point3<Float>;
pub type Vec2f = Vector2<Float>;
pub type Vec3f = Vector3<Float>;
