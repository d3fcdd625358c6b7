use crate::{Float, Point2f, Point3f, Ray, Vec2f, Vec3f};
use cgmath::{Deg, InnerSpace, Quaternion, Rotation, Rotation3, Zero};
use std::time::Instant;

/// The view the tracer samples through. `Clone` so a trace can work from a snapshot
/// while input keeps moving the live camera.
pub trait Camera: Clone + Send + Sync + 'static {
    /// Pixel size of the image being rendered.
    fn set_film_size(&mut self, width: usize, height: usize);

    fn field_of_view(&self) -> Float;

    fn set_field_of_view(&mut self, degrees: Float);

    /// Advances any pending motion. Returns true if the view changed since the last call.
    fn update(&mut self) -> bool;

    /// A ray leaving the camera through a film-space position, in pixels.
    fn generate_ray(&self, sample: Point2f) -> Ray;
}

const WALK_SETTLE_MS: Float = 50.0;
const ORBIT_SETTLE_MS: Float = 80.0;

/// Pending motion waits until at least this much time has passed between updates.
const MIN_STEP_MS: Float = 1.0;

/// A pinhole camera that looks at a focal point and can be orbited, dollied and walked.
/// Motion requests are applied gradually by `update`, easing toward the target.
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    position: Point3f,
    focal_point: Point3f,
    view_dir: Vec3f,
    right: Vec3f,
    up: Vec3f,

    film_size: (usize, usize),
    aspect: Float,
    fov: Float,
    half_angle: Float,

    orbit_delta: Vec2f,
    dolly_delta: Vec3f,
    walk_delta: Vec3f,
    dirty: bool,
    last_update: Option<Instant>,
}

impl PerspectiveCamera {
    pub fn new(position: Point3f, focal_point: Point3f, fov: Float) -> Self {
        let mut camera = Self {
            position,
            focal_point,
            view_dir: Vec3f::unit_z(),
            right: Vec3f::unit_x(),
            up: Vec3f::unit_y(),
            film_size: (1, 1),
            aspect: 1.0,
            fov,
            half_angle: (fov.to_radians() / 2.0).tan(),
            orbit_delta: Vec2f::zero(),
            dolly_delta: Vec3f::zero(),
            walk_delta: Vec3f::zero(),
            dirty: true,
            last_update: None,
        };
        camera.set_position_and_focal_point(position, focal_point);
        camera
    }

    pub fn set_position_and_focal_point(&mut self, position: Point3f, focal_point: Point3f) {
        self.position = position;
        self.focal_point = focal_point;
        let dir = focal_point - position;
        if dir.magnitude2() > 0.0 {
            self.view_dir = dir.normalize();
        }
        self.update_right_up();
        self.dirty = true;
    }

    pub fn position(&self) -> Point3f {
        self.position
    }

    pub fn view_direction(&self) -> Vec3f {
        self.view_dir
    }

    /// Queue a rotation about the focal point, in degrees: `x` around world up, `y` around
    /// the camera's right axis.
    pub fn orbit(&mut self, angle: Vec2f) {
        self.orbit_delta += angle;
    }

    /// Queue a move toward (positive) or away from the focal point.
    pub fn dolly(&mut self, distance: Float) {
        self.dolly_delta += self.view_dir * distance;
    }

    /// Queue a move of camera and focal point together, in (right, up, forward) units.
    pub fn walk(&mut self, planes: Vec3f) {
        self.walk_delta += self.right * planes.x + self.up * planes.y + self.view_dir * planes.z;
    }

    fn update_right_up(&mut self) {
        let right = Vec3f::unit_y().cross(self.view_dir);
        // looking straight up or down keeps the previous right vector
        if right.magnitude2() > 1.0e-8 {
            self.right = right.normalize();
        }
        self.up = self.view_dir.cross(self.right).normalize();
    }

    fn settle(delta_ms: Float, settle_ms: Float) -> Float {
        (delta_ms / settle_ms).min(1.0)
    }

    fn apply_orbit(&mut self, frac: Float) {
        let angle = self.orbit_delta * frac;
        self.orbit_delta *= 1.0 - frac;
        if self.orbit_delta.x.abs() < 1.0e-5 && self.orbit_delta.y.abs() < 1.0e-5 {
            self.orbit_delta = Vec2f::zero();
        }

        let yaw = Quaternion::from_axis_angle(Vec3f::unit_y(), Deg(angle.x));
        let pitch = Quaternion::from_axis_angle(self.right, Deg(angle.y));
        let distance = (self.focal_point - self.position).magnitude();

        self.view_dir = (yaw * pitch).rotate_vector(self.view_dir).normalize();
        self.position = self.focal_point - self.view_dir * distance;
        self.update_right_up();
    }

    fn apply_dolly(&mut self, frac: Float) {
        let step = self.dolly_delta * frac;
        self.dolly_delta = snap_to_zero(self.dolly_delta * (1.0 - frac));
        self.position += step;
    }

    fn apply_walk(&mut self, frac: Float) {
        let step = self.walk_delta * frac;
        self.walk_delta = snap_to_zero(self.walk_delta * (1.0 - frac));
        self.position += step;
        self.focal_point += step;
    }
}

fn snap_to_zero(v: Vec3f) -> Vec3f {
    if v.magnitude2() < 1.0e-10 { Vec3f::zero() } else { v }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(point3f!(0.0, 6.0, -8.0), point3f!(0.0, -0.8, 1.0), 60.0)
    }
}

impl Camera for PerspectiveCamera {
    fn set_film_size(&mut self, width: usize, height: usize) {
        let size = (width.max(1), height.max(1));
        if size != self.film_size {
            self.film_size = size;
            self.aspect = size.0 as Float / size.1 as Float;
            self.dirty = true;
        }
    }

    fn field_of_view(&self) -> Float {
        self.fov
    }

    fn set_field_of_view(&mut self, degrees: Float) {
        if degrees != self.fov {
            self.fov = degrees;
            self.dirty = true;
        }
    }

    fn update(&mut self) -> bool {
        self.half_angle = (self.fov.to_radians() / 2.0).tan();

        let now = Instant::now();
        let delta_ms = self.last_update
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32() * 1000.0);
        self.last_update = Some(now);

        let mut changed = std::mem::replace(&mut self.dirty, false);
        if delta_ms < MIN_STEP_MS {
            return changed;
        }

        if self.orbit_delta != Vec2f::zero() {
            self.apply_orbit(Self::settle(delta_ms, ORBIT_SETTLE_MS));
            changed = true;
        }

        if self.dolly_delta != Vec3f::zero() {
            self.apply_dolly(Self::settle(delta_ms, WALK_SETTLE_MS));
            changed = true;
        }

        if self.walk_delta != Vec3f::zero() {
            self.apply_walk(Self::settle(delta_ms, WALK_SETTLE_MS));
            changed = true;
        }

        changed
    }

    fn generate_ray(&self, sample: Point2f) -> Ray {
        let x = (sample.x * 2.0) / self.film_size.0 as Float - 1.0;
        let y = (sample.y * 2.0) / self.film_size.1 as Float - 1.0;

        let dir = self.view_dir
            + self.right * (self.half_angle * self.aspect * x)
            - self.up * (self.half_angle * y);

        Ray::new(self.position, dir.normalize())
    }
}
