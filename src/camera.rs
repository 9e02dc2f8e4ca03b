use crate::constants::*;
use glam::{Mat4, Vec2, Vec3, Vec4};
use std::f32::consts::{PI, TAU};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: CAMERA_HOME,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 16.0 / 9.0,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Back to the start-up pose looking at the origin.
    pub fn go_home(&mut self) {
        self.eye = CAMERA_HOME;
        self.target = Vec3::ZERO;
        self.up = Vec3::Y;
    }

    /// World-space ray through a normalized device coordinate
    /// (`x`, `y` in -1..1, `y` up).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        let p_near = inv * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let p0: Vec3 = p_near.truncate() / p_near.w;
        let p1: Vec3 = p_far.truncate() / p_far.w;
        Ray::new(self.eye, p1 - p0)
    }

    /// Normalized device coordinate of a world-space point.
    pub fn project(&self, world: Vec3) -> Vec2 {
        let p = self.view_projection().project_point3(world);
        Vec2::new(p.x, p.y)
    }
}

/// Camera supplied by an immersive session host (device pose).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostCamera {
    pub view: Mat4,
    pub projection: Mat4,
}

impl HostCamera {
    pub fn eye(&self) -> Vec3 {
        self.view.inverse().transform_point3(Vec3::ZERO)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Same ray expressed in the space `inv_world` maps into. The direction
    /// is left unnormalized so `t` stays comparable after mapping back.
    pub fn transformed(&self, inv_world: &Mat4) -> Ray {
        Ray {
            origin: inv_world.transform_point3(self.origin),
            direction: inv_world.transform_vector3(self.direction),
        }
    }
}

/// Möller–Trumbore. Returns the ray parameter of the hit. With `cull_back`
/// set, triangles seen from behind (clockwise from the ray origin) miss.
pub fn ray_triangle(ray: &Ray, tri: &[Vec3; 3], cull_back: bool) -> Option<f32> {
    const EPS: f32 = 1e-7;
    let e1 = tri[1] - tri[0];
    let e2 = tri[2] - tri[0];
    let p = ray.direction.cross(e2);
    let det = e1.dot(p);
    if cull_back && det < EPS {
        return None;
    }
    if det.abs() < EPS {
        return None;
    }
    let inv = 1.0 / det;
    let s = ray.origin - tri[0];
    let u = s.dot(p) * inv;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.direction.dot(q) * inv;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv;
    (t >= 0.0).then_some(t)
}

/// Pointer-drag orbit around a target with damped inertia, dolly on wheel.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub enabled: bool,
    pub target: Vec3,
    pub damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    drag_from: Option<Vec2>,
    saved_eye: Vec3,
    saved_target: Vec3,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(&Camera::default())
    }
}

impl OrbitControls {
    pub fn new(camera: &Camera) -> Self {
        Self {
            enabled: true,
            target: camera.target,
            damping: ORBIT_DAMPING,
            min_distance: ORBIT_MIN_DISTANCE,
            max_distance: ORBIT_MAX_DISTANCE,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            drag_from: None,
            saved_eye: camera.eye,
            saved_target: camera.target,
        }
    }

    pub fn begin_drag(&mut self, px: Vec2) {
        if self.enabled {
            self.drag_from = Some(px);
        }
    }

    /// `viewport_height` in the same pixel units as `px`.
    pub fn drag_to(&mut self, px: Vec2, viewport_height: f32) {
        let Some(from) = self.drag_from else {
            return;
        };
        if !self.enabled {
            self.drag_from = None;
            return;
        }
        let h = viewport_height.max(1.0);
        let d = px - from;
        self.delta_theta -= TAU * d.x / h * ORBIT_ROTATE_SPEED;
        self.delta_phi -= TAU * d.y / h * ORBIT_ROTATE_SPEED;
        self.drag_from = Some(px);
    }

    pub fn end_drag(&mut self) {
        self.drag_from = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    /// Positive `notches` move away from the target.
    pub fn dolly(&mut self, notches: f32) {
        if self.enabled {
            self.scale *= ORBIT_ZOOM_STEP.powf(-notches);
        }
    }

    /// One damped step: applies a fraction of the pending rotation and
    /// decays the rest.
    pub fn update(&mut self, camera: &mut Camera) {
        let offset = camera.eye - self.target;
        let mut radius = offset.length().max(1e-6);
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        theta += self.delta_theta * self.damping;
        phi += self.delta_phi * self.damping;
        phi = phi.clamp(1e-6, PI - 1e-6);
        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        let sin_phi = phi.sin();
        camera.eye = self.target
            + Vec3::new(
                radius * sin_phi * theta.sin(),
                radius * phi.cos(),
                radius * sin_phi * theta.cos(),
            );
        camera.target = self.target;

        self.delta_theta *= 1.0 - self.damping;
        self.delta_phi *= 1.0 - self.damping;
        self.scale = 1.0;
    }

    /// Restore the pose captured at construction and drop pending motion.
    pub fn reset(&mut self, camera: &mut Camera) {
        camera.eye = self.saved_eye;
        self.target = self.saved_target;
        camera.target = self.saved_target;
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
        self.drag_from = None;
    }
}
