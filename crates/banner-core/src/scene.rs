//! Scene graph types shared with the renderers.
//!
//! These types avoid referencing platform-specific APIs so the same scene can
//! be drawn by the web and native front-ends and inspected by host tests.

use crate::config::CameraConfig;
use crate::constants::{PLANE_HEIGHT, PLANE_WIDTH};
use crate::timeline::{PlaneSample, PlaneTimeline};
use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaneId(pub u64);

/// Handle to a texture owned by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Right-handed perspective camera looking down -z at the origin.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, config.z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: config.fov_deg.to_radians(),
            znear: config.near,
            zfar: config.far,
        }
    }

    /// Recompute the aspect ratio for a surface of `width` x `height` pixels.
    /// Degenerate sizes leave the camera unchanged.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// A transient textured quad.
#[derive(Clone, Debug)]
pub struct Plane {
    pub id: PlaneId,
    pub texture: Option<TextureId>,
    pub tint: [f32; 3],
    /// Tween-clock time at which the plane entered the scene.
    pub born_at: f64,
    pub timeline: PlaneTimeline,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec2,
    pub opacity: f32,
    released: bool,
}

impl Plane {
    pub fn new(
        id: PlaneId,
        texture: Option<TextureId>,
        tint: [f32; 3],
        born_at: f64,
        timeline: PlaneTimeline,
    ) -> Self {
        let mut plane = Self {
            id,
            texture,
            tint,
            born_at,
            timeline,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec2::ONE,
            opacity: 0.0,
            released: false,
        };
        let first = plane.timeline.sample(0.0);
        plane.apply(&first);
        plane
    }

    /// Seconds since the plane entered the scene at clock time `now`.
    #[inline]
    pub fn age(&self, now: f64) -> f32 {
        (now - self.born_at) as f32
    }

    pub fn apply(&mut self, s: &PlaneSample) {
        self.position = s.position;
        self.rotation = s.rotation;
        self.scale = Vec2::splat(s.scale);
        self.opacity = s.opacity;
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Hand out the plane's GPU resources for release. Returns `None` if they
    /// were already handed out, so a plane can never be freed twice.
    pub fn take_resources(&mut self) -> Option<Option<TextureId>> {
        if self.released {
            return None;
        }
        self.released = true;
        Some(self.texture.take())
    }

    pub fn model_matrix(&self) -> Mat4 {
        let rot = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        let scale = Vec3::new(self.scale.x * PLANE_WIDTH, self.scale.y * PLANE_HEIGHT, 1.0);
        Mat4::from_scale_rotation_translation(scale, rot, self.position)
    }
}

/// Live planes plus the clear color.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub background: [f32; 3],
    planes: Vec<Plane>,
}

impl Scene {
    pub fn new(background: [f32; 3]) -> Self {
        Self {
            background,
            planes: Vec::new(),
        }
    }

    pub fn add(&mut self, plane: Plane) {
        self.planes.push(plane);
    }

    pub fn remove(&mut self, id: PlaneId) -> Option<Plane> {
        let idx = self.planes.iter().position(|p| p.id == id)?;
        Some(self.planes.remove(idx))
    }

    pub fn contains(&self, id: PlaneId) -> bool {
        self.planes.iter().any(|p| p.id == id)
    }

    pub fn get(&self, id: PlaneId) -> Option<&Plane> {
        self.planes.iter().find(|p| p.id == id)
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn planes_mut(&mut self) -> &mut [Plane] {
        &mut self.planes
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Remove and return every plane.
    pub fn drain(&mut self) -> Vec<Plane> {
        std::mem::take(&mut self.planes)
    }
}
