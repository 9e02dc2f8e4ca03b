//! Per-frame animation step.
//!
//! One call per display frame, whichever loop (window or immersive session)
//! drives it. Everything is computed from the elapsed time on [`Clock`], so
//! a given `(state, elapsed)` always produces the same scene.

use crate::builder::CardHandles;
use crate::camera::{Camera, HostCamera, OrbitControls};
use crate::config::Animations;
use crate::constants::*;
use crate::particles::field_rotation;
use crate::scene::Scene;
use crate::view::ViewState;
use glam::{Mat4, Vec3};
use instant::Instant;

#[cfg(target_arch = "wasm32")]
pub mod browser;

/// Matrices the renderer draws with this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderView {
    pub view: Mat4,
    pub projection: Mat4,
    pub eye: Vec3,
}

impl From<&Camera> for RenderView {
    fn from(camera: &Camera) -> Self {
        Self {
            view: camera.view_matrix(),
            projection: camera.projection_matrix(),
            eye: camera.eye,
        }
    }
}

impl From<HostCamera> for RenderView {
    fn from(camera: HostCamera) -> Self {
        Self {
            view: camera.view,
            projection: camera.projection,
            eye: camera.eye(),
        }
    }
}

pub trait FrameRenderer {
    fn render(&mut self, scene: &Scene, view: &RenderView);
}

/// Renderer that draws nothing. Used headless and in tests.
#[derive(Default)]
pub struct NullRenderer {
    pub frames: usize,
}

impl FrameRenderer for NullRenderer {
    fn render(&mut self, _scene: &Scene, _view: &RenderView) {
        self.frames += 1;
    }
}

/// Seconds since the page started animating.
pub struct Clock {
    start: Instant,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Which display loop delivers the next frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameSource {
    Window,
    Xr,
}

/// What [`FrameRequests::plan`] wants done.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FramePlan {
    /// Outstanding window request to cancel before switching to the session.
    pub cancel_window: Option<i32>,
    pub request: Option<FrameSource>,
}

/// Book-keeping for the outstanding frame request on each source. At most
/// one request is queued per source, and switching to the session drops
/// the window request so a paused window callback cannot block the
/// hand-back when the session ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameRequests {
    window: Option<i32>,
    xr: bool,
}

impl FrameRequests {
    pub fn plan(&mut self, xr_active: bool) -> FramePlan {
        if xr_active {
            let cancel_window = self.window.take();
            let request = (!self.xr).then_some(FrameSource::Xr);
            self.xr = true;
            FramePlan {
                cancel_window,
                request,
            }
        } else {
            // An ended session never delivers its queued frame.
            self.xr = false;
            FramePlan {
                cancel_window: None,
                request: self.window.is_none().then_some(FrameSource::Window),
            }
        }
    }

    pub fn window_requested(&mut self, handle: i32) {
        self.window = Some(handle);
    }

    pub fn window_done(&mut self) {
        self.window = None;
    }

    /// The session frame fired, or the request for it failed.
    pub fn xr_done(&mut self) {
        self.xr = false;
    }
}

/// Everything one animation step may touch.
pub struct FrameState<'a> {
    pub scene: &'a mut Scene,
    pub handles: &'a CardHandles,
    pub view: &'a mut ViewState,
    pub animations: &'a Animations,
    pub camera: &'a mut Camera,
    pub orbit: &'a mut OrbitControls,
}

/// Advance all animations to `elapsed` seconds.
pub fn update(state: FrameState<'_>, elapsed: f64) {
    let FrameState {
        scene,
        handles,
        view,
        animations,
        camera,
        orbit,
    } = state;
    let t = elapsed as f32;
    let in_ar = view.is_in_ar;

    if let Some(card) = scene.transform_mut(handles.card) {
        if let Some(angle) = view.advance_flip(elapsed) {
            card.rotation.y = angle;
        }
        if view.is_auto_rotating && !in_ar {
            card.rotation.y += animations.auto_rotate_speed * AUTO_ROTATE_STEP;
        }
        if animations.float_animation {
            let (base, amplitude) = if in_ar {
                (
                    AR_FLOAT_BASE_Y,
                    animations.float_amplitude * AR_FLOAT_AMPLITUDE_SCALE,
                )
            } else {
                (0.0, animations.float_amplitude)
            };
            let phase = elapsed * animations.float_speed as f64 * FLOAT_TIME_SCALE;
            card.position.y = base + phase.sin() as f32 * amplitude;
        }
    }

    if !in_ar {
        for id in &handles.decorations {
            let Some(node) = scene.get_mut(*id) else {
                continue;
            };
            let Some(motion) = node.motion else {
                continue;
            };
            node.transform.rotation.x += motion.rotation_speed;
            node.transform.rotation.y += motion.rotation_speed * DECORATION_Y_SPIN_RATIO;
            node.transform.position.y += (t + motion.float_offset).sin() * DECORATION_BOB;
        }
        if let Some(particles) = handles.particles.and_then(|id| scene.transform_mut(id)) {
            particles.rotation = field_rotation(t);
        }
    }

    if let Some(glow) = handles.glow.and_then(|id| scene.get_mut(id)) {
        if let Some(visual) = glow.visual.as_mut() {
            visual.material.set_glow_time(t);
        }
    }

    if !in_ar && orbit.enabled {
        orbit.update(camera);
    }
}
