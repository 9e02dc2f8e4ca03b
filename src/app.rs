//! The card application context: scene plus every piece of state the
//! commands, the pointer and the frame loop share.

use crate::ar::ArLifecycle;
use crate::builder::{build_card, BuildReport, CardHandles};
use crate::camera::{Camera, HostCamera, OrbitControls};
use crate::config::CardConfig;
use crate::constants::TOOLTIP_OFFSET_PX;
use crate::frame::{self, FrameRenderer, FrameState, RenderView};
use crate::picking::{self, InteractiveRegistry};
use crate::scene::{InteractionMetadata, Scene};
use crate::ui::{CursorHint, UiSurface};
use crate::view::{handle_interaction, InteractionAction, InteractionOutcome, ViewState};
use glam::{Vec2, Vec3};
use rand::Rng;

pub struct CardApp {
    pub config: CardConfig,
    pub scene: Scene,
    pub handles: CardHandles,
    pub registry: InteractiveRegistry,
    pub report: BuildReport,
    pub view: ViewState,
    pub camera: Camera,
    pub orbit: OrbitControls,
    pub ar: ArLifecycle,
    /// Device pose for the current immersive frame.
    pub host_camera: Option<HostCamera>,
    pub ui: Box<dyn UiSurface>,
}

impl CardApp {
    pub fn new<R: Rng>(config: CardConfig, rng: &mut R, ui: Box<dyn UiSurface>) -> Self {
        let built = build_card(&config, rng);
        let camera = Camera::default();
        let orbit = OrbitControls::new(&camera);
        Self {
            config,
            scene: built.scene,
            handles: built.handles,
            registry: built.registry,
            report: built.report,
            view: ViewState::new(),
            camera,
            orbit,
            ar: ArLifecycle::default(),
            host_camera: None,
            ui,
        }
    }

    pub fn card_rotation_y(&self) -> f32 {
        self.scene.transform(self.handles.card).rotation.y
    }

    pub fn toggle_auto_rotate(&mut self) {
        match self.view.toggle_auto_rotate() {
            Some(rotating) => {
                log::info!("[view] auto-rotate {}", rotating);
                self.ui.set_auto_rotate_button(rotating);
            }
            None => log::info!("[view] auto-rotate ignored in AR"),
        }
    }

    /// `now` in seconds on the frame clock.
    pub fn flip(&mut self, now: f64) {
        let current = self.card_rotation_y();
        let duration = self.config.animation_settings().flip_duration;
        self.view.flip(now, current, duration);
        log::info!("[view] flip -> {}", if self.view.is_flipped { "back" } else { "front" });
    }

    pub fn reset(&mut self) {
        if !self.view.reset() {
            log::info!("[view] reset ignored in AR");
            return;
        }
        self.camera.go_home();
        self.orbit.reset(&mut self.camera);
        if let Some(card) = self.scene.transform_mut(self.handles.card) {
            card.rotation = Vec3::ZERO;
        }
        self.ui.set_auto_rotate_button(false);
    }

    fn pick(&self, ndc: Vec2) -> Option<&InteractionMetadata> {
        picking::pick(&self.scene, &self.registry, &self.camera, ndc)
    }

    /// Pointer moved to `ndc`; `client` is the same point in page pixels for
    /// tooltip placement.
    pub fn hover(&mut self, ndc: Vec2, client: Vec2) {
        if self.view.is_in_ar {
            return;
        }
        let tooltip = self.pick(ndc).map(|m| m.tooltip.clone());
        match tooltip {
            Some(text) => {
                let offset = TOOLTIP_OFFSET_PX as f32;
                self.ui
                    .show_tooltip(&text, client.x + offset, client.y + offset);
                self.ui.set_cursor(CursorHint::Pointer);
            }
            None => {
                self.ui.hide_tooltip();
                self.ui.set_cursor(CursorHint::Default);
            }
        }
    }

    /// Click at `ndc`. A miss is silent.
    pub fn click(&mut self, ndc: Vec2) -> Option<InteractionOutcome> {
        let open_links = self.config.interactions.open_social_links;
        let outcome = handle_interaction(self.pick(ndc)?, open_links)?;
        log::info!("[pick] {}", outcome.message);
        self.ui.notify(&outcome.message);
        match &outcome.action {
            Some(InteractionAction::CopyToClipboard(text)) => self.ui.copy_to_clipboard(text),
            Some(InteractionAction::OpenUrl(url)) => {
                log::info!("[pick] opening {}", url);
                self.ui.open_url(url);
            }
            None => {}
        }
        Some(outcome)
    }

    pub fn render_view(&self) -> RenderView {
        match self.host_camera {
            Some(host) if self.view.is_in_ar => host.into(),
            _ => RenderView::from(&self.camera),
        }
    }

    /// One display tick at `elapsed` seconds: animate, then draw.
    pub fn frame<F: FrameRenderer + ?Sized>(&mut self, elapsed: f64, renderer: &mut F) {
        let animations = self.config.animation_settings();
        frame::update(
            FrameState {
                scene: &mut self.scene,
                handles: &self.handles,
                view: &mut self.view,
                animations: &animations,
                camera: &mut self.camera,
                orbit: &mut self.orbit,
            },
            elapsed,
        );
        let view = self.render_view();
        renderer.render(&self.scene, &view);
    }
}
