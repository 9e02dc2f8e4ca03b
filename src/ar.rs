//! Immersive AR session lifecycle.
//!
//! `Inactive -> Requesting -> Active -> Inactive`. Nothing in the scene is
//! touched until the host has handed over a live session; the pre-AR state
//! is captured at that point and put back exactly when the session ends,
//! whoever ends it.

use crate::app::CardApp;
use crate::builder::CardHandles;
use crate::constants::{AR_CARD_POSITION, AR_CARD_SCALE, AR_OVERLAY_ROOT};
use crate::error::CardError;
use crate::scene::Scene;
use crate::ui::StatusTone;
use glam::Vec3;
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};

pub type HostFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionMode {
    ImmersiveAr,
}

impl SessionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionMode::ImmersiveAr => "immersive-ar",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionFeatures {
    pub required: Vec<&'static str>,
    pub optional: Vec<&'static str>,
    /// Element id kept visible over the camera feed, if the host supports it.
    pub dom_overlay_root: Option<&'static str>,
}

impl Default for SessionFeatures {
    fn default() -> Self {
        Self {
            required: vec!["local-floor"],
            optional: vec!["hit-test", "dom-overlay"],
            dom_overlay_root: Some(AR_OVERLAY_ROOT),
        }
    }
}

/// A live session handed out by the host.
pub trait XrSession {
    /// Ask the host to end the session. The end observer fires afterwards.
    fn end(&self);
    /// Register the single end-of-session observer.
    fn on_end(&self, callback: Box<dyn FnOnce()>);
}

/// Capability interface of the immersive runtime.
pub trait XrHost {
    /// Whether the runtime exists at all.
    fn is_available(&self) -> bool;
    fn supports_immersive_session(&self, mode: SessionMode) -> HostFuture<'_, bool>;
    fn request_session<'a>(
        &'a self,
        mode: SessionMode,
        features: &'a SessionFeatures,
    ) -> HostFuture<'a, Result<Rc<dyn XrSession>, CardError>>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArPhase {
    #[default]
    Inactive,
    Requesting,
    Active,
}

/// Pre-AR values of everything entering AR changes.
#[derive(Clone, Debug, PartialEq)]
pub struct ArSessionState {
    pub card_scale: Vec3,
    pub card_position: Vec3,
    pub background: Option<Vec3>,
    pub particles_visible: Option<bool>,
}

impl ArSessionState {
    pub fn capture(scene: &Scene, handles: &CardHandles) -> Self {
        let card = scene.transform(handles.card);
        Self {
            card_scale: card.scale,
            card_position: card.position,
            background: scene.background,
            particles_visible: handles.particles.map(|id| scene.is_visible(id)),
        }
    }

    /// Shrink the card in front of the device origin and drop the backdrop.
    pub fn apply_ar_layout(scene: &mut Scene, handles: &CardHandles) {
        if let Some(card) = scene.transform_mut(handles.card) {
            card.scale = Vec3::splat(AR_CARD_SCALE);
            card.position = AR_CARD_POSITION;
        }
        scene.background = None;
        if let Some(id) = handles.particles {
            scene.set_visible(id, false);
        }
    }

    pub fn restore(&self, scene: &mut Scene, handles: &CardHandles) {
        if let Some(card) = scene.transform_mut(handles.card) {
            card.scale = self.card_scale;
            card.position = self.card_position;
        }
        scene.background = self.background;
        if let (Some(id), Some(visible)) = (handles.particles, self.particles_visible) {
            scene.set_visible(id, visible);
        }
    }
}

#[derive(Default)]
pub struct ArLifecycle {
    phase: ArPhase,
    session: Option<Rc<dyn XrSession>>,
    snapshot: Option<ArSessionState>,
}

impl ArLifecycle {
    pub fn phase(&self) -> ArPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == ArPhase::Active
    }

    pub fn snapshot(&self) -> Option<&ArSessionState> {
        self.snapshot.as_ref()
    }
}

impl CardApp {
    fn ar_failed(&mut self, error: &CardError) {
        log::warn!("[ar] {}", error);
        self.ar.phase = ArPhase::Inactive;
        match error {
            CardError::ArUnavailable => {
                self.ui.set_ar_status("WebXR not available", StatusTone::Error);
                self.ui.notify(
                    "WebXR is not available. For full AR experience, use a compatible browser and device.",
                );
            }
            CardError::ArUnsupported => {
                self.ui
                    .set_ar_status("AR not supported on this device", StatusTone::Error);
                self.ui.notify(
                    "WebXR AR is not supported on this device. Try on a mobile device with AR capabilities.",
                );
            }
            CardError::ArSessionRequestFailure(detail) => {
                self.ui
                    .notify(&format!("Failed to start AR session: {detail}"));
            }
            other => self.ui.notify(&other.to_string()),
        }
    }

    fn enter_ar(&mut self, session: Rc<dyn XrSession>) {
        self.ar.snapshot = Some(ArSessionState::capture(&self.scene, &self.handles));
        ArSessionState::apply_ar_layout(&mut self.scene, &self.handles);
        self.orbit.enabled = false;
        self.orbit.end_drag();
        self.view.set_in_ar(true);
        self.ar.session = Some(session);
        self.ar.phase = ArPhase::Active;

        self.ui.hide_tooltip();
        self.ui.set_ar_layout(true);
        self.ui.set_ar_status("AR Active", StatusTone::Ok);
        self.ui.notify("AR Mode Active! Look around to see your card.");
        log::info!("[ar] session active");
    }

    /// Undo everything `enter_ar` did. Runs from the session's end observer.
    pub fn finish_ar(&mut self) {
        if self.ar.phase != ArPhase::Active {
            return;
        }
        if let Some(snapshot) = self.ar.snapshot.take() {
            snapshot.restore(&mut self.scene, &self.handles);
        }
        self.ar.session = None;
        self.ar.phase = ArPhase::Inactive;
        self.host_camera = None;
        self.view.set_in_ar(false);
        self.orbit.enabled = true;

        self.ui.set_ar_layout(false);
        self.ui.set_ar_status("AR Mode Ready", StatusTone::Ready);
        log::info!("[ar] session ended");
    }
}

/// The AR button. Enters AR when inactive, ends the live session when
/// active, and ignores presses while a request is already in flight.
///
/// No `RefCell` borrow of `app` is held across an await, and the session's
/// end observer only keeps a weak handle.
pub async fn toggle_ar(app: &Rc<RefCell<CardApp>>, host: &dyn XrHost) {
    let phase = app.borrow().ar.phase;
    match phase {
        ArPhase::Active => {
            let session = app.borrow().ar.session.clone();
            if let Some(session) = session {
                log::info!("[ar] ending session");
                session.end();
            }
            return;
        }
        ArPhase::Requesting => {
            log::info!("[ar] request already in flight; ignoring");
            return;
        }
        ArPhase::Inactive => {}
    }

    if !host.is_available() {
        app.borrow_mut().ar_failed(&CardError::ArUnavailable);
        return;
    }

    app.borrow_mut().ar.phase = ArPhase::Requesting;
    let mode = SessionMode::ImmersiveAr;
    if !host.supports_immersive_session(mode).await {
        app.borrow_mut().ar_failed(&CardError::ArUnsupported);
        return;
    }

    let features = SessionFeatures::default();
    let session = match host.request_session(mode, &features).await {
        Ok(session) => session,
        Err(e) => {
            let e = match e {
                CardError::ArSessionRequestFailure(_) => e,
                other => CardError::ArSessionRequestFailure(other.to_string()),
            };
            app.borrow_mut().ar_failed(&e);
            return;
        }
    };

    app.borrow_mut().enter_ar(session.clone());
    let weak: Weak<RefCell<CardApp>> = Rc::downgrade(app);
    session.on_end(Box::new(move || {
        if let Some(app) = weak.upgrade() {
            app.borrow_mut().finish_ar();
        }
    }));
}
