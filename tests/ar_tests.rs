// AR session lifecycle against an in-memory host.

mod common;

use card_web::app::CardApp;
use card_web::ar::{
    toggle_ar, ArPhase, HostFuture, SessionFeatures, SessionMode, XrHost, XrSession,
};
use card_web::error::CardError;
use card_web::frame::NullRenderer;
use card_web::ui::{RecordingUi, StatusTone, UiEvent};
use glam::Vec3;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default)]
struct MockSession {
    ended: Cell<u32>,
    on_end: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl MockSession {
    /// The host ending the session on its own (user left AR from the OS).
    fn host_ends(&self) {
        let callback = self.on_end.borrow_mut().take();
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl XrSession for MockSession {
    fn end(&self) {
        self.ended.set(self.ended.get() + 1);
        self.host_ends();
    }

    fn on_end(&self, callback: Box<dyn FnOnce()>) {
        *self.on_end.borrow_mut() = Some(callback);
    }
}

struct MockHost {
    available: bool,
    supported: bool,
    failure: Option<String>,
    session: Rc<MockSession>,
    requests: Cell<u32>,
    last_features: RefCell<Option<SessionFeatures>>,
}

impl MockHost {
    fn working() -> Self {
        Self {
            available: true,
            supported: true,
            failure: None,
            session: Rc::new(MockSession::default()),
            requests: Cell::new(0),
            last_features: RefCell::new(None),
        }
    }
}

impl XrHost for MockHost {
    fn is_available(&self) -> bool {
        self.available
    }

    fn supports_immersive_session(&self, _mode: SessionMode) -> HostFuture<'_, bool> {
        let supported = self.supported;
        Box::pin(async move { supported })
    }

    fn request_session<'a>(
        &'a self,
        mode: SessionMode,
        features: &'a SessionFeatures,
    ) -> HostFuture<'a, Result<Rc<dyn XrSession>, CardError>> {
        assert_eq!(mode.as_str(), "immersive-ar");
        self.requests.set(self.requests.get() + 1);
        *self.last_features.borrow_mut() = Some(features.clone());
        let result: Result<Rc<dyn XrSession>, CardError> = match &self.failure {
            Some(detail) => Err(CardError::ArSessionRequestFailure(detail.clone())),
            None => Ok(self.session.clone() as Rc<dyn XrSession>),
        };
        Box::pin(async move { result })
    }
}

fn shared_app() -> (Rc<RefCell<CardApp>>, RecordingUi) {
    let (app, ui) = common::app();
    (Rc::new(RefCell::new(app)), ui)
}

#[derive(Debug, PartialEq)]
struct Snapshot {
    card_position: Vec3,
    card_scale: Vec3,
    card_rotation: Vec3,
    background: Option<Vec3>,
    particles_visible: bool,
    orbit_enabled: bool,
    in_ar: bool,
}

fn snapshot(app: &CardApp) -> Snapshot {
    let card = app.scene.transform(app.handles.card);
    Snapshot {
        card_position: card.position,
        card_scale: card.scale,
        card_rotation: card.rotation,
        background: app.scene.background,
        particles_visible: app.scene.is_visible(app.handles.particles.unwrap()),
        orbit_enabled: app.orbit.enabled,
        in_ar: app.view.is_in_ar,
    }
}

#[test]
fn enter_then_exit_restores_exactly() {
    let (app, ui) = shared_app();
    app.borrow_mut().frame(0.7, &mut NullRenderer::default());
    let before = snapshot(&app.borrow());
    let host = MockHost::working();

    pollster::block_on(toggle_ar(&app, &host));
    {
        let a = app.borrow();
        assert_eq!(a.ar.phase(), ArPhase::Active);
        assert!(a.view.is_in_ar);
        assert!(!a.orbit.enabled);
        assert_eq!(a.scene.background, None);
        assert!(!a.scene.is_visible(a.handles.particles.unwrap()));
        let card = a.scene.transform(a.handles.card);
        assert_eq!(card.scale, Vec3::splat(0.25));
        assert_eq!(card.position, Vec3::new(0.0, 0.1, -2.0));
        assert!(a.ar.snapshot().is_some());
    }
    assert_eq!(ui.last_status(), Some(("AR Active".to_string(), StatusTone::Ok)));
    assert!(ui.events().contains(&UiEvent::ArLayout(true)));
    let features = host.last_features.borrow().clone().unwrap();
    assert_eq!(features.required, vec!["local-floor"]);
    assert_eq!(features.optional, vec!["hit-test", "dom-overlay"]);
    // The overlay root must contain the canvas, not just the buttons.
    assert_eq!(features.dom_overlay_root, Some("ar-root"));

    pollster::block_on(toggle_ar(&app, &host));
    assert_eq!(host.session.ended.get(), 1);
    let a = app.borrow();
    assert_eq!(a.ar.phase(), ArPhase::Inactive);
    assert_eq!(snapshot(&a), before);
    assert!(a.host_camera.is_none());
    assert_eq!(
        ui.last_status(),
        Some(("AR Mode Ready".to_string(), StatusTone::Ready))
    );
    assert_eq!(ui.events().last(), Some(&UiEvent::ArStatus {
        text: "AR Mode Ready".into(),
        tone: StatusTone::Ready,
    }));
}

#[test]
fn host_ending_the_session_also_restores() {
    let (app, _ui) = shared_app();
    let before = snapshot(&app.borrow());
    let host = MockHost::working();
    pollster::block_on(toggle_ar(&app, &host));
    host.session.host_ends();
    assert_eq!(host.session.ended.get(), 0);
    assert_eq!(app.borrow().ar.phase(), ArPhase::Inactive);
    assert_eq!(snapshot(&app.borrow()), before);
}

#[test]
fn unsupported_device_changes_nothing() {
    let (app, ui) = shared_app();
    let before = snapshot(&app.borrow());
    let host = MockHost {
        supported: false,
        ..MockHost::working()
    };
    pollster::block_on(toggle_ar(&app, &host));
    assert_eq!(host.requests.get(), 0);
    assert_eq!(app.borrow().ar.phase(), ArPhase::Inactive);
    assert_eq!(snapshot(&app.borrow()), before);
    assert_eq!(
        ui.last_status(),
        Some(("AR not supported on this device".to_string(), StatusTone::Error))
    );
    assert!(ui.notifications()[0].starts_with("WebXR AR is not supported"));
}

#[test]
fn missing_runtime_changes_nothing() {
    let (app, ui) = shared_app();
    let before = snapshot(&app.borrow());
    let host = MockHost {
        available: false,
        ..MockHost::working()
    };
    pollster::block_on(toggle_ar(&app, &host));
    assert_eq!(host.requests.get(), 0);
    assert_eq!(app.borrow().ar.phase(), ArPhase::Inactive);
    assert_eq!(snapshot(&app.borrow()), before);
    assert_eq!(
        ui.last_status(),
        Some(("WebXR not available".to_string(), StatusTone::Error))
    );
}

#[test]
fn refused_request_reports_and_stays_inactive() {
    let (app, ui) = shared_app();
    let before = snapshot(&app.borrow());
    let host = MockHost {
        failure: Some("NotAllowedError".into()),
        ..MockHost::working()
    };
    pollster::block_on(toggle_ar(&app, &host));
    assert_eq!(host.requests.get(), 1);
    assert_eq!(app.borrow().ar.phase(), ArPhase::Inactive);
    assert!(app.borrow().ar.snapshot().is_none());
    assert_eq!(snapshot(&app.borrow()), before);
    assert_eq!(
        ui.notifications(),
        vec!["Failed to start AR session: NotAllowedError".to_string()]
    );

    // A later attempt can still succeed.
    let host = MockHost::working();
    pollster::block_on(toggle_ar(&app, &host));
    assert_eq!(app.borrow().ar.phase(), ArPhase::Active);
}

/// Presses the AR button again while its support check is still pending.
struct ImpatientHost {
    inner: MockHost,
    app: Rc<RefCell<CardApp>>,
    second: MockHost,
}

impl XrHost for ImpatientHost {
    fn is_available(&self) -> bool {
        self.inner.is_available()
    }

    fn supports_immersive_session(&self, mode: SessionMode) -> HostFuture<'_, bool> {
        assert_eq!(self.app.borrow().ar.phase(), ArPhase::Requesting);
        pollster::block_on(toggle_ar(&self.app, &self.second));
        self.inner.supports_immersive_session(mode)
    }

    fn request_session<'a>(
        &'a self,
        mode: SessionMode,
        features: &'a SessionFeatures,
    ) -> HostFuture<'a, Result<Rc<dyn XrSession>, CardError>> {
        self.inner.request_session(mode, features)
    }
}

#[test]
fn second_press_while_requesting_is_ignored() {
    let (app, _ui) = shared_app();
    let host = ImpatientHost {
        inner: MockHost::working(),
        app: app.clone(),
        second: MockHost::working(),
    };
    pollster::block_on(toggle_ar(&app, &host));
    assert_eq!(host.second.requests.get(), 0);
    assert_eq!(host.inner.requests.get(), 1);
    assert_eq!(app.borrow().ar.phase(), ArPhase::Active);
}

#[test]
fn ar_suspends_desktop_animation_and_controls() {
    let (app, ui) = shared_app();
    app.borrow_mut().toggle_auto_rotate();
    let host = MockHost::working();
    pollster::block_on(toggle_ar(&app, &host));

    let mut a = app.borrow_mut();
    let deco = a.handles.decorations[0];
    let deco_before = a.scene.transform(deco);
    let rotation_before = a.card_rotation_y();
    let mut r = NullRenderer::default();
    for _ in 0..5 {
        a.frame(0.0, &mut r);
    }
    assert_eq!(a.card_rotation_y(), rotation_before);
    assert_eq!(a.scene.transform(deco), deco_before);
    // Float continues around the AR base height.
    assert!((a.scene.transform(a.handles.card).position.y - 0.1).abs() < 1e-6);

    ui.clear();
    a.toggle_auto_rotate();
    a.reset();
    assert!(a.view.is_auto_rotating);
    assert!(ui.events().is_empty());
}
