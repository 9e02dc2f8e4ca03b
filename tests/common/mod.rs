// Shared fixtures for the host-side tests.

#![allow(dead_code)]

use card_web::app::CardApp;
use card_web::config::CardConfig;
use card_web::scene::NodeId;
use card_web::ui::RecordingUi;
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn bundled() -> CardConfig {
    CardConfig::bundled().expect("bundled config parses")
}

/// App over `config` with a recorder the test keeps a handle to.
pub fn app_with(config: CardConfig) -> (CardApp, RecordingUi) {
    let ui = RecordingUi::new();
    let mut rng = StdRng::seed_from_u64(7);
    let app = CardApp::new(config, &mut rng, Box::new(ui.clone()));
    (app, ui)
}

pub fn app() -> (CardApp, RecordingUi) {
    app_with(bundled())
}

pub fn node(app: &CardApp, name: &str) -> NodeId {
    app.scene
        .find_by_name(name)
        .unwrap_or_else(|| panic!("no node named {name}"))
}

/// Screen position (NDC) just beside a node's origin as the app camera sees
/// it. The nudge keeps the ray off shared triangle edges.
pub fn ndc_of(app: &CardApp, name: &str) -> Vec2 {
    let world = app.scene.world_position(node(app, name)) + Vec3::new(0.07, 0.03, 0.0);
    app.camera.project(world)
}
