// Pointer picking against the interactive registry.

mod common;

use card_web::config::CardConfig;
use card_web::picking::{client_to_ndc, pick};
use card_web::scene::InteractionKind;
use glam::Vec2;
use std::f32::consts::PI;

#[test]
fn profile_photo_is_hit_on_the_front() {
    let (app, _ui) = common::app();
    let ndc = common::ndc_of(&app, "profile_photo");
    let meta = pick(&app.scene, &app.registry, &app.camera, ndc).unwrap();
    assert_eq!(meta.kind, InteractionKind::Profile);
    assert_eq!(meta.tooltip, "Profile Photo - Click to customize");
}

#[test]
fn hitting_a_social_quad_resolves_to_its_group() {
    let (app, _ui) = common::app();
    let ndc = common::ndc_of(&app, "social_github");
    let meta = pick(&app.scene, &app.registry, &app.camera, ndc).unwrap();
    assert_eq!(meta.kind, InteractionKind::Social);
    assert_eq!(meta.get("name"), Some("GitHub"));
}

#[test]
fn empty_space_is_a_miss() {
    let (app, _ui) = common::app();
    assert!(pick(&app.scene, &app.registry, &app.camera, Vec2::new(0.95, 0.95)).is_none());
    assert!(pick(&app.scene, &app.registry, &app.camera, Vec2::new(-0.98, -0.9)).is_none());
}

#[test]
fn back_elements_are_reachable_after_a_flip() {
    let (mut app, _ui) = common::app();
    app.scene.transform_mut(app.handles.card).unwrap().rotation.y = PI;
    let ndc = common::ndc_of(&app, "qr_code");
    let meta = pick(&app.scene, &app.registry, &app.camera, ndc).unwrap();
    assert_eq!(meta.kind, InteractionKind::QrCode);

    let ndc = common::ndc_of(&app, "logo");
    let meta = pick(&app.scene, &app.registry, &app.camera, ndc).unwrap();
    assert_eq!(meta.kind, InteractionKind::Logo);
}

#[test]
fn back_elements_are_not_hit_through_the_card() {
    let mut config = common::bundled();
    if let Some(ie) = config.interactive_elements.as_mut() {
        ie.profile_photo = None;
    }
    let (app, _ui) = common::app_with(config);
    // Facing front: the QR plane points away from the camera.
    let ndc = common::ndc_of(&app, "qr_code");
    assert!(pick(&app.scene, &app.registry, &app.camera, ndc).is_none());
}

#[test]
fn hidden_elements_are_skipped() {
    let (mut app, _ui) = common::app();
    let ndc = common::ndc_of(&app, "profile_photo");
    let front = app.handles.front;
    app.scene.set_visible(front, false);
    assert!(pick(&app.scene, &app.registry, &app.camera, ndc).is_none());
}

#[test]
fn nothing_is_pickable_without_interactive_config() {
    let (app, _ui) = common::app_with(CardConfig::default());
    for ndc in [Vec2::ZERO, Vec2::new(-0.3, 0.1), Vec2::new(0.2, -0.3)] {
        assert!(pick(&app.scene, &app.registry, &app.camera, ndc).is_none());
    }
}

#[test]
fn client_pixels_map_to_ndc() {
    assert_eq!(client_to_ndc(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
    assert_eq!(client_to_ndc(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
    assert_eq!(client_to_ndc(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
}
