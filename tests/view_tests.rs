// View state machine: flip tween, auto-rotate, reset and click outcomes.

use card_web::scene::{InteractionKind, InteractionMetadata};
use card_web::view::{ease_out_cubic, handle_interaction, InteractionAction, ViewState};
use std::f32::consts::PI;

#[test]
fn ease_out_cubic_endpoints_and_midpoint() {
    assert_eq!(ease_out_cubic(0.0), 0.0);
    assert_eq!(ease_out_cubic(1.0), 1.0);
    assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
}

#[test]
fn flip_tweens_to_the_back_and_finishes() {
    let mut view = ViewState::new();
    view.flip(10.0, 0.0, 1000.0);
    assert!(view.is_flipped);
    assert!(view.is_flipping());

    let mid = view.advance_flip(10.5).unwrap();
    assert!((mid - PI * 0.875).abs() < 1e-5);
    assert!(view.is_flipping());

    let end = view.advance_flip(11.0).unwrap();
    assert!((end - PI).abs() < 1e-6);
    assert!(!view.is_flipping());
    assert_eq!(view.advance_flip(11.5), None);
}

#[test]
fn flip_twice_returns_to_front() {
    let mut view = ViewState::new();
    view.flip(0.0, 0.0, 1000.0);
    let back = view.advance_flip(2.0).unwrap();
    view.flip(3.0, back, 1000.0);
    assert!(!view.is_flipped);
    let front = view.advance_flip(5.0).unwrap();
    assert!(front.abs() < 1e-6);
}

#[test]
fn second_flip_starts_from_live_angle() {
    let mut view = ViewState::new();
    view.flip(0.0, 0.0, 1000.0);
    let live = view.advance_flip(0.5).unwrap();
    view.flip(0.5, live, 1000.0);
    let anim = view.flip_animation.unwrap();
    assert_eq!(anim.start_angle, live);
    assert_eq!(anim.target_angle, 0.0);
    // No jump on the first tick of the new tween.
    assert!((view.advance_flip(0.5).unwrap() - live).abs() < 1e-6);
}

#[test]
fn zero_duration_flip_lands_immediately() {
    let mut view = ViewState::new();
    view.flip(1.0, 0.0, 0.0);
    assert!((view.advance_flip(1.0).unwrap() - PI).abs() < 1e-6);
    assert!(!view.is_flipping());
}

#[test]
fn reset_is_idempotent() {
    let mut view = ViewState::new();
    view.toggle_auto_rotate();
    view.flip(0.0, 0.0, 1000.0);
    assert!(view.reset());
    let once = view.clone();
    assert!(view.reset());
    assert_eq!(view, once);
    assert_eq!(view, ViewState::new());
}

#[test]
fn ar_refuses_auto_rotate_and_reset() {
    let mut view = ViewState::new();
    view.set_in_ar(true);
    assert_eq!(view.toggle_auto_rotate(), None);
    assert!(!view.is_auto_rotating);
    view.flip(0.0, 0.0, 1000.0);
    assert!(!view.reset());
    assert!(view.is_flipped);
}

#[test]
fn auto_rotate_toggles() {
    let mut view = ViewState::new();
    assert_eq!(view.toggle_auto_rotate(), Some(true));
    assert_eq!(view.toggle_auto_rotate(), Some(false));
}

#[test]
fn contact_click_copies_value() {
    let meta = InteractionMetadata::new(InteractionKind::Contact, "Click to copy: a@b.c")
        .with("field", "email")
        .with("value", "a@b.c");
    let outcome = handle_interaction(&meta, false).unwrap();
    assert_eq!(outcome.message, "Contact info copied to clipboard!");
    assert_eq!(
        outcome.action,
        Some(InteractionAction::CopyToClipboard("a@b.c".into()))
    );
}

#[test]
fn social_click_only_navigates_when_enabled() {
    let meta = InteractionMetadata::new(InteractionKind::Social, "GitHub - Click to visit")
        .with("name", "GitHub")
        .with("url", "https://github.com");
    let quiet = handle_interaction(&meta, false).unwrap();
    assert_eq!(quiet.message, "GitHub link clicked!");
    assert_eq!(quiet.action, None);

    let open = handle_interaction(&meta, true).unwrap();
    assert_eq!(
        open.action,
        Some(InteractionAction::OpenUrl("https://github.com".into()))
    );
}

#[test]
fn placeholder_clicks_explain_themselves() {
    let qr = InteractionMetadata::new(InteractionKind::QrCode, "");
    assert_eq!(
        handle_interaction(&qr, false).unwrap().message,
        "QR Code - Replace with your vCard QR!"
    );
    let logo = InteractionMetadata::new(InteractionKind::Logo, "");
    assert!(handle_interaction(&logo, false)
        .unwrap()
        .message
        .starts_with("Logo placeholder"));
    let glow = InteractionMetadata::new(InteractionKind::Decoration, "glow");
    assert_eq!(handle_interaction(&glow, false), None);
}
