// Per-frame animation: float, auto-rotate, decorations, particles, glow.

mod common;

use card_web::frame::{
    FramePlan, FrameRenderer, FrameRequests, FrameSource, NullRenderer, RenderView,
};
use card_web::particles::{field_rotation, ParticleField};
use card_web::scene::Scene;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f64::consts::FRAC_PI_2;

#[derive(Default)]
struct RecordingRenderer {
    views: Vec<RenderView>,
}

impl FrameRenderer for RecordingRenderer {
    fn render(&mut self, _scene: &Scene, view: &RenderView) {
        self.views.push(*view);
    }
}

#[test]
fn float_follows_sine_of_elapsed_time() {
    let (mut app, _ui) = common::app();
    let mut r = NullRenderer::default();
    app.frame(0.0, &mut r);
    assert!(app.scene.transform(app.handles.card).position.y.abs() < 1e-6);

    // floatSpeed 0.001 per ms: phase == seconds.
    app.frame(FRAC_PI_2, &mut r);
    let y = app.scene.transform(app.handles.card).position.y;
    assert!((y - 0.1).abs() < 1e-5, "{y}");
    assert_eq!(r.frames, 2);
}

#[test]
fn auto_rotate_advances_a_fixed_step_per_tick() {
    let (mut app, _ui) = common::app();
    app.toggle_auto_rotate();
    let mut r = NullRenderer::default();
    for _ in 0..10 {
        app.frame(1.0, &mut r);
    }
    // speed 0.5 * 0.01 per tick
    assert!((app.card_rotation_y() - 0.05).abs() < 1e-5);

    app.toggle_auto_rotate();
    app.frame(2.0, &mut r);
    assert!((app.card_rotation_y() - 0.05).abs() < 1e-5);
}

#[test]
fn flip_lands_on_the_back_through_frames() {
    let (mut app, _ui) = common::app();
    let mut r = NullRenderer::default();
    app.flip(0.0);
    app.frame(0.5, &mut r);
    let mid = app.card_rotation_y();
    assert!(mid > 0.0 && mid < std::f32::consts::PI);
    app.frame(1.0, &mut r);
    assert!((app.card_rotation_y() - std::f32::consts::PI).abs() < 1e-6);
    assert!(!app.view.is_flipping());
}

#[test]
fn decorations_spin_and_bob() {
    let (mut app, _ui) = common::app();
    let id = app.handles.decorations[0];
    let before = app.scene.transform(id);
    let speed = app.scene.get(id).unwrap().motion.unwrap().rotation_speed;
    app.frame(0.25, &mut NullRenderer::default());
    let after = app.scene.transform(id);
    assert!((after.rotation.x - before.rotation.x - speed).abs() < 1e-6);
    assert!((after.rotation.y - before.rotation.y - speed * 0.7).abs() < 1e-6);
    let bob = (0.25f32 + 0.0).sin() * 0.003;
    assert!((after.position.y - before.position.y - bob).abs() < 1e-6);
}

#[test]
fn particles_and_glow_follow_the_clock() {
    let (mut app, _ui) = common::app();
    app.frame(3.0, &mut NullRenderer::default());
    let particles = app.handles.particles.unwrap();
    assert_eq!(app.scene.transform(particles).rotation, field_rotation(3.0));
    let glow = app.handles.glow.unwrap();
    let material = &app.scene.get(glow).unwrap().visual.as_ref().unwrap().material;
    assert_eq!(material.glow_time(), Some(3.0));
}

#[test]
fn same_inputs_same_scene() {
    let run = || {
        let (mut app, _ui) = common::app();
        app.toggle_auto_rotate();
        app.flip(0.2);
        for t in [0.0, 0.016, 0.5, 1.25, 4.0] {
            app.frame(t, &mut NullRenderer::default());
        }
        app.scene
            .walk()
            .into_iter()
            .map(|id| app.scene.world_matrix(id))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn renderer_gets_the_orbit_camera_outside_ar() {
    let (mut app, _ui) = common::app();
    let mut r = RecordingRenderer::default();
    app.frame(0.0, &mut r);
    assert_eq!(r.views.len(), 1);
    assert_eq!(r.views[0].eye, app.camera.eye);
    assert_eq!(r.views[0].view, app.camera.view_matrix());
}

#[test]
fn particle_field_stays_in_its_box() {
    let field = ParticleField::standard(Vec3::X, Vec3::Y, &mut StdRng::seed_from_u64(5));
    assert_eq!(field.len(), 100);
    for p in &field.positions {
        assert!(p.x >= -15.0 && p.x < 15.0);
        assert!(p.y >= -10.0 && p.y < 10.0);
        assert!(p.z >= -12.5 && p.z < 2.5);
    }
    assert_eq!(field_rotation(0.0), Vec3::ZERO);
}

#[test]
fn session_start_takes_over_from_a_queued_window_frame() {
    let mut requests = FrameRequests::default();
    assert_eq!(
        requests.plan(false),
        FramePlan {
            cancel_window: None,
            request: Some(FrameSource::Window),
        }
    );
    requests.window_requested(41);
    // Still queued: nothing new.
    assert_eq!(requests.plan(false), FramePlan::default());

    // The session starts while the window frame is still outstanding.
    assert_eq!(
        requests.plan(true),
        FramePlan {
            cancel_window: Some(41),
            request: Some(FrameSource::Xr),
        }
    );
    assert_eq!(requests.plan(true), FramePlan::default());
    requests.xr_done();
    assert_eq!(requests.plan(true).request, Some(FrameSource::Xr));
}

#[test]
fn session_end_hands_back_to_window_frames() {
    let mut requests = FrameRequests::default();
    requests.plan(false);
    requests.window_requested(3);
    requests.plan(true);

    // The ended session's queued frame never arrives.
    assert_eq!(requests.plan(false).request, Some(FrameSource::Window));
    requests.window_requested(4);
    assert_eq!(requests.plan(false).request, None);
    requests.window_done();
    assert_eq!(requests.plan(false).request, Some(FrameSource::Window));
}
