// Perspective camera rays and the damped orbit control.

use card_web::camera::{ray_triangle, Camera, OrbitControls, Ray};
use glam::{Vec2, Vec3};

#[test]
fn centre_ray_looks_down_the_view_axis() {
    let camera = Camera::default();
    let ray = camera.ray_from_ndc(Vec2::ZERO);
    assert_eq!(ray.origin, Vec3::new(0.0, 0.0, 12.0));
    assert!((ray.direction - Vec3::NEG_Z).length() < 1e-5);
}

#[test]
fn project_inverts_ray_from_ndc() {
    let camera = Camera::default();
    let ndc = Vec2::new(0.3, -0.4);
    let ray = camera.ray_from_ndc(ndc);
    let back = camera.project(ray.at(7.0));
    assert!((back - ndc).length() < 1e-4, "{back:?}");
}

#[test]
fn triangle_culling_respects_winding() {
    let tri = [
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];
    let towards = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
    let behind = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
    assert!((ray_triangle(&towards, &tri, true).unwrap() - 5.0).abs() < 1e-5);
    assert_eq!(ray_triangle(&behind, &tri, true), None);
    assert!(ray_triangle(&behind, &tri, false).is_some());
}

#[test]
fn dolly_is_clamped_to_the_distance_range() {
    let mut camera = Camera::default();
    let mut orbit = OrbitControls::new(&camera);
    orbit.dolly(100.0);
    orbit.update(&mut camera);
    assert!((camera.eye.length() - 20.0).abs() < 1e-4);

    orbit.dolly(-200.0);
    orbit.update(&mut camera);
    assert!((camera.eye.length() - 5.0).abs() < 1e-4);
}

#[test]
fn drag_rotation_is_damped_over_frames() {
    let mut camera = Camera::default();
    let mut orbit = OrbitControls::new(&camera);
    orbit.begin_drag(Vec2::ZERO);
    orbit.drag_to(Vec2::new(60.0, 0.0), 600.0);
    orbit.end_drag();

    orbit.update(&mut camera);
    let first = camera.eye;
    orbit.update(&mut camera);
    let second = camera.eye;
    let step1 = first.distance(Vec3::new(0.0, 0.0, 12.0));
    let step2 = second.distance(first);
    assert!(step1 > 0.0);
    assert!(step2 < step1);
    assert!((camera.eye.length() - 12.0).abs() < 1e-3);
}

#[test]
fn disabled_controls_ignore_input_and_reset_restores_pose() {
    let mut camera = Camera::default();
    let mut orbit = OrbitControls::new(&camera);
    orbit.enabled = false;
    orbit.begin_drag(Vec2::ZERO);
    assert!(!orbit.is_dragging());
    orbit.dolly(3.0);
    orbit.update(&mut camera);
    assert!((camera.eye - Vec3::new(0.0, 0.0, 12.0)).length() < 1e-4);

    orbit.enabled = true;
    orbit.dolly(3.0);
    orbit.update(&mut camera);
    orbit.reset(&mut camera);
    assert_eq!(camera.eye, Vec3::new(0.0, 0.0, 12.0));
    assert_eq!(camera.target, Vec3::ZERO);
}
