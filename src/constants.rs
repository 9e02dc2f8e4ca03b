use glam::Vec3;

// Shared layout/animation tuning constants for the card scene.

// Camera
pub const CAMERA_FOV_DEG: f32 = 60.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_HOME: Vec3 = Vec3::new(0.0, 0.0, 12.0);

// Orbit controls
pub const ORBIT_DAMPING: f32 = 0.05;
pub const ORBIT_MIN_DISTANCE: f32 = 5.0;
pub const ORBIT_MAX_DISTANCE: f32 = 20.0;
pub const ORBIT_ROTATE_SPEED: f32 = 1.0; // full canvas height drag = 2π
pub const ORBIT_ZOOM_STEP: f32 = 0.95; // dolly scale per wheel notch

// Scene
pub const BACKGROUND_HEX: u32 = 0x1a1a2e;

// Text quads: every label is a 4x1 plane backed by a 512x128 canvas
pub const TEXT_QUAD_SIZE: [f32; 2] = [4.0, 1.0];
pub const TEXT_CANVAS_PX: [u32; 2] = [512, 128];
pub const TEXT_LIFT: f32 = 0.01; // text sits just above its group plane
pub const FACE_OFFSET: f32 = 0.01; // front/back group gap from the card surface

// Particle field
pub const PARTICLE_COUNT: usize = 100;
pub const PARTICLE_SPREAD: [f32; 3] = [30.0, 20.0, 15.0];
pub const PARTICLE_Z_SHIFT: f32 = -5.0;
pub const PARTICLE_SIZE: f32 = 0.08;
pub const PARTICLE_OPACITY: f32 = 0.6;
pub const PARTICLE_SPIN_Y: f32 = 0.02; // rad per second
pub const PARTICLE_WOBBLE_FREQ: f32 = 0.1;
pub const PARTICLE_WOBBLE_AMP: f32 = 0.1;

// Per-tick animation
pub const AUTO_ROTATE_STEP: f32 = 0.01; // multiplied by animations.autoRotateSpeed
pub const FLOAT_TIME_SCALE: f64 = 1000.0; // floatSpeed is configured per millisecond
pub const DECORATION_BOB: f32 = 0.003;
pub const DECORATION_Y_SPIN_RATIO: f32 = 0.7;

// AR presentation
pub const AR_CARD_SCALE: f32 = 0.25;
pub const AR_CARD_POSITION: Vec3 = Vec3::new(0.0, 0.1, -2.0);
pub const AR_FLOAT_BASE_Y: f32 = 0.1;
pub const AR_FLOAT_AMPLITUDE_SCALE: f32 = 0.3;
// Wraps both the canvas and the controls so the card stays composited.
pub const AR_OVERLAY_ROOT: &str = "ar-root";

// Glow plane behind the card
pub const GLOW_SIZE: [f32; 2] = [10.0, 7.0];
pub const GLOW_Z: f32 = -0.5;

// UI
pub const TOOLTIP_OFFSET_PX: f64 = 15.0;
pub const NOTIFICATION_MS: i32 = 2000;
pub const LOADING_HIDE_MS: i32 = 1000;
