//! Ambient particle field drifting behind the card.

use crate::constants::{PARTICLE_COUNT, PARTICLE_SPREAD, PARTICLE_Z_SHIFT};
use glam::Vec3;
use rand::Rng;

/// Fixed set of point samples. Positions never change after generation;
/// the field only rotates as a whole.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleField {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec3>,
}

impl ParticleField {
    /// `count` samples in a box centred at `(0, 0, PARTICLE_Z_SHIFT)`, each
    /// coloured by an independent random mix of `color_a` and `color_b`.
    pub fn generate<R: Rng>(count: usize, color_a: Vec3, color_b: Vec3, rng: &mut R) -> Self {
        let spread = Vec3::from_array(PARTICLE_SPREAD);
        let mut positions = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);
        for _ in 0..count {
            let unit = Vec3::new(rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>());
            let mut p = (unit - Vec3::splat(0.5)) * spread;
            p.z += PARTICLE_Z_SHIFT;
            positions.push(p);
            let mix = rng.gen::<f32>();
            colors.push(color_a.lerp(color_b, mix));
        }
        Self { positions, colors }
    }

    pub fn standard<R: Rng>(color_a: Vec3, color_b: Vec3, rng: &mut R) -> Self {
        Self::generate(PARTICLE_COUNT, color_a, color_b, rng)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Rotation of the field at `elapsed` seconds. A function of time only, so
/// it can be recomputed from any starting point.
#[inline]
pub fn field_rotation(elapsed: f32) -> Vec3 {
    use crate::constants::{PARTICLE_SPIN_Y, PARTICLE_WOBBLE_AMP, PARTICLE_WOBBLE_FREQ};
    Vec3::new(
        (elapsed * PARTICLE_WOBBLE_FREQ).sin() * PARTICLE_WOBBLE_AMP,
        elapsed * PARTICLE_SPIN_Y,
        0.0,
    )
}
