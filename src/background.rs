//! Static background layers: nebula discs and a twinkling starfield, both
//! slowly rotating around the black hole with per-element parallax.
//!
//! Elements store their spawn-time canvas position; the render pass rotates
//! them around the hole by `rotation / distance_factor`, so nearer elements
//! sweep faster than distant ones.

use crate::constants::{BACKGROUND_ROTATION_STEP, NEBULA_COUNT, STAR_TWINKLE_STEP};
use crate::simulation::{BlackHole, Viewport};
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy)]
pub struct Nebula {
    pub base_pos: Vec2,
    pub size: f32,
    pub hue: f32,
    /// Parallax divisor in [0.5, 1.0]; larger means slower apparent motion.
    pub distance_factor: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct BackdropStar {
    pub base_pos: Vec2,
    pub phase: f32,
    pub brightness: f32,
    /// Parallax divisor in [0.6, 1.2].
    pub distance_factor: f32,
}

/// Rotating backdrop state, regenerated on every resize.
#[derive(Resource, Default)]
pub struct Background {
    pub rotation: f32,
    pub nebulae: Vec<Nebula>,
    pub stars: Vec<BackdropStar>,
    /// Bumped on every regeneration so retained nebula meshes know to rebuild.
    pub revision: u32,
}

impl Background {
    /// Rebuild nebulae and starfield for the current viewport.  The starfield
    /// matches the asteroid target count so density scales with area.
    pub fn regenerate(
        &mut self,
        hole: &BlackHole,
        viewport: &Viewport,
        star_count: usize,
        rng: &mut impl Rng,
    ) {
        self.nebulae.clear();
        self.stars.clear();
        self.revision = self.revision.wrapping_add(1);

        for _ in 0..NEBULA_COUNT {
            let angle = rng.gen_range(0.0..TAU);
            let distance = viewport.width * 0.2 + rng.gen_range(0.0..viewport.width * 0.4);
            let hue = if rng.gen_bool(0.7) {
                220.0 + rng.gen_range(0.0..60.0)
            } else {
                rng.gen_range(0.0..60.0)
            };
            self.nebulae.push(Nebula {
                base_pos: hole.center + Vec2::from_angle(angle) * distance,
                size: viewport.width * (0.15 + rng.gen_range(0.0..0.25)),
                hue,
                distance_factor: 0.5 + 0.5 * (distance / (viewport.width * 0.6)),
            });
        }

        for _ in 0..star_count {
            let angle = rng.gen_range(0.0..TAU);
            let distance = rng.gen_range(0.0..viewport.width * 0.7);
            self.stars.push(BackdropStar {
                base_pos: hole.center + Vec2::from_angle(angle) * distance,
                phase: rng.gen_range(0.0..TAU),
                brightness: 0.3 + rng.gen_range(0.0..0.4),
                distance_factor: 0.6 + 0.6 * (distance / (viewport.width * 0.7)),
            });
        }
    }

    /// One tick of rotation and twinkle-phase drift.
    pub fn advance(&mut self) {
        self.rotation -= BACKGROUND_ROTATION_STEP;
        for star in &mut self.stars {
            star.phase += STAR_TWINKLE_STEP;
        }
    }

    /// Canvas position of a backdrop element after its parallax rotation.
    pub fn rotated_pos(&self, base_pos: Vec2, distance_factor: f32, hole: &BlackHole) -> Vec2 {
        let angle = self.rotation / distance_factor.max(0.01);
        hole.center + (base_pos - hole.center).rotate(Vec2::from_angle(angle))
    }
}

/// Per-frame twinkle alpha for a backdrop star.
pub fn star_twinkle(star: &BackdropStar, now_ms: f64) -> f32 {
    0.7 + 0.3 * ((star.phase as f64 + now_ms * 0.0003).sin() as f32) * star.brightness
}
