//! Shooting stars: fast white streaks that cut across the field.
//!
//! Stars reuse the asteroid gravity curve at half strength, with a proximity
//! boost near the hole and a speed floor so a star never stalls into an
//! invisible crawl.  They are spawned opportunistically (a small chance per
//! edge asteroid spawn, plus pointer taps) and die either at the event
//! horizon or past the canvas margin.

use crate::config::SimConfig;
use crate::constants::*;
use crate::effects::EffectPool;
use crate::field::gravity_ease;
use crate::simulation::{BlackHole, Viewport};
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy)]
pub struct ShootingStar {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Stroke width of the streak.
    pub size: f32,
    /// Spawn-time speed; scales gravity response and anchors the speed floor.
    pub speed: f32,
    /// Streak length in velocity multiples, fixed at spawn.
    pub trail: f32,
    pub alpha: f32,
    pub active: bool,
}

#[derive(Resource, Default)]
pub struct ShootingStarField {
    pub stars: Vec<ShootingStar>,
}

impl ShootingStarField {
    /// Launch a star from just outside a random edge toward a random interior
    /// destination.  Aiming at a point rather than the hole keeps most stars
    /// on flyby trajectories instead of death plunges.
    pub fn spawn(&mut self, viewport: &Viewport, rng: &mut impl Rng) {
        let margin = 20.0;
        let pos = match rng.gen_range(0..4) {
            0 => Vec2::new(rng.gen_range(0.0..viewport.width), -margin),
            1 => Vec2::new(viewport.width + margin, rng.gen_range(0.0..viewport.height)),
            2 => Vec2::new(rng.gen_range(0.0..viewport.width), viewport.height + margin),
            _ => Vec2::new(-margin, rng.gen_range(0.0..viewport.height)),
        };

        let dest = Vec2::new(
            rng.gen_range(0.0..viewport.width),
            rng.gen_range(0.0..viewport.height),
        );
        let angle = (dest.y - pos.y).atan2(dest.x - pos.x);
        let speed = rng.gen_range(2.0..6.0);

        self.stars.push(ShootingStar {
            pos,
            vel: Vec2::from_angle(angle) * speed,
            size: 1.0 + rng.gen_range(0.0..1.5),
            speed,
            trail: 6.0 + rng.gen_range(0.0..8.0),
            alpha: 0.7 + rng.gen_range(0.0..0.3),
            active: true,
        });
    }
}

/// Advance every star one tick; deactivated stars are removed in place.
pub fn update_stars(
    field: &mut ShootingStarField,
    hole: &BlackHole,
    viewport: &Viewport,
    pointer: Option<Vec2>,
    now_ms: f64,
    config: &SimConfig,
    effects: &mut EffectPool,
) {
    for i in (0..field.stars.len()).rev() {
        if !field.stars[i].active {
            field.stars.swap_remove(i);
            continue;
        }
        step_star(
            &mut field.stars[i],
            hole,
            viewport,
            pointer,
            now_ms,
            config,
            effects,
        );
    }
}

fn step_star(
    star: &mut ShootingStar,
    hole: &BlackHole,
    viewport: &Viewport,
    pointer: Option<Vec2>,
    now_ms: f64,
    config: &SimConfig,
    effects: &mut EffectPool,
) {
    let hole_r = hole.radius;
    let to_hole = hole.center - star.pos;
    let dist = to_hole.length();

    let max_dist = viewport.width * 0.9;
    let t = (1.0 - dist / max_dist).clamp(0.0, 1.0);

    let eased = gravity_ease(dist, hole_r, t);
    let accel = (GRAVITY_BASE_ACCEL + GRAVITY_EASED_SCALE * eased) * config.star_gravity_factor;

    // Extra pull inside 3× hole radius so close passes visibly bend.
    let proximity_boost = if dist < hole_r * 3.0 {
        1.0 + STAR_PROXIMITY_BOOST * (1.0 - dist / (hole_r * 3.0)).powi(2)
    } else {
        1.0
    };
    star.vel += to_hole * (accel * star.speed * proximity_boost);

    // Tangential spiral/curl, stronger than the asteroid variant.
    let distance_factor = if dist < hole_r * 2.0 {
        1.2
    } else if dist < hole_r * 4.0 {
        0.4 + 0.6 * (1.0 - (dist - hole_r * 2.0) / (hole_r * 2.0))
    } else {
        0.2 + 0.2 * t
    };

    let wobble_sin = (now_ms * 0.002).sin() as f32;
    let wobble_cos = (now_ms * 0.002).cos() as f32;
    let spiral = SPIRAL_STRENGTH * config.star_gravity_factor * distance_factor
        + TANGENTIAL_WOBBLE * wobble_sin * distance_factor;
    let curve = 0.004 * config.star_gravity_factor * (1.0 - t) * distance_factor
        + TANGENTIAL_WOBBLE * wobble_cos * distance_factor;

    let tangent = Vec2::from_angle(to_hole.y.atan2(to_hole.x) + FRAC_PI_2);
    star.vel += tangent * (curve + spiral);

    // Faint radial attraction toward the pointer.
    if let Some(cursor) = pointer {
        let to_cursor = cursor - star.pos;
        let cdist = to_cursor.length();
        if cdist < config.star_cursor_radius {
            let strength = (1.0 - cdist / config.star_cursor_radius).powi(2) * STAR_CURSOR_STRENGTH;
            let cursor_angle = to_cursor.y.atan2(to_cursor.x);
            star.vel += Vec2::from_angle(cursor_angle) * (strength * STAR_CURSOR_IMPULSE);
        }
    }

    // Speed floor: restore to 70% of spawn speed when gravity wrestling has
    // dropped it below half.  Keeps orbital swings dramatic but visible.
    let current_speed = star.vel.length();
    if current_speed < star.speed * STAR_FLOOR_TRIGGER && current_speed > 0.0 {
        star.vel *= star.speed * STAR_FLOOR_RESTORE / current_speed;
    }

    star.pos += star.vel;

    let dist_to_hole = star.pos.distance(hole.center);

    // Pulse ring while crossing the suck-in band.
    if dist_to_hole > hole_r * 1.8 && dist_to_hole < hole_r * 2.0 {
        effects.push_ripple(star.pos, star.size * 2.0, 220.0, 0.125);
    }

    // Consumed at the event horizon: two parting trails, then gone.
    if dist_to_hole < hole_r * HORIZON_BAND_FACTOR {
        effects.push_trail(star.pos, star.size * 4.0, 220.0, 0.3);
        effects.push_trail(star.pos - star.vel * 2.0, star.size * 2.0, 200.0, 0.2);
        star.active = false;
    }

    if star.pos.x < -50.0
        || star.pos.x > viewport.width + 50.0
        || star.pos.y < -50.0
        || star.pos.y > viewport.height + 50.0
    {
        star.active = false;
    }
}
