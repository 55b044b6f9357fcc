//! Asteroid field simulator.
//!
//! Owns the asteroid population and advances it one tick at a time: piecewise
//! radial gravity, tangential spiral/curl forces, cursor influence, velocity
//! retention, boundary culling, black-hole consumption, and replenishment
//! toward the viewport-derived target count.
//!
//! The per-asteroid step is deterministic; randomness only enters through
//! spawning and merging, which keeps the force model directly unit-testable.

use crate::config::SimConfig;
use crate::constants::*;
use crate::effects::EffectPool;
use crate::error::{SimError, SimResult};
use crate::math::MIN_DENOM;
use crate::simulation::{BlackHole, Viewport};
use crate::stars::ShootingStarField;
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, TAU};

/// One asteroid: radius doubles as the mass proxy, `merged` is the tombstone
/// set by the collision resolver and cleared only by the sweep pass.
#[derive(Debug, Clone, Copy)]
pub struct Asteroid {
    pub pos: Vec2,
    pub r: f32,
    /// Per-asteroid phase feeding the curl oscillation; drifts slowly.
    pub phase: f32,
    /// Spawn-time nominal speed.
    pub base_speed: f32,
    pub vel: Vec2,
    pub merged: bool,
    pub hue: f32,
}

/// The asteroid population plus its resize-derived target count.
#[derive(Resource, Default)]
pub struct AsteroidField {
    pub asteroids: Vec<Asteroid>,
    pub target_count: usize,
}

/// Map a radius onto the hue ramp (blue for dust, red for giants), with a
/// ±20° jitter so same-sized asteroids don't share one exact color.
pub fn hue_from_radius(r: f32, rng: &mut impl Rng) -> f32 {
    let t = (r.clamp(1.0, 100.0) - 1.0) / 99.0;
    220.0 - t * 220.0 + rng.gen_range(-20.0..20.0)
}

/// Piecewise gravity ease curve shared with the shooting-star simulator.
///
/// Bands, inside-out: a strong quadratic ramp under 2× hole radius, a sharper
/// suck-in spike between 1.8× and 2×, a moderate ramp out to 4×, then a mild
/// quartic falloff of the normalized far-range factor `far_t`.
pub fn gravity_ease(dist: f32, hole_r: f32, far_t: f32) -> f32 {
    if dist < hole_r * 4.0 {
        if dist > hole_r * 2.0 {
            0.6 + (1.0 - dist / (hole_r * 4.0)).powi(2) * 3.5
        } else if dist > hole_r * 1.8 {
            4.0 + (1.0 - dist / (hole_r * 2.0)).powi(2) * 15.0
        } else {
            2.0 + (1.0 - dist / (hole_r * 2.0)).powi(2) * 12.0
        }
    } else {
        far_t.powi(4) * 0.25
    }
}

/// Base spiral and curl strengths by distance band.
///
/// Inside the 2×–4× anti-orbit band both drop to their weaker counter values,
/// scaled by the band falloff, so nothing settles into a stable orbit there.
pub fn tangential_strengths(dist: f32, hole_r: f32) -> (f32, f32) {
    if dist > hole_r * 2.0 && dist < hole_r * 4.0 {
        let falloff = 1.0 - (dist - hole_r * 2.0) / (hole_r * 2.0);
        (
            SPIRAL_COUNTER_STRENGTH * falloff,
            CURVE_COUNTER_STRENGTH * falloff,
        )
    } else {
        (SPIRAL_STRENGTH, CURVE_STRENGTH)
    }
}

impl AsteroidField {
    /// Recompute the target population from the viewport area.
    pub fn retarget(&mut self, viewport: &Viewport, config: &SimConfig) {
        self.target_count = (viewport.width * viewport.height / config.density_divisor) as usize;
    }

    /// Seed the initial population with interior spawns only.
    pub fn seed(
        &mut self,
        hole: &BlackHole,
        viewport: &Viewport,
        config: &SimConfig,
        rng: &mut impl Rng,
    ) {
        while self.asteroids.len() < self.target_count {
            self.spawn_interior(hole, viewport, config, rng);
        }
    }

    /// Place one asteroid uniformly at random, rejecting positions closer to
    /// the hole than the minimum safe distance.
    ///
    /// Attempts are capped: a viewport too small to contain any safe interior
    /// position falls back to an edge spawn instead of spinning at startup.
    pub fn spawn_interior(
        &mut self,
        hole: &BlackHole,
        viewport: &Viewport,
        config: &SimConfig,
        rng: &mut impl Rng,
    ) {
        const MAX_ATTEMPTS: usize = 32;

        let r = 1.0 + rng.gen_range(0.0..2.0);
        let min_safe = hole.radius * config.interior_safe_factor;
        let mut placed = None;
        for _ in 0..MAX_ATTEMPTS {
            let candidate = Vec2::new(
                rng.gen_range(0.0..viewport.width),
                rng.gen_range(0.0..viewport.height),
            );
            if candidate.distance(hole.center) >= min_safe {
                placed = Some(candidate);
                break;
            }
        }
        let Some(pos) = placed else {
            self.spawn_from_edge(hole, viewport, config, rng);
            return;
        };
        let hue = hue_from_radius(r, rng);
        self.asteroids.push(Asteroid {
            pos,
            r,
            phase: rng.gen_range(0.0..TAU),
            base_speed: 0.05 + rng.gen_range(0.0..0.08),
            vel: Vec2::ZERO,
            merged: false,
            hue,
        });
    }

    /// Place one asteroid just outside a random edge, aimed at the hole with
    /// a low initial speed.  Returns `true` when the caller should also spawn
    /// a shooting star.
    pub fn spawn_from_edge(
        &mut self,
        hole: &BlackHole,
        viewport: &Viewport,
        config: &SimConfig,
        rng: &mut impl Rng,
    ) -> bool {
        if self.asteroids.len() >= self.target_count {
            return false;
        }

        let margin = config.edge_spawn_margin;
        let pos = match rng.gen_range(0..4) {
            0 => Vec2::new(rng.gen_range(0.0..viewport.width), -margin),
            1 => Vec2::new(rng.gen_range(0.0..viewport.width), viewport.height + margin),
            2 => Vec2::new(-margin, rng.gen_range(0.0..viewport.height)),
            _ => Vec2::new(viewport.width + margin, rng.gen_range(0.0..viewport.height)),
        };

        let angle = (hole.center.y - pos.y).atan2(hole.center.x - pos.x);
        let speed = (0.015 + rng.gen_range(0.0..0.03)) * 0.4;
        let r = 1.0 + rng.gen_range(0.0..2.0);
        let hue = hue_from_radius(r, rng);

        self.asteroids.push(Asteroid {
            pos,
            r,
            phase: rng.gen_range(0.0..TAU),
            base_speed: speed,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed * 2.0,
            merged: false,
            hue,
        });

        rng.gen_bool(config.star_spawn_chance)
    }

    /// Top the population back up to the target after the tick's removals.
    ///
    /// Steady state reaches exactly the target: `spawn_from_edge` refuses to
    /// overshoot, so the double-spawn attempt per iteration only accelerates
    /// refill after a burst of consumption.
    pub fn replenish(
        &mut self,
        stars: &mut ShootingStarField,
        hole: &BlackHole,
        viewport: &Viewport,
        config: &SimConfig,
        rng: &mut impl Rng,
    ) {
        while self.asteroids.len() < self.target_count {
            if self.spawn_from_edge(hole, viewport, config, rng) {
                stars.spawn(viewport, rng);
            }
            if self.asteroids.len() < self.target_count
                && self.spawn_from_edge(hole, viewport, config, rng)
            {
                stars.spawn(viewport, rng);
            }
        }
    }

    /// Verify that every live asteroid has finite, positive state.
    pub fn check_finite(&self) -> SimResult<()> {
        for a in &self.asteroids {
            if !a.pos.is_finite() || !a.vel.is_finite() {
                return Err(SimError::NonFiniteState {
                    context: "asteroid position/velocity",
                });
            }
            if !a.r.is_finite() || a.r <= 0.0 {
                return Err(SimError::NonFiniteState {
                    context: "asteroid radius",
                });
            }
        }
        Ok(())
    }
}

/// Advance every non-merged asteroid one tick and apply the removal policy.
pub fn update_asteroids(
    field: &mut AsteroidField,
    hole: &BlackHole,
    viewport: &Viewport,
    pointer: Option<Vec2>,
    now_ms: f64,
    config: &SimConfig,
    effects: &mut EffectPool,
) {
    for i in (0..field.asteroids.len()).rev() {
        let remove = step_asteroid(
            &mut field.asteroids[i],
            hole,
            viewport,
            pointer,
            now_ms,
            config,
            effects,
        );
        if remove {
            field.asteroids.swap_remove(i);
        }
    }
}

/// One asteroid tick.  Returns `true` when the asteroid must be removed.
///
/// Removal predicates are evaluated in a fixed priority order (bounds cull,
/// then the 0.65x consumption band, then the 0.8x horizon band) and the
/// first that fires short-circuits the rest of the tick.
fn step_asteroid(
    a: &mut Asteroid,
    hole: &BlackHole,
    viewport: &Viewport,
    pointer: Option<Vec2>,
    now_ms: f64,
    config: &SimConfig,
    effects: &mut EffectPool,
) -> bool {
    let hole_r = hole.radius;
    let size_factor = 1.0 / a.r.max(MIN_DENOM).sqrt();

    let to_hole = hole.center - a.pos;
    let dist = to_hole.length();

    // Normalized far-range factor: 1 at the hole, 0 beyond 90% of the width.
    let max_dist = viewport.width * 0.9;
    let t = (1.0 - dist / max_dist).clamp(0.0, 1.0);

    let eased = gravity_ease(dist, hole_r, t);
    let accel = GRAVITY_BASE_ACCEL + GRAVITY_EASED_SCALE * eased;
    a.vel += to_hole * (accel * size_factor);

    // Spiral/curl strength scales with distance and is cut back in the
    // 2×–4× band so nothing settles into a stable orbit there.
    let mid_falloff = 1.0 - (dist - hole_r * 2.0) / (hole_r * 2.0);
    let distance_factor = if dist < hole_r * 2.0 {
        1.0
    } else if dist < hole_r * 4.0 {
        0.3 + 0.5 * mid_falloff
    } else {
        0.12 + 0.18 * t
    };

    let (spiral_strength, curve_strength) = tangential_strengths(dist, hole_r);

    let wobble_sin = (now_ms * 0.002).sin() as f32;
    let wobble_cos = ((now_ms * 0.002) + a.phase as f64).cos() as f32;
    let spiral = spiral_strength * size_factor * distance_factor
        + TANGENTIAL_WOBBLE * wobble_sin * distance_factor;
    let curve = curve_strength * (1.0 - t) * distance_factor
        + TANGENTIAL_WOBBLE * wobble_cos * distance_factor;

    let radial_angle = to_hole.y.atan2(to_hole.x);
    let tangent = Vec2::from_angle(radial_angle + FRAC_PI_2);
    a.vel += tangent * (curve + spiral);

    a.phase += 0.0004 * size_factor * distance_factor;

    // Cursor influence: tangential + radial impulses with power-1.8 falloff,
    // plus mild damping; an interaction affordance, not physics.
    if let Some(cursor) = pointer {
        let to_cursor = cursor - a.pos;
        let cdist = to_cursor.length();
        if cdist < config.cursor_radius {
            let strength =
                (1.0 - cdist / config.cursor_radius).powf(1.8) * config.cursor_strength;
            let cursor_tangent =
                Vec2::from_angle(to_cursor.y.atan2(to_cursor.x) + FRAC_PI_2);
            a.vel += cursor_tangent * (strength * CURSOR_TANGENTIAL * size_factor);
            a.vel += to_cursor * (strength * CURSOR_RADIAL * size_factor);
            a.vel *= CURSOR_DAMPING;
        }
    }

    a.pos += a.vel;

    // Hard cull beyond the canvas margin, no fade.
    let margin = config.cull_margin;
    if a.pos.x < -margin
        || a.pos.x > viewport.width + margin
        || a.pos.y < -margin
        || a.pos.y > viewport.height + margin
    {
        return true;
    }

    // Velocity retention, stronger close in where the force law spikes.
    let retention = if dist < hole_r * 2.0 {
        RETENTION_NEAR
    } else if dist < hole_r * 4.0 {
        RETENTION_MID
    } else {
        RETENTION_FAR_BASE + RETENTION_FAR_SCALE * t
    };
    a.vel *= retention;

    effects.push_trail(a.pos, a.r * 1.2, a.hue, 0.12);

    let dist_to_hole = a.pos.distance(hole.center);

    // Suck-in band: a dramatic streak of ghosts plus a ripple pulse.
    if dist_to_hole > hole_r * 1.8 && dist_to_hole < hole_r * 2.0 {
        let extra = 12;
        for k in 0..extra {
            let offset = (k + 1) as f32 * 5.0;
            effects.push_trail(
                a.pos - a.vel * offset * 1.2,
                (a.r * (1.5 - k as f32 * 0.1)).max(0.05),
                a.hue,
                0.5 * (1.0 - k as f32 / extra as f32),
            );
        }
        effects.push_ripple(a.pos, a.r * 1.5, a.hue, 0.2);
    }

    // Approaching-horizon ghosts, denser and brighter the closer it gets.
    if dist_to_hole < hole_r * 1.5 && dist_to_hole > hole_r * CONSUME_BAND_FACTOR {
        let proximity = (dist_to_hole - hole_r * CONSUME_BAND_FACTOR) / (hole_r * 0.85);
        let trail_count = (7.0 * (1.0 - proximity) + 3.0) as usize;
        let trail_alpha = 0.4 * (1.0 - proximity) + 0.15;
        for k in 0..trail_count {
            let offset = (k + 1) as f32 * 2.5;
            effects.push_trail(
                a.pos - a.vel * offset * 0.8,
                (a.r * (1.2 - k as f32 * 0.15)).max(0.05),
                a.hue,
                trail_alpha * (1.0 - k as f32 / trail_count as f32),
            );
        }
    }

    // Final consumption: amplified pull, geometric shrink, heavy damping.
    if dist_to_hole < hole_r * CONSUME_BAND_FACTOR {
        a.vel += to_hole * CONSUME_PULL;
        effects.push_trail(a.pos, a.r * 1.4, a.hue, 0.15);
        a.r *= CONSUME_SHRINK;
        a.vel *= CONSUME_DAMPING;

        let close_to_center = (a.pos.x - hole.center.x).abs() < CONSUME_CENTER_BOX
            && (a.pos.y - hole.center.y).abs() < CONSUME_CENTER_BOX;
        if a.r < CONSUME_MIN_RADIUS
            || close_to_center
            || dist_to_hole < hole_r * CONSUME_INNER_FACTOR
        {
            return true;
        }
    }

    // Event-horizon band, evaluated last: shrink quietly and remove when
    // tiny.  Overrides the 0.65× band's shrink when both apply.
    if dist_to_hole < hole_r * HORIZON_BAND_FACTOR {
        a.r *= HORIZON_SHRINK;
        if a.r < HORIZON_MIN_RADIUS {
            return true;
        }
    }

    false
}
