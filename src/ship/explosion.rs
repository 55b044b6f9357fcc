//! Ship explosion: particle burst creation, per-tick debris aging, and the
//! timed end-of-explosion cleanup.

use crate::config::SimConfig;
use crate::constants::*;
use crate::effects::{EffectPool, RippleGuard, RippleScheduler, ScheduledRipple};
use crate::ship::state::{ExplosionParticle, Ship, ShipState};
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

/// Blow the ship up: build the debris cloud, queue the staggered after-glow
/// ripples, and set the long randomized respawn delay.
pub fn trigger_explosion(
    ship: &mut Ship,
    now_ms: f64,
    config: &SimConfig,
    effects: &mut EffectPool,
    scheduler: &mut RippleScheduler,
    rng: &mut impl Rng,
) {
    ship.state = ShipState::Exploding;
    ship.explosion_started_ms = now_ms;
    ship.explosion_particles.clear();

    // Outer burst: fast, large, orange-red.
    for _ in 0..EXPLOSION_OUTER_PARTICLES {
        let angle = rng.gen_range(0.0..TAU);
        let speed = 0.5 + rng.gen_range(0.0..1.8);
        let size_variation = 0.8 + rng.gen_range(0.0..0.7);
        let base_size = 2.0 + rng.gen_range(0.0..ship.size * 1.2);
        ship.explosion_particles.push(ExplosionParticle {
            pos: ship.pos,
            vel: Vec2::from_angle(angle) * speed,
            size: base_size * size_variation,
            alpha: 0.8 + rng.gen_range(0.0..0.2),
            hue: 5.0 + rng.gen_range(0.0..10.0),
        });
    }

    // Dense inner core: slower, slightly offset, deeper red.
    for _ in 0..EXPLOSION_INNER_PARTICLES {
        let angle = rng.gen_range(0.0..TAU);
        let speed = 0.2 + rng.gen_range(0.0..0.6);
        ship.explosion_particles.push(ExplosionParticle {
            pos: ship.pos + Vec2::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0)),
            vel: Vec2::from_angle(angle) * speed,
            size: 1.5 + rng.gen_range(0.0..ship.size * 0.5),
            alpha: 0.9,
            hue: 2.0 + rng.gen_range(0.0..8.0),
        });
    }

    // Four staggered ripples, guarded so they only fire while the explosion
    // is still running.
    for i in 0..4_u64 {
        scheduler.schedule(ScheduledRipple {
            fire_at_ms: now_ms as u64 + i * 50,
            radius: ship.size * (0.6 + i as f32 * 0.2),
            alpha: 0.25 - i as f32 * 0.05,
            guard: RippleGuard::ShipExploding,
            ripple: true,
        });
    }

    // Immediate fire splash around the hull.
    for _ in 0..12 {
        let angle = rng.gen_range(0.0..TAU);
        let offset = 2.0 + rng.gen_range(0.0..ship.size * 0.6);
        effects.push_trail(
            ship.pos + Vec2::from_angle(angle) * offset,
            1.2 + rng.gen_range(0.0..ship.size * 0.4),
            10.0,
            0.8,
        );
    }

    ship.respawn_at_ms = now_ms + config.respawn_base_ms + rng.gen_range(0.0..config.respawn_jitter_ms);
}

/// Age the debris cloud one tick and end the explosion once its lifetime is
/// spent, purging any lingering trails near the wreck.
pub fn update_explosion(
    ship: &mut Ship,
    now_ms: f64,
    config: &SimConfig,
    effects: &mut EffectPool,
    rng: &mut impl Rng,
) {
    if ship.state != ShipState::Exploding {
        return;
    }

    for i in (0..ship.explosion_particles.len()).rev() {
        let p = &mut ship.explosion_particles[i];
        p.pos += p.vel + Vec2::new(rng.gen_range(-0.2..0.2), rng.gen_range(-0.2..0.2));
        p.size *= EXPLOSION_SHRINK;
        p.alpha -= EXPLOSION_FADE;
        if p.size < EXPLOSION_MIN_SIZE || p.alpha < EXPLOSION_MIN_ALPHA {
            ship.explosion_particles.swap_remove(i);
            continue;
        }
        p.vel *= 0.94 + rng.gen_range(0.0..0.02);
        if rng.gen_bool(0.4) {
            let (pos, size, alpha, hue) = (p.pos, p.size, p.alpha, p.hue);
            effects.push_trail(pos, size * 0.6, hue, alpha * 0.5);
        }
    }

    if now_ms - ship.explosion_started_ms > config.explosion_duration_ms {
        ship.state = ShipState::Dormant;
        ship.explosion_particles.clear();
        effects.purge_near(ship.pos, EXPLOSION_TRAIL_PURGE);
    }
}
