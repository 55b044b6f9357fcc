//! Pairwise collision resolution for the asteroid field.
//!
//! One O(n²) pass per tick: overlapping pairs merge, the larger asteroid
//! absorbs the smaller's area (discounted by a growth modifier so giants
//! accrete slowly), and the loser is tombstoned via its `merged` flag.  A
//! separate sweep removes tombstones after the pass so that in-progress
//! iteration never reindexes the population.

use crate::constants::{MERGE_GROWTH_PENALTY, MERGE_RECOIL};
use crate::effects::EffectPool;
use crate::field::{hue_from_radius, AsteroidField};
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::{PI, TAU};

/// Resolve every overlapping pair, larger absorbing smaller.
///
/// Chain merges within a single pass flow through the winner's already
/// updated radius.  Losers keep their (stale) position and radius until the
/// sweep, which is what lets a tombstone still seed burst particles.
pub fn resolve_collisions(
    field: &mut AsteroidField,
    effects: &mut EffectPool,
    now_ms: f64,
    rng: &mut impl Rng,
) {
    let n = field.asteroids.len();
    for i in 0..n {
        if field.asteroids[i].merged {
            continue;
        }
        for j in (i + 1)..n {
            if field.asteroids[j].merged {
                continue;
            }

            let dist = field.asteroids[i].pos.distance(field.asteroids[j].pos);
            if dist >= field.asteroids[i].r + field.asteroids[j].r {
                continue;
            }

            let (win, lose) = if field.asteroids[j].r > field.asteroids[i].r {
                (j, i)
            } else {
                (i, j)
            };
            let smaller = field.asteroids[lose];
            field.asteroids[lose].merged = true;

            let larger = &mut field.asteroids[win];
            let area_large = PI * larger.r * larger.r;
            let area_small = PI * smaller.r * smaller.r;
            let growth_modifier = 1.0 / (1.0 + larger.r * MERGE_GROWTH_PENALTY);
            larger.r = ((area_large + area_small * growth_modifier) / PI).sqrt();

            // Ease the hue toward the new size's color instead of snapping;
            // the blend factor wobbles so repeat merges don't look uniform.
            let target_hue = hue_from_radius(larger.r, rng);
            let blend = 0.3 + 0.2 * ((larger.r as f64 + now_ms * 0.001).sin() as f32);
            larger.hue = larger.hue * (1.0 - blend) + target_hue * blend;

            let recoil_angle =
                (smaller.pos.y - larger.pos.y).atan2(smaller.pos.x - larger.pos.x);
            let recoil = MERGE_RECOIL / larger.r;
            larger.vel -= Vec2::from_angle(recoil_angle) * recoil;

            let win_pos = larger.pos;
            let win_r = larger.r;
            let win_hue = larger.hue;
            effects.push_trail(win_pos, win_r * 0.8, win_hue, 0.2);

            // Burst particles at the collision midpoint, tinted by the loser.
            let collision = smaller.pos + (win_pos - smaller.pos) * 0.5;
            let burst_size = (smaller.r * 0.5).min(win_r * 0.3);
            for _ in 0..4 {
                let angle = rng.gen_range(0.0..TAU);
                let offset = burst_size * rng.gen_range(0.0..0.8);
                effects.push_trail(
                    collision + Vec2::from_angle(angle) * offset,
                    burst_size * rng.gen_range(0.5..1.0),
                    smaller.hue,
                    rng.gen_range(0.5..0.8),
                );
            }
        }
    }
}

/// Drop every tombstoned asteroid, preserving the survivors' order.
pub fn sweep_merged(field: &mut AsteroidField) {
    field.asteroids.retain(|a| !a.merged);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Asteroid;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn asteroid(pos: Vec2, r: f32) -> Asteroid {
        Asteroid {
            pos,
            r,
            phase: 0.0,
            base_speed: 0.05,
            vel: Vec2::ZERO,
            merged: false,
            hue: 180.0,
        }
    }

    fn run_pass(field: &mut AsteroidField) -> EffectPool {
        let mut effects = EffectPool::default();
        let mut rng = StdRng::seed_from_u64(42);
        resolve_collisions(field, &mut effects, 0.0, &mut rng);
        sweep_merged(field);
        effects
    }

    #[test]
    fn overlapping_pair_merges_into_the_larger() {
        let mut field = AsteroidField {
            asteroids: vec![
                asteroid(Vec2::new(100.0, 100.0), 6.0),
                asteroid(Vec2::new(104.0, 100.0), 3.0),
            ],
            target_count: 0,
        };
        run_pass(&mut field);
        assert_eq!(field.asteroids.len(), 1);
        let winner = &field.asteroids[0];
        assert!(winner.r > 6.0, "winner must grow");
        // Full area conservation would give sqrt(36+9) ≈ 6.7; the growth
        // modifier keeps it strictly below that.
        assert!(winner.r < (36.0_f32 + 9.0).sqrt());
    }

    #[test]
    fn growth_modifier_penalizes_large_winners() {
        let small_winner = {
            let mut field = AsteroidField {
                asteroids: vec![
                    asteroid(Vec2::new(0.0, 0.0), 4.0),
                    asteroid(Vec2::new(1.0, 0.0), 2.0),
                ],
                target_count: 0,
            };
            run_pass(&mut field);
            field.asteroids[0].r / 4.0
        };
        let large_winner = {
            let mut field = AsteroidField {
                asteroids: vec![
                    asteroid(Vec2::new(0.0, 0.0), 40.0),
                    asteroid(Vec2::new(1.0, 0.0), 2.0),
                ],
                target_count: 0,
            };
            run_pass(&mut field);
            field.asteroids[0].r / 40.0
        };
        assert!(
            small_winner > large_winner,
            "relative growth must shrink as the winner gets bigger"
        );
    }

    #[test]
    fn winner_recoils_away_from_the_absorbed_asteroid() {
        let mut field = AsteroidField {
            asteroids: vec![
                asteroid(Vec2::new(0.0, 0.0), 6.0),
                asteroid(Vec2::new(5.0, 0.0), 3.0),
            ],
            target_count: 0,
        };
        run_pass(&mut field);
        assert!(
            field.asteroids[0].vel.x < 0.0,
            "recoil points opposite the loser"
        );
    }

    #[test]
    fn merge_emits_burst_particles() {
        let mut field = AsteroidField {
            asteroids: vec![
                asteroid(Vec2::new(0.0, 0.0), 6.0),
                asteroid(Vec2::new(5.0, 0.0), 3.0),
            ],
            target_count: 0,
        };
        let effects = run_pass(&mut field);
        // One winner trail plus four burst particles.
        assert_eq!(effects.trails.len(), 5);
    }

    #[test]
    fn separated_asteroids_do_not_merge() {
        let mut field = AsteroidField {
            asteroids: vec![
                asteroid(Vec2::new(0.0, 0.0), 3.0),
                asteroid(Vec2::new(50.0, 0.0), 3.0),
            ],
            target_count: 0,
        };
        run_pass(&mut field);
        assert_eq!(field.asteroids.len(), 2);
    }

    #[test]
    fn three_way_overlap_chains_into_one_survivor() {
        let mut field = AsteroidField {
            asteroids: vec![
                asteroid(Vec2::new(0.0, 0.0), 5.0),
                asteroid(Vec2::new(4.0, 0.0), 3.0),
                asteroid(Vec2::new(7.0, 0.0), 2.0),
            ],
            target_count: 0,
        };
        run_pass(&mut field);
        assert_eq!(field.asteroids.len(), 1);
    }
}
