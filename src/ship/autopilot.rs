//! The ship's autopilot: threat avoidance, black-hole orbital routing, and
//! edge-exit validation.
//!
//! Steering blends four candidate headings (directly away from the hole, an
//! orbital tangent, the exit point, and any active evasive offset) with
//! distance-derived weights.  Two deterministic oscillations (one on time,
//! one on time plus the ship's x position) modulate the weights so repeated
//! passes never look identical even before randomness enters.

use crate::config::SimConfig;
use crate::constants::*;
use crate::effects::{EffectPool, RippleScheduler};
use crate::field::AsteroidField;
use crate::math::{angle_diff, heading, wrap_angle};
use crate::ship::explosion::trigger_explosion;
use crate::ship::state::{Edge, Ship, ShipState};
use crate::simulation::{BlackHole, Viewport};
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_8};

/// Steering weights for the three always-on candidate headings.
///
/// Inside the critical radius the escape intensity ramps the direct-away
/// weight; beyond it the orbit weight decays smoothly toward pure
/// exit-seeking at the influence boundary.
pub fn blend_weights(
    dist_to_hole: f32,
    critical_radius: f32,
    influence_radius: f32,
    time_variation: f32,
    random_factor: f32,
) -> (f32, f32, f32) {
    if dist_to_hole < critical_radius {
        let escape_intensity = (1.0 - dist_to_hole / critical_radius).powf(1.2)
            * (0.9 + time_variation * 0.2);
        let direct = (0.2 + random_factor * 0.2) * escape_intensity;
        let orbit = 0.5 + 0.3 * escape_intensity * (1.0 - random_factor * 0.3);
        (direct, orbit, 1.0 - direct - orbit)
    } else {
        let t = (dist_to_hole - critical_radius) / (influence_radius - critical_radius);
        let t_varied = t * (0.9 + random_factor * 0.2);
        let orbit = 0.6 * (1.0 - t_varied.powf(0.7 + time_variation * 0.3));
        (0.0, orbit, 1.0 - orbit)
    }
}

/// The most threatening asteroid found by the proactive scan.
struct Threat {
    pos: Vec2,
    vel: Vec2,
    r: f32,
    distance: f32,
}

/// Scan for asteroids on a collision course, using both current distance and
/// positions extrapolated over the look-ahead horizon.
///
/// Returns `Err(())` when an asteroid is already overlapping the hull; the
/// caller must explode.
fn scan_threats(ship: &Ship, field: &AsteroidField, config: &SimConfig) -> Result<Option<Threat>, ()> {
    let mut nearest: Option<Threat> = None;
    let mut min_distance = f32::INFINITY;
    let lookahead_ticks = SHIP_LOOKAHEAD_SECS * TICKS_PER_SECOND;
    let ship_heading = heading(ship.angle);

    for a in &field.asteroids {
        if a.merged || a.r < 3.0 {
            continue;
        }

        let delta = ship.pos - a.pos;
        let distance = delta.length();
        let collision_threshold = ship.size + a.r;

        if distance < collision_threshold {
            return Err(());
        }

        // Larger asteroids are detected from further away.
        let adjusted_range = config.ship_detection_range + a.r * 2.0;
        let relative_speed = a.vel.length() + ship.speed;

        let ship_future = ship.pos + ship_heading * ship.speed * lookahead_ticks;
        let asteroid_future = a.pos + a.vel * lookahead_ticks;
        let future_distance = ship_future.distance(asteroid_future);

        let time_to_collision = distance / (relative_speed + 1e-4);
        let future_close = future_distance < collision_threshold * 2.0;

        if !((distance < adjusted_range && time_to_collision < SHIP_LOOKAHEAD_SECS) || future_close)
        {
            continue;
        }

        // Only treat it as a threat if it is closing in (or the projected
        // positions already intersect).
        let relative_vel = a.vel - ship_heading * ship.speed;
        let relative_angle = relative_vel.y.atan2(relative_vel.x);
        let closing = relative_angle.cos() * delta.x + relative_angle.sin() * delta.y;
        if closing >= 0.0 && !future_close {
            continue;
        }

        let distance_range = (adjusted_range - collision_threshold).max(1.0);
        let threat_level =
            1.0 - ((distance - collision_threshold) / distance_range).min(1.0);

        if distance < min_distance || (distance < adjusted_range * 0.7 && threat_level > 0.7) {
            min_distance = distance;
            nearest = Some(Threat {
                pos: a.pos,
                vel: a.vel,
                r: a.r,
                distance,
            });
        }
    }

    Ok(nearest)
}

/// Steer and thrust around a threatening asteroid.  Returns `true` when the
/// threat is imminent enough that this maneuver replaces the rest of the tick.
fn evade_asteroid(
    ship: &mut Ship,
    threat: &Threat,
    config: &SimConfig,
    effects: &mut EffectPool,
) -> bool {
    let away = ship.pos - threat.pos;
    let away_angle = away.y.atan2(away.x);
    let asteroid_angle = threat.vel.y.atan2(threat.vel.x);

    // Perpendicular escapes to either side of the asteroid's path; pick the
    // one closer to the current heading so we never turn across its nose.
    let perp_left = wrap_angle(asteroid_angle + FRAC_PI_2);
    let perp_right = wrap_angle(asteroid_angle - FRAC_PI_2);
    let dot_left = perp_left.cos() * ship.angle.cos() + perp_left.sin() * ship.angle.sin();
    let dot_right = perp_right.cos() * ship.angle.cos() + perp_right.sin() * ship.angle.sin();
    let best_evasion = if dot_left > dot_right { perp_left } else { perp_right };

    let hull = ship.size + threat.r;
    let (target_angle, speed_multiplier) = if threat.distance < hull * 2.0 {
        (away_angle, 1.5)
    } else {
        (best_evasion, 1.3)
    };

    // Close threats get an immediate partial snap toward the escape heading.
    if threat.distance < hull * 3.0 {
        ship.angle = ship.angle * 0.3 + target_angle * 0.7;
    }

    let detection = config.ship_detection_range + threat.r * 2.0;
    let proximity = ((detection - threat.distance) / detection).min(1.0);
    effects.push_trail(
        ship.pos,
        6.0 + proximity * 4.0,
        300.0,
        0.3 + proximity * 0.4,
    );

    // Red warning marker pointing at the threat.
    let warning_dir = (threat.pos.y - ship.pos.y).atan2(threat.pos.x - ship.pos.x);
    let warning_len = 5.0 + proximity * 10.0;
    effects.push_trail(
        ship.pos + heading(warning_dir) * warning_len,
        4.0,
        0.0,
        0.3 + proximity * 0.4,
    );

    ship.speed *= speed_multiplier;

    if threat.distance < hull * 5.0 {
        ship.pos += heading(ship.angle) * ship.speed;
        return true;
    }
    false
}

/// One autopilot tick: respawn check, threat avoidance, orbital steering,
/// movement, and exit validation.
#[allow(clippy::too_many_arguments)]
pub fn update_ship(
    ship: &mut Ship,
    field: &AsteroidField,
    hole: &BlackHole,
    viewport: &Viewport,
    now_ms: f64,
    config: &SimConfig,
    effects: &mut EffectPool,
    scheduler: &mut RippleScheduler,
    rng: &mut impl Rng,
) {
    match ship.state {
        ShipState::Exploding => return,
        ShipState::Dormant => {
            if now_ms <= ship.respawn_at_ms {
                return;
            }
            ship.explosion_particles.clear();
            if ship.has_been_active {
                ship.spawn_from_last_exit(viewport, rng);
            } else {
                ship.spawn_from_random_edge(viewport, rng);
                ship.has_been_active = true;
            }
        }
        ShipState::Cruising => {}
    }

    match scan_threats(ship, field, config) {
        Err(()) => {
            trigger_explosion(ship, now_ms, config, effects, scheduler, rng);
            return;
        }
        Ok(Some(threat)) => {
            if evade_asteroid(ship, &threat, config, effects) {
                return;
            }
        }
        Ok(None) => {}
    }

    let from_hole = ship.pos - hole.center;
    let dist_to_hole = from_hole.length();

    // Danger-zone entry re-routes the exit so the escape path cannot thread
    // the horizon.
    let in_danger = dist_to_hole < hole.radius * config.danger_zone_factor;
    if in_danger && !ship.in_danger_zone {
        ship.in_danger_zone = true;
        ship.select_safe_exit_edge(hole, viewport);
        effects.push_trail(ship.pos, 12.0, 60.0, 0.6);
    } else if !in_danger && ship.in_danger_zone {
        ship.in_danger_zone = false;
    }

    let exit_angle = ship.exit_angle(viewport);
    let to_exit = ship.exit_coords(viewport) - ship.pos;

    let influence_factor_cfg = if viewport.is_portrait() {
        config.influence_factor_portrait
    } else {
        config.influence_factor_landscape
    };
    let influence_radius = hole.radius * influence_factor_cfg;
    let critical_radius = hole.radius * config.critical_radius_factor;

    let time_variation = ((now_ms * 0.001).sin() as f32) * 0.5 + 0.5;
    let random_factor =
        ((now_ms * 0.0003 + (ship.pos.x * 0.01) as f64).sin() as f32) * 0.5 + 0.5;

    let mut target_angle = exit_angle;
    let mut avoidance_factor = 0.0_f32;

    // Occasional evasive maneuver: a sharp turn or a speed burst.
    let evasive = dist_to_hole < influence_radius && rng.gen_bool(config.evasive_chance);
    let mut evasive_offset = 0.0;
    let mut speed_multiplier = 1.0;
    if evasive {
        let sharp_turn = rng.gen_bool(0.5);
        let burst_hue = if sharp_turn { 60.0 } else { 190.0 };
        effects.push_trail(ship.pos, 8.0, burst_hue, 0.5);
        for i in 0..3 {
            let offset = (i + 1) as f32 * 1.5;
            effects.push_trail(
                ship.pos - heading(ship.angle) * offset,
                2.0 - i as f32 * 0.3,
                burst_hue,
                0.4 - i as f32 * 0.1,
            );
        }
        let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        if sharp_turn {
            evasive_offset = sign * (FRAC_PI_4 + rng.gen_range(0.0..FRAC_PI_4));
            speed_multiplier = 0.7;
        } else {
            evasive_offset = sign * FRAC_PI_8;
            speed_multiplier = 1.5;
        }
    }

    if dist_to_hole < influence_radius {
        let influence_factor = 1.0 - dist_to_hole / influence_radius;
        let away_angle = from_hole.y.atan2(from_hole.x);

        let clockwise = away_angle + FRAC_PI_2;
        let counter_clockwise = away_angle - FRAC_PI_2;
        let dot_cw = clockwise.cos() * to_exit.x + clockwise.sin() * to_exit.y;
        let dot_ccw = counter_clockwise.cos() * to_exit.x + counter_clockwise.sin() * to_exit.y;

        // Mostly orbit in whichever direction aligns with the exit, but a
        // slow oscillation occasionally overrides the logical choice.
        let prefer_clockwise = (now_ms * 0.0006 + (ship.pos.x * 0.01) as f64).sin() > 0.0;
        let orbit_angle = if influence_factor > 0.4 && rng.gen_bool(0.1) {
            if rng.gen_bool(0.3) {
                effects.push_trail(
                    ship.pos,
                    5.0,
                    if prefer_clockwise { 240.0 } else { 140.0 },
                    0.4,
                );
            }
            if prefer_clockwise { clockwise } else { counter_clockwise }
        } else if dot_cw > dot_ccw {
            clockwise
        } else {
            counter_clockwise
        };

        let (direct_w, orbit_w, exit_w) = blend_weights(
            dist_to_hole,
            critical_radius,
            influence_radius,
            time_variation,
            random_factor,
        );
        let evasive_w = if evasive { 0.7 } else { 0.0 };

        target_angle = (away_angle * direct_w
            + orbit_angle * orbit_w
            + exit_angle * exit_w
            + (ship.angle + evasive_offset) * evasive_w)
            / (direct_w + orbit_w + exit_w + evasive_w);

        avoidance_factor = (influence_factor
            * if dist_to_hole < critical_radius { 1.0 } else { 0.6 })
        .min(0.9);
    } else if evasive {
        target_angle = ship.angle + evasive_offset;
    }

    // Clamped, slightly randomized steering toward the blended target.
    let responsiveness = if evasive { 1.2 } else { 0.8 + avoidance_factor * 0.4 };
    let max_turn = config.ship_turn_rate * responsiveness;
    let diff = angle_diff(ship.angle, target_angle).clamp(-max_turn, max_turn);
    let steering_factor = (0.3 + 0.2 * avoidance_factor) * (0.95 + rng.gen_range(0.0..0.1));
    ship.angle = wrap_angle(ship.angle + diff * steering_factor);

    // Speed: pressure near the hole, a slow wobble, and rare bursts.
    let mut speed_adjustment = if dist_to_hole < critical_radius {
        0.85 - 0.15 * (1.0 - dist_to_hole / critical_radius)
    } else {
        1.0
    };
    speed_adjustment *= 0.95 + time_variation * 0.1;
    if evasive {
        speed_adjustment *= speed_multiplier;
    }
    if rng.gen_bool(config.speed_burst_chance) {
        speed_adjustment *= 1.2 + rng.gen_range(0.0..0.3);
        effects.push_trail(
            ship.pos - heading(ship.angle) * ship.size,
            7.0,
            200.0 + rng.gen_range(0.0..40.0),
            0.5,
        );
    }
    ship.speed = config.ship_base_speed * speed_adjustment;
    ship.pos += heading(ship.angle) * ship.speed;

    let thruster = 0.6 + 0.2 * ((now_ms * 0.01).sin() as f32) + 0.3 * avoidance_factor;
    ship.thruster_alpha = thruster * if speed_adjustment > 1.1 { 1.3 } else { 1.0 };

    emit_cruise_trail(ship, evasive, avoidance_factor, speed_adjustment, effects, rng);

    check_exit(ship, viewport, now_ms, config, effects, rng);
}

/// Exhaust trail behind the hull, tinted by what the ship is doing.
fn emit_cruise_trail(
    ship: &Ship,
    evasive: bool,
    avoidance_factor: f32,
    speed_adjustment: f32,
    effects: &mut EffectPool,
    rng: &mut impl Rng,
) {
    let chance = if evasive || speed_adjustment > 1.1 || avoidance_factor > 0.5 {
        0.5
    } else {
        0.3
    };
    if !rng.gen_bool(chance) {
        return;
    }

    let (hue, size_span, alpha_boost) = if evasive {
        (if rng.gen_bool(0.5) { 60.0 } else { 190.0 }, 2.0, 0.2)
    } else if avoidance_factor > 0.7 {
        (rng.gen_range(0.0..30.0), 2.5, 0.2)
    } else if speed_adjustment > 1.1 {
        (220.0 + rng.gen_range(0.0..40.0), 2.2, 0.15)
    } else {
        (180.0 + rng.gen_range(0.0..60.0), 1.5, 0.0)
    };

    effects.push_trail(
        ship.pos - heading(ship.angle) * ship.size * 0.8,
        2.0 + rng.gen_range(0.0..size_span),
        hue,
        0.2 + rng.gen_range(0.0..0.1) + alpha_boost,
    );
}

/// Validate which edge the ship crossed.  Leaving through the targeted edge
/// completes the pass; any other edge triggers a forced course correction
/// back toward the correct exit.
fn check_exit(
    ship: &mut Ship,
    viewport: &Viewport,
    now_ms: f64,
    config: &SimConfig,
    effects: &mut EffectPool,
    rng: &mut impl Rng,
) {
    let margin = ship.size * 2.0;
    let crossed = if ship.pos.x < -margin {
        Some(Edge::Left)
    } else if ship.pos.x > viewport.width + margin {
        Some(Edge::Right)
    } else if ship.pos.y < -margin {
        Some(Edge::Top)
    } else if ship.pos.y > viewport.height + margin {
        Some(Edge::Bottom)
    } else {
        None
    };
    let Some(exit_edge) = crossed else { return };

    if exit_edge != ship.target_exit_edge {
        // Redirect: snap the heading toward the nearest point on the correct
        // edge and force-move along it.
        let target = match ship.target_exit_edge {
            Edge::Top => Vec2::new(ship.pos.x, -margin),
            Edge::Right => Vec2::new(viewport.width + margin, ship.pos.y),
            Edge::Bottom => Vec2::new(ship.pos.x, viewport.height + margin),
            Edge::Left => Vec2::new(-margin, ship.pos.y),
        };
        ship.angle = (target.y - ship.pos.y).atan2(target.x - ship.pos.x);
        ship.pos += heading(ship.angle) * ship.speed * 2.0;
        effects.push_trail(
            ship.pos - heading(ship.angle) * ship.size * 0.8,
            3.0,
            60.0,
            0.4,
        );
        return;
    }

    ship.last_exit_edge = exit_edge;
    ship.state = ShipState::Dormant;
    ship.in_danger_zone = false;
    ship.respawn_at_ms = now_ms + config.respawn_base_ms + rng.gen_range(0.0..config.respawn_jitter_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Asteroid;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world() -> (BlackHole, Viewport, SimConfig) {
        (
            BlackHole {
                center: Vec2::new(400.0, 300.0),
                radius: 50.0,
            },
            Viewport {
                width: 800.0,
                height: 600.0,
            },
            SimConfig::default(),
        )
    }

    fn cruising_ship(pos: Vec2, angle: f32, rng: &mut StdRng) -> Ship {
        let config = SimConfig::default();
        let mut ship = Ship::new(0.0, &config, rng);
        ship.state = ShipState::Cruising;
        ship.pos = pos;
        ship.angle = angle;
        ship.target_exit_edge = Edge::Right;
        ship.entry_edge = Edge::Left;
        ship.has_been_active = true;
        ship
    }

    fn big_asteroid(pos: Vec2, vel: Vec2, r: f32) -> Asteroid {
        Asteroid {
            pos,
            r,
            phase: 0.0,
            base_speed: 0.05,
            vel,
            merged: false,
            hue: 100.0,
        }
    }

    #[test]
    fn blend_weights_sum_to_one() {
        for dist in [30.0_f32, 100.0, 175.0, 300.0, 550.0] {
            let (d, o, e) = blend_weights(dist, 175.0, 600.0, 0.5, 0.5);
            assert!((d + o + e - 1.0).abs() < 1e-5, "weights at dist {dist}");
            assert!(d >= 0.0 && o >= 0.0);
        }
    }

    #[test]
    fn blend_prioritizes_escape_inside_critical_radius() {
        let (direct_near, ..) = blend_weights(40.0, 175.0, 600.0, 0.5, 0.5);
        let (direct_far, orbit_far, exit_far) = blend_weights(500.0, 175.0, 600.0, 0.5, 0.5);
        assert!(direct_near > 0.0);
        assert_eq!(direct_far, 0.0);
        assert!(exit_far > orbit_far, "far out, exit-seeking dominates");
    }

    #[test]
    fn hull_contact_triggers_the_explosion() {
        let (hole, viewport, config) = world();
        let mut rng = StdRng::seed_from_u64(21);
        let mut ship = cruising_ship(Vec2::new(200.0, 150.0), 0.0, &mut rng);
        let field = AsteroidField {
            asteroids: vec![big_asteroid(ship.pos + Vec2::new(5.0, 0.0), Vec2::ZERO, 6.0)],
            target_count: 0,
        };
        let mut effects = EffectPool::default();
        let mut scheduler = RippleScheduler::default();
        update_ship(
            &mut ship, &field, &hole, &viewport, 1000.0, &config, &mut effects, &mut scheduler,
            &mut rng,
        );
        assert_eq!(ship.state, ShipState::Exploding);
        assert!(!ship.explosion_particles.is_empty());
    }

    #[test]
    fn small_asteroids_are_ignored_by_the_scanner() {
        let (hole, viewport, config) = world();
        let mut rng = StdRng::seed_from_u64(22);
        let mut ship = cruising_ship(Vec2::new(200.0, 150.0), 0.0, &mut rng);
        // Radius below the threat floor, sitting right on the hull.
        let field = AsteroidField {
            asteroids: vec![big_asteroid(ship.pos + Vec2::new(4.0, 0.0), Vec2::ZERO, 2.0)],
            target_count: 0,
        };
        let mut effects = EffectPool::default();
        let mut scheduler = RippleScheduler::default();
        update_ship(
            &mut ship, &field, &hole, &viewport, 1000.0, &config, &mut effects, &mut scheduler,
            &mut rng,
        );
        assert_eq!(ship.state, ShipState::Cruising);
    }

    #[test]
    fn imminent_threat_steers_the_ship_away() {
        let (hole, viewport, config) = world();
        let mut rng = StdRng::seed_from_u64(23);
        let mut ship = cruising_ship(Vec2::new(150.0, 500.0), 0.0, &mut rng);
        // Large asteroid dead ahead, closing.
        let field = AsteroidField {
            asteroids: vec![big_asteroid(
                ship.pos + Vec2::new(30.0, 0.0),
                Vec2::new(-0.5, 0.0),
                10.0,
            )],
            target_count: 0,
        };
        let mut effects = EffectPool::default();
        let mut scheduler = RippleScheduler::default();
        let before = ship.angle;
        update_ship(
            &mut ship, &field, &hole, &viewport, 1000.0, &config, &mut effects, &mut scheduler,
            &mut rng,
        );
        assert_eq!(ship.state, ShipState::Cruising);
        assert!(
            (ship.angle - before).abs() > 0.1,
            "close threat must snap the heading"
        );
        assert!(
            effects.trails.iter().any(|t| t.hue == 300.0),
            "avoidance emits the purple marker"
        );
    }

    #[test]
    fn dormant_ship_respawns_after_its_delay() {
        let (hole, viewport, config) = world();
        let mut rng = StdRng::seed_from_u64(24);
        let mut ship = Ship::new(0.0, &config, &mut rng);
        let field = AsteroidField::default();
        let mut effects = EffectPool::default();
        let mut scheduler = RippleScheduler::default();

        update_ship(
            &mut ship, &field, &hole, &viewport, 10.0, &config, &mut effects, &mut scheduler,
            &mut rng,
        );
        assert_eq!(ship.state, ShipState::Dormant, "still waiting");

        let after_respawn_ms = ship.respawn_at_ms + 1.0;
        update_ship(
            &mut ship, &field, &hole, &viewport, after_respawn_ms, &config, &mut effects,
            &mut scheduler, &mut rng,
        );
        assert_eq!(ship.state, ShipState::Cruising);
        assert!(ship.has_been_active);
    }

    #[test]
    fn entering_the_danger_zone_reroutes_the_exit() {
        let (hole, viewport, config) = world();
        let mut rng = StdRng::seed_from_u64(25);
        // Just inside 2.25× hole radius, left of the hole, headed right
        // (straight at it); entry edge Left, naive target Right.
        let mut ship = cruising_ship(hole.center - Vec2::new(100.0, 0.0), 0.0, &mut rng);
        let field = AsteroidField::default();
        let mut effects = EffectPool::default();
        let mut scheduler = RippleScheduler::default();
        update_ship(
            &mut ship, &field, &hole, &viewport, 1000.0, &config, &mut effects, &mut scheduler,
            &mut rng,
        );
        assert!(ship.in_danger_zone);
        assert_ne!(
            ship.target_exit_edge,
            Edge::Right,
            "path through the hole must be re-routed"
        );
        assert!(
            effects.trails.iter().any(|t| t.hue == 60.0),
            "re-route emits the yellow cue"
        );
    }

    #[test]
    fn exit_through_the_target_edge_goes_dormant_with_respawn_delay() {
        let (hole, viewport, config) = world();
        let mut rng = StdRng::seed_from_u64(26);
        let mut ship = cruising_ship(Vec2::new(viewport.width + 20.0, 300.0), 0.0, &mut rng);
        let field = AsteroidField::default();
        let mut effects = EffectPool::default();
        let mut scheduler = RippleScheduler::default();
        update_ship(
            &mut ship, &field, &hole, &viewport, 1000.0, &config, &mut effects, &mut scheduler,
            &mut rng,
        );
        assert_eq!(ship.state, ShipState::Dormant);
        assert_eq!(ship.last_exit_edge, Edge::Right);
        assert!(ship.respawn_at_ms >= 1000.0 + config.respawn_base_ms);
        assert!(
            ship.respawn_at_ms <= 1000.0 + config.respawn_base_ms + config.respawn_jitter_ms
        );
    }

    #[test]
    fn exit_through_the_wrong_edge_is_corrected() {
        let (hole, viewport, config) = world();
        let mut rng = StdRng::seed_from_u64(27);
        // Target Right, but drifting out the top.
        let mut ship = cruising_ship(Vec2::new(400.0, -20.0), -FRAC_PI_2, &mut rng);
        let field = AsteroidField::default();
        let mut effects = EffectPool::default();
        let mut scheduler = RippleScheduler::default();
        update_ship(
            &mut ship, &field, &hole, &viewport, 1000.0, &config, &mut effects, &mut scheduler,
            &mut rng,
        );
        assert_eq!(ship.state, ShipState::Cruising, "wrong edge never completes the pass");
        assert!(
            heading(ship.angle).x > 0.9,
            "redirected heading points at the right edge"
        );
    }

    #[test]
    fn cruise_steering_stays_finite_over_many_ticks() {
        let (hole, viewport, config) = world();
        let mut rng = StdRng::seed_from_u64(28);
        let mut ship = cruising_ship(Vec2::new(100.0, 100.0), 0.3, &mut rng);
        let field = AsteroidField::default();
        let mut effects = EffectPool::default();
        let mut scheduler = RippleScheduler::default();
        for tick in 0..2000 {
            let now = 1000.0 + tick as f64 * 16.7;
            update_ship(
                &mut ship, &field, &hole, &viewport, now, &config, &mut effects, &mut scheduler,
                &mut rng,
            );
            assert!(ship.pos.is_finite() && ship.angle.is_finite());
            if ship.state != ShipState::Cruising {
                break;
            }
        }
    }
}
