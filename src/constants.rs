//! Centralised simulation constants.
//!
//! Every hand-tuned number in the gravity model, the merge resolver, and the
//! autopilot lives here so it can be found and reasoned about in one place.
//! The headline values are mirrored by [`crate::config::SimConfig`] and can be
//! overridden at runtime via `assets/tuning.toml`; the deeper curve
//! coefficients are compile-time only.
//!
//! All velocities and accelerations are expressed per tick at a nominal
//! 60 Hz frame rate, in canvas pixels.

// ── Black hole ────────────────────────────────────────────────────────────────

/// Reference radius (px) for every proximity threshold in the gravity and
/// danger-zone logic.  The visible core discs are drawn at fractions of this.
pub const HOLE_RADIUS: f32 = 50.0;

// ── Asteroid field ────────────────────────────────────────────────────────────

/// Viewport area divisor giving the target asteroid population.
/// `target = floor(width × height / DENSITY_DIVISOR)`; recomputed on resize.
pub const DENSITY_DIVISOR: f32 = 8000.0;

/// Minimum spawn distance from the hole, in hole radii, for interior seeding.
/// Below ~3 the initial field visibly pops into the suck-in zone.
pub const INTERIOR_SAFE_FACTOR: f32 = 3.5;

/// Off-screen offset (px) at which edge-spawned asteroids appear.
pub const EDGE_SPAWN_MARGIN: f32 = 40.0;

/// Asteroids beyond canvas bounds plus this margin (px) are removed outright.
pub const CULL_MARGIN: f32 = 50.0;

/// Base + eased acceleration scale of the radial gravity curve.
/// Raising `GRAVITY_EASED_SCALE` past ~1e-4 makes small asteroids overshoot
/// the hole and slingshot out of the viewport.
pub const GRAVITY_BASE_ACCEL: f32 = 0.000_003;
pub const GRAVITY_EASED_SCALE: f32 = 0.000_075;

/// Tangential spiral strength, full value outside the 2×–4× anti-orbit band.
pub const SPIRAL_STRENGTH: f32 = 0.005;

/// Tangential curl strength, full value outside the 2×–4× anti-orbit band.
pub const CURVE_STRENGTH: f32 = 0.0035;

/// Weakened spiral/curl inside the anti-orbit band, further scaled by the
/// band falloff so orbits decay instead of stabilizing there.
pub const SPIRAL_COUNTER_STRENGTH: f32 = 0.003;
pub const CURVE_COUNTER_STRENGTH: f32 = 0.0025;

/// Amplitude of the slow sinusoidal oscillation layered on spiral and curl.
pub const TANGENTIAL_WOBBLE: f32 = 0.0008;

/// Cursor influence radius (px) and overall strength for asteroids.
/// Falloff is `(1 − d/radius)^1.8`.
pub const CURSOR_RADIUS: f32 = 220.0;
pub const CURSOR_STRENGTH: f32 = 0.85;
pub const CURSOR_TANGENTIAL: f32 = 0.0252;
pub const CURSOR_RADIAL: f32 = 0.0013;
pub const CURSOR_DAMPING: f32 = 0.988;

/// Per-tick velocity retention by distance band: the singular-looking force
/// law needs stronger damping close in to bound runaway speeds.
pub const RETENTION_NEAR: f32 = 0.992;
pub const RETENTION_MID: f32 = 0.984;
pub const RETENTION_FAR_BASE: f32 = 0.97;
pub const RETENTION_FAR_SCALE: f32 = 0.01;

/// Consumption: inside 0.65× hole radius the asteroid shrinks ×0.7/tick with
/// amplified inward pull and ×0.65 velocity damping until one removal
/// predicate fires (radius < 0.7, within 16 px of centre, or inside 0.45×).
pub const CONSUME_BAND_FACTOR: f32 = 0.65;
pub const CONSUME_PULL: f32 = 0.07;
pub const CONSUME_SHRINK: f32 = 0.7;
pub const CONSUME_DAMPING: f32 = 0.65;
pub const CONSUME_MIN_RADIUS: f32 = 0.7;
pub const CONSUME_CENTER_BOX: f32 = 16.0;
pub const CONSUME_INNER_FACTOR: f32 = 0.45;

/// Event-horizon band: inside 0.8× hole radius the asteroid shrinks ×0.6/tick
/// and is removed below radius 0.5.  Evaluated after (and short-circuiting)
/// the 0.65× band, preserving the removal-priority order of the model.
pub const HORIZON_BAND_FACTOR: f32 = 0.8;
pub const HORIZON_SHRINK: f32 = 0.6;
pub const HORIZON_MIN_RADIUS: f32 = 0.5;

/// Merge growth penalty: absorbed area is scaled by `1/(1 + larger_r × this)`
/// so big asteroids grow proportionally less per absorption.
pub const MERGE_GROWTH_PENALTY: f32 = 0.15;

/// Recoil impulse on the surviving asteroid, scaled by `1/larger_r`.
pub const MERGE_RECOIL: f32 = 0.5;

// ── Shooting stars ────────────────────────────────────────────────────────────

/// Chance that an edge-spawned asteroid also launches a shooting star.
pub const STAR_SPAWN_CHANCE: f64 = 0.04;

/// Shooting-star gravity as a fraction of the asteroid gravity curve.
pub const STAR_GRAVITY_FACTOR: f32 = 0.5;

/// Close-range boost: up to 1 + this inside 3× hole radius (quadratic ramp).
pub const STAR_PROXIMITY_BOOST: f32 = 3.0;

/// Cursor attraction for shooting stars: radius (px), power-2 falloff scale,
/// and the per-tick impulse applied along the cursor direction.
pub const STAR_CURSOR_RADIUS: f32 = 200.0;
pub const STAR_CURSOR_STRENGTH: f32 = 0.4;
pub const STAR_CURSOR_IMPULSE: f32 = 0.012;

/// Velocity floor: when speed falls under `FLOOR_TRIGGER × nominal` it is
/// rescaled to `FLOOR_RESTORE × nominal`, keeping stars streaking instead of
/// stalling into orbit.
pub const STAR_FLOOR_TRIGGER: f32 = 0.5;
pub const STAR_FLOOR_RESTORE: f32 = 0.7;

// ── Spaceship ─────────────────────────────────────────────────────────────────

/// Ship half-length (px) and nominal cruise speed (px/tick).
pub const SHIP_SIZE: f32 = 8.0;
pub const SHIP_BASE_SPEED: f32 = 0.7;

/// Base detection range (px) for proactive threat avoidance; each asteroid
/// extends it by `2 × radius`.
pub const SHIP_DETECTION_RANGE: f32 = 150.0;

/// Look-ahead horizon (s) for predicted-position threat checks, at 60 ticks/s.
pub const SHIP_LOOKAHEAD_SECS: f32 = 3.0;
pub const TICKS_PER_SECOND: f32 = 60.0;

/// Danger zone (exit re-routing) and critical radius (speed/steer pressure),
/// in hole radii.
pub const DANGER_ZONE_FACTOR: f32 = 2.25;
pub const CRITICAL_RADIUS_FACTOR: f32 = 3.5;

/// Steering influence radius in hole radii; portrait viewports use the
/// smaller factor to keep the orbit inside the narrow dimension.
pub const INFLUENCE_FACTOR_LANDSCAPE: f32 = 12.0;
pub const INFLUENCE_FACTOR_PORTRAIT: f32 = 10.0;

/// Per-tick chance of an evasive maneuver while inside the influence radius,
/// and of a spontaneous speed burst anywhere.
pub const EVASIVE_CHANCE: f64 = 0.005;
pub const SPEED_BURST_CHANCE: f64 = 0.005;

/// Base clamped turn rate (rad/tick) before responsiveness scaling.
pub const SHIP_TURN_RATE: f32 = 0.04;

/// Respawn delay after an exit or explosion: base + uniform jitter (ms).
pub const RESPAWN_BASE_MS: f64 = 8_000.0;
pub const RESPAWN_JITTER_MS: f64 = 15_000.0;

/// First-activation delay after startup: base + uniform jitter (ms).
pub const FIRST_SPAWN_BASE_MS: f64 = 5_000.0;
pub const FIRST_SPAWN_JITTER_MS: f64 = 5_000.0;

/// Respawn delay applied when a resize forces the ship dormant (ms).
pub const RESIZE_RESPAWN_MS: f64 = 3_000.0;

/// Explosion lifetime (ms) and particle counts.
pub const EXPLOSION_DURATION_MS: f64 = 1_000.0;
pub const EXPLOSION_OUTER_PARTICLES: usize = 60;
pub const EXPLOSION_INNER_PARTICLES: usize = 20;

/// Explosion particle aging: multiplicative shrink and linear alpha fade per
/// tick; particles below either floor are pruned.
pub const EXPLOSION_SHRINK: f32 = 0.94;
pub const EXPLOSION_FADE: f32 = 0.025;
pub const EXPLOSION_MIN_SIZE: f32 = 0.5;
pub const EXPLOSION_MIN_ALPHA: f32 = 0.1;

/// Half-width (px) of the trail purge box around the ship when an explosion
/// ends.
pub const EXPLOSION_TRAIL_PURGE: f32 = 50.0;

// ── Pointer interaction ───────────────────────────────────────────────────────

/// Tap thresholds for the ship: inside the first the ship explodes, inside
/// the second it is pushed with linear proximity scaling.
pub const TAP_EXPLODE_RADIUS: f32 = 25.0;
pub const TAP_PUSH_RADIUS: f32 = 180.0;
pub const TAP_SHIP_PUSH_STRENGTH: f32 = 0.7;
pub const TAP_SHIP_PUSH_STEP: f32 = 8.0;
pub const TAP_SHIP_ALIGN: f32 = 0.8;

/// Radial push applied to asteroids and (at half effect) shooting stars.
pub const TAP_FIELD_RADIUS: f32 = 200.0;
pub const TAP_ASTEROID_STRENGTH: f32 = 0.65;
pub const TAP_ASTEROID_IMPULSE: f32 = 0.1;
pub const TAP_STAR_STRENGTH: f32 = 0.3;
pub const TAP_STAR_IMPULSE: f32 = 0.04;

/// Touch taps closer together than this (ms) are ignored as double-fires;
/// a tap holds the pointer position for the hold window before clearing.
pub const TAP_DEBOUNCE_MS: f64 = 300.0;
pub const TAP_POINTER_HOLD_MS: f64 = 50.0;

// ── Background ────────────────────────────────────────────────────────────────

/// Global background rotation step (rad/tick, counter-clockwise).
pub const BACKGROUND_ROTATION_STEP: f32 = 0.000_03;

/// Number of static nebula discs.
pub const NEBULA_COUNT: usize = 6;

/// Twinkle phase advance per tick for background stars.
pub const STAR_TWINKLE_STEP: f32 = 0.001;
