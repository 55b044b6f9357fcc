//! Runtime tuning configuration loaded from `assets/tuning.toml`.
//!
//! [`SimConfig`] is a Bevy [`Resource`] that mirrors the headline constants in
//! [`crate::constants`].  At startup, [`load_sim_config`] reads
//! `assets/tuning.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the values you care about.
//!
//! Add `config: Res<SimConfig>` to any system parameter list and read values
//! with `config.hole_radius`, `config.ship_base_speed`, etc.

use crate::constants::*;
use crate::error::{validate_density_divisor, validate_hole_radius, validate_ship_turn_rate};
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable simulation configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/tuning.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // ── Black hole / field ───────────────────────────────────────────────────
    pub hole_radius: f32,
    pub density_divisor: f32,
    pub interior_safe_factor: f32,
    pub edge_spawn_margin: f32,
    pub cull_margin: f32,

    // ── Cursor interaction ───────────────────────────────────────────────────
    pub cursor_radius: f32,
    pub cursor_strength: f32,

    // ── Shooting stars ───────────────────────────────────────────────────────
    pub star_spawn_chance: f64,
    pub star_gravity_factor: f32,
    pub star_cursor_radius: f32,

    // ── Spaceship ────────────────────────────────────────────────────────────
    pub ship_size: f32,
    pub ship_base_speed: f32,
    pub ship_detection_range: f32,
    pub ship_turn_rate: f32,
    pub danger_zone_factor: f32,
    pub critical_radius_factor: f32,
    pub influence_factor_landscape: f32,
    pub influence_factor_portrait: f32,
    pub evasive_chance: f64,
    pub speed_burst_chance: f64,
    pub respawn_base_ms: f64,
    pub respawn_jitter_ms: f64,
    pub explosion_duration_ms: f64,

    // ── Pointer taps ─────────────────────────────────────────────────────────
    pub tap_explode_radius: f32,
    pub tap_push_radius: f32,
    pub tap_field_radius: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            hole_radius: HOLE_RADIUS,
            density_divisor: DENSITY_DIVISOR,
            interior_safe_factor: INTERIOR_SAFE_FACTOR,
            edge_spawn_margin: EDGE_SPAWN_MARGIN,
            cull_margin: CULL_MARGIN,
            cursor_radius: CURSOR_RADIUS,
            cursor_strength: CURSOR_STRENGTH,
            star_spawn_chance: STAR_SPAWN_CHANCE,
            star_gravity_factor: STAR_GRAVITY_FACTOR,
            star_cursor_radius: STAR_CURSOR_RADIUS,
            ship_size: SHIP_SIZE,
            ship_base_speed: SHIP_BASE_SPEED,
            ship_detection_range: SHIP_DETECTION_RANGE,
            ship_turn_rate: SHIP_TURN_RATE,
            danger_zone_factor: DANGER_ZONE_FACTOR,
            critical_radius_factor: CRITICAL_RADIUS_FACTOR,
            influence_factor_landscape: INFLUENCE_FACTOR_LANDSCAPE,
            influence_factor_portrait: INFLUENCE_FACTOR_PORTRAIT,
            evasive_chance: EVASIVE_CHANCE,
            speed_burst_chance: SPEED_BURST_CHANCE,
            respawn_base_ms: RESPAWN_BASE_MS,
            respawn_jitter_ms: RESPAWN_JITTER_MS,
            explosion_duration_ms: EXPLOSION_DURATION_MS,
            tap_explode_radius: TAP_EXPLODE_RADIUS,
            tap_push_radius: TAP_PUSH_RADIUS,
            tap_field_radius: TAP_FIELD_RADIUS,
        }
    }
}

impl SimConfig {
    /// Reject values outside their safe operating ranges.
    pub fn validate(&self) -> crate::error::SimResult<()> {
        validate_hole_radius(self.hole_radius)?;
        validate_density_divisor(self.density_divisor)?;
        validate_ship_turn_rate(self.ship_turn_rate)?;
        Ok(())
    }
}

/// Startup system: attempt to load `assets/tuning.toml` and overwrite the
/// `SimConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  A missing file is silently
/// fine (defaults are already in place from `insert_resource`); parse or
/// validation failures log a warning and keep the defaults rather than
/// aborting the visualization.
pub fn load_sim_config(mut config: ResMut<SimConfig>) {
    let path = "assets/tuning.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<SimConfig>(&contents) {
            Ok(loaded) => match loaded.validate() {
                Ok(()) => {
                    *config = loaded;
                    info!("loaded tuning config from {path}");
                }
                Err(e) => {
                    warn!("rejected {path}: {e}; using compiled defaults");
                }
            },
            Err(e) => {
                warn!("failed to parse {path}: {e}; using compiled defaults");
            }
        },
        Err(_) => {
            info!("no {path} found; using compiled defaults");
        }
    }
}
