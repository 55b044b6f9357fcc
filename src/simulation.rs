//! World resources and the simulation plugin.
//!
//! One `Update` pass is one simulation tick.  Systems run in the fixed order
//! the model was tuned for: clock → resize → input → background → effect
//! decay → scheduled ripples → collisions → asteroid integration → shooting
//! stars → ship.  Every per-tick constant assumes a nominal 60 Hz cadence.
//!
//! The simulation itself runs in canvas space: origin at the top-left,
//! y growing downward, units in pixels.  Only the render pass converts to
//! Bevy world coordinates.

use crate::background::Background;
use crate::config::{load_sim_config, SimConfig};
use crate::constants::RESIZE_RESPAWN_MS;
use crate::effects::{EffectPool, RippleGuard, RippleScheduler, ScheduledRipple};
use crate::field::{update_asteroids, AsteroidField};
use crate::input::{handle_clicks, handle_touches, track_pointer, PointerState};
use crate::merge::{resolve_collisions, sweep_merged};
use crate::ship::{update_explosion, update_ship, Ship, ShipState};
use crate::stars::{update_stars, ShootingStarField};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Virtual wall clock in milliseconds, advanced from the frame delta.
/// Everything time-based (respawns, explosion lifetime, scheduled ripples,
/// steering oscillations) reads this instead of ambient time, so tests can
/// drive it directly.
#[derive(Resource, Default)]
pub struct SimClock {
    pub now_ms: f64,
}

/// Canvas dimensions in pixels, kept in sync with the primary window.
#[derive(Resource, Clone, Copy)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// The singularity at the viewport centre.
#[derive(Resource, Clone, Copy)]
pub struct BlackHole {
    pub center: Vec2,
    pub radius: f32,
}

/// Simulation-wide random source.  A single seeded generator keeps full runs
/// reproducible in headless tests.
#[derive(Resource)]
pub struct SimRng(pub StdRng);

impl Default for SimRng {
    fn default() -> Self {
        SimRng(StdRng::from_entropy())
    }
}

/// Registers every simulation resource and the fixed-order tick systems.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimClock>()
            .init_resource::<Viewport>()
            .init_resource::<SimConfig>()
            .init_resource::<SimRng>()
            .init_resource::<AsteroidField>()
            .init_resource::<ShootingStarField>()
            .init_resource::<EffectPool>()
            .init_resource::<RippleScheduler>()
            .init_resource::<PointerState>()
            .init_resource::<Background>()
            .insert_resource(BlackHole {
                center: Vec2::ZERO,
                radius: crate::constants::HOLE_RADIUS,
            })
            .add_systems(Startup, (load_sim_config, setup_world).chain())
            .add_systems(
                Update,
                (
                    advance_clock,
                    handle_resize,
                    track_pointer,
                    handle_clicks,
                    handle_touches,
                    tick_background,
                    decay_effects,
                    flush_scheduled_ripples,
                    tick_collisions,
                    tick_asteroids,
                    tick_stars,
                    tick_ship,
                )
                    .chain(),
            );
    }
}

/// Size the world to the primary window, seed the initial asteroid field,
/// and park the ship in its pre-first-spawn dormancy.
fn setup_world(
    windows: Query<&Window, With<PrimaryWindow>>,
    config: Res<SimConfig>,
    mut viewport: ResMut<Viewport>,
    mut hole: ResMut<BlackHole>,
    mut field: ResMut<AsteroidField>,
    mut background: ResMut<Background>,
    mut commands: Commands,
    mut rng: ResMut<SimRng>,
) {
    if let Ok(window) = windows.single() {
        viewport.width = window.width();
        viewport.height = window.height();
    }
    hole.center = viewport.center();
    hole.radius = config.hole_radius;

    field.retarget(&viewport, &config);
    field.seed(&hole, &viewport, &config, &mut rng.0);
    background.regenerate(&hole, &viewport, field.target_count, &mut rng.0);

    let ship = Ship::new(0.0, &config, &mut rng.0);
    commands.insert_resource(ship);

    info!(
        "world ready: {}x{}, {} asteroids",
        viewport.width,
        viewport.height,
        field.asteroids.len()
    );
}

fn advance_clock(time: Res<Time>, mut clock: ResMut<SimClock>) {
    clock.now_ms += time.delta().as_secs_f64() * 1000.0;
}

/// Resize: recompute the target population and hole position, rebuild the
/// backdrop, and force an active ship back to dormancy with a short respawn.
fn handle_resize(
    mut resized: MessageReader<WindowResized>,
    clock: Res<SimClock>,
    config: Res<SimConfig>,
    mut viewport: ResMut<Viewport>,
    mut hole: ResMut<BlackHole>,
    mut field: ResMut<AsteroidField>,
    mut background: ResMut<Background>,
    mut ship: ResMut<Ship>,
    mut rng: ResMut<SimRng>,
) {
    let Some(event) = resized.read().last() else {
        return;
    };
    viewport.width = event.width;
    viewport.height = event.height;
    hole.center = viewport.center();
    field.retarget(&viewport, &config);
    background.regenerate(&hole, &viewport, field.target_count, &mut rng.0);

    if ship.state == ShipState::Cruising {
        ship.state = ShipState::Dormant;
        ship.respawn_at_ms = clock.now_ms + RESIZE_RESPAWN_MS;
    }
    info!("viewport resized to {}x{}", event.width, event.height);
}

fn tick_background(mut background: ResMut<Background>) {
    background.advance();
}

fn decay_effects(mut effects: ResMut<EffectPool>) {
    effects.decay();
}

/// Emit any scheduled ripples whose deadline has passed, re-checking their
/// guard against the live ship state.
fn flush_scheduled_ripples(
    clock: Res<SimClock>,
    ship: Res<Ship>,
    mut scheduler: ResMut<RippleScheduler>,
    mut effects: ResMut<EffectPool>,
    mut rng: ResMut<SimRng>,
    mut due: Local<Vec<ScheduledRipple>>,
) {
    due.clear();
    scheduler.drain_due(clock.now_ms, &mut due);
    for ripple in due.iter() {
        let live = match ripple.guard {
            RippleGuard::Always => true,
            RippleGuard::ShipExploding => ship.state == ShipState::Exploding,
        };
        if !live {
            continue;
        }
        let hue = 10.0 + rng.0.gen_range(0.0..10.0);
        if ripple.ripple {
            effects.push_ripple(ship.pos, ripple.radius, hue, ripple.alpha);
        } else {
            effects.push_trail(ship.pos, ripple.radius, hue, ripple.alpha);
        }
    }
}

fn tick_collisions(
    clock: Res<SimClock>,
    mut field: ResMut<AsteroidField>,
    mut effects: ResMut<EffectPool>,
    mut rng: ResMut<SimRng>,
) {
    resolve_collisions(&mut field, &mut effects, clock.now_ms, &mut rng.0);
    sweep_merged(&mut field);
}

fn tick_asteroids(
    clock: Res<SimClock>,
    hole: Res<BlackHole>,
    viewport: Res<Viewport>,
    pointer: Res<PointerState>,
    config: Res<SimConfig>,
    mut field: ResMut<AsteroidField>,
    mut stars: ResMut<ShootingStarField>,
    mut effects: ResMut<EffectPool>,
    mut rng: ResMut<SimRng>,
) {
    update_asteroids(
        &mut field,
        &hole,
        &viewport,
        pointer.pos,
        clock.now_ms,
        &config,
        &mut effects,
    );
    field.replenish(&mut stars, &hole, &viewport, &config, &mut rng.0);
}

fn tick_stars(
    clock: Res<SimClock>,
    hole: Res<BlackHole>,
    viewport: Res<Viewport>,
    pointer: Res<PointerState>,
    config: Res<SimConfig>,
    mut stars: ResMut<ShootingStarField>,
    mut effects: ResMut<EffectPool>,
) {
    update_stars(
        &mut stars,
        &hole,
        &viewport,
        pointer.pos,
        clock.now_ms,
        &config,
        &mut effects,
    );
}

fn tick_ship(
    clock: Res<SimClock>,
    hole: Res<BlackHole>,
    viewport: Res<Viewport>,
    config: Res<SimConfig>,
    field: Res<AsteroidField>,
    mut ship: ResMut<Ship>,
    mut effects: ResMut<EffectPool>,
    mut scheduler: ResMut<RippleScheduler>,
    mut rng: ResMut<SimRng>,
) {
    update_ship(
        &mut ship,
        &field,
        &hole,
        &viewport,
        clock.now_ms,
        &config,
        &mut effects,
        &mut scheduler,
        &mut rng.0,
    );
    update_explosion(&mut ship, clock.now_ms, &config, &mut effects, &mut rng.0);
}
