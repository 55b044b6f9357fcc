//! Pointer plumbing: cursor tracking, click/tap impulses, and the short
//! touch-hold window that lets a tap also act as a momentary cursor.
//!
//! Window cursor coordinates are top-left-origin with y growing downward,
//! which is exactly the canvas space the simulation runs in, so positions
//! pass through untranslated.

use crate::config::SimConfig;
use crate::constants::*;
use crate::effects::{EffectPool, RippleScheduler};
use crate::field::AsteroidField;
use crate::math::{angle_diff, heading, wrap_angle};
use crate::ship::{trigger_explosion, Ship, ShipState};
use crate::simulation::{SimClock, SimRng};
use crate::stars::ShootingStarField;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rand::Rng;

/// Current pointer position in canvas space, if any.
///
/// A mouse cursor inside the window always wins; after a touch tap the touch
/// position is held for a short window so the field reacts to the tap the
/// same way it reacts to a hovering cursor.
#[derive(Resource, Default)]
pub struct PointerState {
    pub pos: Option<Vec2>,
    /// While set, `pos` is a touch-hold that expires at this virtual time.
    hold_until_ms: Option<f64>,
    last_tap_ms: f64,
}

impl PointerState {
    pub fn set_cursor(&mut self, pos: Option<Vec2>) {
        if pos.is_some() {
            self.pos = pos;
            self.hold_until_ms = None;
        } else if self.hold_until_ms.is_none() {
            self.pos = None;
        }
    }

    pub fn hold_touch(&mut self, pos: Vec2, now_ms: f64) {
        self.pos = Some(pos);
        self.hold_until_ms = Some(now_ms + TAP_POINTER_HOLD_MS);
    }

    pub fn expire_hold(&mut self, now_ms: f64) {
        if let Some(until) = self.hold_until_ms {
            if now_ms >= until {
                self.hold_until_ms = None;
                self.pos = None;
            }
        }
    }

    /// Debounce: returns `false` for taps arriving inside the dead window.
    pub fn accept_tap(&mut self, now_ms: f64) -> bool {
        if now_ms - self.last_tap_ms < TAP_DEBOUNCE_MS {
            return false;
        }
        self.last_tap_ms = now_ms;
        true
    }
}

/// Apply one tap/click at `tap` in canvas space: interaction ripple and
/// flare, ship explode-or-push, and radial impulses to asteroids and
/// shooting stars.
#[allow(clippy::too_many_arguments)]
pub fn apply_tap(
    tap: Vec2,
    ship: &mut Ship,
    field: &mut AsteroidField,
    stars: &mut ShootingStarField,
    effects: &mut EffectPool,
    scheduler: &mut RippleScheduler,
    now_ms: f64,
    config: &SimConfig,
    rng: &mut impl Rng,
) {
    effects.push_ripple(tap, 6.5, 0.0, 0.3);
    effects.push_flare(tap, 3.0, 30.0, 0.25);

    if ship.state == ShipState::Cruising {
        let from_tap = ship.pos - tap;
        let dist = from_tap.length();
        if dist < config.tap_explode_radius {
            trigger_explosion(ship, now_ms, config, effects, scheduler, rng);
        } else if dist < config.tap_push_radius {
            let push_angle = from_tap.y.atan2(from_tap.x);
            let push_strength = TAP_SHIP_PUSH_STRENGTH * (1.0 - dist / config.tap_push_radius);

            ship.pos += heading(push_angle) * push_strength * TAP_SHIP_PUSH_STEP;
            let diff = angle_diff(ship.angle, push_angle);
            ship.angle = wrap_angle(ship.angle + diff * push_strength * TAP_SHIP_ALIGN);

            effects.push_trail(ship.pos, 6.0, 200.0, 0.7);
            if push_strength > 0.3 {
                effects.push_trail(ship.pos - heading(push_angle) * 4.0, 4.0, 220.0, 0.5);
            }
        }
    }

    for a in &mut field.asteroids {
        let delta = a.pos - tap;
        let dist = delta.length();
        if dist < config.tap_field_radius {
            let strength = (1.0 - dist / config.tap_field_radius) * TAP_ASTEROID_STRENGTH;
            a.vel += delta * (strength * TAP_ASTEROID_IMPULSE);
        }
    }

    for star in &mut stars.stars {
        let delta = star.pos - tap;
        let dist = delta.length();
        if dist < config.tap_field_radius {
            let strength = (1.0 - dist / config.tap_field_radius) * TAP_STAR_STRENGTH;
            star.vel += delta * (strength * TAP_STAR_IMPULSE);
        }
    }
}

// ── Bevy systems ──────────────────────────────────────────────────────────────

/// Mirror the window cursor into [`PointerState`] and expire touch holds.
pub fn track_pointer(
    windows: Query<&Window, With<PrimaryWindow>>,
    clock: Res<SimClock>,
    mut pointer: ResMut<PointerState>,
) {
    pointer.expire_hold(clock.now_ms);
    if let Ok(window) = windows.single() {
        pointer.set_cursor(window.cursor_position());
    }
}

/// Left click applies a tap at the cursor position.
#[allow(clippy::too_many_arguments)]
pub fn handle_clicks(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    clock: Res<SimClock>,
    config: Res<SimConfig>,
    mut ship: ResMut<Ship>,
    mut field: ResMut<AsteroidField>,
    mut stars: ResMut<ShootingStarField>,
    mut effects: ResMut<EffectPool>,
    mut scheduler: ResMut<RippleScheduler>,
    mut rng: ResMut<SimRng>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else { return };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    apply_tap(
        cursor,
        &mut ship,
        &mut field,
        &mut stars,
        &mut effects,
        &mut scheduler,
        clock.now_ms,
        &config,
        &mut rng.0,
    );
}

/// Touch taps: debounced, then applied like a click, holding the pointer
/// position briefly so the cursor-influence forces also react.
#[allow(clippy::too_many_arguments)]
pub fn handle_touches(
    touches: Res<Touches>,
    clock: Res<SimClock>,
    config: Res<SimConfig>,
    mut pointer: ResMut<PointerState>,
    mut ship: ResMut<Ship>,
    mut field: ResMut<AsteroidField>,
    mut stars: ResMut<ShootingStarField>,
    mut effects: ResMut<EffectPool>,
    mut scheduler: ResMut<RippleScheduler>,
    mut rng: ResMut<SimRng>,
) {
    for touch in touches.iter_just_pressed() {
        if !pointer.accept_tap(clock.now_ms) {
            continue;
        }
        let pos = touch.position();
        pointer.hold_touch(pos, clock.now_ms);
        apply_tap(
            pos,
            &mut ship,
            &mut field,
            &mut stars,
            &mut effects,
            &mut scheduler,
            clock.now_ms,
            &config,
            &mut rng.0,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Asteroid;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tap_world() -> (Ship, AsteroidField, ShootingStarField, EffectPool, RippleScheduler, SimConfig, StdRng)
    {
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(31);
        let mut ship = Ship::new(0.0, &config, &mut rng);
        ship.state = ShipState::Cruising;
        ship.pos = Vec2::new(400.0, 300.0);
        let field = AsteroidField {
            asteroids: vec![Asteroid {
                pos: Vec2::new(450.0, 300.0),
                r: 2.0,
                phase: 0.0,
                base_speed: 0.05,
                vel: Vec2::ZERO,
                merged: false,
                hue: 200.0,
            }],
            target_count: 0,
        };
        (
            ship,
            field,
            ShootingStarField::default(),
            EffectPool::default(),
            RippleScheduler::default(),
            config,
            rng,
        )
    }

    #[test]
    fn tap_on_the_ship_explodes_it() {
        let (mut ship, mut field, mut stars, mut effects, mut scheduler, config, mut rng) =
            tap_world();
        apply_tap(
            ship.pos + Vec2::new(10.0, 0.0),
            &mut ship,
            &mut field,
            &mut stars,
            &mut effects,
            &mut scheduler,
            1000.0,
            &config,
            &mut rng,
        );
        assert_eq!(ship.state, ShipState::Exploding);
    }

    #[test]
    fn tap_near_the_ship_pushes_it_away() {
        let (mut ship, mut field, mut stars, mut effects, mut scheduler, config, mut rng) =
            tap_world();
        let before = ship.pos;
        // 100 px left of the ship: inside push range, outside explode range.
        apply_tap(
            ship.pos - Vec2::new(100.0, 0.0),
            &mut ship,
            &mut field,
            &mut stars,
            &mut effects,
            &mut scheduler,
            1000.0,
            &config,
            &mut rng,
        );
        assert_eq!(ship.state, ShipState::Cruising);
        assert!(ship.pos.x > before.x, "push moves the ship away from the tap");
    }

    #[test]
    fn tap_impulse_pushes_asteroids_radially() {
        let (mut ship, mut field, mut stars, mut effects, mut scheduler, config, mut rng) =
            tap_world();
        ship.state = ShipState::Dormant;
        let tap = Vec2::new(400.0, 300.0);
        apply_tap(
            tap, &mut ship, &mut field, &mut stars, &mut effects, &mut scheduler, 1000.0, &config,
            &mut rng,
        );
        let a = &field.asteroids[0];
        assert!(a.vel.x > 0.0, "asteroid right of the tap gets pushed right");
        assert_eq!(a.vel.y, 0.0);
        assert!(
            effects.trails.iter().any(|t| t.ripple),
            "tap spawns the interaction ripple"
        );
    }

    #[test]
    fn debounce_rejects_rapid_double_taps() {
        let mut pointer = PointerState::default();
        assert!(pointer.accept_tap(1000.0));
        assert!(!pointer.accept_tap(1000.0 + TAP_DEBOUNCE_MS / 2.0));
        assert!(pointer.accept_tap(1000.0 + TAP_DEBOUNCE_MS + 1.0));
    }

    #[test]
    fn touch_hold_expires_after_its_window() {
        let mut pointer = PointerState::default();
        pointer.hold_touch(Vec2::new(10.0, 10.0), 1000.0);
        pointer.expire_hold(1000.0 + TAP_POINTER_HOLD_MS - 1.0);
        assert!(pointer.pos.is_some());
        pointer.expire_hold(1000.0 + TAP_POINTER_HOLD_MS + 1.0);
        assert!(pointer.pos.is_none());
    }

    #[test]
    fn cursor_updates_do_not_cancel_an_active_hold() {
        let mut pointer = PointerState::default();
        pointer.hold_touch(Vec2::new(10.0, 10.0), 1000.0);
        pointer.set_cursor(None);
        assert!(pointer.pos.is_some(), "hold survives a cursor-left event");
    }
}
