//! Shared decaying-particle pool: trails, flares, and the ripple scheduler.
//!
//! Every simulation component pushes into the pool as a side effect of its
//! own update; nothing ever reads it back except the rendering shell.  The
//! pool is therefore an unordered arena: expiry uses `swap_remove`, which is
//! O(1) and does not preserve insertion order (no consumer depends on it).
//!
//! [`RippleScheduler`] replaces ambient fire-and-forget timers: staggered
//! explosion ripples are queued on a min-heap keyed by virtual time and
//! flushed once the clock passes them, re-checking a guard predicate at fire
//! time ("is the ship still exploding").

use bevy::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Alpha below which a trail is considered fully faded and removed.
const TRAIL_EXPIRY_ALPHA: f32 = 0.001;

/// A fading particle: a filled disc, or an expanding stroked ring when
/// `ripple` is set.
#[derive(Debug, Clone, Copy)]
pub struct Trail {
    pub pos: Vec2,
    pub radius: f32,
    pub hue: f32,
    pub alpha: f32,
    pub ripple: bool,
}

/// A slowly expanding glow disc with drifting hue.
#[derive(Debug, Clone, Copy)]
pub struct Flare {
    pub pos: Vec2,
    pub radius: f32,
    pub hue: f32,
    pub alpha: f32,
}

/// Append-only effect arena, aged once per tick and drawn by the render pass.
#[derive(Resource, Default)]
pub struct EffectPool {
    pub trails: Vec<Trail>,
    pub flares: Vec<Flare>,
}

impl EffectPool {
    pub fn push_trail(&mut self, pos: Vec2, radius: f32, hue: f32, alpha: f32) {
        self.trails.push(Trail {
            pos,
            radius,
            hue,
            alpha,
            ripple: false,
        });
    }

    pub fn push_ripple(&mut self, pos: Vec2, radius: f32, hue: f32, alpha: f32) {
        self.trails.push(Trail {
            pos,
            radius,
            hue,
            alpha,
            ripple: true,
        });
    }

    pub fn push_flare(&mut self, pos: Vec2, radius: f32, hue: f32, alpha: f32) {
        self.flares.push(Flare {
            pos,
            radius,
            hue,
            alpha,
        });
    }

    /// Age every pooled effect by one tick and drop the expired ones.
    ///
    /// Trails shrink geometrically (ripples expand instead); flares grow and
    /// hue-drift while fading.  Iteration runs back-to-front so `swap_remove`
    /// never skips an element.
    pub fn decay(&mut self) {
        for i in (0..self.trails.len()).rev() {
            let t = &mut self.trails[i];
            if t.ripple {
                t.radius += 3.0;
                t.alpha -= 0.015;
            } else {
                t.radius *= 0.97;
                t.alpha -= 0.02;
            }
            if t.alpha <= TRAIL_EXPIRY_ALPHA {
                self.trails.swap_remove(i);
            }
        }
        for i in (0..self.flares.len()).rev() {
            let f = &mut self.flares[i];
            f.radius += 0.1;
            f.hue += 0.5;
            f.alpha -= 0.008;
            if f.alpha <= 0.0 {
                self.flares.swap_remove(i);
            }
        }
    }

    /// Remove every trail within an axis-aligned box around `center`.
    /// Used when a ship explosion ends to clear lingering debris trails.
    pub fn purge_near(&mut self, center: Vec2, half_width: f32) {
        for i in (0..self.trails.len()).rev() {
            let t = self.trails[i];
            if (t.pos.x - center.x).abs() < half_width && (t.pos.y - center.y).abs() < half_width {
                self.trails.swap_remove(i);
            }
        }
    }
}

// ── Ripple scheduler ──────────────────────────────────────────────────────────

/// Guard predicate re-checked when a scheduled ripple fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RippleGuard {
    /// Fire unconditionally.
    Always,
    /// Fire only while the ship is still in its exploding state.
    ShipExploding,
}

/// A trail queued to spawn at the ship's position at a future virtual time.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledRipple {
    /// Virtual timestamp (ms) at which to emit.
    pub fire_at_ms: u64,
    pub radius: f32,
    pub alpha: f32,
    pub guard: RippleGuard,
    /// Emit as an expanding ring rather than a filled disc.
    pub ripple: bool,
}

impl PartialEq for ScheduledRipple {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at_ms == other.fire_at_ms
    }
}

impl Eq for ScheduledRipple {}

impl PartialOrd for ScheduledRipple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledRipple {
    // Reversed so BinaryHeap pops the earliest deadline first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.fire_at_ms.cmp(&self.fire_at_ms)
    }
}

/// Min-heap of pending ripples, keyed by virtual time.
#[derive(Resource, Default)]
pub struct RippleScheduler {
    pending: BinaryHeap<ScheduledRipple>,
}

impl RippleScheduler {
    pub fn schedule(&mut self, ripple: ScheduledRipple) {
        self.pending.push(ripple);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Pop every ripple whose deadline has passed.  The caller evaluates the
    /// guard and emits the trail, since the guard state lives on the ship.
    pub fn drain_due(&mut self, now_ms: f64, due: &mut Vec<ScheduledRipple>) {
        while self
            .pending
            .peek()
            .is_some_and(|next| (next.fire_at_ms as f64) <= now_ms)
        {
            if let Some(ripple) = self.pending.pop() {
                due.push(ripple);
            }
        }
    }
}
