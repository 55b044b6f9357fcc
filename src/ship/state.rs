//! Ship state: the singleton resource, its lifecycle enum, and the edge
//! geometry used for spawning and exit routing.

use crate::config::SimConfig;
use crate::math::segment_point_distance;
use crate::simulation::{BlackHole, Viewport};
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, PI};

/// Canvas edges, used for both spawn entry and exit routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn opposite(self) -> Edge {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Right => Edge::Left,
            Edge::Bottom => Edge::Top,
            Edge::Left => Edge::Right,
        }
    }

    pub fn random(rng: &mut impl Rng) -> Edge {
        Edge::ALL[rng.gen_range(0..4)]
    }
}

/// Lifecycle of the autonomous ship.
///
/// `Dormant` waits out the respawn timer off-screen; `Cruising` runs the
/// autopilot; `Exploding` freezes movement while the debris animation plays,
/// then falls back to `Dormant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShipState {
    #[default]
    Dormant,
    Cruising,
    Exploding,
}

/// One piece of explosion debris, aged by the explosion updater.
#[derive(Debug, Clone, Copy)]
pub struct ExplosionParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub alpha: f32,
    pub hue: f32,
}

/// The autonomous ship singleton.
#[derive(Resource)]
pub struct Ship {
    pub pos: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub size: f32,
    pub thruster_alpha: f32,
    pub state: ShipState,
    /// Virtual timestamp after which a dormant ship may respawn.
    pub respawn_at_ms: f64,
    pub entry_edge: Edge,
    /// Edge of the last successful exit; the next spawn re-enters from it.
    pub last_exit_edge: Edge,
    pub has_been_active: bool,
    pub target_exit_edge: Edge,
    pub in_danger_zone: bool,
    pub explosion_started_ms: f64,
    pub explosion_particles: Vec<ExplosionParticle>,
}

impl Ship {
    /// Dormant ship waiting for its first (shorter) spawn delay.
    pub fn new(now_ms: f64, config: &SimConfig, rng: &mut impl Rng) -> Self {
        Ship {
            pos: Vec2::ZERO,
            angle: 0.0,
            speed: config.ship_base_speed,
            size: config.ship_size,
            thruster_alpha: 0.0,
            state: ShipState::Dormant,
            respawn_at_ms: now_ms
                + crate::constants::FIRST_SPAWN_BASE_MS
                + rng.gen_range(0.0..crate::constants::FIRST_SPAWN_JITTER_MS),
            entry_edge: Edge::Top,
            last_exit_edge: Edge::random(rng),
            has_been_active: false,
            target_exit_edge: Edge::Top,
            in_danger_zone: false,
            explosion_started_ms: 0.0,
            explosion_particles: Vec::new(),
        }
    }

    /// Enter from `edge` near one of its corners, heading straight across.
    /// Portrait viewports push the corner offset inward so the crossing angle
    /// stays shallow.
    pub fn spawn_from_edge(&mut self, edge: Edge, viewport: &Viewport, rng: &mut impl Rng) {
        self.explosion_particles.clear();
        self.entry_edge = edge;
        self.target_exit_edge = edge.opposite();
        self.in_danger_zone = false;

        let margin = self.size * 2.0;
        let corner = rng.gen_bool(0.5);
        let offset_y = if viewport.is_portrait() {
            viewport.height * 0.15
        } else {
            margin * 2.0
        };

        match edge {
            Edge::Top => {
                self.pos = Vec2::new(
                    if corner { margin * 2.0 } else { viewport.width - margin * 2.0 },
                    -margin,
                );
                self.angle = FRAC_PI_2;
            }
            Edge::Right => {
                self.pos = Vec2::new(
                    viewport.width + margin,
                    if corner { offset_y } else { viewport.height - offset_y },
                );
                self.angle = PI;
            }
            Edge::Bottom => {
                self.pos = Vec2::new(
                    if corner { margin * 2.0 } else { viewport.width - margin * 2.0 },
                    viewport.height + margin,
                );
                self.angle = -FRAC_PI_2;
            }
            Edge::Left => {
                self.pos = Vec2::new(
                    -margin,
                    if corner { offset_y } else { viewport.height - offset_y },
                );
                self.angle = 0.0;
            }
        }

        self.state = ShipState::Cruising;
    }

    pub fn spawn_from_last_exit(&mut self, viewport: &Viewport, rng: &mut impl Rng) {
        self.spawn_from_edge(self.last_exit_edge, viewport, rng);
    }

    pub fn spawn_from_random_edge(&mut self, viewport: &Viewport, rng: &mut impl Rng) {
        self.spawn_from_edge(Edge::random(rng), viewport, rng);
    }

    /// Exit point on `edge`, biased toward the corner diagonal from the
    /// ship's current half of the canvas.
    pub fn exit_coords_for(&self, edge: Edge, viewport: &Viewport) -> Vec2 {
        let margin = self.size * 2.0;
        let offset_y = if viewport.is_portrait() {
            viewport.height * 0.15
        } else {
            margin
        };

        match edge {
            Edge::Top => Vec2::new(
                if self.pos.x < viewport.width / 2.0 {
                    viewport.width - margin * 2.0
                } else {
                    margin * 2.0
                },
                -margin,
            ),
            Edge::Right => Vec2::new(
                viewport.width + margin,
                if self.pos.y < viewport.height / 2.0 {
                    viewport.height - offset_y
                } else {
                    offset_y
                },
            ),
            Edge::Bottom => Vec2::new(
                if self.pos.x < viewport.width / 2.0 {
                    viewport.width - margin * 2.0
                } else {
                    margin * 2.0
                },
                viewport.height + margin,
            ),
            Edge::Left => Vec2::new(
                -margin,
                if self.pos.y < viewport.height / 2.0 {
                    viewport.height - offset_y
                } else {
                    offset_y
                },
            ),
        }
    }

    /// Exit point on the current target edge.
    pub fn exit_coords(&self, viewport: &Viewport) -> Vec2 {
        self.exit_coords_for(self.target_exit_edge, viewport)
    }

    /// Heading toward the current exit point.
    pub fn exit_angle(&self, viewport: &Viewport) -> f32 {
        let exit = self.exit_coords(viewport);
        (exit.y - self.pos.y).atan2(exit.x - self.pos.x)
    }

    /// Re-route to whichever non-entry edge gives the straight-line path
    /// that clears the black hole by the widest margin.
    pub fn select_safe_exit_edge(&mut self, hole: &BlackHole, viewport: &Viewport) {
        let mut best = self.target_exit_edge;
        let mut best_score = f32::NEG_INFINITY;
        for edge in Edge::ALL {
            if edge == self.entry_edge {
                continue;
            }
            let exit = self.exit_coords_for(edge, viewport);
            let score = segment_point_distance(self.pos, exit, hole.center);
            if score > best_score {
                best_score = score;
                best = edge;
            }
        }
        self.target_exit_edge = best;
    }
}
