//! Rendering shell: retained meshes for the static layers, gizmos for
//! everything that moves.
//!
//! | Layer               | Mechanism | Notes                                  |
//! |---------------------|-----------|----------------------------------------|
//! | Black hole          | `Mesh2d`  | 30 glow discs + 4 core discs, retained |
//! | Nebulae             | `Mesh2d`  | rebuilt on resize, parallax transform  |
//! | Starfield           | Gizmos    | twinkle alpha recomputed per frame     |
//! | Trails/flares       | Gizmos    | short-lived, high churn                |
//! | Asteroids/stars/ship| Gizmos    | plain-data populations, modest counts  |
//!
//! The static layers are uploaded once and live on the GPU; the dynamic
//! populations are plain data (no entities), so immediate-mode gizmos are the
//! natural fit; at a few hundred elements the per-frame cost is negligible.
//!
//! The simulation runs in canvas space (top-left origin, y down);
//! [`canvas_to_world`] recenters and flips into Bevy world coordinates.

use crate::background::{star_twinkle, Background};
use crate::effects::EffectPool;
use crate::field::AsteroidField;
use crate::ship::{Ship, ShipState};
use crate::simulation::{BlackHole, SimClock, Viewport};
use crate::stars::ShootingStarField;
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use std::f32::consts::TAU;

/// Number of fading discs in the black hole's outer glow.
const GLOW_LAYERS: usize = 30;

/// Deep violet void behind everything, approximating the original's radial
/// background gradient near its mid-stop.
const BACKGROUND_COLOR: Color = Color::srgb(0.035, 0.022, 0.07);

/// Marker for every retained black-hole disc, repositioned on resize.
#[derive(Component)]
struct BlackHoleLayer;

/// Marker for retained nebula discs; `index` points into `Background::nebulae`.
#[derive(Component)]
struct NebulaDisc {
    index: usize,
    revision: u32,
}

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(BACKGROUND_COLOR))
            .add_systems(Startup, (setup_camera, setup_black_hole_layers))
            .add_systems(
                Update,
                (
                    sync_black_hole_layers,
                    sync_nebula_discs,
                    draw_backdrop,
                    draw_effects,
                    draw_field,
                    draw_ship,
                )
                    .chain(),
            );
    }
}

/// Convert a canvas-space point (top-left origin, y down) to Bevy world
/// coordinates (centre origin, y up).
pub fn canvas_to_world(pos: Vec2, viewport: &Viewport) -> Vec2 {
    Vec2::new(pos.x - viewport.width / 2.0, viewport.height / 2.0 - pos.y)
}

/// Wrap a simulation hue into `[0, 360)`.  Hue jitter and blending produce
/// values outside the range; `Color::hsl` does not wrap them itself.
pub fn wrap_hue(hue: f32) -> f32 {
    hue.rem_euclid(360.0)
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Spawn the retained black-hole stack: a wide non-linear glow falloff, the
/// accretion ring, and the void core drawn innermost-on-top.
fn setup_black_hole_layers(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    hole: Res<BlackHole>,
) {
    // Outer glow: alpha falls off as (1 − ratio)^5, so only the innermost
    // few discs are clearly visible and the rest melt into the background.
    for i in (1..=GLOW_LAYERS).rev() {
        let ratio = i as f32 / GLOW_LAYERS as f32;
        let radius = hole.radius * (0.9 + ratio * 0.9);
        let alpha = 0.4 * (1.0 - ratio).powi(5);
        commands.spawn((
            Mesh2d(meshes.add(disc_mesh(radius, 64))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(Color::srgba(
                0.667, 0.667, 0.667, alpha,
            )))),
            Transform::from_translation(Vec3::new(0.0, 0.0, -0.6 - ratio * 0.01)),
            BlackHoleLayer,
        ));
    }

    // Accretion ring and core, brightest ring outermost.
    let core = [
        (0.9, Color::srgb(0.667, 0.667, 0.667), -0.5),
        (0.8, Color::srgb(0.333, 0.333, 0.333), -0.49),
        (0.75, Color::srgb(0.133, 0.133, 0.133), -0.48),
        (0.725, Color::BLACK, -0.47),
    ];
    for (factor, color, z) in core {
        commands.spawn((
            Mesh2d(meshes.add(disc_mesh(hole.radius * factor, 64))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(color))),
            Transform::from_translation(Vec3::new(0.0, 0.0, z)),
            BlackHoleLayer,
        ));
    }
}

/// Keep the retained hole discs centred on the (resize-movable) hole.
fn sync_black_hole_layers(
    hole: Res<BlackHole>,
    viewport: Res<Viewport>,
    mut query: Query<&mut Transform, With<BlackHoleLayer>>,
) {
    let world = canvas_to_world(hole.center, &viewport);
    for mut transform in query.iter_mut() {
        transform.translation.x = world.x;
        transform.translation.y = world.y;
    }
}

/// Create/update nebula discs: rebuild the set when the backdrop regenerates
/// and apply the parallax rotation every frame.
fn sync_nebula_discs(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    background: Res<Background>,
    hole: Res<BlackHole>,
    viewport: Res<Viewport>,
    mut query: Query<(Entity, &mut NebulaDisc, &mut Transform)>,
) {
    let stale: Vec<Entity> = query
        .iter()
        .filter(|(_, disc, _)| disc.revision != background.revision)
        .map(|(e, _, _)| e)
        .collect();
    let rebuild = !stale.is_empty() || (query.is_empty() && !background.nebulae.is_empty());

    if rebuild {
        for entity in stale {
            commands.entity(entity).despawn();
        }
        for (index, nebula) in background.nebulae.iter().enumerate() {
            commands.spawn((
                Mesh2d(meshes.add(disc_mesh(nebula.size, 48))),
                MeshMaterial2d(materials.add(ColorMaterial::from_color(Color::hsla(
                    nebula.hue, 0.7, 0.4, 0.05,
                )))),
                Transform::from_translation(Vec3::new(0.0, 0.0, -0.9)),
                NebulaDisc {
                    index,
                    revision: background.revision,
                },
            ));
        }
        return;
    }

    for (_, disc, mut transform) in query.iter_mut() {
        let Some(nebula) = background.nebulae.get(disc.index) else {
            continue;
        };
        let pos = background.rotated_pos(nebula.base_pos, nebula.distance_factor, &hole);
        let world = canvas_to_world(pos, &viewport);
        transform.translation.x = world.x;
        transform.translation.y = world.y;
    }
}

/// Twinkling starfield, drawn as sub-pixel dots; stars that would sit on the
/// accretion disc are skipped.
fn draw_backdrop(
    mut gizmos: Gizmos,
    background: Res<Background>,
    hole: Res<BlackHole>,
    viewport: Res<Viewport>,
    clock: Res<SimClock>,
) {
    for star in &background.stars {
        if star.base_pos.distance(hole.center) <= hole.radius * 0.9 {
            continue;
        }
        let pos = background.rotated_pos(star.base_pos, star.distance_factor, &hole);
        let alpha = 0.6 * star_twinkle(star, clock.now_ms);
        gizmos.circle_2d(
            canvas_to_world(pos, &viewport),
            0.7,
            Color::srgba(1.0, 1.0, 1.0, alpha),
        );
    }
}

/// Trails (filled ghosts and expanding ripple rings) and flares.
fn draw_effects(mut gizmos: Gizmos, effects: Res<EffectPool>, viewport: Res<Viewport>) {
    for t in &effects.trails {
        if t.radius <= 0.0 {
            continue;
        }
        let pos = canvas_to_world(t.pos, &viewport);
        if t.ripple {
            gizmos.circle_2d(pos, t.radius, Color::srgba(1.0, 1.0, 1.0, t.alpha));
        } else {
            filled_circle(
                &mut gizmos,
                pos,
                t.radius,
                Color::hsla(wrap_hue(t.hue), 1.0, 0.75, t.alpha),
            );
        }
    }
    for f in &effects.flares {
        filled_circle(
            &mut gizmos,
            canvas_to_world(f.pos, &viewport),
            f.radius,
            Color::hsla(wrap_hue(f.hue), 1.0, 0.7, f.alpha),
        );
    }
}

/// Asteroids and shooting stars.
fn draw_field(
    mut gizmos: Gizmos,
    field: Res<AsteroidField>,
    stars: Res<ShootingStarField>,
    hole: Res<BlackHole>,
    viewport: Res<Viewport>,
) {
    for a in &field.asteroids {
        // Inside the horizon band the asteroid is being swallowed; the core
        // discs own those pixels.
        if a.pos.distance(hole.center) < hole.radius * 0.8 {
            continue;
        }
        filled_circle(
            &mut gizmos,
            canvas_to_world(a.pos, &viewport),
            a.r,
            Color::hsl(wrap_hue(a.hue), 0.7, 0.7),
        );
    }

    for star in &stars.stars {
        let head = canvas_to_world(star.pos, &viewport);
        let tail = canvas_to_world(star.pos - star.vel * star.trail, &viewport);
        gizmos.line_2d(tail, head, Color::srgba(1.0, 1.0, 1.0, star.alpha));
        filled_circle(&mut gizmos, head, star.size, Color::srgba(1.0, 1.0, 1.0, star.alpha));
        gizmos.circle_2d(
            head,
            star.size * 2.0,
            Color::srgba(1.0, 1.0, 1.0, star.alpha * 0.3),
        );
    }
}

/// The ship hull, cockpit, thruster flame, and explosion debris.
fn draw_ship(mut gizmos: Gizmos, ship: Res<Ship>, viewport: Res<Viewport>) {
    match ship.state {
        ShipState::Dormant => {}
        ShipState::Exploding => {
            for p in &ship.explosion_particles {
                let pos = canvas_to_world(p.pos, &viewport);
                filled_circle(
                    &mut gizmos,
                    pos,
                    p.size,
                    Color::hsla(wrap_hue(p.hue), 1.0, 0.55, p.alpha),
                );
                // Soft red glow halo.
                gizmos.circle_2d(
                    pos,
                    p.size * 2.0,
                    Color::srgba(1.0, 0.2, 0.0, p.alpha * 0.3),
                );
            }
        }
        ShipState::Cruising => {
            let to_world = |local: Vec2| {
                canvas_to_world(ship.pos + local.rotate(Vec2::from_angle(ship.angle)), &viewport)
            };
            let s = ship.size;

            // Hull: nose, left fin, tail notch, right fin.
            let hull = [
                Vec2::new(s, 0.0),
                Vec2::new(-s / 2.0, -s / 2.0),
                Vec2::new(-s / 3.0, 0.0),
                Vec2::new(-s / 2.0, s / 2.0),
            ];
            let body = Color::srgb(0.53, 0.67, 1.0);
            for i in 0..hull.len() {
                let p1 = to_world(hull[i]);
                let p2 = to_world(hull[(i + 1) % hull.len()]);
                gizmos.line_2d(p1, p2, body);
            }

            filled_circle(
                &mut gizmos,
                to_world(Vec2::new(s / 3.0, 0.0)),
                s / 4.0,
                Color::WHITE,
            );

            // Thruster flame behind the tail.
            let flame = Color::srgba(1.0, 0.39, 0.12, ship.thruster_alpha.clamp(0.0, 1.0));
            let tail = [
                Vec2::new(-s / 2.0, -s / 4.0),
                Vec2::new(-s * 1.2, 0.0),
                Vec2::new(-s / 2.0, s / 4.0),
            ];
            for i in 0..tail.len() {
                let p1 = to_world(tail[i]);
                let p2 = to_world(tail[(i + 1) % tail.len()]);
                gizmos.line_2d(p1, p2, flame);
            }
        }
    }
}

/// A small filled disc out of concentric gizmo circles.  Fine for the dot
/// sizes this visualization draws; anything big and persistent should be a
/// retained mesh instead.
fn filled_circle(gizmos: &mut Gizmos, pos: Vec2, radius: f32, color: Color) {
    let rings = (radius.ceil() as u32).clamp(1, 12);
    for i in 1..=rings {
        gizmos.circle_2d(pos, radius * i as f32 / rings as f32, color);
    }
}

// ── Mesh helper ───────────────────────────────────────────────────────────────

/// Build a filled disc mesh as a triangle fan from the centre.
fn disc_mesh(radius: f32, sides: u32) -> Mesh {
    let n = sides as usize;
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(n + 1);

    positions.push([0.0, 0.0, 0.0]);
    normals.push([0.0, 0.0, 1.0]);
    uvs.push([0.5, 0.5]);

    for i in 0..n {
        let angle = TAU * i as f32 / n as f32;
        let x = radius * angle.cos();
        let y = radius * angle.sin();
        positions.push([x, y, 0.0]);
        normals.push([0.0, 0.0, 1.0]);
        uvs.push([x / (2.0 * radius) + 0.5, y / (2.0 * radius) + 0.5]);
    }

    let mut indices: Vec<u32> = Vec::with_capacity(n * 3);
    for i in 0..n as u32 {
        let v1 = i + 1;
        let v2 = (i + 1) % n as u32 + 1;
        indices.extend_from_slice(&[0, v1, v2]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}
