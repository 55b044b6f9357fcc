//! Singularity: a continuously running black-hole particle visualization.
//!
//! An asteroid field spirals into a central black hole under a hand-tuned
//! gravity model, overlapping asteroids merge, shooting stars streak through
//! on gravity-bent flybys, and an autonomous spaceship autopilots across the
//! screen dodging asteroids and the horizon.  Clicks and taps push, pull,
//! and occasionally detonate things.
//!
//! The simulation state lives in plain-data resources updated by free
//! functions, so every behavior is testable headless with a seeded RNG and a
//! hand-driven clock; the Bevy systems are thin wrappers that feed those
//! functions the virtual clock and draw the results.

pub mod background;
pub mod config;
pub mod constants;
pub mod effects;
pub mod error;
pub mod field;
pub mod input;
pub mod math;
pub mod merge;
pub mod rendering;
pub mod ship;
pub mod simulation;
pub mod stars;
