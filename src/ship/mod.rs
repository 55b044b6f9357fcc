//! The autonomous spaceship: state machine, autopilot, and explosion.

pub mod autopilot;
pub mod explosion;
pub mod state;

pub use autopilot::update_ship;
pub use explosion::{trigger_explosion, update_explosion};
pub use state::{Edge, ExplosionParticle, Ship, ShipState};
