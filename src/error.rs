//! Simulation-specific error types.
//!
//! The simulation core has no fallible I/O; these types cover the two places
//! errors can still surface: runtime tuning values outside their safe
//! operating range (rejected by the config loader) and non-finite numeric
//! state (checked by the test suite's invariant sweeps).

use std::fmt;

/// Top-level error enum for the singularity simulation.
#[derive(Debug)]
pub enum SimError {
    /// A tuning value is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// A simulation quantity became NaN or infinite.
    NonFiniteState {
        /// Human-readable description of where the value was observed.
        context: &'static str,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            SimError::NonFiniteState { context } => {
                write!(f, "non-finite value observed in '{}'", context)
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if `hole_radius` is outside its validated safe range.
///
/// Every proximity threshold scales off this value; above ~300 px the suck-in
/// band swallows most of a 1080p viewport.
pub fn validate_hole_radius(value: f32) -> SimResult<()> {
    if value <= 0.0 || value > 300.0 {
        Err(SimError::UnsafeConstant {
            name: "hole_radius",
            value,
            safe_range: "(0.0, 300.0]",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if `density_divisor` is not strictly positive.
pub fn validate_density_divisor(value: f32) -> SimResult<()> {
    if value <= 0.0 {
        Err(SimError::UnsafeConstant {
            name: "density_divisor",
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if `ship_turn_rate` is outside its validated safe range.
///
/// Above 0.5 rad/tick the clamped steering overshoots and the ship visibly
/// oscillates around its target heading.
pub fn validate_ship_turn_rate(value: f32) -> SimResult<()> {
    if value <= 0.0 || value > 0.5 {
        Err(SimError::UnsafeConstant {
            name: "ship_turn_rate",
            value,
            safe_range: "(0.0, 0.5]",
        })
    } else {
        Ok(())
    }
}
