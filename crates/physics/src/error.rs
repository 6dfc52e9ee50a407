use thiserror::Error;

use crate::world::BodyHandle;

/// Errors raised while building physical state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("particle mass must be positive and finite, got {0}")]
    InvalidMass(f64),
    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),
    #[error("unknown body {0:?}")]
    UnknownBody(BodyHandle),
}
