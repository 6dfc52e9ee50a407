use physics::PhysicsError;
use thiserror::Error;

/// Contract violations and construction failures.
///
/// None of these are retried: each one is a defect in the caller or in the
/// settings it supplied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvError {
    #[error("action has {actual} components, expected {expected}")]
    ActionLength { expected: usize, actual: usize },
    #[error("action component {index} is {value}, outside [-1, 1]")]
    ActionOutOfRange { index: usize, value: f64 },
    #[error("categorical action {index} out of range, environment offers {count}")]
    InvalidCategoricalAction { index: usize, count: usize },
    #[error("{env} does not support {capability}")]
    Unsupported {
        env: &'static str,
        capability: &'static str,
    },
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error(transparent)]
    Physics(#[from] PhysicsError),
}
