use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::EnvError;
use crate::scene::Scene;

/// Environment-specific debugging data. Never used for control.
pub type Info = BTreeMap<String, Value>;

/// Outcome of a single [`Env::step`].
#[derive(Clone, Debug, PartialEq)]
pub struct StepResult {
    /// What the agent senses, normalized to roughly [-1, 1].
    pub observation: Vec<f64>,
    pub reward: f64,
    /// The episode is over; call [`Env::reset`] before stepping again.
    pub terminated: bool,
    pub info: Info,
}

/// Outcome of [`Env::reset`].
#[derive(Clone, Debug, PartialEq)]
pub struct ResetResult {
    pub observation: Vec<f64>,
    pub info: Info,
}

/// Reinforcement learning environment contract.
///
/// Modelled on the Gym interface: a driver calls [`reset`], then [`step`]
/// repeatedly until `terminated` is reported (or its own horizon runs out),
/// then resets again. The shape queries never change over the lifetime of an
/// instance.
///
/// [`reset`]: Env::reset
/// [`step`]: Env::step
pub trait Env {
    /// Stable identifier, e.g. `"CartPole"`.
    fn name(&self) -> &'static str;

    /// Length of the action vector accepted by [`step`](Env::step).
    fn action_len(&self) -> usize;

    /// Length of every observation vector this environment produces.
    fn observation_len(&self) -> usize;

    /// Number of discrete actions offered.
    ///
    /// # Errors
    ///
    /// [`EnvError::Unsupported`] for continuous-only environments.
    fn num_categorical_actions(&self) -> Result<usize, EnvError>;

    /// Maps discrete action `index` onto a continuous action vector.
    ///
    /// # Errors
    ///
    /// [`EnvError::InvalidCategoricalAction`] when `index` is out of range,
    /// [`EnvError::Unsupported`] for continuous-only environments.
    fn categorical_action(&self, index: usize) -> Result<Vec<f64>, EnvError>;

    /// Reinitializes the episode with randomized starting conditions and
    /// clears every episode-scoped flag. Valid at any time.
    fn reset(&mut self) -> ResetResult;

    /// Advances the simulation one fixed time step.
    ///
    /// # Errors
    ///
    /// [`EnvError::ActionLength`] or [`EnvError::ActionOutOfRange`] when the
    /// action has the wrong length or a component outside [-1, 1]. The state
    /// is left untouched in that case.
    fn step(&mut self, action: &[f64]) -> Result<StepResult, EnvError>;

    /// Logical canvas size `(width, height)` used by [`scene`](Env::scene).
    fn render_size(&self) -> (f64, f64);

    /// Drawing primitives describing the current state.
    fn scene(&self) -> Scene;
}
