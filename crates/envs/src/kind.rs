//! The closed set of environments.
//!
//! [`EnvKind`] lets a driver hold any environment by value and dispatch the
//! [`Env`] contract without trait objects. [`EnvConfig`] is its serialized
//! form: a tagged settings record that builds the matching variant.

use physics::RigidBodyWorld;
use serde::{Deserialize, Serialize};

use crate::ballpush::{BallPushEnv, BallPushSettings};
use crate::cartpole::{CartPoleEnv, CartPoleSettings};
use crate::env::{Env, ResetResult, StepResult};
use crate::error::EnvError;
use crate::scene::Scene;
use crate::walker::{WalkerEnv, WalkerSettings};

pub enum EnvKind {
    CartPole(CartPoleEnv),
    BallPush(BallPushEnv),
    Walker(WalkerEnv),
}

/// Settings for one environment, tagged by `"env"`.
///
/// ```
/// use envs::EnvConfig;
///
/// let config: EnvConfig = serde_json::from_str(r#"{"env": "ball_push", "agent_drag": 2.0}"#)?;
/// assert!(matches!(config, EnvConfig::BallPush(s) if s.agent_drag == 2.0 && s.ball_radius == 2.0));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "env", rename_all = "snake_case")]
pub enum EnvConfig {
    CartPole(CartPoleSettings),
    BallPush(BallPushSettings),
    Walker(WalkerSettings),
}

impl EnvConfig {
    /// Builds the environment seeded with `seed`. `world` is only called for
    /// the walker, which needs a rigid-body engine to live in.
    ///
    /// # Errors
    ///
    /// Settings validation and world construction failures.
    pub fn build<F>(self, seed: u64, world: F) -> Result<EnvKind, EnvError>
    where
        F: FnOnce() -> Box<dyn RigidBodyWorld>,
    {
        let rng = fastrand::Rng::with_seed(seed);
        Ok(match self {
            Self::CartPole(settings) => EnvKind::CartPole(CartPoleEnv::new(settings, rng)?),
            Self::BallPush(settings) => EnvKind::BallPush(BallPushEnv::new(settings, rng)?),
            Self::Walker(settings) => EnvKind::Walker(WalkerEnv::new(settings, world(), rng)?),
        })
    }
}

macro_rules! dispatch {
    ($self:expr, $env:ident => $body:expr) => {
        match $self {
            EnvKind::CartPole($env) => $body,
            EnvKind::BallPush($env) => $body,
            EnvKind::Walker($env) => $body,
        }
    };
}

impl Env for EnvKind {
    fn name(&self) -> &'static str {
        dispatch!(self, env => env.name())
    }

    fn action_len(&self) -> usize {
        dispatch!(self, env => env.action_len())
    }

    fn observation_len(&self) -> usize {
        dispatch!(self, env => env.observation_len())
    }

    fn num_categorical_actions(&self) -> Result<usize, EnvError> {
        dispatch!(self, env => env.num_categorical_actions())
    }

    fn categorical_action(&self, index: usize) -> Result<Vec<f64>, EnvError> {
        dispatch!(self, env => env.categorical_action(index))
    }

    fn reset(&mut self) -> ResetResult {
        dispatch!(self, env => env.reset())
    }

    fn step(&mut self, action: &[f64]) -> Result<StepResult, EnvError> {
        dispatch!(self, env => env.step(action))
    }

    fn render_size(&self) -> (f64, f64) {
        dispatch!(self, env => env.render_size())
    }

    fn scene(&self) -> Scene {
        dispatch!(self, env => env.scene())
    }
}

impl From<CartPoleEnv> for EnvKind {
    fn from(env: CartPoleEnv) -> Self {
        Self::CartPole(env)
    }
}

impl From<BallPushEnv> for EnvKind {
    fn from(env: BallPushEnv) -> Self {
        Self::BallPush(env)
    }
}

impl From<WalkerEnv> for EnvKind {
    fn from(env: WalkerEnv) -> Self {
        Self::Walker(env)
    }
}

#[cfg(test)]
mod tests {
    use physics::KinematicWorld;

    use super::*;

    fn kinematic() -> Box<dyn RigidBodyWorld> {
        Box::new(KinematicWorld::new())
    }

    #[test]
    fn builds_each_variant_from_json() {
        let cases = [
            (r#"{"env": "cart_pole"}"#, "CartPole", 1, 4),
            (r#"{"env": "ball_push"}"#, "BallPush", 2, 8),
            (r#"{"env": "walker", "rock_count": 3}"#, "Walker Environment", 4, 10),
        ];
        for (json, name, action_len, observation_len) in cases {
            let config: EnvConfig = serde_json::from_str(json).unwrap();
            let env = config.build(1, kinematic).unwrap();
            assert_eq!(env.name(), name);
            assert_eq!(env.action_len(), action_len);
            assert_eq!(env.observation_len(), observation_len);
        }
    }

    #[test]
    fn invalid_settings_fail_to_build() {
        let config = EnvConfig::CartPole(CartPoleSettings {
            time_step: 0.0,
            ..CartPoleSettings::default()
        });
        assert!(matches!(config.build(0, kinematic), Err(EnvError::InvalidSettings(_))));
    }

    #[test]
    fn same_seed_replays_the_same_episode() {
        let run = || {
            let mut env = EnvConfig::BallPush(BallPushSettings::default())
                .build(42, kinematic)
                .unwrap();
            let mut observations = vec![env.reset().observation];
            for i in 0..50 {
                let action = env.categorical_action(i % 5).unwrap();
                observations.push(env.step(&action).unwrap().observation);
            }
            observations
        };
        assert_eq!(run(), run());
    }
}
