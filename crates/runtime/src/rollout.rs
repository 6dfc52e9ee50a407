//! Episode loop shared by every environment.

use clap::ValueEnum;
use envs::{Env, EnvError};

/// How actions are chosen during a rollout.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    /// All-zero action every step
    Zero,
    /// Each component uniform in [-1, 1]
    Random,
    /// Uniform over the environment's discrete actions
    Categorical,
}

impl Policy {
    pub fn act<E: Env + ?Sized>(self, env: &E, rng: &mut fastrand::Rng) -> Result<Vec<f64>, EnvError> {
        match self {
            Self::Zero => Ok(vec![0.0; env.action_len()]),
            Self::Random => Ok((0..env.action_len()).map(|_| rng.f64() * 2.0 - 1.0).collect()),
            Self::Categorical => {
                let count = env.num_categorical_actions()?;
                env.categorical_action(rng.usize(..count))
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeStats {
    pub steps: usize,
    pub total_reward: f64,
    /// Ended by the environment rather than by the step limit
    pub terminated: bool,
}

/// Resets `env` and steps it until it terminates or `max_steps` is reached.
pub fn run_episode<E: Env + ?Sized>(
    env: &mut E,
    policy: Policy,
    rng: &mut fastrand::Rng,
    max_steps: usize,
) -> Result<EpisodeStats, EnvError> {
    env.reset();
    let mut stats = EpisodeStats {
        steps: 0,
        total_reward: 0.0,
        terminated: false,
    };
    while stats.steps < max_steps {
        let action = policy.act(env, rng)?;
        let step = env.step(&action)?;
        stats.steps += 1;
        stats.total_reward += step.reward;
        if step.terminated {
            stats.terminated = true;
            break;
        }
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use envs::{CartPoleEnv, CartPoleSettings, EnvConfig, WalkerSettings};
    use physics::KinematicWorld;

    use super::*;

    fn cart_pole() -> CartPoleEnv {
        CartPoleEnv::new(CartPoleSettings::default(), fastrand::Rng::with_seed(0)).unwrap()
    }

    #[test]
    fn episode_stops_at_the_step_limit() {
        let mut env = EnvConfig::Walker(WalkerSettings::default())
            .build(0, || Box::new(KinematicWorld::new()))
            .unwrap();
        let stats = run_episode(&mut env, Policy::Random, &mut fastrand::Rng::with_seed(1), 25).unwrap();
        assert_eq!(stats.steps, 25);
        assert!(!stats.terminated);
    }

    #[test]
    fn episode_stops_when_terminated() {
        let mut env = cart_pole();
        let stats = run_episode(&mut env, Policy::Random, &mut fastrand::Rng::with_seed(2), 100_000).unwrap();
        assert!(stats.terminated);
        assert!(stats.steps < 100_000);
    }

    #[test]
    fn categorical_policy_picks_table_entries() {
        let env = cart_pole();
        let mut rng = fastrand::Rng::with_seed(3);
        for _ in 0..20 {
            let action = Policy::Categorical.act(&env, &mut rng).unwrap();
            assert!([[0.0], [1.0], [-1.0]].iter().any(|a| a[..] == action[..]));
        }
    }

    #[test]
    fn categorical_policy_fails_for_continuous_envs() {
        let mut env = EnvConfig::Walker(WalkerSettings {
            rock_count: 0,
            ..WalkerSettings::default()
        })
        .build(0, || Box::new(KinematicWorld::new()))
        .unwrap();
        let result = run_episode(&mut env, Policy::Categorical, &mut fastrand::Rng::with_seed(4), 10);
        assert!(matches!(result, Err(EnvError::Unsupported { .. })));
    }
}
