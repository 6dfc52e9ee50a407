//! Checks every environment against the shared step/reset contract.

use envs::{Env, EnvConfig, EnvError, EnvKind};
use physics::{KinematicWorld, RigidBodyWorld};

fn kinematic() -> Box<dyn RigidBodyWorld> {
    Box::new(KinematicWorld::new())
}

fn all_envs(seed: u64) -> anyhow::Result<Vec<EnvKind>> {
    let configs = [
        r#"{"env": "cart_pole"}"#,
        r#"{"env": "ball_push"}"#,
        r#"{"env": "walker", "rock_count": 10}"#,
    ];
    configs
        .into_iter()
        .map(|json| -> anyhow::Result<EnvKind> {
            Ok(serde_json::from_str::<EnvConfig>(json)?.build(seed, kinematic)?)
        })
        .collect()
}

#[test]
fn wrong_length_actions_are_rejected() -> anyhow::Result<()> {
    for mut env in all_envs(0)? {
        env.reset();
        let too_long = vec![0.0; env.action_len() + 1];
        assert_eq!(
            env.step(&too_long),
            Err(EnvError::ActionLength {
                expected: env.action_len(),
                actual: env.action_len() + 1,
            }),
            "{}",
            env.name()
        );
        assert!(matches!(env.step(&[]), Err(EnvError::ActionLength { actual: 0, .. })));
    }
    Ok(())
}

#[test]
fn out_of_range_actions_are_rejected() -> anyhow::Result<()> {
    for mut env in all_envs(0)? {
        env.reset();
        let mut action = vec![0.0; env.action_len()];
        let last = action.len() - 1;
        action[last] = -1.5;
        assert_eq!(
            env.step(&action),
            Err(EnvError::ActionOutOfRange { index: last, value: -1.5 }),
            "{}",
            env.name()
        );
        action[last] = f64::NAN;
        assert!(matches!(env.step(&action), Err(EnvError::ActionOutOfRange { .. })));
    }
    Ok(())
}

#[test]
fn observation_length_never_changes() -> anyhow::Result<()> {
    let mut rng = fastrand::Rng::with_seed(11);
    for mut env in all_envs(3)? {
        let expected = env.observation_len();
        assert_eq!(env.reset().observation.len(), expected);
        for _ in 0..200 {
            let action: Vec<f64> = (0..env.action_len()).map(|_| rng.f64() * 2.0 - 1.0).collect();
            let step = env.step(&action)?;
            assert_eq!(step.observation.len(), expected, "{}", env.name());
            assert!(step.reward.is_finite());
            if step.terminated {
                assert_eq!(env.reset().observation.len(), expected);
            }
        }
    }
    Ok(())
}

#[test]
fn categorical_actions_are_valid_actions() -> anyhow::Result<()> {
    for mut env in all_envs(0)? {
        let count = match env.num_categorical_actions() {
            Ok(count) => count,
            Err(EnvError::Unsupported { .. }) => {
                assert_eq!(env.name(), "Walker Environment");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        env.reset();
        for index in 0..count {
            let action = env.categorical_action(index)?;
            assert_eq!(action.len(), env.action_len());
            env.step(&action)?;
        }
        assert_eq!(
            env.categorical_action(count),
            Err(EnvError::InvalidCategoricalAction { index: count, count })
        );
    }
    Ok(())
}

#[test]
fn scenes_fit_the_render_size() -> anyhow::Result<()> {
    for mut env in all_envs(9)? {
        env.reset();
        let (width, height) = env.render_size();
        let scene = env.scene();
        assert_eq!((scene.width, scene.height), (width, height));
        assert!(!scene.shapes.is_empty());
        let json = serde_json::to_value(&scene)?;
        assert!(json["shapes"][0]["shape"].is_string(), "{}", env.name());
    }
    Ok(())
}

#[test]
fn unknown_env_tag_is_rejected() {
    let parsed = serde_json::from_str::<EnvConfig>(r#"{"env": "mountain_car"}"#);
    assert!(parsed.is_err());
}
