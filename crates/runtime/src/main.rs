#![deny(clippy::all, clippy::pedantic)]

mod rollout;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use envs::{BallPushSettings, CartPoleSettings, Env, EnvConfig, WalkerSettings};
use physics::{KinematicWorld, RigidBodyWorld};

use crate::rollout::{run_episode, Policy};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum EnvName {
    CartPole,
    BallPush,
    Walker,
}

/// Runs environment episodes headless and logs their returns.
#[derive(Parser, Debug)]
#[command(name = "runtime", version, about)]
struct Cli {
    /// Environment to run with default settings
    #[arg(long, value_enum, default_value = "cart-pole")]
    env: EnvName,

    /// JSON settings file, e.g. `{"env": "ball_push", "agent_drag": 2.0}`.
    /// Takes precedence over --env.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 5)]
    episodes: usize,

    /// Step limit per episode
    #[arg(long, default_value_t = 1000)]
    max_steps: usize,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, value_enum, default_value = "random")]
    policy: Policy,

    #[arg(long, default_value = "info")]
    log_level: tracing::Level,

    /// Write the final scene of the last episode here as JSON
    #[arg(long)]
    scene_out: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<EnvConfig> {
    let Some(path) = &cli.config else {
        return Ok(match cli.env {
            EnvName::CartPole => EnvConfig::CartPole(CartPoleSettings::default()),
            EnvName::BallPush => EnvConfig::BallPush(BallPushSettings::default()),
            EnvName::Walker => EnvConfig::Walker(WalkerSettings::default()),
        });
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_max_level(cli.log_level).init();

    let config = load_config(&cli)?;
    tracing::debug!(?config, "loaded settings");
    let mut env = config
        .build(cli.seed, || Box::new(KinematicWorld::new()) as Box<dyn RigidBodyWorld>)
        .context("building environment")?;

    // actions draw from their own stream so the environment's start states
    // do not depend on the policy
    let mut rng = fastrand::Rng::with_seed(cli.seed.wrapping_add(1));
    tracing::info!(
        env = env.name(),
        episodes = cli.episodes,
        max_steps = cli.max_steps,
        policy = ?cli.policy,
        "starting rollouts"
    );

    let mut total = 0.0;
    for episode in 0..cli.episodes {
        let stats = run_episode(&mut env, cli.policy, &mut rng, cli.max_steps)
            .with_context(|| format!("episode {episode}"))?;
        tracing::info!(
            episode,
            steps = stats.steps,
            total_reward = stats.total_reward,
            terminated = stats.terminated,
            "episode finished"
        );
        total += stats.total_reward;
    }
    if cli.episodes > 0 {
        #[allow(clippy::cast_precision_loss)]
        let mean = total / cli.episodes as f64;
        tracing::info!(mean_reward = mean, "rollouts finished");
    }

    if let Some(path) = &cli.scene_out {
        let scene = serde_json::to_string_pretty(&env.scene())?;
        std::fs::write(path, scene).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote scene");
    }
    Ok(())
}
