#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Reinforcement learning environments.
//!
//! Three environments share the [`Env`] contract:
//!
//! * [`CartPoleEnv`]: balance a pole on a cart, three discrete pushes.
//! * [`BallPushEnv`]: steer a particle to shove a ball into the arena centre.
//! * [`WalkerEnv`]: drive the four motorized joints of a 2D biped, built on
//!   top of any [`physics::RigidBodyWorld`].
//!
//! ```
//! use envs::{CartPoleEnv, CartPoleSettings, Env};
//!
//! let mut env = CartPoleEnv::new(CartPoleSettings::default(), fastrand::Rng::with_seed(7))?;
//! let start = env.reset();
//! assert_eq!(start.observation.len(), env.observation_len());
//!
//! let push = env.categorical_action(1)?;
//! let step = env.step(&push)?;
//! assert!(step.observation.iter().all(|v| (-1.0..=1.0).contains(v)));
//! # Ok::<(), envs::EnvError>(())
//! ```

pub mod ballpush;
pub mod cartpole;
pub mod env;
pub mod error;
pub mod kind;
pub mod scene;
mod util;
pub mod walker;

pub use ballpush::{BallPushEnv, BallPushSettings};
pub use cartpole::{CartPoleEnv, CartPoleSettings};
pub use env::{Env, Info, ResetResult, StepResult};
pub use error::EnvError;
pub use kind::{EnvConfig, EnvKind};
pub use scene::{Color, Scene, Shape};
pub use walker::{Skeleton, WalkerEnv, WalkerSettings};
