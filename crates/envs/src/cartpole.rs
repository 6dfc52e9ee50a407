//! Analytic cart-pole.
//!
//! A cart on a unit track carries a hinged pole. The cart is driven by a
//! single continuous action; the pole is pulled over by gravity and pushed
//! back by the torque the cart transfers to it. Integration is explicit
//! Euler on four scalars with hard velocity limits.

use std::f64::consts::PI;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::env::{Env, Info, ResetResult, StepResult};
use crate::error::EnvError;
use crate::scene::{Color, Scene};
use crate::util::{categorical_from_table, clamp_unit, require_positive, symmetric, validate_action};

/// Divisor applied to the pole angle in the observation. Kept as a fixed
/// constant rather than `fail_angle` or π.
const POLE_ANGLE_OBSERVATION_SCALE: f64 = 180.0;

const CATEGORICAL_ACTIONS: [&[f64]; 3] = [&[0.0], &[1.0], &[-1.0]];

/// Configuration for the cart-pole environment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartPoleSettings {
    /// Acceleration of the cart at full action
    pub acceleration: f64,
    /// Cart speed limit
    pub max_velocity: f64,
    /// Pole angular speed limit (rad/s)
    pub max_angular_velocity: f64,
    /// Gravitational acceleration acting on the pole
    pub gravity: f64,
    /// Scales the torque the cart applies to the pole
    pub torque_multiplier: f64,

    /// Seconds per step
    pub time_step: f64,
    /// Pole angle bound on reset (radians)
    pub max_initial_angle: f64,
    /// Cart offset bound on reset, at most 1
    pub max_initial_offset: f64,
    /// Pole angle past which the episode fails (radians)
    pub fail_angle: f64,

    /// Reward at the centre of the track, falling off linearly
    pub centered_reward: f64,
    /// Reward for leaving the track, should be negative
    pub out_of_bounds_reward: f64,
    /// Reward for dropping the pole, should be negative
    pub pole_fall_reward: f64,
}

impl Default for CartPoleSettings {
    fn default() -> Self {
        Self {
            acceleration: 0.5,
            max_velocity: 1.5,
            max_angular_velocity: PI * 3.0,
            gravity: 9.8,
            torque_multiplier: 4.0,

            time_step: 1.0 / 60.0,
            max_initial_angle: PI / 8.0,
            max_initial_offset: 0.8,
            fail_angle: PI / 2.0,

            centered_reward: 1.0,
            out_of_bounds_reward: -1.0,
            pole_fall_reward: -5.0,
        }
    }
}

impl CartPoleSettings {
    /// # Errors
    ///
    /// [`EnvError::InvalidSettings`] for non-positive time step, limits or
    /// fail angle, or an initial offset outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), EnvError> {
        require_positive("time_step", self.time_step)?;
        require_positive("max_velocity", self.max_velocity)?;
        require_positive("max_angular_velocity", self.max_angular_velocity)?;
        require_positive("fail_angle", self.fail_angle)?;
        if !(0.0..=1.0).contains(&self.max_initial_offset) {
            return Err(EnvError::InvalidSettings(format!(
                "max_initial_offset must be within [0, 1], got {}",
                self.max_initial_offset
            )));
        }
        Ok(())
    }
}

pub struct CartPoleEnv {
    /// Cart position, -1 to 1 on the track
    pub cart_position: f64,
    pub cart_velocity: f64,
    /// Pole angle from vertical, radians
    pub pole_angle: f64,
    pub pole_angular_velocity: f64,
    settings: CartPoleSettings,
    rng: fastrand::Rng,
}

impl CartPoleEnv {
    /// Creates the environment and draws its first starting state.
    ///
    /// # Errors
    ///
    /// Propagates [`CartPoleSettings::validate`] failures.
    pub fn new(settings: CartPoleSettings, rng: fastrand::Rng) -> Result<Self, EnvError> {
        settings.validate()?;
        let mut env = Self {
            cart_position: 0.0,
            cart_velocity: 0.0,
            pole_angle: 0.0,
            pole_angular_velocity: 0.0,
            settings,
            rng,
        };
        env.reset();
        Ok(env)
    }

    #[must_use]
    pub fn settings(&self) -> &CartPoleSettings {
        &self.settings
    }

    fn observation(&self) -> Vec<f64> {
        clamp_unit([
            self.cart_position,
            self.cart_velocity / self.settings.max_velocity,
            self.pole_angle / POLE_ANGLE_OBSERVATION_SCALE,
            self.pole_angular_velocity / self.settings.max_angular_velocity,
        ])
    }

    fn info(&self) -> Info {
        Info::from([
            ("cart_position".to_owned(), json!(self.cart_position)),
            ("pole_angle".to_owned(), json!(self.pole_angle)),
        ])
    }
}

impl Env for CartPoleEnv {
    fn name(&self) -> &'static str {
        "CartPole"
    }

    fn action_len(&self) -> usize {
        1
    }

    fn observation_len(&self) -> usize {
        4
    }

    fn num_categorical_actions(&self) -> Result<usize, EnvError> {
        Ok(CATEGORICAL_ACTIONS.len())
    }

    /// `0` holds still, `1` pushes right, `2` pushes left.
    fn categorical_action(&self, index: usize) -> Result<Vec<f64>, EnvError> {
        categorical_from_table(&CATEGORICAL_ACTIONS, index)
    }

    fn reset(&mut self) -> ResetResult {
        self.cart_position = symmetric(&mut self.rng, self.settings.max_initial_offset);
        self.cart_velocity = 0.0;
        self.pole_angle = symmetric(&mut self.rng, self.settings.max_initial_angle);
        self.pole_angular_velocity = 0.0;
        tracing::debug!(
            cart_position = self.cart_position,
            pole_angle = self.pole_angle,
            "cart-pole reset"
        );
        ResetResult {
            observation: self.observation(),
            info: self.info(),
        }
    }

    /// Action is `[push]`, negative left and positive right.
    ///
    /// Observation is `[cart_position, cart_velocity, pole_angle,
    /// pole_angular_velocity]`, each scaled and clamped to [-1, 1].
    fn step(&mut self, action: &[f64]) -> Result<StepResult, EnvError> {
        validate_action(action, self.action_len())?;
        let push = action[0];
        let s = &self.settings;

        self.cart_velocity = (self.cart_velocity + push * s.acceleration * s.time_step)
            .clamp(-s.max_velocity, s.max_velocity);
        self.cart_position += self.cart_velocity * s.time_step;

        let gravity = s.gravity * self.pole_angle.sin();
        let torque = push * self.pole_angle.cos() * s.torque_multiplier;
        self.pole_angular_velocity = (self.pole_angular_velocity + (gravity + torque) * s.time_step)
            .clamp(-s.max_angular_velocity, s.max_angular_velocity);
        self.pole_angle += self.pole_angular_velocity * s.time_step;

        let (reward, terminated) = if !(-1.0..=1.0).contains(&self.cart_position) {
            tracing::trace!(cart_position = self.cart_position, "cart left the track");
            (s.out_of_bounds_reward, true)
        } else if !(-s.fail_angle..=s.fail_angle).contains(&self.pole_angle) {
            tracing::trace!(pole_angle = self.pole_angle, "pole fell");
            (s.pole_fall_reward, true)
        } else {
            (s.centered_reward - self.cart_position.abs(), false)
        };

        Ok(StepResult {
            observation: self.observation(),
            reward,
            terminated,
            info: self.info(),
        })
    }

    fn render_size(&self) -> (f64, f64) {
        (1200.0, 800.0)
    }

    fn scene(&self) -> Scene {
        let (width, height) = self.render_size();
        let axis_y = height / 3.0;
        let mut scene = Scene::new((width, height), Color::WHITE);

        scene.line(DVec2::new(0.0, axis_y), DVec2::new(width, axis_y), 2.0, Color::BLACK);

        let cart = DVec2::new(width / 2.0 + self.cart_position * width / 2.0, axis_y);
        scene.rect(cart, DVec2::new(50.0, 35.0), 0.0, Color::BLACK);

        let tip = cart + DVec2::from_angle(self.pole_angle).rotate(DVec2::new(0.0, 200.0));
        scene.line(cart, tip, 10.0, Color::rgb(0.976, 0.682, 0.357));
        scene.circle(cart, 4.0, Color::rgb(0.243, 0.396, 0.663));
        scene
    }
}
