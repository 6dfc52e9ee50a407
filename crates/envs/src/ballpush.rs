//! Ball-push.
//!
//! An agent particle must shove a ball particle into a target circle at the
//! centre of a circular arena. Both are [`VerletParticle`]s with linear drag;
//! the arena wall and the agent/ball contact are resolved at the position
//! level each step before integration.
//!
//! Rewards are shaped: a one-shot bonus for the first touch and for first
//! getting the ball into the target, a continuous term for ball motion
//! towards the centre, and (until the first touch) a continuous term for
//! agent motion towards the ball. The episode never terminates on its own.

use std::f64::consts::TAU;

use glam::DVec2;
use physics::{contain_in_circle, detect_circle_circle, VerletParticle};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::env::{Env, Info, ResetResult, StepResult};
use crate::error::EnvError;
use crate::scene::{Color, Scene};
use crate::util::{categorical_from_table, require_positive, validate_action};

/// Both particles start within this fraction of the boundary radius.
const SPAWN_FRACTION: f64 = 0.75;

const PARTICLE_MASS: f64 = 1.0;

const CATEGORICAL_ACTIONS: [&[f64]; 5] = [&[1.0, 0.0], &[-1.0, 0.0], &[0.0, 1.0], &[0.0, -1.0], &[0.0, 0.0]];

/// Configuration for the ball-push environment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallPushSettings {
    pub ball_radius: f64,
    pub agent_radius: f64,
    /// Control force on the agent at full action
    pub agent_acceleration: f64,
    /// Linear drag coefficient of the agent
    pub agent_drag: f64,
    /// Linear drag coefficient of the ball
    pub ball_drag: f64,
    /// Radius of the arena, centred on the origin
    pub boundary_radius: f64,
    /// Weight of agent motion towards the ball before the first touch
    pub move_to_ball_reward: f64,
    /// One-shot bonus for the first touch
    pub touch_ball_reward: f64,
    /// Weight of ball motion towards the centre
    pub move_to_center_reward: f64,
    /// One-shot bonus for first placing the ball in the target
    pub place_in_center_reward: f64,
    /// Radius of the target circle
    pub target_radius: f64,
    /// Canvas pixels per world unit
    pub scale: f64,
    /// Seconds per step
    pub time_step: f64,
}

impl Default for BallPushSettings {
    fn default() -> Self {
        Self {
            ball_radius: 2.0,
            agent_radius: 1.0,
            agent_acceleration: 20.0,
            agent_drag: 1.5,
            ball_drag: 0.75,
            boundary_radius: 50.0,
            move_to_ball_reward: 0.5,
            touch_ball_reward: 1.0,
            move_to_center_reward: 1.0,
            place_in_center_reward: 2.0,
            target_radius: 3.0,
            scale: 10.0,
            time_step: 1.0 / 60.0,
        }
    }
}

impl BallPushSettings {
    /// Terminal speed of the agent under full control against drag.
    #[must_use]
    pub fn agent_max_speed(&self) -> f64 {
        self.agent_acceleration / self.agent_drag
    }

    /// # Errors
    ///
    /// [`EnvError::InvalidSettings`] for non-positive radii, drag, scale or
    /// time step, or particles too large for the arena.
    pub fn validate(&self) -> Result<(), EnvError> {
        require_positive("ball_radius", self.ball_radius)?;
        require_positive("agent_radius", self.agent_radius)?;
        require_positive("agent_acceleration", self.agent_acceleration)?;
        require_positive("agent_drag", self.agent_drag)?;
        require_positive("ball_drag", self.ball_drag)?;
        require_positive("boundary_radius", self.boundary_radius)?;
        require_positive("scale", self.scale)?;
        require_positive("time_step", self.time_step)?;
        if self.agent_radius.max(self.ball_radius) >= self.boundary_radius {
            return Err(EnvError::InvalidSettings(
                "agent and ball must be smaller than the boundary".to_owned(),
            ));
        }
        Ok(())
    }
}

pub struct BallPushEnv {
    agent: VerletParticle,
    ball: VerletParticle,
    /// The agent has touched the ball this episode
    has_touched_ball: bool,
    /// The ball has been inside the target this episode
    has_centered_ball: bool,
    settings: BallPushSettings,
    rng: fastrand::Rng,
}

impl BallPushEnv {
    /// Creates the environment and draws its first starting state.
    ///
    /// # Errors
    ///
    /// Propagates [`BallPushSettings::validate`] failures.
    pub fn new(settings: BallPushSettings, rng: fastrand::Rng) -> Result<Self, EnvError> {
        settings.validate()?;
        let mut env = Self {
            agent: VerletParticle::new(DVec2::ZERO, PARTICLE_MASS, settings.time_step)?,
            ball: VerletParticle::new(DVec2::ZERO, PARTICLE_MASS, settings.time_step)?,
            has_touched_ball: false,
            has_centered_ball: false,
            settings,
            rng,
        };
        env.reset();
        Ok(env)
    }

    #[must_use]
    pub fn settings(&self) -> &BallPushSettings {
        &self.settings
    }

    #[must_use]
    pub fn agent(&self) -> &VerletParticle {
        &self.agent
    }

    #[must_use]
    pub fn ball(&self) -> &VerletParticle {
        &self.ball
    }

    #[must_use]
    pub fn has_touched_ball(&self) -> bool {
        self.has_touched_ball
    }

    #[must_use]
    pub fn has_centered_ball(&self) -> bool {
        self.has_centered_ball
    }

    /// Moves the agent to `position` moving at `velocity`, as a reset would.
    /// Episode flags are untouched.
    pub fn place_agent(&mut self, position: DVec2, velocity: DVec2) {
        self.agent.slide_to_position(position);
        self.agent.set_velocity(velocity);
    }

    /// Moves the ball to `position` moving at `velocity`, as a reset would.
    pub fn place_ball(&mut self, position: DVec2, velocity: DVec2) {
        self.ball.slide_to_position(position);
        self.ball.set_velocity(velocity);
    }

    #[must_use]
    pub fn ball_in_center(&self) -> bool {
        self.ball.position().length() < self.settings.target_radius - self.settings.ball_radius
    }

    fn spawn_point(&mut self) -> DVec2 {
        let radius = self.rng.f64() * self.settings.boundary_radius * SPAWN_FRACTION;
        DVec2::from_angle(self.rng.f64() * TAU) * radius
    }

    fn observation(&self) -> Vec<f64> {
        let s = &self.settings;
        let agent = self.agent.position() / s.boundary_radius;
        let offset = (self.ball.position() - self.agent.position()) / (2.0 * s.boundary_radius);
        let agent_velocity = self.agent.velocity() / s.agent_max_speed();
        let ball_velocity = self.ball.velocity() / s.agent_max_speed();
        vec![
            agent.x,
            agent.y,
            offset.x,
            offset.y,
            agent_velocity.x,
            agent_velocity.y,
            ball_velocity.x,
            ball_velocity.y,
        ]
    }

    fn info(&self, just_touched: bool, just_centered: bool) -> Info {
        Info::from([
            ("ball_distance".to_owned(), json!(self.ball.position().length())),
            ("has_touched_ball".to_owned(), json!(self.has_touched_ball)),
            ("has_centered_ball".to_owned(), json!(self.has_centered_ball)),
            ("just_touched_ball".to_owned(), json!(just_touched)),
            ("just_centered_ball".to_owned(), json!(just_centered)),
        ])
    }

    /// Wall and contact pass. Returns whether the agent and ball overlapped.
    fn resolve_constraints(&mut self) -> bool {
        let s = &self.settings;
        if let Some(p) = contain_in_circle(self.agent.position(), s.agent_radius, s.boundary_radius) {
            self.agent.slide_to_position(p);
        }

        let contact = detect_circle_circle(
            self.agent.position(),
            s.agent_radius,
            self.ball.position(),
            s.ball_radius,
        );
        if let Some(contact) = contact {
            let correction = contact.half_correction();
            self.agent.slide_to_position(self.agent.position() + correction);
            self.ball.slide_to_position(self.ball.position() - correction);
        }

        if let Some(p) = contain_in_circle(self.ball.position(), s.ball_radius, s.boundary_radius) {
            self.ball.slide_to_position(p);
        }
        contact.is_some()
    }
}

impl Env for BallPushEnv {
    fn name(&self) -> &'static str {
        "BallPush"
    }

    fn action_len(&self) -> usize {
        2
    }

    fn observation_len(&self) -> usize {
        8
    }

    fn num_categorical_actions(&self) -> Result<usize, EnvError> {
        Ok(CATEGORICAL_ACTIONS.len())
    }

    /// `0..4` push along +x, -x, +y, -y; `4` coasts.
    fn categorical_action(&self, index: usize) -> Result<Vec<f64>, EnvError> {
        categorical_from_table(&CATEGORICAL_ACTIONS, index)
    }

    fn reset(&mut self) -> ResetResult {
        let agent = self.spawn_point();
        self.place_agent(agent, DVec2::ZERO);
        let ball = self.spawn_point();
        self.place_ball(ball, DVec2::ZERO);

        self.has_touched_ball = false;
        self.has_centered_ball = false;
        tracing::debug!(?agent, ?ball, "ball-push reset");

        ResetResult {
            observation: self.observation(),
            info: self.info(false, false),
        }
    }

    /// Action is `[x, y]` control, normalized when longer than 1.
    ///
    /// Observation is `[agent_x, agent_y, ball_dx, ball_dy, agent_vx,
    /// agent_vy, ball_vx, ball_vy]`: agent position over the boundary radius,
    /// ball offset from the agent over the arena diameter, and velocities
    /// over the agent's terminal speed.
    fn step(&mut self, action: &[f64]) -> Result<StepResult, EnvError> {
        validate_action(action, self.action_len())?;

        // diagonal control is no faster than axis-aligned control
        let mut control = DVec2::new(action[0], action[1]);
        if control.length() > 1.0 {
            control = control.normalize();
        }

        let s = &self.settings;
        let agent_drag = self.agent.velocity() * s.agent_drag;
        self.agent.apply_force(control * s.agent_acceleration - agent_drag);
        let ball_drag = self.ball.velocity() * s.ball_drag;
        self.ball.apply_force(-ball_drag);

        let touching = self.resolve_constraints();
        let just_touched = touching && !self.has_touched_ball;
        if just_touched {
            self.has_touched_ball = true;
            tracing::trace!("agent touched the ball");
        }

        let just_centered = self.ball_in_center() && !self.has_centered_ball;
        if just_centered {
            self.has_centered_ball = true;
            tracing::trace!("ball reached the target");
        }

        self.agent.step();
        self.ball.step();

        let s = &self.settings;
        let mut reward = 0.0;
        if just_touched {
            reward += s.touch_ball_reward;
        }
        if just_centered {
            reward += s.place_in_center_reward;
        }

        // crossing from the boundary to the centre sums to exactly 1
        let toward_center = -self.ball.position().normalize_or_zero();
        let ball_speed_to_center = self.ball.velocity().dot(toward_center);
        reward += s.move_to_center_reward * ball_speed_to_center * s.time_step / s.boundary_radius;

        if !self.has_touched_ball {
            let toward_ball = (self.ball.position() - self.agent.position()).normalize_or_zero();
            let agent_speed_to_ball = self.agent.velocity().dot(toward_ball);
            reward += s.move_to_ball_reward * agent_speed_to_ball * s.time_step / (2.0 * s.boundary_radius);
        }

        Ok(StepResult {
            observation: self.observation(),
            reward,
            terminated: false,
            info: self.info(just_touched, just_centered),
        })
    }

    fn render_size(&self) -> (f64, f64) {
        let side = self.settings.boundary_radius * 2.0 * self.settings.scale;
        (side, side)
    }

    fn scene(&self) -> Scene {
        let s = &self.settings;
        let size = self.render_size();
        let center = DVec2::new(size.0, size.1) * 0.5;
        let to_canvas = |p: DVec2| center + p * s.scale;
        let mut scene = Scene::new(size, Color::BLACK);

        scene.circle(center, s.boundary_radius * s.scale, Color::rgb(0.1, 0.1, 0.1));
        scene.ring(center, s.boundary_radius * s.scale, 3.0, Color::rgb(0.4, 0.4, 0.4));

        let target = if self.ball_in_center() {
            Color::rgb(0.0, 0.9, 0.0)
        } else {
            Color::rgb(0.0, 0.2, 0.8)
        };
        scene.ring(center, s.target_radius * s.scale, 3.0, target);
        scene.circle(to_canvas(self.ball.position()), s.ball_radius * s.scale, Color::rgb(0.0, 0.2, 0.8));
        scene.circle(to_canvas(self.agent.position()), s.agent_radius * s.scale, Color::rgb(0.8, 0.2, 0.0));
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> BallPushEnv {
        BallPushEnv::new(BallPushSettings::default(), fastrand::Rng::with_seed(11)).unwrap()
    }

    #[test]
    fn reset_spawns_inside_three_quarters_of_the_arena() {
        let mut env = env();
        for _ in 0..500 {
            env.has_touched_ball = true;
            env.has_centered_ball = true;
            let reset = env.reset();
            assert!(env.agent.position().length() <= 37.5);
            assert!(env.ball.position().length() <= 37.5);
            assert_eq!(env.agent.velocity(), DVec2::ZERO);
            assert!(!env.has_touched_ball && !env.has_centered_ball);
            assert_eq!(reset.observation.len(), 8);
        }
    }

    #[test]
    fn placed_particles_keep_the_environment_time_step() {
        let mut env = BallPushEnv::new(
            BallPushSettings {
                time_step: 0.01,
                ..BallPushSettings::default()
            },
            fastrand::Rng::with_seed(4),
        )
        .unwrap();
        env.place_agent(DVec2::new(3.0, 4.0), DVec2::new(-2.0, 1.0));
        assert_eq!(env.agent().position(), DVec2::new(3.0, 4.0));
        assert_eq!(env.agent().velocity(), DVec2::new(-2.0, 1.0));
        assert_eq!(env.agent().time_step(), 0.01);
        assert!((env.agent().previous_position() - DVec2::new(3.02, 3.99)).length() < 1e-12);
    }

    #[test]
    fn diagonal_action_is_normalized() {
        let mut env = env();
        env.place_agent(DVec2::new(-20.0, 0.0), DVec2::ZERO);
        env.place_ball(DVec2::new(20.0, 0.0), DVec2::ZERO);
        env.step(&[1.0, 1.0]).unwrap();
        let a = env.agent.acceleration();
        assert!((a.length() - 20.0).abs() < 1e-9);
        assert!((a.x - a.y).abs() < 1e-9);
    }

    #[test]
    fn overlap_is_split_and_flags_touch() {
        let mut env = env();
        env.place_agent(DVec2::new(0.0, 10.0), DVec2::ZERO);
        env.place_ball(DVec2::new(2.0, 10.0), DVec2::ZERO);
        let step = env.step(&[0.0, 0.0]).unwrap();
        assert!(env.has_touched_ball);
        assert_eq!(step.info["just_touched_ball"], json!(true));
        // half of the unit penetration each way, then one step of the induced motion
        assert!((env.agent.previous_position() - DVec2::new(-0.5, 10.0)).length() < 1e-12);
        assert!((env.ball.previous_position() - DVec2::new(2.5, 10.0)).length() < 1e-12);
        // touch bonus less the ball being shoved away from the centre
        assert!(step.reward > 0.99 && step.reward < 1.0);
    }

    #[test]
    fn agent_is_held_inside_the_wall() {
        let mut env = env();
        env.place_agent(DVec2::new(60.0, 0.0), DVec2::ZERO);
        env.place_ball(DVec2::new(-20.0, 0.0), DVec2::ZERO);
        env.step(&[1.0, 0.0]).unwrap();
        assert!((env.agent.previous_position() - DVec2::new(49.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn ball_at_the_origin_has_finite_reward() {
        let mut env = env();
        env.place_ball(DVec2::ZERO, DVec2::ZERO);
        env.place_agent(DVec2::ZERO, DVec2::ZERO);
        let step = env.step(&[0.0, 0.0]).unwrap();
        assert!(step.reward.is_finite());
        assert!(step.observation.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn render_size_scales_the_arena() {
        let env = env();
        assert_eq!(env.render_size(), (1000.0, 1000.0));
        assert_eq!(env.scene().shapes.len(), 5);
    }
}
