//! Biped walker.
//!
//! A torso with two two-segment legs, hinged at the hips and knees by
//! motorised revolute joints, on a floor scattered with rocks. The rigid-body
//! simulation is delegated to a [`RigidBodyWorld`]; this module only builds
//! the body, maps actions onto motor speeds and reads joint state back.

use std::f64::consts::PI;

use glam::DVec2;
use physics::{BodyHandle, BodyKind, BoxDef, JointHandle, RevoluteJointDef, RigidBodyWorld};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::env::{Env, Info, ResetResult, StepResult};
use crate::error::EnvError;
use crate::scene::{Color, Scene};
use crate::util::{require_positive, validate_action};

/// Torso position after a reset.
const SPAWN_POSITION: DVec2 = DVec2::new(0.0, 4.0);

const FLOOR_SIZE: DVec2 = DVec2::new(100.0, 1.0);
const FLOOR_CENTER: DVec2 = DVec2::new(45.0, 0.0);

/// Canvas pixels per metre.
const PIXELS_PER_METER: f64 = 25.0;
/// Canvas point the camera keeps the torso on.
const CAMERA_ANCHOR: DVec2 = DVec2::new(400.0, 200.0);

/// Configuration for the walker environment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerSettings {
    pub limb_length: f64,
    pub limb_width: f64,
    pub body_length: f64,
    pub body_height: f64,

    /// Symmetric limit of every joint (radians)
    pub joint_max_angle: f64,
    /// Motor speed at full action (rad/s)
    pub joint_max_velocity: f64,
    pub joint_max_torque: f64,

    /// End the episode when the torso drops below `fall_height`
    pub stop_on_fall: bool,
    pub fall_height: f64,

    pub density: f64,
    pub friction: f64,
    /// Number of static rocks scattered along the floor
    pub rock_count: usize,

    pub time_step: f64,
    pub velocity_iterations: u32,
    pub position_iterations: u32,
}

impl Default for WalkerSettings {
    fn default() -> Self {
        Self {
            limb_length: 1.0,
            limb_width: 0.15,
            body_length: 2.0,
            body_height: 0.25,

            joint_max_angle: PI / 1.5,
            joint_max_velocity: 5.0,
            joint_max_torque: 15.0,

            stop_on_fall: false,
            fall_height: 1.2,

            density: 1.0,
            friction: 0.3,
            rock_count: 90,

            time_step: 1.0 / 60.0,
            velocity_iterations: 6,
            position_iterations: 2,
        }
    }
}

impl WalkerSettings {
    /// # Errors
    ///
    /// [`EnvError::InvalidSettings`] for non-positive dimensions, joint
    /// limits or time step.
    pub fn validate(&self) -> Result<(), EnvError> {
        require_positive("limb_length", self.limb_length)?;
        require_positive("limb_width", self.limb_width)?;
        require_positive("body_length", self.body_length)?;
        require_positive("body_height", self.body_height)?;
        require_positive("joint_max_angle", self.joint_max_angle)?;
        require_positive("joint_max_velocity", self.joint_max_velocity)?;
        require_positive("joint_max_torque", self.joint_max_torque)?;
        require_positive("time_step", self.time_step)?;
        Ok(())
    }
}

/// A box body together with what is needed to draw it.
#[derive(Copy, Clone, Debug)]
struct Part {
    body: BodyHandle,
    size: DVec2,
    color: Color,
}

/// Handles into the world for the walker's body.
#[derive(Copy, Clone, Debug)]
pub struct Skeleton {
    pub torso: BodyHandle,
    pub left_thigh: BodyHandle,
    pub left_shin: BodyHandle,
    pub right_thigh: BodyHandle,
    pub right_shin: BodyHandle,
    pub left_hip: JointHandle,
    pub right_hip: JointHandle,
    pub left_knee: JointHandle,
    pub right_knee: JointHandle,
}

impl Skeleton {
    /// Joints in action order: left hip, right hip, left knee, right knee.
    #[must_use]
    pub fn joints(&self) -> [JointHandle; 4] {
        [self.left_hip, self.right_hip, self.left_knee, self.right_knee]
    }
}

pub struct WalkerEnv<W: RigidBodyWorld = Box<dyn RigidBodyWorld>> {
    world: W,
    skeleton: Skeleton,
    parts: [Part; 5],
    terrain: Vec<Part>,
    settings: WalkerSettings,
}

impl<W: RigidBodyWorld> WalkerEnv<W> {
    /// Builds the walker, floor and rocks in `world`, drawing rock sizes and
    /// placement from `rng`.
    ///
    /// # Errors
    ///
    /// Propagates [`WalkerSettings::validate`] failures and joint creation
    /// errors from the world.
    pub fn new(settings: WalkerSettings, mut world: W, mut rng: fastrand::Rng) -> Result<Self, EnvError> {
        settings.validate()?;
        let s = &settings;

        let part = |world: &mut W, size: DVec2, color: Color| Part {
            body: world.create_box(&BoxDef {
                width: size.x,
                height: size.y,
                kind: BodyKind::Dynamic,
                density: s.density,
                friction: s.friction,
            }),
            size,
            color,
        };
        let limb = DVec2::new(s.limb_width, s.limb_length);
        let torso = part(&mut world, DVec2::new(s.body_length, s.body_height), Color::rgb(1.0, 0.647, 0.0));
        let left_thigh = part(&mut world, limb, Color::rgb(1.0, 0.0, 0.0));
        let left_shin = part(&mut world, limb, Color::rgb(1.0, 0.0, 0.0));
        let right_thigh = part(&mut world, limb, Color::rgb(0.0, 0.0, 1.0));
        let right_shin = part(&mut world, limb, Color::rgb(0.0, 0.0, 1.0));

        let hip_anchor = DVec2::new(s.body_length / 2.0, -s.body_height / 2.0);
        let limb_top = DVec2::new(0.0, s.limb_length / 2.0);
        let joint = |world: &mut W, a: BodyHandle, b: BodyHandle, anchor_a: DVec2| {
            world.create_revolute_joint(&RevoluteJointDef::limited_motor(
                a,
                b,
                anchor_a,
                limb_top,
                s.joint_max_angle,
                s.joint_max_torque,
            ))
        };
        let left_hip = joint(&mut world, torso.body, left_thigh.body, hip_anchor * DVec2::new(-1.0, 1.0))?;
        let right_hip = joint(&mut world, torso.body, right_thigh.body, hip_anchor)?;
        let left_knee = joint(&mut world, left_thigh.body, left_shin.body, -limb_top)?;
        let right_knee = joint(&mut world, right_thigh.body, right_shin.body, -limb_top)?;

        let terrain = build_terrain(&mut world, s, &mut rng);

        let mut env = Self {
            world,
            skeleton: Skeleton {
                torso: torso.body,
                left_thigh: left_thigh.body,
                left_shin: left_shin.body,
                right_thigh: right_thigh.body,
                right_shin: right_shin.body,
                left_hip,
                right_hip,
                left_knee,
                right_knee,
            },
            parts: [torso, left_thigh, left_shin, right_thigh, right_shin],
            terrain,
            settings,
        };
        env.teleport(DVec2::ZERO);
        tracing::debug!(rocks = env.terrain.len() - 1, "walker built");
        Ok(env)
    }

    #[must_use]
    pub fn settings(&self) -> &WalkerSettings {
        &self.settings
    }

    #[must_use]
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    #[must_use]
    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Places the torso at `position` with both legs hanging straight down
    /// and every body at rest.
    pub fn teleport(&mut self, position: DVec2) {
        let s = &self.settings;
        let k = &self.skeleton;
        let hip_x = s.body_length / 2.0;
        let thigh_y = -(s.body_height / 2.0 + s.limb_length / 2.0);
        let shin_y = -(s.body_height / 2.0 + s.limb_length * 1.5);

        let placements = [
            (k.torso, position),
            (k.left_thigh, position + DVec2::new(-hip_x, thigh_y)),
            (k.right_thigh, position + DVec2::new(hip_x, thigh_y)),
            (k.left_shin, position + DVec2::new(-hip_x, shin_y)),
            (k.right_shin, position + DVec2::new(hip_x, shin_y)),
        ];
        for (body, at) in placements {
            self.world.set_transform(body, at, 0.0);
            self.world.set_linear_velocity(body, DVec2::ZERO);
            self.world.set_angular_velocity(body, 0.0);
        }
        self.world.set_awake(k.torso, true);
    }

    fn set_motor_speeds(&mut self, action: &[f64]) {
        for (joint, a) in self.skeleton.joints().into_iter().zip(action) {
            self.world.set_motor_speed(joint, a * self.settings.joint_max_velocity);
        }
    }

    fn observation(&self) -> Vec<f64> {
        let s = &self.settings;
        let joints = self.skeleton.joints();
        let torso_angle = self.world.angle(self.skeleton.torso);
        joints
            .iter()
            .map(|&j| self.world.joint_angle(j) / s.joint_max_angle)
            .chain(joints.iter().map(|&j| self.world.joint_speed(j) / s.joint_max_velocity))
            .chain([torso_angle.sin(), torso_angle.cos()])
            .collect()
    }

    fn info(&self) -> Info {
        let torso = self.world.position(self.skeleton.torso);
        Info::from([
            ("torso_height".to_owned(), json!(torso.y)),
            ("distance".to_owned(), json!(torso.x)),
        ])
    }
}

fn build_terrain<W: RigidBodyWorld>(world: &mut W, s: &WalkerSettings, rng: &mut fastrand::Rng) -> Vec<Part> {
    let solid = |world: &mut W, size: DVec2, friction: f64, at: DVec2, angle: f64| {
        let body = world.create_box(&BoxDef {
            width: size.x,
            height: size.y,
            kind: BodyKind::Static,
            density: 1.0,
            friction,
        });
        world.set_transform(body, at, angle);
        Part {
            body,
            size,
            color: Color::BLACK,
        }
    };

    let mut terrain = Vec::with_capacity(s.rock_count + 1);
    terrain.push(solid(world, FLOOR_SIZE, 1.0, FLOOR_CENTER, 0.0));
    for _ in 0..s.rock_count {
        // rocks grow larger further from the start line
        let along = rng.f64();
        let x = along * 90.0 + 10.0;
        let side = (rng.f64() * 0.8 + 0.2) * along;
        let angle = rng.f64() * 6.0;
        terrain.push(solid(world, DVec2::splat(side), 0.3, DVec2::new(x, 0.5), angle));
    }
    terrain
}

impl<W: RigidBodyWorld> Env for WalkerEnv<W> {
    fn name(&self) -> &'static str {
        "Walker Environment"
    }

    fn action_len(&self) -> usize {
        4
    }

    fn observation_len(&self) -> usize {
        10
    }

    fn num_categorical_actions(&self) -> Result<usize, EnvError> {
        Err(EnvError::Unsupported {
            env: self.name(),
            capability: "categorical actions",
        })
    }

    fn categorical_action(&self, _index: usize) -> Result<Vec<f64>, EnvError> {
        Err(EnvError::Unsupported {
            env: self.name(),
            capability: "categorical actions",
        })
    }

    fn reset(&mut self) -> ResetResult {
        self.teleport(SPAWN_POSITION);
        self.set_motor_speeds(&[0.0; 4]);
        tracing::debug!("walker reset");
        ResetResult {
            observation: self.observation(),
            info: self.info(),
        }
    }

    /// Action is the target speed of `[left_hip, right_hip, left_knee,
    /// right_knee]` as a fraction of `joint_max_velocity`.
    ///
    /// Observation is the four joint angles over `joint_max_angle`, the four
    /// joint speeds over `joint_max_velocity`, then sine and cosine of the
    /// torso angle.
    fn step(&mut self, action: &[f64]) -> Result<StepResult, EnvError> {
        validate_action(action, self.action_len())?;
        self.set_motor_speeds(action);
        let s = &self.settings;
        self.world.step(s.time_step, s.velocity_iterations, s.position_iterations);

        let velocity = self.world.linear_velocity(self.skeleton.torso);
        let height = self.world.position(self.skeleton.torso).y;
        let terminated = s.stop_on_fall && height < s.fall_height;
        if terminated {
            tracing::trace!(height, "walker fell");
        }

        Ok(StepResult {
            observation: self.observation(),
            reward: velocity.x * s.time_step,
            terminated,
            info: self.info(),
        })
    }

    fn render_size(&self) -> (f64, f64) {
        (800.0, 800.0)
    }

    fn scene(&self) -> Scene {
        let camera = CAMERA_ANCHOR / PIXELS_PER_METER - self.world.position(self.skeleton.torso);
        let to_canvas = |p: DVec2| (p + camera) * PIXELS_PER_METER;
        let mut scene = Scene::new(self.render_size(), Color::rgb(0.15, 0.15, 0.15));

        scene.line(to_canvas(DVec2::ZERO), to_canvas(DVec2::new(0.0, 100.0)), 0.2 * PIXELS_PER_METER, Color::WHITE);
        for part in self.terrain.iter().chain(&self.parts) {
            scene.rect(
                to_canvas(self.world.position(part.body)),
                part.size * PIXELS_PER_METER,
                self.world.angle(part.body),
                part.color,
            );
        }
        scene
    }
}
