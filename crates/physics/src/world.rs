//! # Rigid-Body World Boundary
//!
//! The walker environment drives an external 2D rigid-body engine. It only
//! needs rectangular bodies, revolute joints with limits and motors, joint
//! readback and a fixed-step advance, so that is all [`RigidBodyWorld`]
//! exposes. Engine bindings implement the trait; the solver itself lives on
//! the other side of it.

use glam::DVec2;

use crate::error::PhysicsError;

/// Opaque handle to a body created by a [`RigidBodyWorld`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub usize);

/// Opaque handle to a joint created by a [`RigidBodyWorld`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct JointHandle(pub usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum BodyKind {
    #[default]
    Static,
    Dynamic,
}

/// A box-shaped body with a single fixture.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxDef {
    /// Full width (not half extent)
    pub width: f64,
    /// Full height (not half extent)
    pub height: f64,
    pub kind: BodyKind,
    pub density: f64,
    pub friction: f64,
}

/// Revolute joint definition. Anchors are in each body's local frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RevoluteJointDef {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub local_anchor_a: DVec2,
    pub local_anchor_b: DVec2,
    pub collide_connected: bool,
    pub enable_limit: bool,
    pub lower_angle: f64,
    pub upper_angle: f64,
    pub enable_motor: bool,
    pub motor_speed: f64,
    pub max_motor_torque: f64,
}

impl RevoluteJointDef {
    /// A motorised joint limited to `[-max_angle, max_angle]` with the motor at rest.
    #[must_use]
    pub fn limited_motor(
        body_a: BodyHandle,
        body_b: BodyHandle,
        local_anchor_a: DVec2,
        local_anchor_b: DVec2,
        max_angle: f64,
        max_torque: f64,
    ) -> Self {
        Self {
            body_a,
            body_b,
            local_anchor_a,
            local_anchor_b,
            collide_connected: false,
            enable_limit: true,
            lower_angle: -max_angle,
            upper_angle: max_angle,
            enable_motor: true,
            motor_speed: 0.0,
            max_motor_torque: max_torque,
        }
    }
}

/// The operations the walker needs from a rigid-body engine.
///
/// Handles passed in must come from the same world; implementations may
/// panic on foreign handles.
pub trait RigidBodyWorld {
    fn create_box(&mut self, def: &BoxDef) -> BodyHandle;

    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownBody`] when either body was not created
    /// by this world.
    fn create_revolute_joint(&mut self, def: &RevoluteJointDef) -> Result<JointHandle, PhysicsError>;

    fn set_transform(&mut self, body: BodyHandle, position: DVec2, angle: f64);
    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: DVec2);
    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: f64);
    fn set_awake(&mut self, body: BodyHandle, awake: bool);

    fn position(&self, body: BodyHandle) -> DVec2;
    fn angle(&self, body: BodyHandle) -> f64;
    fn linear_velocity(&self, body: BodyHandle) -> DVec2;

    fn set_motor_speed(&mut self, joint: JointHandle, speed: f64);
    fn joint_angle(&self, joint: JointHandle) -> f64;
    fn joint_speed(&self, joint: JointHandle) -> f64;

    /// Advances every body by `dt` using fixed solver iteration counts.
    fn step(&mut self, dt: f64, velocity_iterations: u32, position_iterations: u32);
}

impl<W: RigidBodyWorld + ?Sized> RigidBodyWorld for Box<W> {
    fn create_box(&mut self, def: &BoxDef) -> BodyHandle {
        (**self).create_box(def)
    }

    fn create_revolute_joint(&mut self, def: &RevoluteJointDef) -> Result<JointHandle, PhysicsError> {
        (**self).create_revolute_joint(def)
    }

    fn set_transform(&mut self, body: BodyHandle, position: DVec2, angle: f64) {
        (**self).set_transform(body, position, angle);
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: DVec2) {
        (**self).set_linear_velocity(body, velocity);
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: f64) {
        (**self).set_angular_velocity(body, velocity);
    }

    fn set_awake(&mut self, body: BodyHandle, awake: bool) {
        (**self).set_awake(body, awake);
    }

    fn position(&self, body: BodyHandle) -> DVec2 {
        (**self).position(body)
    }

    fn angle(&self, body: BodyHandle) -> f64 {
        (**self).angle(body)
    }

    fn linear_velocity(&self, body: BodyHandle) -> DVec2 {
        (**self).linear_velocity(body)
    }

    fn set_motor_speed(&mut self, joint: JointHandle, speed: f64) {
        (**self).set_motor_speed(joint, speed);
    }

    fn joint_angle(&self, joint: JointHandle) -> f64 {
        (**self).joint_angle(joint)
    }

    fn joint_speed(&self, joint: JointHandle) -> f64 {
        (**self).joint_speed(joint)
    }

    fn step(&mut self, dt: f64, velocity_iterations: u32, position_iterations: u32) {
        (**self).step(dt, velocity_iterations, position_iterations);
    }
}
