//! Kinematic reference world.
//!
//! [`KinematicWorld`] implements [`RigidBodyWorld`] without a solver: bodies
//! move with whatever velocity was set on them, joint motors reach their
//! target speed instantly and joint angles stop at their limits. There is no
//! gravity and no contact. It stands in for a real engine in tests and in the
//! headless runtime.

use glam::DVec2;

use crate::error::PhysicsError;
use crate::world::{BodyHandle, BodyKind, BoxDef, JointHandle, RevoluteJointDef, RigidBodyWorld};

#[derive(Clone, Debug)]
struct KinematicBody {
    def: BoxDef,
    position: DVec2,
    angle: f64,
    linear_velocity: DVec2,
    angular_velocity: f64,
    awake: bool,
}

#[derive(Clone, Debug)]
struct KinematicJoint {
    def: RevoluteJointDef,
    angle: f64,
    speed: f64,
}

#[derive(Clone, Debug, Default)]
pub struct KinematicWorld {
    bodies: Vec<KinematicBody>,
    joints: Vec<KinematicJoint>,
    steps: u64,
}

impl KinematicWorld {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Number of completed [`RigidBodyWorld::step`] calls.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[must_use]
    pub fn joint_def(&self, joint: JointHandle) -> &RevoluteJointDef {
        &self.joints[joint.0].def
    }

    #[must_use]
    pub fn is_awake(&self, body: BodyHandle) -> bool {
        self.bodies[body.0].awake
    }

    #[must_use]
    pub fn angular_velocity(&self, body: BodyHandle) -> f64 {
        self.bodies[body.0].angular_velocity
    }

    /// Overrides a joint angle, for placing a body in a known pose.
    pub fn set_joint_angle(&mut self, joint: JointHandle, angle: f64) {
        self.joints[joint.0].angle = angle;
    }
}

impl RigidBodyWorld for KinematicWorld {
    fn create_box(&mut self, def: &BoxDef) -> BodyHandle {
        self.bodies.push(KinematicBody {
            def: def.clone(),
            position: DVec2::ZERO,
            angle: 0.0,
            linear_velocity: DVec2::ZERO,
            angular_velocity: 0.0,
            awake: true,
        });
        BodyHandle(self.bodies.len() - 1)
    }

    fn create_revolute_joint(&mut self, def: &RevoluteJointDef) -> Result<JointHandle, PhysicsError> {
        for body in [def.body_a, def.body_b] {
            if body.0 >= self.bodies.len() {
                return Err(PhysicsError::UnknownBody(body));
            }
        }
        self.joints.push(KinematicJoint {
            def: def.clone(),
            angle: 0.0,
            speed: 0.0,
        });
        tracing::trace!(joint = self.joints.len() - 1, "created revolute joint");
        Ok(JointHandle(self.joints.len() - 1))
    }

    /// Also relaxes every joint attached to `body`: a placed body carries
    /// no memory of the pose its joints were in.
    fn set_transform(&mut self, body: BodyHandle, position: DVec2, angle: f64) {
        let placed = &mut self.bodies[body.0];
        placed.position = position;
        placed.angle = angle;
        for joint in &mut self.joints {
            if joint.def.body_a == body || joint.def.body_b == body {
                joint.angle = 0.0;
                joint.speed = 0.0;
            }
        }
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: DVec2) {
        self.bodies[body.0].linear_velocity = velocity;
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: f64) {
        self.bodies[body.0].angular_velocity = velocity;
    }

    fn set_awake(&mut self, body: BodyHandle, awake: bool) {
        self.bodies[body.0].awake = awake;
    }

    fn position(&self, body: BodyHandle) -> DVec2 {
        self.bodies[body.0].position
    }

    fn angle(&self, body: BodyHandle) -> f64 {
        self.bodies[body.0].angle
    }

    fn linear_velocity(&self, body: BodyHandle) -> DVec2 {
        self.bodies[body.0].linear_velocity
    }

    fn set_motor_speed(&mut self, joint: JointHandle, speed: f64) {
        self.joints[joint.0].def.motor_speed = speed;
    }

    fn joint_angle(&self, joint: JointHandle) -> f64 {
        self.joints[joint.0].angle
    }

    fn joint_speed(&self, joint: JointHandle) -> f64 {
        self.joints[joint.0].speed
    }

    fn step(&mut self, dt: f64, _velocity_iterations: u32, _position_iterations: u32) {
        for joint in &mut self.joints {
            let target = if joint.def.enable_motor { joint.def.motor_speed } else { 0.0 };
            let mut angle = joint.angle + target * dt;
            if joint.def.enable_limit {
                angle = angle.clamp(joint.def.lower_angle, joint.def.upper_angle);
            }
            joint.speed = (angle - joint.angle) / dt;
            joint.angle = angle;
        }
        for body in &mut self.bodies {
            if body.def.kind == BodyKind::Dynamic && body.awake {
                body.position += body.linear_velocity * dt;
                body.angle += body.angular_velocity * dt;
            }
        }
        self.steps += 1;
    }
}
