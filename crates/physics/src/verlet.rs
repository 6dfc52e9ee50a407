//! # Position-Verlet Particles
//!
//! A [`VerletParticle`] keeps its current and previous position rather than
//! an integrated velocity. Velocity is reconstructed from the position pair
//! with a central difference each step, which keeps repeated force
//! application stable and makes position corrections (boundary clamps,
//! collision separation) a single assignment.

use glam::DVec2;

use crate::error::PhysicsError;

/// A point mass integrated with the position-Verlet scheme.
///
/// The time step is fixed at construction and must match the step interval
/// of the environment that owns the particle.
#[derive(Clone, Debug, PartialEq)]
pub struct VerletParticle {
    current_position: DVec2,
    previous_position: DVec2,
    mass: f64,
    force: DVec2,
    impulse: DVec2,
    velocity: DVec2,
    acceleration: DVec2,
    dt: f64,
}

impl VerletParticle {
    /// Creates a particle at rest.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidMass`] or
    /// [`PhysicsError::InvalidTimeStep`] when either value is not a positive,
    /// finite number.
    pub fn new(position: DVec2, mass: f64, dt: f64) -> Result<Self, PhysicsError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(PhysicsError::InvalidMass(mass));
        }
        if !(dt.is_finite() && dt > 0.0) {
            return Err(PhysicsError::InvalidTimeStep(dt));
        }
        Ok(Self {
            current_position: position,
            previous_position: position,
            mass,
            force: DVec2::ZERO,
            impulse: DVec2::ZERO,
            velocity: DVec2::ZERO,
            acceleration: DVec2::ZERO,
            dt,
        })
    }

    #[must_use]
    pub fn position(&self) -> DVec2 {
        self.current_position
    }

    /// Position before the most recent integration step. After a step this is
    /// the position the constraint pass left the particle at.
    #[must_use]
    pub fn previous_position(&self) -> DVec2 {
        self.previous_position
    }

    /// Velocity computed by the last [`step`](Self::step), or the value given
    /// to [`set_velocity`](Self::set_velocity) since then.
    #[must_use]
    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    #[must_use]
    pub fn acceleration(&self) -> DVec2 {
        self.acceleration
    }

    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[must_use]
    pub fn time_step(&self) -> f64 {
        self.dt
    }

    /// Adds a force for the next step. Forces are cleared after every step.
    pub fn apply_force(&mut self, force: DVec2) {
        self.force += force;
    }

    /// Adds an impulse for the next step. It is divided by the time step when
    /// integrated, so one application yields one step's worth of velocity
    /// change.
    pub fn apply_impulse(&mut self, impulse: DVec2) {
        self.impulse += impulse;
    }

    /// Moves the particle without touching its previous position.
    ///
    /// This changes the velocity the next step reconstructs. Follow with
    /// [`set_velocity`](Self::set_velocity) to keep the true velocity.
    pub fn slide_to_position(&mut self, position: DVec2) {
        self.current_position = position;
    }

    /// Sets the velocity by rewriting the previous position.
    pub fn set_velocity(&mut self, velocity: DVec2) {
        self.previous_position = self.current_position - velocity * self.dt;
        self.velocity = velocity;
    }

    /// Advances the particle one time step.
    pub fn step(&mut self) {
        let total_force = self.force + self.impulse / self.dt;
        let acceleration = total_force / self.mass;
        let next_position = self.current_position * 2.0 - self.previous_position
            + acceleration * (self.dt * self.dt);

        // central difference across the old and new positions
        self.velocity = (next_position - self.previous_position) * (0.5 / self.dt);
        self.acceleration = acceleration;
        self.previous_position = self.current_position;
        self.current_position = next_position;
        self.force = DVec2::ZERO;
        self.impulse = DVec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    fn assert_close(a: DVec2, b: DVec2) {
        assert!((a - b).length() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn rejects_non_positive_mass_and_time_step() {
        assert_eq!(
            VerletParticle::new(DVec2::ZERO, 0.0, DT),
            Err(PhysicsError::InvalidMass(0.0))
        );
        assert_eq!(
            VerletParticle::new(DVec2::ZERO, 1.0, -DT),
            Err(PhysicsError::InvalidTimeStep(-DT))
        );
        assert!(VerletParticle::new(DVec2::ZERO, f64::NAN, DT).is_err());
    }

    #[test]
    fn moves_at_constant_velocity_without_forces() {
        let mut p = VerletParticle::new(DVec2::new(1.0, -2.0), 2.0, DT).unwrap();
        let v = DVec2::new(3.0, 0.5);
        p.set_velocity(v);
        let start = p.position();
        for i in 1..=240 {
            p.step();
            assert_close(p.velocity(), v);
            assert_close(p.position(), start + v * (f64::from(i) * DT));
        }
    }

    #[test]
    fn set_velocity_is_read_back_before_stepping() {
        let mut p = VerletParticle::new(DVec2::ZERO, 1.0, DT).unwrap();
        p.apply_force(DVec2::new(5.0, 5.0));
        p.step();
        p.set_velocity(DVec2::new(-4.0, 2.0));
        assert_eq!(p.velocity(), DVec2::new(-4.0, 2.0));
    }

    #[test]
    fn constant_force_accelerates_uniformly() {
        let mut p = VerletParticle::new(DVec2::ZERO, 2.0, DT).unwrap();
        for _ in 0..10 {
            p.apply_force(DVec2::new(4.0, 0.0));
            p.step();
            assert_close(p.acceleration(), DVec2::new(2.0, 0.0));
        }
        // the first step starts from rest, so the central difference lags half a step
        assert_close(p.velocity(), DVec2::new(2.0 * (9.5 * DT), 0.0));
    }

    #[test]
    fn impulse_is_spread_over_one_step() {
        let mut p = VerletParticle::new(DVec2::ZERO, 2.0, DT).unwrap();
        p.apply_impulse(DVec2::new(0.0, 3.0));
        p.step();
        assert_close(p.acceleration(), DVec2::new(0.0, 3.0 / DT / 2.0));
        p.step();
        assert_close(p.velocity(), DVec2::new(0.0, 1.5));
        assert_eq!(p.acceleration(), DVec2::ZERO);
    }

    #[test]
    fn sliding_changes_reconstructed_velocity() {
        let mut p = VerletParticle::new(DVec2::ZERO, 1.0, DT).unwrap();
        p.slide_to_position(DVec2::new(1.0, 0.0));
        p.step();
        assert!(p.velocity().x > 0.0);

        let mut q = VerletParticle::new(DVec2::ZERO, 1.0, DT).unwrap();
        q.slide_to_position(DVec2::new(1.0, 0.0));
        q.set_velocity(DVec2::ZERO);
        q.step();
        assert_eq!(q.velocity(), DVec2::ZERO);
        assert_eq!(q.position(), DVec2::new(1.0, 0.0));
    }
}
