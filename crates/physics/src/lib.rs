#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Physics Kernels
//!
//! The small physics layer shared by the environments in the `envs` crate.
//!
//! ## Key Components
//!
//! -   **Particles:** [`VerletParticle`] in the [`verlet`] module is a
//!     position-Verlet point mass driven by accumulated forces and impulses.
//! -   **Contacts:** the [`contact`] module resolves circle/circle overlap
//!     and circle/arena containment at the position level.
//! -   **Rigid-body boundary:** [`RigidBodyWorld`] in the [`world`] module is
//!     the narrow interface an external 2D rigid-body engine must offer to
//!     host the walker. With the `mock` feature, [`KinematicWorld`] provides
//!     a solver-free implementation.
//!
//! ## Usage
//!
//! ```rust
//! use physics::{DVec2, VerletParticle};
//!
//! let mut particle = VerletParticle::new(DVec2::ZERO, 1.0, 1.0 / 60.0)?;
//! particle.apply_force(DVec2::new(10.0, 0.0));
//! particle.step();
//! assert!(particle.velocity().x > 0.0);
//! # Ok::<(), physics::PhysicsError>(())
//! ```

pub mod contact;
pub mod error;
#[cfg(feature = "mock")]
pub mod kinematic;
pub mod verlet;
pub mod world;

pub use contact::{contain_in_circle, detect_circle_circle, CircleContact};
pub use error::PhysicsError;
#[cfg(feature = "mock")]
pub use kinematic::KinematicWorld;
pub use verlet::VerletParticle;
pub use world::{BodyHandle, BodyKind, BoxDef, JointHandle, RevoluteJointDef, RigidBodyWorld};

pub use glam::DVec2;
