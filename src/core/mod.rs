//! Detector event core: sensor layout, particle tracks, sensor hits and light beams.
//!
//! Each event runs `trajectory` -> `hits` -> `beams` over the sensor set built once
//! by `geometry`, driven by [`Simulation`].

pub mod beams;
pub mod event;
pub mod geometry;
pub mod hits;
pub mod particle;
pub mod sim;
pub mod trajectory;
pub mod vec3;

pub use event::{EventState, LightBeam};
pub use geometry::{build_detector, DetectorGeometry, Sensor, Surface};
pub use hits::ActivationSet;
pub use particle::ParticleKind;
pub use sim::Simulation;
pub use trajectory::{Termination, Track, Trajectory};
pub use vec3::Vec3;
