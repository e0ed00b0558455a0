//! Stylized water Cherenkov detector events.
//!
//! Builds a cylindrical detector's sensor layout once, then for each requested
//! particle generates a track, decides which sensors fire and links them to the
//! track with light beams. Rendering is left to the caller.

pub mod config;
pub mod core;
pub mod error;

#[cfg(feature = "python")]
mod python;

pub use crate::config::{BeamOrigin, DetectorConfig};
pub use crate::core::{build_detector, EventState, ParticleKind, Simulation};
pub use crate::error::{Error, Result};
