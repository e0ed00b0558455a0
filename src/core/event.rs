use crate::core::hits::ActivationSet;
use crate::core::particle::ParticleKind;
use crate::core::trajectory::{Termination, Trajectory};
use crate::core::vec3::Vec3;

/// Display segment from a track point to an activated sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightBeam {
    /// Sensor the beam ends on.
    pub sensor_id: u32,
    /// Track point nearest the sensor.
    pub from: Vec3,
    /// Sensor position.
    pub to: Vec3,
    /// `intensity * 0.5`, so always in [0, 0.5].
    pub opacity: f64,
}

/// Everything one event produced. Owned by the caller; the next event builds a new one.
///
/// `beams.len() == hits.len()` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct EventState {
    pub kind: ParticleKind,
    pub trajectory: Trajectory,
    pub hits: ActivationSet,
    pub beams: Vec<LightBeam>,
}

impl EventState {
    /// Primary track points.
    #[inline]
    pub fn track(&self) -> &[Vec3] {
        &self.trajectory.primary.points
    }

    /// Secondary track points, one list per secondary.
    pub fn secondaries(&self) -> Vec<&[Vec3]> {
        self.trajectory
            .secondaries
            .iter()
            .map(|t| t.points.as_slice())
            .collect()
    }

    #[inline]
    pub fn termination(&self) -> Termination {
        self.trajectory.primary.termination
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.hits.len()
    }

    /// Share of `total_sensors` that fired; 0 for an empty detector.
    pub fn hit_fraction(&self, total_sensors: usize) -> f64 {
        if total_sensors == 0 {
            return 0.0;
        }
        self.hits.len() as f64 / total_sensors as f64
    }
}
