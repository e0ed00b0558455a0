//! Per-particle track generation.
//!
//! Electron and neutron tracks are bounded random walks from the origin; a muon
//! track is a straight chord. A captured neutron additionally spawns short
//! electron-like secondary tracks from its capture point.

use crate::core::geometry::DetectorGeometry;
use crate::core::particle::ParticleKind;
use crate::core::vec3::{add_scaled, distance, normalize, normalize_or, radial, random_unit, Vec3};
use log::debug;
use rand::Rng;
use std::ops::RangeInclusive;

/// Walks stop once they leave `RADIAL_LIMIT * radius` from the axis...
pub const RADIAL_LIMIT: f64 = 0.9;
/// ...or `AXIAL_LIMIT * height` from the mid-plane.
pub const AXIAL_LIMIT: f64 = 0.48;

pub const ELECTRON_MAX_POINTS: usize = 50;
pub const ELECTRON_SCATTER: f64 = 0.2;
pub const ELECTRON_STEP: RangeInclusive<f64> = 2.0..=3.0;

pub const MUON_POINTS: usize = 30;
/// Muon path length as a multiple of the detector radius.
pub const MUON_LENGTH_FACTOR: f64 = 1.8;

pub const NEUTRON_MAX_POINTS: usize = 40;
pub const NEUTRON_HARD_SCATTER_PROB: f64 = 0.2;
pub const NEUTRON_HARD_SCATTER: f64 = 0.4;
pub const NEUTRON_SOFT_SCATTER: f64 = 0.1;
pub const NEUTRON_STEP: RangeInclusive<f64> = 1.0..=1.5;
pub const NEUTRON_CAPTURE_DISTANCE: RangeInclusive<f64> = 10.0..=30.0;

pub const SECONDARY_COUNT: RangeInclusive<usize> = 3..=5;
pub const SECONDARY_MAX_POINTS: usize = 15;
pub const SECONDARY_STEP: RangeInclusive<f64> = 0.5..=1.0;

/// Why a track stopped growing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Used its whole point budget.
    StepLimit,
    /// The step after the last point left the fiducial region.
    Escaped,
    /// The step after the last point reached the capture distance; the last point
    /// is the capture point.
    Captured,
}

impl Termination {
    pub fn name(self) -> &'static str {
        match self {
            Termination::StepLimit => "step_limit",
            Termination::Escaped => "escaped",
            Termination::Captured => "captured",
        }
    }
}

/// Ordered positions visited by one particle.
///
/// `headings[k]` is the unit direction of travel at `points[k]`: the launch direction
/// for the first point, the direction of the step that arrived there otherwise.
///
/// Walks record only positions that passed the bounds and capture checks, so for
/// them `traveled` exceeds `path_length()` by the final unrecorded step.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub kind: ParticleKind,
    pub points: Vec<Vec3>,
    pub headings: Vec<Vec3>,
    pub termination: Termination,
    /// Distance walked, including the unrecorded terminating step.
    pub traveled: f64,
}

impl Track {
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Last position; tracks always hold at least the starting point.
    #[inline]
    pub fn end(&self) -> Option<&Vec3> {
        self.points.last()
    }

    /// Sum of segment lengths.
    pub fn path_length(&self) -> f64 {
        self.points.windows(2).map(|w| distance(&w[0], &w[1])).sum()
    }
}

/// Primary track plus any secondaries produced at its end.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub primary: Track,
    /// Electron-tagged tracks from a neutron capture; empty otherwise.
    pub secondaries: Vec<Track>,
    /// The neutron's drawn capture distance.
    pub capture_distance: Option<f64>,
}

/// Whether a walk position is still inside the fiducial cylinder.
#[inline]
pub fn in_bounds(geometry: &DetectorGeometry, p: &Vec3) -> bool {
    radial(p) <= RADIAL_LIMIT * geometry.radius() && p[1].abs() <= AXIAL_LIMIT * geometry.height()
}

/// Generate the trajectory for one event of the given particle kind.
pub fn generate<R: Rng + ?Sized>(
    kind: ParticleKind,
    geometry: &DetectorGeometry,
    rng: &mut R,
) -> Trajectory {
    let trajectory = match kind {
        ParticleKind::Electron => Trajectory {
            primary: electron_track(geometry, rng),
            secondaries: Vec::new(),
            capture_distance: None,
        },
        ParticleKind::Muon => Trajectory {
            primary: muon_track(geometry, rng),
            secondaries: Vec::new(),
            capture_distance: None,
        },
        ParticleKind::Neutron => neutron_trajectory(geometry, rng),
    };
    debug!(
        "{} track: {} points, {}, {} secondaries",
        kind,
        trajectory.primary.len(),
        trajectory.primary.termination.name(),
        trajectory.secondaries.len()
    );
    trajectory
}

/// Scattering track from the origin.
pub fn electron_track<R: Rng + ?Sized>(geometry: &DetectorGeometry, rng: &mut R) -> Track {
    let launch = random_unit(rng);
    let walk = Walk {
        max_points: ELECTRON_MAX_POINTS,
        step: ELECTRON_STEP,
        scatter: Scatter::Uniform(ELECTRON_SCATTER),
        capture_distance: None,
    };
    walk.run(ParticleKind::Electron, [0.0; 3], launch, geometry, rng)
}

/// Straight track from the origin with an upward-biased direction.
pub fn muon_track<R: Rng + ?Sized>(geometry: &DetectorGeometry, rng: &mut R) -> Track {
    let raw = [
        rng.random_range(-1.0..=1.0),
        rng.random_range(0.5..=1.0),
        rng.random_range(-1.0..=1.0),
    ];
    // y >= 0.5 keeps the draw away from zero length
    let dir = normalize_or(&raw, [0.0, 1.0, 0.0]);
    let length = geometry.radius() * MUON_LENGTH_FACTOR;
    let last = (MUON_POINTS - 1) as f64;
    let points = (0..MUON_POINTS)
        .map(|i| add_scaled(&[0.0; 3], &dir, length * i as f64 / last))
        .collect();
    Track {
        kind: ParticleKind::Muon,
        points,
        headings: vec![dir; MUON_POINTS],
        termination: Termination::StepLimit,
        traveled: length,
    }
}

/// Neutron walk with a capture budget; a capture spawns secondary electrons.
pub fn neutron_trajectory<R: Rng + ?Sized>(geometry: &DetectorGeometry, rng: &mut R) -> Trajectory {
    let capture_distance = rng.random_range(NEUTRON_CAPTURE_DISTANCE);
    let launch = random_unit(rng);
    let walk = Walk {
        max_points: NEUTRON_MAX_POINTS,
        step: NEUTRON_STEP,
        scatter: Scatter::Mixed {
            hard_prob: NEUTRON_HARD_SCATTER_PROB,
            hard: NEUTRON_HARD_SCATTER,
            soft: NEUTRON_SOFT_SCATTER,
        },
        capture_distance: Some(capture_distance),
    };
    let primary = walk.run(ParticleKind::Neutron, [0.0; 3], launch, geometry, rng);

    let secondaries = match (primary.termination, primary.end()) {
        (Termination::Captured, Some(&capture_point)) => {
            secondary_tracks(capture_point, geometry, rng)
        }
        _ => Vec::new(),
    };

    Trajectory {
        primary,
        secondaries,
        capture_distance: Some(capture_distance),
    }
}

/// 3 to 5 short electron walks starting at `origin`.
pub fn secondary_tracks<R: Rng + ?Sized>(
    origin: Vec3,
    geometry: &DetectorGeometry,
    rng: &mut R,
) -> Vec<Track> {
    let count = rng.random_range(SECONDARY_COUNT);
    let walk = Walk {
        max_points: SECONDARY_MAX_POINTS,
        step: SECONDARY_STEP,
        scatter: Scatter::Uniform(ELECTRON_SCATTER),
        capture_distance: None,
    };
    (0..count)
        .map(|_| {
            let launch = random_unit(rng);
            walk.run(ParticleKind::Electron, origin, launch, geometry, rng)
        })
        .collect()
}

/// Per-step direction perturbation.
#[derive(Debug, Clone, Copy)]
enum Scatter {
    /// Each axis perturbed uniformly in [-a, a].
    Uniform(f64),
    /// With probability `hard_prob` perturb by ±`hard`, else by ±`soft`.
    Mixed { hard_prob: f64, hard: f64, soft: f64 },
}

impl Scatter {
    fn apply<R: Rng + ?Sized>(self, dir: &Vec3, rng: &mut R) -> Vec3 {
        let amp = match self {
            Scatter::Uniform(a) => a,
            Scatter::Mixed {
                hard_prob,
                hard,
                soft,
            } => {
                if rng.random::<f64>() < hard_prob {
                    hard
                } else {
                    soft
                }
            }
        };
        let perturbed = [
            dir[0] + rng.random_range(-amp..=amp),
            dir[1] + rng.random_range(-amp..=amp),
            dir[2] + rng.random_range(-amp..=amp),
        ];
        // Keep the previous heading if the perturbation cancelled it out
        normalize(&perturbed).unwrap_or(*dir)
    }
}

/// Bounded random walk shared by electrons, neutrons and secondaries.
#[derive(Debug, Clone)]
struct Walk {
    max_points: usize,
    step: RangeInclusive<f64>,
    scatter: Scatter,
    capture_distance: Option<f64>,
}

impl Walk {
    fn run<R: Rng + ?Sized>(
        &self,
        kind: ParticleKind,
        origin: Vec3,
        launch: Vec3,
        geometry: &DetectorGeometry,
        rng: &mut R,
    ) -> Track {
        let mut points = Vec::with_capacity(self.max_points);
        let mut headings = Vec::with_capacity(self.max_points);

        let mut pos = origin;
        let mut dir = launch;
        let mut traveled = 0.0;
        let mut termination = Termination::StepLimit;

        while points.len() < self.max_points {
            points.push(pos);
            headings.push(dir);

            dir = self.scatter.apply(&dir, rng);
            let step = rng.random_range(self.step.clone());
            pos = add_scaled(&pos, &dir, step);
            traveled += step;

            if self.capture_distance.is_some_and(|c| traveled >= c) {
                termination = Termination::Captured;
                break;
            }
            if !in_bounds(geometry, &pos) {
                termination = Termination::Escaped;
                break;
            }
        }

        Track {
            kind,
            points,
            headings,
            termination,
            traveled,
        }
    }
}
