//! Sensor activation rules per particle kind.

use crate::core::geometry::{DetectorGeometry, Sensor};
use crate::core::particle::ParticleKind;
use crate::core::trajectory::{Track, Trajectory};
use crate::core::vec3::{angle_between, dot, norm, normalize, normalize_or, sub, Vec3};
use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

pub const ELECTRON_RANDOM_HITS: usize = 30;
pub const ELECTRON_RANDOM_INTENSITY: RangeInclusive<f64> = 0.7..=1.0;
/// Proximity radius around electron track points, as a multiple of the detector radius.
pub const ELECTRON_NEAR_FACTOR: f64 = 0.4;
pub const ELECTRON_NEAR_PROB: f64 = 0.1;
pub const ELECTRON_NEAR_INTENSITY: RangeInclusive<f64> = 0.6..=1.0;

/// Half-width of the accepted band around the Cherenkov angle for muons.
pub const MUON_CONE_TOLERANCE: f64 = 0.4;
pub const MUON_INTENSITY: RangeInclusive<f64> = 0.7..=1.0;

pub const SECONDARY_CONE_TOLERANCE: f64 = 0.3;
/// Peak activation probability at the exact cone angle for secondaries.
pub const SECONDARY_PEAK_PROB: f64 = 0.7;
pub const SECONDARY_RANGE_FACTOR: f64 = 0.8;
pub const SECONDARY_INTENSITY: RangeInclusive<f64> = 0.6..=1.0;

pub const QUOTA_INTENSITY: RangeInclusive<f64> = 0.5..=0.8;

/// Sensor id to intensity for one event. A sensor appears at most once.
pub type ActivationSet = BTreeMap<u32, f64>;

/// Parameters that the rules read besides the detector radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRules {
    pub cherenkov_angle: f64,
    pub neutron_hit_quota: usize,
}

/// Records activations against the detector's sensor list for one event.
#[derive(Debug)]
pub struct HitRecorder<'a> {
    sensors: &'a mut [Sensor],
    hits: ActivationSet,
}

impl<'a> HitRecorder<'a> {
    /// Start recording. Sensors are expected to be reset already.
    pub fn new(sensors: &'a mut [Sensor]) -> Self {
        Self {
            sensors,
            hits: ActivationSet::new(),
        }
    }

    /// Mark sensor `index` as hit with `intensity`.
    ///
    /// Returns `false` without changing anything if the sensor is already active
    /// or the index is out of range.
    pub fn activate(&mut self, index: usize, intensity: f64) -> bool {
        let Some(sensor) = self.sensors.get_mut(index) else {
            return false;
        };
        if sensor.active {
            return false;
        }
        sensor.active = true;
        sensor.intensity = intensity;
        self.hits.insert(sensor.id, intensity);
        true
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.hits.len()
    }

    #[inline]
    pub fn sensors(&self) -> &[Sensor] {
        self.sensors
    }

    pub fn finish(self) -> ActivationSet {
        self.hits
    }
}

/// Run the activation rule for `kind` over a fresh set of sensors.
pub fn simulate<R: Rng + ?Sized>(
    kind: ParticleKind,
    trajectory: &Trajectory,
    sensors: &mut [Sensor],
    geometry: &DetectorGeometry,
    rules: &HitRules,
    rng: &mut R,
) -> ActivationSet {
    let mut rec = HitRecorder::new(sensors);
    match kind {
        ParticleKind::Electron => electron_hits(&trajectory.primary, geometry, &mut rec, rng),
        ParticleKind::Muon => muon_hits(&trajectory.primary, rules.cherenkov_angle, &mut rec, rng),
        ParticleKind::Neutron => {
            for secondary in &trajectory.secondaries {
                secondary_hits(secondary, geometry, rules.cherenkov_angle, &mut rec, rng);
            }
            fill_quota(rules.neutron_hit_quota, &mut rec, rng);
        }
    }
    debug!("{} event: {} sensors active", kind, rec.active_count());
    rec.finish()
}

/// Scattered hits: a fixed number of random sensors plus sparse hits near the track.
pub fn electron_hits<R: Rng + ?Sized>(
    track: &Track,
    geometry: &DetectorGeometry,
    rec: &mut HitRecorder<'_>,
    rng: &mut R,
) {
    let n = rec.sensors().len();
    if n == 0 {
        return;
    }
    for _ in 0..ELECTRON_RANDOM_HITS {
        let index = rng.random_range(0..n);
        let intensity = rng.random_range(ELECTRON_RANDOM_INTENSITY);
        rec.activate(index, intensity);
    }

    let reach_sq = (ELECTRON_NEAR_FACTOR * geometry.radius()).powi(2);
    for point in &track.points {
        for index in 0..n {
            let d = sub(&rec.sensors()[index].position, point);
            if dot(&d, &d) < reach_sq && rng.random::<f64>() < ELECTRON_NEAR_PROB {
                let intensity = rng.random_range(ELECTRON_NEAR_INTENSITY);
                rec.activate(index, intensity);
            }
        }
    }
}

/// Ring hits: sensors whose direction from the origin lies near the Cherenkov cone
/// around the muon's direction.
pub fn muon_hits<R: Rng + ?Sized>(
    track: &Track,
    cherenkov_angle: f64,
    rec: &mut HitRecorder<'_>,
    rng: &mut R,
) {
    let axis = cone_axis(track);
    for index in 0..rec.sensors().len() {
        let Some(dir) = normalize(&rec.sensors()[index].position) else {
            continue;
        };
        let offset = (angle_between(&dir, &axis) - cherenkov_angle).abs();
        if offset < MUON_CONE_TOLERANCE {
            let probability = 1.0 - offset / MUON_CONE_TOLERANCE;
            if rng.random::<f64>() < probability {
                let intensity = rng.random_range(MUON_INTENSITY);
                rec.activate(index, intensity);
            }
        }
    }
}

/// Direction of the first track segment, or +Y for a track shorter than two points.
pub fn cone_axis(track: &Track) -> Vec3 {
    match track.points.as_slice() {
        [p0, p1, ..] => normalize_or(&sub(p1, p0), [0.0, 1.0, 0.0]),
        _ => [0.0, 1.0, 0.0],
    }
}

/// Cone hits from one secondary electron, using the local heading at each point.
pub fn secondary_hits<R: Rng + ?Sized>(
    track: &Track,
    geometry: &DetectorGeometry,
    cherenkov_angle: f64,
    rec: &mut HitRecorder<'_>,
    rng: &mut R,
) {
    let range = SECONDARY_RANGE_FACTOR * geometry.radius();
    for (point, heading) in track.points.iter().zip(&track.headings) {
        for index in 0..rec.sensors().len() {
            let to_sensor = sub(&rec.sensors()[index].position, point);
            let distance = norm(&to_sensor);
            let Some(dir) = normalize(&to_sensor) else {
                continue;
            };
            let offset = (angle_between(&dir, heading) - cherenkov_angle).abs();
            if offset < SECONDARY_CONE_TOLERANCE && distance < range {
                let probability = SECONDARY_PEAK_PROB - offset / SECONDARY_CONE_TOLERANCE;
                if rng.random::<f64>() < probability {
                    let intensity = rng.random_range(SECONDARY_INTENSITY);
                    rec.activate(index, intensity);
                }
            }
        }
    }
}

/// Activate random inactive sensors until `quota` are active or none remain.
pub fn fill_quota<R: Rng + ?Sized>(quota: usize, rec: &mut HitRecorder<'_>, rng: &mut R) {
    let current = rec.active_count();
    if current >= quota {
        return;
    }
    let mut available: Vec<usize> = rec
        .sensors()
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.active)
        .map(|(i, _)| i)
        .collect();
    let needed = (quota - current).min(available.len());
    let (chosen, _) = available.partial_shuffle(rng, needed);
    for &index in chosen.iter() {
        let intensity = rng.random_range(QUOTA_INTENSITY);
        rec.activate(index, intensity);
    }
    trace!(
        "hit quota {}: {} cone hits, {} filled",
        quota,
        current,
        rec.active_count() - current
    );
}
