use crate::config::BeamOrigin;
use crate::core::event::LightBeam;
use crate::core::geometry::Sensor;
use crate::core::hits::ActivationSet;
use crate::core::trajectory::Trajectory;
use crate::core::vec3::{distance_sq, Vec3};
use ordered_float::OrderedFloat;

/// Beam opacity per unit of sensor intensity.
pub const OPACITY_SCALE: f64 = 0.5;

/// Point among `points` closest to `target`, or `None` if `points` is empty.
pub fn closest_point<'a, I>(points: I, target: &Vec3) -> Option<Vec3>
where
    I: IntoIterator<Item = &'a Vec3>,
{
    points
        .into_iter()
        .min_by_key(|p| OrderedFloat(distance_sq(p, target)))
        .copied()
}

/// One beam per activated sensor, from the nearest track point to the sensor.
///
/// With `BeamOrigin::PrimaryTrack` only the primary track is scanned, even when the
/// hits came from secondary tracks.
pub fn link(
    hits: &ActivationSet,
    sensors: &[Sensor],
    trajectory: &Trajectory,
    origin: BeamOrigin,
) -> Vec<LightBeam> {
    hits.iter()
        .filter_map(|(&id, &intensity)| {
            let sensor = sensors.get(id as usize)?;
            let target = &sensor.position;
            let from = match origin {
                BeamOrigin::PrimaryTrack => closest_point(&trajectory.primary.points, target),
                BeamOrigin::NearestTrack => closest_point(
                    trajectory
                        .secondaries
                        .iter()
                        .flat_map(|t| t.points.iter())
                        .chain(trajectory.primary.points.iter()),
                    target,
                ),
            }?;
            Some(LightBeam {
                sensor_id: id,
                from,
                to: *target,
                opacity: intensity * OPACITY_SCALE,
            })
        })
        .collect()
}
