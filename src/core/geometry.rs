use crate::config::{validate_dimensions, validate_sensor_count};
use crate::core::vec3::{normalize_or, Vec3};
use crate::error::Result;
use log::info;
use std::f64::consts::PI;

/// Absorbs rounding in area ratios so e.g. 12000 * 2/3 floors to 8000, not 7999.
const FLOOR_SLACK: f64 = 1e-9;

/// Part of the detector boundary a sensor is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Curved side wall, `x² + z² = radius²`.
    Wall,
    /// Cap at `y = +height / 2`.
    TopCap,
    /// Cap at `y = -height / 2`.
    BottomCap,
}

impl Surface {
    pub fn name(self) -> &'static str {
        match self {
            Surface::Wall => "wall",
            Surface::TopCap => "top",
            Surface::BottomCap => "bottom",
        }
    }
}

/// A photosensor fixed on the detector boundary.
///
/// Fields:
/// - `id`: stable identifier, equal to the sensor's index in the detector's sensor list
/// - `position`: mount point, never relocated after construction
/// - `surface`: which boundary surface holds it
/// - `active`, `intensity`: per-event hit state, reset to `(false, 0.0)` before each event
#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    /// Stable sensor identifier.
    pub id: u32,
    /// Position (x, y, z).
    pub position: Vec3,
    /// Mounting surface.
    pub surface: Surface,
    /// Hit flag for the current event.
    pub active: bool,
    /// Hit intensity in [0, 1] for the current event.
    pub intensity: f64,
}

impl Sensor {
    pub fn new(id: u32, position: Vec3, surface: Surface) -> Self {
        Self {
            id,
            position,
            surface,
            active: false,
            intensity: 0.0,
        }
    }

    /// Orientation a display would point this sensor: radially outward on the wall,
    /// down on the top cap, up on the bottom cap.
    pub fn facing(&self) -> Vec3 {
        match self.surface {
            Surface::Wall => normalize_or(&[self.position[0], 0.0, self.position[2]], [1.0, 0.0, 0.0]),
            Surface::TopCap => [0.0, -1.0, 0.0],
            Surface::BottomCap => [0.0, 1.0, 0.0],
        }
    }

    /// Clear per-event hit state.
    #[inline]
    pub fn reset(&mut self) {
        self.active = false;
        self.intensity = 0.0;
    }
}

/// Finite cylinder centered at the origin with its axis along Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorGeometry {
    radius: f64,
    height: f64,
}

impl DetectorGeometry {
    /// Errors:
    /// - `Error::InvalidConfiguration` if `radius` or `height` is non-positive or non-finite.
    pub fn new(radius: f64, height: f64) -> Result<Self> {
        validate_dimensions(radius, height)?;
        Ok(Self { radius, height })
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Side wall area `2π r h`.
    pub fn wall_area(&self) -> f64 {
        2.0 * PI * self.radius * self.height
    }

    /// Combined area of both caps `2π r²`.
    pub fn cap_area(&self) -> f64 {
        PI * self.radius * self.radius * 2.0
    }

    /// Split a sensor budget between the wall and each cap in proportion to area.
    ///
    /// Returns `(wall_count, cap_count_each)`. The wall always receives at least one sensor
    /// so a positive budget never yields an empty detector.
    pub fn sensor_budget(&self, target: usize) -> (usize, usize) {
        let wall = self.wall_area();
        let caps = self.cap_area();
        let total = wall + caps;
        let target = target as f64;
        let wall_count = (target * (wall / total) + FLOOR_SLACK).floor() as usize;
        let cap_each = (target * (caps / total) / 2.0 + FLOOR_SLACK).floor() as usize;
        (wall_count.max(1), cap_each)
    }

    /// Place sensors over the wall and both caps. Deterministic.
    ///
    /// The number placed may differ from `target` due to flooring and the circular
    /// rejection on the caps.
    ///
    /// Errors:
    /// - `Error::InvalidConfiguration` if `target` is zero.
    pub fn build_sensors(&self, target: usize) -> Result<Vec<Sensor>> {
        validate_sensor_count(target)?;
        let (wall_count, cap_each) = self.sensor_budget(target);
        info!(
            "Sensor budget: {} wall, {} cap ({} per cap)",
            wall_count,
            cap_each * 2,
            cap_each
        );

        let mut sensors = Vec::with_capacity(wall_count + 2 * cap_each);
        self.place_wall(wall_count, &mut sensors);
        if cap_each > 0 {
            self.place_cap(cap_each, Cap::Top, &mut sensors);
            self.place_cap(cap_each, Cap::Bottom, &mut sensors);
        }

        info!("Created {} sensors (requested {})", sensors.len(), target);
        Ok(sensors)
    }

    fn place_wall(&self, wall_count: usize, out: &mut Vec<Sensor>) {
        let circumference = 2.0 * PI * self.radius;
        let spacing = (self.wall_area() / wall_count as f64).sqrt();
        let rows = ((self.height / spacing).floor() as usize).max(1);
        let cols = ((circumference / spacing).floor() as usize).max(1);
        info!("Wall sensor grid: {} rows x {} columns", rows, cols);

        let half = self.height / 2.0;
        for row in 0..rows {
            // A single row sits on the bottom edge
            let y = if rows == 1 {
                -half
            } else {
                (row as f64 / (rows - 1) as f64) * self.height - half
            };
            for col in 0..cols {
                let theta = (col as f64 / cols as f64) * 2.0 * PI;
                let position = [self.radius * theta.cos(), y, self.radius * theta.sin()];
                push_sensor(out, position, Surface::Wall);
            }
        }
    }

    fn place_cap(&self, cap_count: usize, cap: Cap, out: &mut Vec<Sensor>) {
        let y = cap.y(self.height);
        let surface = cap.surface();
        let spacing = (PI * self.radius * self.radius / cap_count as f64).sqrt();
        let grid = ((2.0 * self.radius / spacing).ceil() as usize).max(1);
        let r_sq = self.radius * self.radius;

        for i in 0..grid {
            for j in 0..grid {
                let x = (grid_fraction(i, grid) - 0.5) * 2.0 * self.radius;
                let z = (grid_fraction(j, grid) - 0.5) * 2.0 * self.radius;
                if x * x + z * z > r_sq {
                    continue;
                }
                push_sensor(out, [x, y, z], surface);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cap {
    Top,
    Bottom,
}

impl Cap {
    #[inline]
    fn y(self, height: f64) -> f64 {
        match self {
            Cap::Top => height / 2.0,
            Cap::Bottom => -height / 2.0,
        }
    }

    #[inline]
    fn surface(self) -> Surface {
        match self {
            Cap::Top => Surface::TopCap,
            Cap::Bottom => Surface::BottomCap,
        }
    }
}

/// Grid index mapped to [0, 1]; a one-cell grid maps to the center.
#[inline]
fn grid_fraction(i: usize, grid: usize) -> f64 {
    if grid <= 1 {
        0.5
    } else {
        i as f64 / (grid - 1) as f64
    }
}

#[inline]
fn push_sensor(out: &mut Vec<Sensor>, position: Vec3, surface: Surface) {
    let id = out.len() as u32;
    out.push(Sensor::new(id, position, surface));
}

/// Build the sensor set for a cylinder of the given shape.
///
/// Errors:
/// - `Error::InvalidConfiguration` if `radius <= 0`, `height <= 0`, or `target == 0`.
pub fn build_detector(radius: f64, height: f64, target: usize) -> Result<Vec<Sensor>> {
    DetectorGeometry::new(radius, height)?.build_sensors(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use approx::assert_relative_eq;

    #[test]
    fn budget_matches_area_split() -> Result<()> {
        let geo = DetectorGeometry::new(40.0, 80.0)?;
        assert_relative_eq!(geo.wall_area(), 20106.19, epsilon = 0.01);
        assert_relative_eq!(geo.cap_area(), 10053.10, epsilon = 0.01);
        assert_eq!(geo.sensor_budget(12_000), (8000, 2000));
        Ok(())
    }

    #[test]
    fn tiny_budget_still_places_a_wall_sensor() -> Result<()> {
        let sensors = build_detector(40.0, 80.0, 1)?;
        assert_eq!(sensors.len(), 1);
        assert_eq!(sensors[0].surface, Surface::Wall);
        // Single row sits on the bottom edge
        assert_relative_eq!(sensors[0].position[1], -40.0);
        Ok(())
    }

    #[test]
    fn grid_fraction_guards_single_cell() {
        assert_eq!(grid_fraction(0, 1), 0.5);
        assert_eq!(grid_fraction(0, 5), 0.0);
        assert_eq!(grid_fraction(4, 5), 1.0);
    }

    #[test]
    fn cap_sensors_lie_on_their_cap() -> Result<()> {
        let geo = DetectorGeometry::new(5.0, 4.0)?;
        for (cap, y, surface) in [
            (Cap::Top, 2.0, Surface::TopCap),
            (Cap::Bottom, -2.0, Surface::BottomCap),
        ] {
            let mut out = Vec::new();
            geo.place_cap(40, cap, &mut out);
            assert!(!out.is_empty());
            for s in &out {
                assert_eq!(s.surface, surface);
                assert_eq!(s.position[1], y);
                assert!(s.position[0].powi(2) + s.position[2].powi(2) <= 25.0 + 1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn ids_are_indices() -> Result<()> {
        let sensors = build_detector(10.0, 20.0, 500)?;
        for (i, s) in sensors.iter().enumerate() {
            assert_eq!(s.id as usize, i);
            assert!(!s.active);
            assert_eq!(s.intensity, 0.0);
        }
        Ok(())
    }

    #[test]
    fn facing_points_into_or_out_of_surfaces() -> Result<()> {
        let sensors = build_detector(10.0, 20.0, 500)?;
        for s in &sensors {
            let f = s.facing();
            match s.surface {
                Surface::Wall => {
                    assert_eq!(f[1], 0.0);
                    assert_relative_eq!(f[0] * 10.0, s.position[0], epsilon = 1e-9);
                }
                Surface::TopCap => assert_eq!(f, [0.0, -1.0, 0.0]),
                Surface::BottomCap => assert_eq!(f, [0.0, 1.0, 0.0]),
            }
        }
        Ok(())
    }

    #[test]
    fn geometry_accepts_shape_without_a_sensor_count() -> Result<()> {
        let geo = DetectorGeometry::new(0.5, 0.5)?;
        assert!(matches!(
            geo.build_sensors(0),
            Err(Error::InvalidConfiguration(ref m)) if m.contains("sensor_count")
        ));
        assert!(matches!(
            DetectorGeometry::new(f64::NAN, 1.0),
            Err(Error::InvalidConfiguration(ref m)) if m.contains("radius")
        ));
        Ok(())
    }

    #[test]
    fn invalid_shape_rejected() {
        assert!(matches!(
            build_detector(0.0, 80.0, 100),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            build_detector(40.0, -1.0, 100),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            build_detector(40.0, 80.0, 0),
            Err(Error::InvalidConfiguration(_))
        ));
    }
}
