use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::config::DetectorConfig;
use crate::core::vec3::{Vec3, DIM};
use crate::core::Simulation;

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn points_array(points: &[Vec3]) -> Array2<f64> {
    let mut arr = Array2::<f64>::zeros((points.len(), DIM));
    for (i, p) in points.iter().enumerate() {
        for k in 0..DIM {
            arr[[i, k]] = p[k];
        }
    }
    arr
}

/// Python-facing wrapper around a detector session.
///
/// API:
/// - __new__(radius=40.0, height=80.0, sensor_count=12000, seed=None)
/// - num_sensors()
/// - sensor_positions() -> np.ndarray, shape (N, 3)
/// - sensor_surfaces() -> list[str]
/// - sensor_facings() -> np.ndarray, shape (N, 3)
/// - generate_event(particle) -> dict
#[pyclass]
pub struct WcSim {
    sim: Simulation,
}

#[pymethods]
impl WcSim {
    /// Build the detector sensor layout.
    ///
    /// Parameters
    /// - radius: cylinder radius (float, > 0)
    /// - height: cylinder height (float, > 0)
    /// - sensor_count: requested number of sensors (int, > 0)
    /// - seed: RNG seed (int) for reproducibility; None for nondeterministic
    ///
    /// Errors: raises ValueError on invalid parameters.
    #[new]
    #[pyo3(signature = (radius=40.0, height=80.0, sensor_count=12000, seed=None))]
    fn new(radius: f64, height: f64, sensor_count: usize, seed: Option<u64>) -> PyResult<Self> {
        let config = DetectorConfig::with_shape(radius, height, sensor_count);
        let sim = Simulation::new(config, seed).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Number of sensors actually placed.
    fn num_sensors(&self) -> usize {
        self.sim.num_sensors()
    }

    /// Return sensor positions as a NumPy array of shape (N, 3), dtype=float64.
    fn sensor_positions<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let positions: Vec<Vec3> = self.sim.sensors().iter().map(|s| s.position).collect();
        let pyarr = points_array(&positions).into_pyarray(py);
        Ok(pyarr.to_owned().into())
    }

    /// Return the mounting surface of each sensor: "wall", "top" or "bottom".
    fn sensor_surfaces(&self) -> Vec<&'static str> {
        self.sim.sensors().iter().map(|s| s.surface.name()).collect()
    }

    /// Return the unit orientation of each sensor as a NumPy array of shape (N, 3):
    /// radially outward on the wall, down on the top cap, up on the bottom cap.
    fn sensor_facings<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let facings: Vec<Vec3> = self.sim.sensors().iter().map(|s| s.facing()).collect();
        let pyarr = points_array(&facings).into_pyarray(py);
        Ok(pyarr.to_owned().into())
    }

    /// Generate one event.
    ///
    /// Parameters
    /// - particle: "electron", "muon" or "neutron"
    ///
    /// Returns: dict with
    /// - "track": (M, 3) primary track points
    /// - "secondaries": list of (K, 3) arrays (neutron captures only)
    /// - "hits": {sensor_id: intensity}
    /// - "beams": (B, 7) rows of [from_x, from_y, from_z, to_x, to_y, to_z, opacity]
    /// - "termination": "step_limit", "escaped" or "captured"
    /// - "charged": whether the primary particle is charged
    ///
    /// Errors: raises ValueError on an unknown particle name.
    fn generate_event<'py>(&mut self, py: Python<'py>, particle: &str) -> PyResult<Py<PyDict>> {
        let ev = self.sim.generate_event_named(particle).map_err(py_err)?;

        let out = PyDict::new(py);
        out.set_item("track", points_array(ev.track()).into_pyarray(py))?;

        let secondaries = PyList::empty(py);
        for points in ev.secondaries() {
            secondaries.append(points_array(points).into_pyarray(py))?;
        }
        out.set_item("secondaries", secondaries)?;

        let hits = PyDict::new(py);
        for (id, intensity) in &ev.hits {
            hits.set_item(*id, *intensity)?;
        }
        out.set_item("hits", hits)?;

        let mut beams = Array2::<f64>::zeros((ev.beams.len(), 2 * DIM + 1));
        for (i, beam) in ev.beams.iter().enumerate() {
            for k in 0..DIM {
                beams[[i, k]] = beam.from[k];
                beams[[i, DIM + k]] = beam.to[k];
            }
            beams[[i, 2 * DIM]] = beam.opacity;
        }
        out.set_item("beams", beams.into_pyarray(py))?;
        out.set_item("termination", ev.termination().name())?;
        out.set_item("charged", ev.kind.is_charged())?;

        Ok(out.into())
    }
}

/// The wcsim Python module entry point.
#[pymodule]
fn wcsim(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<WcSim>()?;
    Ok(())
}
