use crate::config::DetectorConfig;
use crate::core::event::EventState;
use crate::core::geometry::{DetectorGeometry, Sensor};
use crate::core::hits::{self, HitRules};
use crate::core::particle::ParticleKind;
use crate::core::{beams, trajectory};
use crate::error::Result;
use log::debug;
use rand::{rng, rngs::StdRng, Rng, SeedableRng};

/// A detector session: fixed sensor layout plus the random source for events.
///
/// Sensor hit state is reset in place at the start of every event; sensors are never
/// reallocated or moved. Events run to completion one at a time.
#[derive(Debug)]
pub struct Simulation {
    config: DetectorConfig,
    geometry: DetectorGeometry,
    sensors: Vec<Sensor>,
    rng: StdRng,
}

impl Simulation {
    /// Build the sensor layout for `config` and seed the session's random source.
    ///
    /// `seed = None` draws a seed from the thread-local generator.
    ///
    /// Errors:
    /// - `Error::InvalidConfiguration` if `config` fails validation.
    pub fn new(config: DetectorConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        let geometry = DetectorGeometry::new(config.radius, config.height)?;
        let sensors = geometry.build_sensors(config.sensor_count)?;

        let rng: StdRng = match seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };

        Ok(Self {
            config,
            geometry,
            sensors,
            rng,
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn geometry(&self) -> &DetectorGeometry {
        &self.geometry
    }

    /// Sensors with the hit state of the most recent event.
    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    /// Number of sensors placed.
    pub fn num_sensors(&self) -> usize {
        self.sensors.len()
    }

    /// Clear every sensor's hit state.
    pub fn reset(&mut self) {
        self.sensors.iter_mut().for_each(Sensor::reset);
    }

    /// Generate one event using the session's own random source.
    pub fn generate_event(&mut self, kind: ParticleKind) -> EventState {
        run_event(
            &self.config,
            &self.geometry,
            &mut self.sensors,
            kind,
            &mut self.rng,
        )
    }

    /// Generate one event from a particle name (`"electron"`, `"muon"`, `"neutron"`).
    ///
    /// Errors:
    /// - `Error::InvalidParticleType` for any other name; sensor state is left untouched.
    pub fn generate_event_named(&mut self, name: &str) -> Result<EventState> {
        let kind: ParticleKind = name.parse()?;
        Ok(self.generate_event(kind))
    }

    /// Generate one event drawing every random number from `rng`.
    pub fn generate_event_with<R: Rng + ?Sized>(
        &mut self,
        kind: ParticleKind,
        rng: &mut R,
    ) -> EventState {
        run_event(&self.config, &self.geometry, &mut self.sensors, kind, rng)
    }
}

/// Clear the previous event's sensor state, then run track generation, hit
/// simulation and beam linking in order.
fn run_event<R: Rng + ?Sized>(
    config: &DetectorConfig,
    geometry: &DetectorGeometry,
    sensors: &mut [Sensor],
    kind: ParticleKind,
    rng: &mut R,
) -> EventState {
    sensors.iter_mut().for_each(Sensor::reset);

    let trajectory = trajectory::generate(kind, geometry, rng);
    let rules = HitRules {
        cherenkov_angle: config.cherenkov_angle,
        neutron_hit_quota: config.neutron_hit_quota,
    };
    let hits = hits::simulate(kind, &trajectory, sensors, geometry, &rules, rng);
    let beams = beams::link(&hits, sensors, &trajectory, config.beam_origin);

    debug!(
        "{} event: {} track points, {} hits, {} beams",
        kind,
        trajectory.primary.len(),
        hits.len(),
        beams.len()
    );

    EventState {
        kind,
        trajectory,
        hits,
        beams,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn small() -> DetectorConfig {
        DetectorConfig::with_shape(20.0, 40.0, 3000)
    }

    #[test]
    fn make_small_sim_ok() -> Result<()> {
        let mut sim = Simulation::new(small(), Some(1234))?;
        assert!(sim.num_sensors() > 2500);
        let ev = sim.generate_event(ParticleKind::Muon);
        assert_eq!(ev.track().len(), 30);
        assert_eq!(ev.beams.len(), ev.hits.len());
        Ok(())
    }

    #[test]
    fn sensor_state_mirrors_hits() -> Result<()> {
        let mut sim = Simulation::new(small(), Some(99))?;
        let ev = sim.generate_event(ParticleKind::Electron);
        let active: Vec<u32> = sim.sensors().iter().filter(|s| s.active).map(|s| s.id).collect();
        let keys: Vec<u32> = ev.hits.keys().copied().collect();
        assert_eq!(active, keys);
        for (&id, &i) in &ev.hits {
            assert_eq!(sim.sensors()[id as usize].intensity, i);
        }
        Ok(())
    }

    #[test]
    fn invalid_particle_leaves_state_untouched() -> Result<()> {
        let mut sim = Simulation::new(small(), Some(5))?;
        let before = sim.generate_event(ParticleKind::Muon).hits;
        let err = sim.generate_event_named("tau").unwrap_err();
        assert!(matches!(err, Error::InvalidParticleType(_)));
        let still_active = sim.sensors().iter().filter(|s| s.active).count();
        assert_eq!(still_active, before.len());
        Ok(())
    }

    #[test]
    fn invalid_config_rejected() {
        let err = Simulation::new(DetectorConfig::with_shape(-1.0, 10.0, 10), None).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn seeded_sessions_agree() -> Result<()> {
        let mut a = Simulation::new(small(), Some(7))?;
        let mut b = Simulation::new(small(), Some(7))?;
        for kind in ParticleKind::ALL {
            assert_eq!(a.generate_event(kind), b.generate_event(kind));
        }
        Ok(())
    }
}
