use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of particle variants an event can be generated for.
///
/// Trajectory generation and hit simulation each dispatch on this tag with one
/// routine per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    /// Light, heavily scattering charged track with a fuzzy hit pattern.
    Electron,
    /// Straight charged track producing a Cherenkov ring.
    Muon,
    /// Neutral track; light comes only from secondary electrons after capture.
    Neutron,
}

impl ParticleKind {
    /// All variants in a fixed order.
    pub const ALL: [ParticleKind; 3] = [
        ParticleKind::Electron,
        ParticleKind::Muon,
        ParticleKind::Neutron,
    ];

    /// Lowercase identifier used by `FromStr` and `Display`.
    pub fn name(self) -> &'static str {
        match self {
            ParticleKind::Electron => "electron",
            ParticleKind::Muon => "muon",
            ParticleKind::Neutron => "neutron",
        }
    }

    /// Human-readable label with the particle symbol.
    pub fn label(self) -> &'static str {
        match self {
            ParticleKind::Electron => "Electron (e⁻)",
            ParticleKind::Muon => "Muon (μ⁻)",
            ParticleKind::Neutron => "Neutron (n)",
        }
    }

    /// Nominal kinetic energy the stylized event represents, in MeV.
    pub fn nominal_energy_mev(self) -> f64 {
        match self {
            ParticleKind::Electron => 5.0,
            ParticleKind::Muon => 500.0,
            ParticleKind::Neutron => 10.0,
        }
    }

    /// Whether the particle itself emits Cherenkov light.
    #[inline]
    pub fn is_charged(self) -> bool {
        !matches!(self, ParticleKind::Neutron)
    }
}

impl fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParticleKind {
    type Err = Error;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        ParticleKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidParticleType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_names() -> Result<()> {
        assert_eq!("electron".parse::<ParticleKind>()?, ParticleKind::Electron);
        assert_eq!(" Muon ".parse::<ParticleKind>()?, ParticleKind::Muon);
        assert_eq!("NEUTRON".parse::<ParticleKind>()?, ParticleKind::Neutron);
        Ok(())
    }

    #[test]
    fn unknown_name_rejected() {
        let err = "positron".parse::<ParticleKind>().unwrap_err();
        assert!(matches!(err, Error::InvalidParticleType(ref s) if s == "positron"));
    }

    #[test]
    fn display_round_trips_through_parse() -> Result<()> {
        for kind in ParticleKind::ALL {
            assert_eq!(kind.to_string().parse::<ParticleKind>()?, kind);
        }
        Ok(())
    }

    #[test]
    fn only_neutron_is_neutral() {
        assert!(ParticleKind::Electron.is_charged());
        assert!(ParticleKind::Muon.is_charged());
        assert!(!ParticleKind::Neutron.is_charged());
        assert_eq!(ParticleKind::Muon.nominal_energy_mev(), 500.0);
    }
}
