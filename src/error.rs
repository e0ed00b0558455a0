use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the detector event core.
///
/// Configuration and particle-type failures are fatal and surfaced to the caller
/// before any event state is touched. Numeric edge cases inside the generators are
/// guarded internally and never produce an error.
#[derive(Debug, Error)]
pub enum Error {
    /// Non-positive or non-finite detector dimensions, zero sensor count, or a bad angle.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Particle name outside {electron, muon, neutron}.
    #[error("invalid particle type: {0:?} (expected electron, muon or neutron)")]
    InvalidParticleType(String),

    /// Propagated I/O errors from reading a configuration file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Malformed configuration document.
    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),
}
