use thiserror::Error;

use crate::solutions::InvalidationCause;

/// Errors that abort the resolution of an epoch, or reject its outcome.
/// The [std::fmt::Display] implementation is the diagnostic message
/// reported to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Empty observation set.
    #[error("no observation data")]
    NoObservations,

    /// Not enough usable rows (valid measurements + constraints)
    /// to resolve all unknowns.
    #[error("lack of valid sats ns={0}")]
    NotEnoughMeasurements(usize),

    /// Singular normal equations. Invalid orbital states or bad signal data
    /// may cause the algebric calculations to wind up here.
    #[error("lsq error: failed to invert matrix")]
    MatrixInversion,

    /// Gauss-Newton did not converge within the allowed iterations.
    #[error("iteration divergent i={0}")]
    Divergence(usize),

    /// Converged solution that did not pass validation.
    #[error(transparent)]
    InvalidSolution(#[from] InvalidationCause),

    /// Failed to parse navigation method
    #[error("unknown navigation method")]
    UnknownNavigationMethod,

    /// Failed to parse ionosphere option
    #[error("unknown ionosphere option \"{0}\"")]
    UnknownIonosphereOption(String),

    /// Failed to parse troposphere option
    #[error("unknown troposphere option \"{0}\"")]
    UnknownTroposphereOption(String),

    /// Failed to parse ephemeris selection
    #[error("unknown ephemeris selection \"{0}\"")]
    UnknownEphemerisSelection(String),

    /// Failed to parse an observable code
    #[error("invalid observable code \"{0}\"")]
    InvalidObservableCode(String),
}

impl Error {
    /// True when this [Error] only rejects a numerically valid solution.
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, Self::InvalidSolution(_))
    }
}
