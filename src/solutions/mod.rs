//! PVT Solutions
use std::collections::HashMap;

use nalgebra::Matrix3;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    constants::SPEED_OF_LIGHT_M_S,
    export::RawMeasurement,
    navigation::DilutionOfPrecision,
    position::Position,
    prelude::{Constellation, Epoch, Error, Vector3, SV},
    system::System,
};

mod validator;

pub use validator::InvalidationCause;
pub(crate) use validator::SolutionValidator;

/// Qualifies a [PVTSolution]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum SolutionStatus {
    /// No valid solution
    #[default]
    None,
    /// Single point solution
    Single,
    /// Single point solution, using SBAS corrected ephemeris
    Sbas,
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Single => write!(f, "single"),
            Self::Sbas => write!(f, "sbas"),
        }
    }
}

/// [PVTSolution] of one epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PVTSolution {
    /// Receiver [Epoch]: sampling instant corrected by the receiver clock bias
    pub epoch: Epoch,
    /// [SolutionStatus]
    pub status: SolutionStatus,
    /// Position in meters ECEF
    pub position: Vector3<f64>,
    /// Velocity in m.s⁻¹ ECEF. Null when it could not be determined.
    pub velocity: Vector3<f64>,
    /// Receiver clock biases (s): reference (GPS) clock, followed by
    /// the Glonass, Galileo, BeiDou and IRNSS offsets to the reference clock.
    pub clock_biases_s: [f64; 5],
    /// Receiver clock drift (s.s⁻¹), determined along the velocity
    pub clock_drift_s_s: f64,
    /// Position covariance (m²)
    pub position_covariance: Matrix3<f64>,
    /// Velocity covariance (m².s⁻²)
    pub velocity_covariance: Matrix3<f64>,
    /// Number of satellites that contributed
    pub satellites: usize,
    /// Age of differential corrections (s), always null in single point
    pub age: f64,
    /// Ambiguity validation ratio, always null in single point
    pub ratio: f64,
    /// Geometric Dilution of Precision
    pub gdop: f64,
    /// Position Dilution of Precision
    pub pdop: f64,
    /// Horizontal Dilution of Precision
    pub hdop: f64,
    /// Vertical Dilution of Precision
    pub vdop: f64,
    /// Temporal Dilution of Precision
    pub tdop: f64,
}

impl PVTSolution {
    /// Builds a [PVTSolution] from the position state
    /// (ECEF, reference clock and offsets, in meters) and its covariance.
    pub(crate) fn new(
        epoch: Epoch,
        state: &[f64],
        covariance: Matrix3<f64>,
        satellites: usize,
        dop: &DilutionOfPrecision,
    ) -> Self {
        let mut clock_biases_s = [0.0; 5];
        for (bias, x) in clock_biases_s.iter_mut().zip(state.iter().skip(3)) {
            *bias = x / SPEED_OF_LIGHT_M_S;
        }

        Self {
            epoch,
            status: SolutionStatus::None,
            position: Vector3::new(state[0], state[1], state[2]),
            velocity: Vector3::zeros(),
            clock_biases_s,
            clock_drift_s_s: 0.0,
            position_covariance: covariance,
            velocity_covariance: Matrix3::zeros(),
            satellites,
            age: 0.0,
            ratio: 0.0,
            gdop: dop.gdop,
            pdop: dop.pdop,
            hdop: dop.hdop,
            vdop: dop.vdop,
            tdop: dop.tdop,
        }
    }

    /// Latitude, longitude (rad) and altitude above the ellipsoid (m)
    pub fn geodetic(&self) -> Vector3<f64> {
        Position::from_ecef(self.position).geodetic()
    }

    /// Receiver clock bias (s) with respect to the time system
    /// of this [Constellation]. None when the constellation is not supported.
    pub fn clock_bias_s(&self, constellation: Constellation) -> Option<f64> {
        let system = System::from_constellation(constellation)?;
        let reference = self.clock_biases_s[0];
        match system.clock_offset() {
            Some(offset) => Some(reference + self.clock_biases_s[offset.clock_index()]),
            None => Some(reference),
        }
    }
}

/// Per satellite status, updated on each resolution
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SatelliteStatus {
    /// Azimuth (rad)
    pub azimuth_rad: f64,
    /// Elevation (rad)
    pub elevation_rad: f64,
    /// SNR of the primary signal (dB.Hz)
    pub snr_dbhz: f64,
    /// Contributed to the solution
    pub valid: bool,
    /// Pseudo range residual (m), only meaningful when valid
    pub residual_m: f64,
}

/// Outcome of the resolution of one epoch.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Validated [PVTSolution]
    Fix(PVTSolution),
    /// The solver converged but the [PVTSolution] did not pass validation.
    /// It is still populated and may be used with caution.
    Rejected {
        solution: PVTSolution,
        cause: Error,
    },
    /// Resolution failed
    Failure(Error),
}

impl Resolution {
    /// Returns the validated [PVTSolution], if any.
    pub fn fix(&self) -> Option<&PVTSolution> {
        match self {
            Self::Fix(solution) => Some(solution),
            _ => None,
        }
    }

    /// Returns the [PVTSolution], whether it was validated or not.
    pub fn solution(&self) -> Option<&PVTSolution> {
        match self {
            Self::Fix(solution) | Self::Rejected { solution, .. } => Some(solution),
            Self::Failure(_) => None,
        }
    }

    pub(crate) fn solution_mut(&mut self) -> Option<&mut PVTSolution> {
        match self {
            Self::Fix(solution) | Self::Rejected { solution, .. } => Some(solution),
            Self::Failure(_) => None,
        }
    }

    /// Returns the [Error] that prevented a validated solution, if any.
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Fix(_) => None,
            Self::Rejected { cause, .. } => Some(cause),
            Self::Failure(e) => Some(e),
        }
    }

    pub fn is_fix(&self) -> bool {
        matches!(self, Self::Fix(_))
    }
}

/// [Output] of [crate::prelude::Solver::resolve].
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    /// Epoch [Resolution]
    pub resolution: Resolution,
    /// Status of each observed satellite
    pub satellites: HashMap<SV, SatelliteStatus>,
    /// Corrected measurements, for downstream processing
    pub measurements: Vec<RawMeasurement>,
}

impl Output {
    /// Diagnostic message: empty on success, error description otherwise.
    pub fn message(&self) -> String {
        self.resolution
            .error()
            .map(|e| e.to_string())
            .unwrap_or_default()
    }
}
