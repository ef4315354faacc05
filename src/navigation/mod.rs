use nalgebra::{DMatrix, DVector};

use crate::{
    bias::{EnvironmentalBias, SpacebornBias},
    carrier::Carrier,
    cfg::Config,
    ephemeris::{excluded, SatelliteState},
    observation::Observation,
    prelude::Error,
};

pub(crate) mod dop;
pub(crate) mod position;
pub(crate) mod raim;
pub(crate) mod residuals;
pub(crate) mod velocity;

pub(crate) use dop::DilutionOfPrecision;

/// [Observation] proposed to the navigation filters,
/// along with the state of the satellite that produced it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub observation: Observation,
    pub state: SatelliteState,
    /// Rejected by the exclusion policy
    pub excluded: bool,
}

impl Candidate {
    pub fn new(observation: Observation, state: SatelliteState, cfg: &Config) -> Self {
        Self {
            excluded: excluded(&observation, &state, cfg),
            observation,
            state,
        }
    }
}

/// Geometry and fit of one [Candidate], after a resolution attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct SatelliteFit {
    pub azimuth_rad: f64,
    pub elevation_rad: f64,
    /// Contributed to the last iteration
    pub used: bool,
    /// Pseudo range residual (m), not weighted
    pub residual_m: f64,
}

/// Everything the navigation filters need, except the [Candidate]s,
/// for one resolution attempt.
pub(crate) struct Context<'a, S: SpacebornBias, B: EnvironmentalBias> {
    pub cfg: &'a Config,
    pub biases: &'a S,
    pub environment: &'a B,
}

impl<S: SpacebornBias, B: EnvironmentalBias> Context<'_, S, B> {
    /// [Carrier] of the primary signal, None when it cannot be identified.
    pub fn carrier(&self, observation: &Observation) -> Option<Carrier> {
        let sv = observation.sv;
        Carrier::from_code(
            sv.constellation,
            observation.primary.code,
            self.biases.glonass_channel(sv),
        )
    }
}

/// Least squares estimate: returns the correction
/// dx = (HᵀH)⁻¹Hᵀv and its covariance Q = (HᵀH)⁻¹.
pub(crate) fn least_squares(
    h: &DMatrix<f64>,
    v: &DVector<f64>,
) -> Result<(DVector<f64>, DMatrix<f64>), Error> {
    let ht = h.transpose();
    let q = (&ht * h).try_inverse().ok_or(Error::MatrixInversion)?;
    let dx = &q * (ht * v);
    Ok((dx, q))
}
