//! Doppler velocity estimator
use log::{debug, trace};
use nalgebra::{DMatrix, DVector, Matrix3};

use crate::{
    bias::{EnvironmentalBias, SpacebornBias},
    constants::{
        EARTH_ANGULAR_VEL_RAD, MAX_ITERATIONS, SPEED_OF_LIGHT_M_S, VELOCITY_CONVERGENCE_M_S,
        VELOCITY_STATE_DIM,
    },
    navigation::{least_squares, Candidate, Context, SatelliteFit},
    position::Position,
    prelude::Vector3,
};

/// Receiver velocity
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct VelocityEstimate {
    /// ECEF velocity (m.s⁻¹)
    pub velocity: Vector3<f64>,
    /// Velocity covariance
    pub covariance: Matrix3<f64>,
    /// Receiver clock drift (m.s⁻¹)
    pub clock_drift_m_s: f64,
}

/// Range rate residuals and their design matrix, around state `x`
/// (ECEF velocity and clock drift). Rows are weighted by the Doppler error.
fn range_rate_residuals<S: SpacebornBias, B: EnvironmentalBias>(
    ctx: &Context<S, B>,
    candidates: &[Candidate],
    fits: &[SatelliteFit],
    position: &Position,
    x: &DVector<f64>,
) -> (DVector<f64>, DMatrix<f64>) {
    let rx = position.ecef();
    let vx = Vector3::new(x[0], x[1], x[2]);
    let drift_m_s = x[3];
    let doppler_err_hz = ctx.cfg.errors.doppler_hz;

    let mut residuals = Vec::with_capacity(candidates.len());
    let mut jacobian = Vec::with_capacity(candidates.len() * VELOCITY_STATE_DIM);

    for (cd, fit) in candidates.iter().zip(fits.iter()) {
        let doppler_hz = cd.observation.primary.doppler_hz;

        if doppler_hz == 0.0 || !fit.used {
            continue;
        }

        let Some(carrier) = ctx.carrier(&cd.observation) else {
            continue;
        };

        let Some(sat_vel) = cd.state.known_velocity() else {
            trace!(
                "{} ({}) - unknown satellite velocity",
                cd.observation.epoch,
                cd.observation.sv
            );
            continue;
        };

        let sat_pos = cd.state.position;
        let frequency = carrier.frequency();

        let e = position.line_of_sight(fit.azimuth_rad, fit.elevation_rad);

        let vs = sat_vel - vx;

        // range rate, with Earth rotation correction
        let rate = vs.dot(&e)
            + EARTH_ANGULAR_VEL_RAD / SPEED_OF_LIGHT_M_S
                * (sat_vel[1] * rx[0] + sat_pos[1] * vx[0]
                    - sat_vel[0] * rx[1]
                    - sat_pos[0] * vx[1]);

        let sigma = if doppler_err_hz <= 0.0 {
            1.0
        } else {
            doppler_err_hz * SPEED_OF_LIGHT_M_S / frequency
        };

        let observed = -doppler_hz * SPEED_OF_LIGHT_M_S / frequency;
        let modeled = rate + drift_m_s - SPEED_OF_LIGHT_M_S * cd.state.clock_drift_s_s;

        residuals.push((observed - modeled) / sigma);
        jacobian.extend_from_slice(&[-e[0] / sigma, -e[1] / sigma, -e[2] / sigma, 1.0 / sigma]);
    }

    let nv = residuals.len();

    (
        DVector::from_vec(residuals),
        DMatrix::from_row_slice(nv, VELOCITY_STATE_DIM, &jacobian),
    )
}

/// Resolves the receiver velocity from the Doppler observations of the
/// [Candidate]s that contributed to the position solution.
/// None when the velocity could not be determined.
pub(crate) fn estimate<S: SpacebornBias, B: EnvironmentalBias>(
    ctx: &Context<S, B>,
    candidates: &[Candidate],
    fits: &[SatelliteFit],
    position: &Vector3<f64>,
) -> Option<VelocityEstimate> {
    let position = Position::from_ecef(*position);
    let mut x = DVector::<f64>::zeros(VELOCITY_STATE_DIM);

    for iteration in 0..MAX_ITERATIONS {
        let (v, h) = range_rate_residuals(ctx, candidates, fits, &position, &x);

        if v.len() < VELOCITY_STATE_DIM {
            debug!("velocity: not enough doppler observations ({})", v.len());
            return None;
        }

        let (dx, q) = match least_squares(&h, &v) {
            Ok(estimate) => estimate,
            Err(e) => {
                debug!("velocity: {}", e);
                return None;
            },
        };

        x += &dx;

        let norm = dx.norm();
        trace!("velocity: iteration #{} |dx|={:.9}", iteration, norm);

        if norm < VELOCITY_CONVERGENCE_M_S {
            return Some(VelocityEstimate {
                velocity: Vector3::new(x[0], x[1], x[2]),
                covariance: q.fixed_view::<3, 3>(0, 0).into_owned(),
                clock_drift_m_s: x[3],
            });
        }
    }

    debug!("velocity: did not converge");
    None
}
