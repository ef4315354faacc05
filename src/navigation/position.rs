//! Weighted least squares position solver
use log::{debug, trace};
use nalgebra::{DVector, Matrix3};

use crate::{
    bias::{EnvironmentalBias, SpacebornBias},
    cfg::EphemerisSelection,
    constants::{
        MAX_ITERATIONS, POSITION_CONVERGENCE_M, POSITION_STATE_DIM, SPEED_OF_LIGHT_M_S,
    },
    navigation::{
        least_squares, residuals, Candidate, Context, DilutionOfPrecision, SatelliteFit,
    },
    prelude::{Duration, Epoch, Error, Vector3},
    solutions::{PVTSolution, Resolution, SolutionStatus, SolutionValidator},
};

/// Position resolution attempt
#[derive(Debug, Clone)]
pub(crate) struct PositionEstimate {
    pub resolution: Resolution,
    /// Geometry and fit of each [Candidate], as of the last iteration
    pub fits: Vec<SatelliteFit>,
}

impl PositionEstimate {
    fn failure(error: Error, fits: Vec<SatelliteFit>) -> Self {
        Self {
            resolution: Resolution::Failure(error),
            fits,
        }
    }
}

/// Resolves the position and clock state from these [Candidate]s,
/// sampled at `t`, starting from `apriori` (ECEF, m).
pub(crate) fn estimate<S: SpacebornBias, B: EnvironmentalBias>(
    ctx: &Context<S, B>,
    t: Epoch,
    candidates: &[Candidate],
    apriori: &Vector3<f64>,
) -> PositionEstimate {
    let mut x = DVector::<f64>::zeros(POSITION_STATE_DIM);
    x.fixed_rows_mut::<3>(0).copy_from(apriori);

    let mut fits = Vec::new();

    for iteration in 0..MAX_ITERATIONS {
        let mut design = residuals::build(ctx, iteration, candidates, &x);
        fits = std::mem::take(&mut design.fits);

        let nv = design.rows();
        if nv < POSITION_STATE_DIM {
            debug!("{} - lack of valid satellites (rows={})", t, nv);
            return PositionEstimate::failure(Error::NotEnoughMeasurements(nv), fits);
        }

        design.whiten();

        let (dx, q) = match least_squares(&design.jacobian, &design.residuals) {
            Ok(estimate) => estimate,
            Err(e) => return PositionEstimate::failure(e, fits),
        };

        x += &dx;

        let norm = dx.norm();
        trace!("{} - iteration #{} |dx|={:.6}", t, iteration, norm);

        if norm < POSITION_CONVERGENCE_M {
            let epoch = t - Duration::from_seconds(x[3] / SPEED_OF_LIGHT_M_S);
            let covariance: Matrix3<f64> = q.fixed_view::<3, 3>(0, 0).into_owned();
            let dop = DilutionOfPrecision::new(&fits, ctx.cfg.elevation_mask_rad);

            let mut solution =
                PVTSolution::new(epoch, x.as_slice(), covariance, design.valid, &dop);

            let validation = SolutionValidator::new(&design.residuals, &dop).validate(ctx.cfg);

            let resolution = match validation {
                Ok(()) => {
                    solution.status = match ctx.cfg.ephemeris {
                        EphemerisSelection::Sbas => SolutionStatus::Sbas,
                        _ => SolutionStatus::Single,
                    };
                    Resolution::Fix(solution)
                },
                Err(cause) => {
                    debug!("{} - solution rejected: {}", t, cause);
                    Resolution::Rejected {
                        solution,
                        cause: cause.into(),
                    }
                },
            };

            return PositionEstimate { resolution, fits };
        }
    }

    PositionEstimate::failure(Error::Divergence(MAX_ITERATIONS), fits)
}
