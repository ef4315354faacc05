//! Pseudo range residuals and design matrix
use log::{trace, warn};
use nalgebra::{DMatrix, DVector};

use crate::{
    bias::{
        ionosphere_correction, troposphere_correction, AtmosphereDelay, BiasRuntime,
        EnvironmentalBias, SpacebornBias,
    },
    carrier::Carrier,
    constants::{POSITION_STATE_DIM, SPEED_OF_LIGHT_M_S, UNSEEN_SYSTEM_VARIANCE_M2},
    navigation::{Candidate, Context, SatelliteFit},
    position::{geometric_range, Position},
    prelude::Vector3,
    pseudo_range::corrected_pseudo_range,
    system::{SeenSystems, System},
    variance::pseudo_range_variance,
};

/// One row of the linearized system
struct Row {
    residual_m: f64,
    jacobian: [f64; POSITION_STATE_DIM],
    variance_m2: f64,
}

/// Linearized pseudo range system, around current state.
#[derive(Debug, Clone)]
pub(crate) struct Design {
    /// Residuals (m), measurements then constraints
    pub residuals: DVector<f64>,
    /// Design matrix, one row per residual
    pub jacobian: DMatrix<f64>,
    /// Variance of each row (m²)
    pub variances: DVector<f64>,
    /// Per candidate geometry and fit
    pub fits: Vec<SatelliteFit>,
    /// Number of valid measurements
    pub valid: usize,
}

impl Design {
    pub fn rows(&self) -> usize {
        self.residuals.len()
    }

    /// Divides each row by its standard deviation.
    pub fn whiten(&mut self) {
        for i in 0..self.rows() {
            let sigma = self.variances[i].sqrt();
            self.residuals[i] /= sigma;
            for j in 0..self.jacobian.ncols() {
                self.jacobian[(i, j)] /= sigma;
            }
        }
    }
}

/// Flags the consecutive records of the same satellite:
/// both records of the pair are rejected.
fn duplicates(candidates: &[Candidate]) -> Vec<bool> {
    let mut flags = vec![false; candidates.len()];
    let mut i = 0;

    while i + 1 < candidates.len() {
        let sv = candidates[i].observation.sv;
        if System::from_constellation(sv.constellation).is_some()
            && sv == candidates[i + 1].observation.sv
        {
            flags[i] = true;
            flags[i + 1] = true;
            i += 2;
        } else {
            i += 1;
        }
    }

    flags
}

/// Builds the pseudo range [Design] around state `x`
/// (ECEF position, reference clock and inter system offsets, in meters).
/// The atmosphere is only compensated once the first iteration
/// gave us a meaningful position.
pub(crate) fn build<S: SpacebornBias, B: EnvironmentalBias>(
    ctx: &Context<S, B>,
    iteration: usize,
    candidates: &[Candidate],
    x: &DVector<f64>,
) -> Design {
    let cfg = ctx.cfg;

    let rx = Vector3::new(x[0], x[1], x[2]);
    let dtr_m = x[3];
    let position = Position::from_ecef(rx);

    let duplicated = duplicates(candidates);

    let mut fits = vec![SatelliteFit::default(); candidates.len()];
    let mut rows = Vec::<Row>::with_capacity(candidates.len() + 4);
    let mut seen = SeenSystems::default();
    let mut valid = 0;

    for (i, cd) in candidates.iter().enumerate() {
        let (t, sv) = (cd.observation.epoch, cd.observation.sv);

        let Some(system) = System::from_constellation(sv.constellation) else {
            continue;
        };

        if duplicated[i] {
            if iteration == 0 {
                warn!("{} ({}) - duplicated observation", t, sv);
            }
            continue;
        }

        if cd.excluded {
            continue;
        }

        let Some((r, los)) = geometric_range(&cd.state.position, &rx) else {
            trace!("{} ({}) - invalid geometry", t, sv);
            continue;
        };

        if r <= 0.0 {
            continue;
        }

        let mut elevation_rad = 0.0;
        let mut iono = AtmosphereDelay::default();
        let mut tropo = AtmosphereDelay::default();

        if iteration > 0 {
            let (azimuth_rad, el) = position.azimuth_elevation(&los);

            fits[i].azimuth_rad = azimuth_rad;
            fits[i].elevation_rad = el;

            if el < cfg.elevation_mask_rad {
                trace!("{} ({}) - below elevation mask", t, sv);
                continue;
            }

            if cfg.snr_mask.rejects(0, el, cd.observation.primary.snr_dbhz) {
                trace!("{} ({}) - snr mask", t, sv);
                continue;
            }

            if cfg.ionosphere_free()
                && cfg
                    .snr_mask
                    .rejects(1, el, cd.observation.secondary_snr_dbhz())
            {
                trace!("{} ({}) - snr mask (secondary)", t, sv);
                continue;
            }

            let rtm = BiasRuntime {
                t,
                sv,
                position,
                azimuth_rad,
                elevation_rad: el,
            };

            let Some(delay) =
                ionosphere_correction(cfg.effective_ionosphere(), ctx.environment, &rtm)
            else {
                continue;
            };

            let Some(carrier) = ctx.carrier(&cd.observation) else {
                trace!("{} ({}) - unknown carrier frequency", t, sv);
                continue;
            };

            iono = delay.scaled((Carrier::L1.frequency() / carrier.frequency()).powi(2));

            tropo = match troposphere_correction(
                cfg.effective_troposphere(),
                ctx.environment,
                &rtm,
            ) {
                Some(delay) => delay,
                None => continue,
            };

            elevation_rad = el;
        }

        let Some(pr) = corrected_pseudo_range(&cd.observation, ctx.biases, cfg) else {
            continue;
        };

        let mut residual_m = pr.value_m
            - (r + dtr_m - SPEED_OF_LIGHT_M_S * cd.state.clock_bias_s
                + iono.delay_m
                + tropo.delay_m);

        let mut jacobian = [0.0; POSITION_STATE_DIM];
        jacobian[0] = -los[0];
        jacobian[1] = -los[1];
        jacobian[2] = -los[2];
        jacobian[3] = 1.0;

        if let Some(offset) = system.clock_offset() {
            residual_m -= x[offset.column()];
            jacobian[offset.column()] = 1.0;
            seen.insert(offset);
        }

        fits[i].used = true;
        fits[i].residual_m = residual_m;
        valid += 1;

        let variance_m2 = pseudo_range_variance(cfg, elevation_rad, system)
            + cd.state.variance_m2
            + pr.variance_m2
            + iono.variance_m2
            + tropo.variance_m2;

        rows.push(Row {
            residual_m,
            jacobian,
            variance_m2,
        });
    }

    // unobserved offsets are pinned down
    for offset in seen.unseen() {
        let mut jacobian = [0.0; POSITION_STATE_DIM];
        jacobian[offset.column()] = 1.0;
        rows.push(Row {
            residual_m: 0.0,
            jacobian,
            variance_m2: UNSEEN_SYSTEM_VARIANCE_M2,
        });
    }

    let nv = rows.len();

    Design {
        residuals: DVector::from_iterator(nv, rows.iter().map(|row| row.residual_m)),
        variances: DVector::from_iterator(nv, rows.iter().map(|row| row.variance_m2)),
        jacobian: DMatrix::from_row_iterator(
            nv,
            POSITION_STATE_DIM,
            rows.iter().flat_map(|row| row.jacobian),
        ),
        fits,
        valid,
    }
}
