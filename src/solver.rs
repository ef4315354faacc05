//! PVT solver
use std::collections::HashMap;

use log::{debug, info, warn};
use map_3d::rad2deg;

use crate::{
    bias::{EnvironmentalBias, SpacebornBias},
    cfg::{Config, Method},
    constants::{RAIM_MIN_OBSERVATIONS, SPEED_OF_LIGHT_M_S},
    ephemeris::{EphemerisSource, SatelliteState},
    export::raw_measurements,
    navigation::{position, raim, velocity, Candidate, Context, SatelliteFit},
    observation::Observation,
    prelude::{Error, Vector3, SV},
    solutions::{Output, PVTSolution, Resolution, SatelliteStatus},
};

/// [Solver] resolves single point [PVTSolution]s, one epoch at a time.
/// It holds no state between two resolutions: you're in charge of feeding
/// the previous solution back, to speed up the convergence.
pub struct Solver<E: EphemerisSource, S: SpacebornBias, B: EnvironmentalBias> {
    /// Solver parametrization
    pub cfg: Config,
    /// [EphemerisSource]
    ephemeris: E,
    /// [SpacebornBias] source
    biases: S,
    /// [EnvironmentalBias] source
    environment: B,
}

impl<E: EphemerisSource, S: SpacebornBias, B: EnvironmentalBias> Solver<E, S, B> {
    /// Creates a new [Solver].
    /// ## Inputs
    /// - cfg: Solver [Config]
    /// - ephemeris: [EphemerisSource] that resolves the satellite states
    /// - biases: [SpacebornBias] source (group delays, code biases)
    /// - environment: [EnvironmentalBias] source (atmosphere models)
    pub fn new(cfg: &Config, ephemeris: E, biases: S, environment: B) -> Self {
        info!(
            "{} solver: ionosphere={} troposphere={} mask={:.1}° raim={}",
            cfg.method,
            cfg.effective_ionosphere(),
            cfg.effective_troposphere(),
            rad2deg(cfg.elevation_mask_rad),
            cfg.raim,
        );

        if cfg.method == Method::Precise {
            debug!("precise method: broadcast ionosphere and saastamoinen troposphere");
        }

        Self {
            cfg: cfg.clone(),
            ephemeris,
            biases,
            environment,
        }
    }

    /// [PVTSolution] resolution attempt.
    /// ## Inputs
    /// - observations: all [Observation]s of this epoch. They should be sorted
    ///   by satellite: consecutive records of the same satellite are rejected.
    /// - apriori: previous [PVTSolution], if any. Its position is our
    ///   initial guess, the Earth center is used otherwise.
    /// ## Returns
    /// - [Output], that always describes the satellites
    ///   and contains the [Resolution] outcome.
    pub fn resolve(&self, observations: &[Observation], apriori: Option<&PVTSolution>) -> Output {
        let Some(first) = observations.first() else {
            warn!("no observation data");
            return Output {
                resolution: Resolution::Failure(Error::NoObservations),
                satellites: HashMap::new(),
                measurements: Vec::new(),
            };
        };

        let t = first.epoch;

        let ctx = Context {
            cfg: &self.cfg,
            biases: &self.biases,
            environment: &self.environment,
        };

        let candidates = observations
            .iter()
            .map(|observation| {
                let state = self
                    .ephemeris
                    .satellite_state(t, observation, self.cfg.ephemeris)
                    .unwrap_or_else(SatelliteState::unavailable);
                Candidate::new(*observation, state, &self.cfg)
            })
            .collect::<Vec<_>>();

        let apriori = apriori
            .map(|solution| solution.position)
            .unwrap_or_else(Vector3::zeros);

        let estimate = position::estimate(&ctx, t, &candidates, &apriori);

        let mut resolution = estimate.resolution;
        let mut fits = estimate.fits;

        let rx = resolution
            .solution()
            .map(|solution| solution.position)
            .unwrap_or(apriori);

        let measurements = raw_measurements(&ctx, &candidates, &fits, &rx);

        if !resolution.is_fix() && self.cfg.raim && candidates.len() >= RAIM_MIN_OBSERVATIONS {
            if let Some(error) = resolution.error() {
                debug!("{} - {}: attempting fault exclusion", t, error);
            }

            match raim::fault_detection_exclusion(&ctx, t, &candidates, &apriori, &fits) {
                Some(exclusion) => {
                    fits = exclusion.fits;
                    resolution = Resolution::Fix(exclusion.solution);
                },
                None => {
                    debug!("{} - raim: no valid exclusion", t);
                },
            }
        }

        // velocity follows any populated solution, validated or rejected.
        // A failure leaves no position to linearize around.
        if let Some(solution) = resolution.solution_mut() {
            if let Some(estimate) = velocity::estimate(&ctx, &candidates, &fits, &solution.position)
            {
                solution.velocity = estimate.velocity;
                solution.velocity_covariance = estimate.covariance;
                solution.clock_drift_s_s = estimate.clock_drift_m_s / SPEED_OF_LIGHT_M_S;
            }
        }

        match &resolution {
            Resolution::Fix(solution) => {
                let geo = solution.geodetic();
                debug!(
                    "{} - {} solution: lat={:.6}° lon={:.6}° alt={:.3}m nsat={} gdop={:.2}",
                    t,
                    solution.status,
                    rad2deg(geo[0]),
                    rad2deg(geo[1]),
                    geo[2],
                    solution.satellites,
                    solution.gdop,
                );
            },
            Resolution::Rejected { cause, .. } => warn!("{} - {}", t, cause),
            Resolution::Failure(e) => warn!("{} - {}", t, e),
        }

        Output {
            satellites: satellite_status(&candidates, &fits),
            resolution,
            measurements,
        }
    }
}

/// Status of every observed satellite. The last record wins
/// when a satellite appears several times.
fn satellite_status(
    candidates: &[Candidate],
    fits: &[SatelliteFit],
) -> HashMap<SV, SatelliteStatus> {
    let mut satellites = HashMap::with_capacity(candidates.len());

    for (cd, fit) in candidates.iter().zip(fits.iter()) {
        let status = satellites
            .entry(cd.observation.sv)
            .or_insert_with(SatelliteStatus::default);

        status.azimuth_rad = fit.azimuth_rad;
        status.elevation_rad = fit.elevation_rad;
        status.snr_dbhz = cd.observation.primary.snr_dbhz;

        if fit.used {
            status.valid = true;
            status.residual_m = fit.residual_m;
        }
    }

    satellites
}
