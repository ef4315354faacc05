//! Receiver Autonomous Integrity Monitoring: fault detection and exclusion
use log::{debug, info};

use crate::{
    bias::{EnvironmentalBias, SpacebornBias},
    constants::{RAIM_MAX_RMS_M, RAIM_MIN_VALID_SATELLITES},
    navigation::{position, Candidate, Context, SatelliteFit},
    prelude::{Epoch, Vector3},
    solutions::{PVTSolution, Resolution},
};

/// Solution obtained by excluding one [Candidate]
#[derive(Debug, Clone)]
pub(crate) struct Exclusion {
    /// Index of the excluded [Candidate]
    pub excluded: usize,
    pub solution: PVTSolution,
    /// Geometry and fit of all [Candidate]s (excluded one is not used)
    pub fits: Vec<SatelliteFit>,
    /// Residual RMS (m)
    pub rms_m: f64,
}

/// Root mean square of the residuals of the [SatelliteFit]s that were used,
/// along with their number.
fn residual_rms(fits: &[SatelliteFit]) -> (f64, usize) {
    let (sum, n) = fits
        .iter()
        .filter(|fit| fit.used)
        .fold((0.0, 0), |(sum, n), fit| (sum + fit.residual_m.powi(2), n + 1));

    if n == 0 {
        (0.0, 0)
    } else {
        ((sum / n as f64).sqrt(), n)
    }
}

/// Solves again without the `excluded` [Candidate].
/// `baseline` is the geometry of the failed attempt, kept for the excluded satellite.
/// None when the reduced set does not produce a validated solution
/// with enough valid satellites.
pub(crate) fn leave_one_out<S: SpacebornBias, B: EnvironmentalBias>(
    ctx: &Context<S, B>,
    t: Epoch,
    candidates: &[Candidate],
    excluded: usize,
    apriori: &Vector3<f64>,
    baseline: &[SatelliteFit],
) -> Option<Exclusion> {
    let sv = candidates.get(excluded)?.observation.sv;

    let reduced = candidates
        .iter()
        .enumerate()
        .filter_map(|(j, cd)| if j == excluded { None } else { Some(*cd) })
        .collect::<Vec<_>>();

    let estimate = position::estimate(ctx, t, &reduced, apriori);

    let Resolution::Fix(solution) = estimate.resolution else {
        debug!("{} ({}) - raim: exclusion did not help", t, sv);
        return None;
    };

    let (rms_m, valid) = residual_rms(&estimate.fits);

    if valid < RAIM_MIN_VALID_SATELLITES {
        debug!("{} ({}) - raim: not enough satellites ({})", t, sv, valid);
        return None;
    }

    debug!("{} ({}) - raim: exclusion rms={:.3}m", t, sv, rms_m);

    let mut fits = baseline.to_vec();
    let mut reduced_fits = estimate.fits.into_iter();

    for (j, fit) in fits.iter_mut().enumerate() {
        if j == excluded {
            fit.used = false;
        } else if let Some(reduced) = reduced_fits.next() {
            *fit = reduced;
        }
    }

    Some(Exclusion {
        excluded,
        solution,
        fits,
        rms_m,
    })
}

/// Picks the exclusion with the smallest residual RMS, among `(index, rms)` pairs.
/// RMS must not exceed [RAIM_MAX_RMS_M]; the earliest index wins exact ties.
pub(crate) fn select_exclusion<I: IntoIterator<Item = (usize, f64)>>(
    candidates: I,
) -> Option<usize> {
    candidates
        .into_iter()
        .fold(None, |best: Option<(usize, f64)>, (index, rms_m)| {
            if rms_m.is_nan() || rms_m > RAIM_MAX_RMS_M {
                return best;
            }
            match best {
                Some((_, best_rms)) if rms_m >= best_rms => best,
                _ => Some((index, rms_m)),
            }
        })
        .map(|(index, _)| index)
}

/// Tries every single satellite exclusion and retains the one that
/// produces a validated solution with the smallest residual RMS.
/// `baseline` is the geometry of the failed attempt, used for the excluded satellite.
/// None when no exclusion is acceptable.
pub(crate) fn fault_detection_exclusion<S: SpacebornBias, B: EnvironmentalBias>(
    ctx: &Context<S, B>,
    t: Epoch,
    candidates: &[Candidate],
    apriori: &Vector3<f64>,
    baseline: &[SatelliteFit],
) -> Option<Exclusion> {
    let exclusions = (0..candidates.len())
        .filter_map(|i| leave_one_out(ctx, t, candidates, i, apriori, baseline))
        .collect::<Vec<_>>();

    let selected = select_exclusion(exclusions.iter().map(|ex| (ex.excluded, ex.rms_m)))?;

    let exclusion = exclusions
        .into_iter()
        .find(|exclusion| exclusion.excluded == selected)?;

    info!(
        "{} ({}) - excluded by raim (rms={:.3}m)",
        t, candidates[exclusion.excluded].observation.sv, exclusion.rms_m
    );

    Some(exclusion)
}

#[cfg(test)]
mod test {
    use super::{leave_one_out, residual_rms, select_exclusion};
    use crate::{
        cfg::{Config, EphemerisSelection, IonosphereOption, TroposphereOption},
        ephemeris::{EphemerisSource, SatelliteState},
        navigation::{position, Candidate, Context, SatelliteFit},
        prelude::{Constellation, Vector3, SV},
        tests::{NullBiases, NullEnvironment, Scenario},
    };

    #[test]
    fn rms_of_used_residuals() {
        let fit = |used, residual_m| SatelliteFit {
            used,
            residual_m,
            ..Default::default()
        };

        let fits = [fit(true, 3.0), fit(false, 100.0), fit(true, -4.0)];
        let (rms, n) = residual_rms(&fits);
        assert_eq!(n, 2);
        assert!((rms - 12.5_f64.sqrt()).abs() < 1.0E-12);

        assert_eq!(residual_rms(&[fit(false, 1.0)]), (0.0, 0));
    }

    #[test]
    fn exclusion_selection() {
        assert_eq!(select_exclusion(std::iter::empty()), None);

        // smallest rms
        assert_eq!(select_exclusion([(0, 3.0), (1, 1.0), (2, 2.0)]), Some(1));

        // exact ties: earliest wins
        assert_eq!(select_exclusion([(0, 2.0), (3, 1.5), (5, 1.5)]), Some(3));
        assert_eq!(select_exclusion([(4, 1.5), (1, 1.5)]), Some(4));

        // upper bound is inclusive
        assert_eq!(select_exclusion([(2, 100.0)]), Some(2));
        assert_eq!(select_exclusion([(2, 100.0 + 1.0E-9)]), None);
        assert_eq!(select_exclusion([(0, 100.5), (1, 100.0)]), Some(1));
        assert_eq!(select_exclusion([(0, f64::NAN), (1, 7.0)]), Some(1));
    }

    #[test]
    fn single_exclusion() {
        let g11 = SV::new(Constellation::GPS, 11);

        let scenario = Scenario::new()
            .gps()
            .galileo()
            .with_atmosphere(IonosphereOption::Estimated, TroposphereOption::Saastamoinen)
            .with_fault(g11, 50.0);

        let cfg = Config::default().with_ionosphere(IonosphereOption::Estimated);

        let ctx = Context {
            cfg: &cfg,
            biases: &NullBiases,
            environment: &NullEnvironment,
        };

        let candidates = scenario
            .observations()
            .iter()
            .map(|observation| {
                let state = scenario
                    .satellite_state(scenario.t, observation, EphemerisSelection::Broadcast)
                    .unwrap_or_else(SatelliteState::unavailable);
                Candidate::new(*observation, state, &cfg)
            })
            .collect::<Vec<_>>();

        let faulty = candidates
            .iter()
            .position(|cd| cd.observation.sv == g11)
            .unwrap();

        let apriori = Vector3::zeros();
        let baseline = position::estimate(&ctx, scenario.t, &candidates, &apriori).fits;

        let exclusion =
            leave_one_out(&ctx, scenario.t, &candidates, faulty, &apriori, &baseline).unwrap();

        assert_eq!(exclusion.excluded, faulty);
        assert!(exclusion.rms_m < 1.0E-3);
        assert_eq!(exclusion.fits.len(), candidates.len());
        assert!(!exclusion.fits[faulty].used);
        assert_eq!(exclusion.fits.iter().filter(|fit| fit.used).count(), 11);

        let err = (exclusion.solution.position - scenario.truth.ecef()).norm();
        assert!(err < 1.0E-3, "position error {:.6}m", err);

        // out of range
        assert!(leave_one_out(&ctx, scenario.t, &candidates, 99, &apriori, &baseline).is_none());
    }
}
