//! Corrected measurements, for downstream (fusion) processing
use itertools::Itertools;
use log::debug;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    bias::{
        ionosphere_correction, troposphere_correction, BiasRuntime, EnvironmentalBias,
        SpacebornBias,
    },
    carrier::Carrier,
    constants::{EXPORT_MIN_ALTITUDE_M, SPEED_OF_LIGHT_M_S},
    navigation::{Candidate, Context, SatelliteFit},
    position::Position,
    prelude::{Epoch, TimeScale, Vector3, SV},
    pseudo_range::corrected_pseudo_range,
};

/// [RawMeasurement] of one satellite: pseudo range with satellite clock,
/// ionosphere and troposphere delays removed, plus everything needed
/// to form it again.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RawMeasurement {
    /// Sampling [Epoch]
    pub epoch: Epoch,
    /// GPS week
    pub gpst_week: u32,
    /// GPS time of week (s)
    pub gpst_time_of_week_s: f64,
    /// Number of observations in this epoch
    pub observations: usize,
    /// Satellite
    pub sv: SV,
    /// False when the satellite was rejected (health, selection, ephemeris accuracy)
    pub valid: bool,
    /// Primary signal SNR (dB.Hz)
    pub snr_dbhz: f64,
    /// Azimuth (°)
    pub azimuth_deg: f64,
    /// Elevation (°)
    pub elevation_deg: f64,
    /// Satellite ECEF position (m)
    pub satellite_position: Vector3<f64>,
    /// Primary carrier wavelength (m)
    pub wavelength_m: f64,
    /// Satellite clock error (m)
    pub satellite_clock_m: f64,
    /// Ionospheric delay on the primary carrier (m)
    pub ionosphere_m: f64,
    /// Tropospheric delay (m)
    pub troposphere_m: f64,
    /// Pseudo range, as observed (m)
    pub raw_pseudo_range_m: f64,
    /// Corrected pseudo range (m)
    pub pseudo_range_m: f64,
    /// Carrier phase (cycles)
    pub phase_cycles: f64,
}

/// Forms the [RawMeasurement]s from these [Candidate]s,
/// with the geometry of the latest resolution attempt and
/// the receiver `position` (ECEF m) we obtained.
pub(crate) fn raw_measurements<S: SpacebornBias, B: EnvironmentalBias>(
    ctx: &Context<S, B>,
    candidates: &[Candidate],
    fits: &[SatelliteFit],
    position: &Vector3<f64>,
) -> Vec<RawMeasurement> {
    let cfg = ctx.cfg;

    // NLOS mitigation
    let position = Position::from_ecef(*position).with_min_altitude(EXPORT_MIN_ALTITUDE_M);

    let mut measurements = Vec::with_capacity(candidates.len());

    for (cd, fit) in candidates.iter().zip(fits.iter()) {
        let (t, sv) = (cd.observation.epoch, cd.observation.sv);

        let Some(carrier) = ctx.carrier(&cd.observation) else {
            continue;
        };

        let Some(pr) = corrected_pseudo_range(&cd.observation, ctx.biases, cfg) else {
            continue;
        };

        let rtm = BiasRuntime {
            t,
            sv,
            position,
            azimuth_rad: fit.azimuth_rad,
            elevation_rad: fit.elevation_rad,
        };

        let Some(iono) = ionosphere_correction(cfg.ionosphere, ctx.environment, &rtm) else {
            continue;
        };

        let iono = iono.scaled((Carrier::L1.frequency() / carrier.frequency()).powi(2));

        let Some(tropo) = troposphere_correction(cfg.troposphere, ctx.environment, &rtm) else {
            continue;
        };

        if fit.elevation_rad <= cfg.elevation_mask_rad {
            debug!(
                "{} ({}) - elevation {:.2}° below mask: not exported",
                t,
                sv,
                fit.elevation_rad.to_degrees()
            );
            continue;
        }

        let (gpst_week, tow_nanos) = t.to_time_scale(TimeScale::GPST).to_time_of_week();
        let satellite_clock_m = cd.state.clock_bias_s * SPEED_OF_LIGHT_M_S;

        measurements.push(RawMeasurement {
            epoch: t,
            gpst_week,
            gpst_time_of_week_s: tow_nanos as f64 * 1.0E-9,
            observations: candidates.len(),
            sv,
            valid: !cd.excluded,
            snr_dbhz: cd.observation.primary.snr_dbhz,
            azimuth_deg: fit.azimuth_rad.to_degrees(),
            elevation_deg: fit.elevation_rad.to_degrees(),
            satellite_position: cd.state.position,
            wavelength_m: carrier.wavelength(),
            satellite_clock_m,
            ionosphere_m: iono.delay_m,
            troposphere_m: tropo.delay_m,
            raw_pseudo_range_m: cd.observation.primary.pseudo_range_m,
            pseudo_range_m: pr.value_m + satellite_clock_m - iono.delay_m - tropo.delay_m,
            phase_cycles: cd.observation.primary.phase_cycles,
        });
    }

    for (constellation, count) in measurements
        .iter()
        .map(|m| m.sv.constellation)
        .counts()
        .iter()
        .sorted_by_key(|(constellation, _)| constellation.to_string())
    {
        debug!("{} - exported {} measurements", constellation, count);
    }

    measurements
}
