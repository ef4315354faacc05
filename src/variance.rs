//! Pseudo range measurement error model
use crate::{cfg::Config, system::System};

/// Elevation floor of the error model (rad)
const MIN_ELEVATION_RAD: f64 = 5.0 * std::f64::consts::PI / 180.0;

/// Ionosphere free combination noise amplification (3²)
const IONO_FREE_VARIANCE_FACTOR: f64 = 9.0;

/// Pseudo range variance (m²), for this elevation (rad) and [System].
pub(crate) fn pseudo_range_variance(cfg: &Config, elevation_rad: f64, system: System) -> f64 {
    let fact = system.error_factor();
    let el = elevation_rad.max(MIN_ELEVATION_RAD);
    let errors = &cfg.errors;

    let mut var = errors.code_phase_ratio.powi(2)
        * (errors.base_m.powi(2) + errors.elevation_m.powi(2) / el.sin());

    if cfg.ionosphere_free() {
        var *= IONO_FREE_VARIANCE_FACTOR;
    }

    fact.powi(2) * var
}
