use log::debug;

use crate::{
    cfg::{Config, EphemerisSelection},
    constants::MAX_EPHEMERIS_VARIANCE_M2,
    observation::Observation,
    prelude::{Constellation, Epoch, Vector3},
};

/// Satellite health, as reported by the navigation message.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Health {
    /// Satellite usable
    #[default]
    Healthy,
    /// Raw health flags (non zero), as broadcast
    Unhealthy(u32),
    /// No valid ephemeris for this satellite
    Unavailable,
}

/// [SatelliteState] at signal transmission time,
/// as resolved by your [EphemerisSource].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct SatelliteState {
    /// ECEF position (m)
    pub position: Vector3<f64>,
    /// ECEF velocity (m.s⁻¹), when it could be determined
    pub velocity: Option<Vector3<f64>>,
    /// Onboard clock offset to system time (s)
    pub clock_bias_s: f64,
    /// Onboard clock drift (s.s⁻¹)
    pub clock_drift_s_s: f64,
    /// Position and clock variance (m²)
    pub variance_m2: f64,
    /// Satellite [Health]
    pub health: Health,
}

impl SatelliteState {
    /// Builds a healthy [SatelliteState] from ECEF position (m)
    pub fn from_position(position: Vector3<f64>) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Copies and returns [SatelliteState] with ECEF velocity (m.s⁻¹)
    pub fn with_velocity(mut self, velocity: Vector3<f64>) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Copies and returns [SatelliteState] with clock bias (s) and drift (s.s⁻¹)
    pub fn with_clock(mut self, clock_bias_s: f64, clock_drift_s_s: f64) -> Self {
        self.clock_bias_s = clock_bias_s;
        self.clock_drift_s_s = clock_drift_s_s;
        self
    }

    /// Copies and returns [SatelliteState] with updated [Health]
    pub fn with_health(mut self, health: Health) -> Self {
        self.health = health;
        self
    }

    /// Copies and returns [SatelliteState] with updated variance (m²)
    pub fn with_variance(mut self, variance_m2: f64) -> Self {
        self.variance_m2 = variance_m2;
        self
    }

    /// State used when the [EphemerisSource] could not resolve the satellite
    pub(crate) fn unavailable() -> Self {
        Self {
            health: Health::Unavailable,
            ..Default::default()
        }
    }

    /// Velocity, when known and not null
    pub(crate) fn known_velocity(&self) -> Option<Vector3<f64>> {
        self.velocity.filter(|v| v.norm() > 0.0)
    }
}

/// [EphemerisSource] is the orbit and clock collaborator of the [Solver].
/// It evaluates broadcast or precise products, depending on your setup.
pub trait EphemerisSource {
    /// Resolve the [SatelliteState] that produced this [Observation].
    ///
    /// The state must describe the satellite at signal transmission time,
    /// which you can deduce from the sampling [Epoch] and pseudo range,
    /// expressed in ECEF at reception time.
    /// The clock bias must include the relativistic correction.
    ///
    /// Return None when this satellite cannot be resolved: it is then
    /// excluded from this epoch.
    fn satellite_state(
        &self,
        t: Epoch,
        observation: &Observation,
        selection: EphemerisSelection,
    ) -> Option<SatelliteState>;
}

/// Health and eligibility policy.
/// Returns true when this satellite must not contribute.
pub(crate) fn excluded(observation: &Observation, state: &SatelliteState, cfg: &Config) -> bool {
    let (t, sv) = (observation.epoch, observation.sv);

    if state.health == Health::Unavailable {
        debug!("{} ({}) - ephemeris unavailable", t, sv);
        return true;
    }

    if cfg.excluded.contains(&sv) {
        debug!("{} ({}) - excluded by user", t, sv);
        return true;
    }

    if !cfg.included.contains(&sv) && !cfg.selects(sv.constellation) {
        debug!("{} ({}) - constellation not selected", t, sv);
        return true;
    }

    if let Health::Unhealthy(mut flags) = state.health {
        if sv.constellation == Constellation::QZSS {
            // LEX health
            flags &= 0xfe;
        }
        if flags != 0 {
            debug!("{} ({}) - unhealthy satellite (flags={:x})", t, sv, flags);
            return true;
        }
    }

    if state.variance_m2 > MAX_EPHEMERIS_VARIANCE_M2 {
        debug!(
            "{} ({}) - invalid ura std={:.1}",
            t,
            sv,
            state.variance_m2.sqrt()
        );
        return true;
    }

    false
}

#[cfg(doc)]
use crate::prelude::Solver;
