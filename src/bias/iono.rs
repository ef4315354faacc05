use crate::{
    bias::BiasRuntime,
    constants::SPEED_OF_LIGHT_M_S,
    prelude::TimeScale,
};

use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Klobuchar Model, broadcast by GPS and QZSS.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KbModel {
    /// alpha coefficients (s, s/sc, s/sc², s/sc³)
    pub alpha: (f64, f64, f64, f64),
    /// beta coefficients (s, s/sc, s/sc², s/sc³)
    pub beta: (f64, f64, f64, f64),
}

impl KbModel {
    /// Coefficients applied when no broadcast coefficients are known (2004/1/1)
    pub const DEFAULT: Self = Self {
        alpha: (0.1118E-07, -0.7451E-08, -0.5961E-07, 0.1192E-06),
        beta: (0.1167E+06, -0.2294E+06, -0.1311E+06, 0.1049E+07),
    };

    /// True when all coefficients are null
    pub fn is_null(&self) -> bool {
        let (a0, a1, a2, a3) = self.alpha;
        let (b0, b1, b2, b3) = self.beta;
        [a0, a1, a2, a3, b0, b1, b2, b3]
            .iter()
            .all(|coef| *coef == 0.0)
    }

    /// Ionospheric delay on L1 (m), for this [BiasRuntime].
    /// Null coefficients are replaced by [KbModel::DEFAULT].
    pub(crate) fn bias_m(&self, rtm: &BiasRuntime) -> f64 {
        let model = if self.is_null() { &Self::DEFAULT } else { self };

        let geodetic = rtm.position.geodetic();
        let (lat_rad, long_rad, alt_m) = (geodetic[0], geodetic[1], geodetic[2]);

        if alt_m < -1.0E3 || rtm.elevation_rad <= 0.0 {
            return 0.0;
        }

        let (azim_rad, elev_sc) = (rtm.azimuth_rad, rtm.elevation_rad / PI);

        // earth centered angle (semi-circle)
        let psi = 0.0137 / (elev_sc + 0.11) - 0.022;

        // subionospheric latitude/longitude (semi-circle)
        let phi_i = (lat_rad / PI + psi * azim_rad.cos()).clamp(-0.416, 0.416);
        let lambda_i = long_rad / PI + psi * azim_rad.sin() / (phi_i * PI).cos();

        // geomagnetic latitude (semi-circle)
        let phi_m = phi_i + 0.064 * ((lambda_i - 1.617) * PI).cos();

        let t_gpst = rtm
            .t
            .to_duration_in_time_scale(TimeScale::GPST)
            .to_seconds();

        // local time
        let mut t_s = 43.2E3 * lambda_i + t_gpst;
        t_s -= (t_s / 86.4E3).floor() * 86.4E3;

        // slant factor
        let f = 1.0 + 16.0 * (0.53 - elev_sc).powi(3);

        let (a0, a1, a2, a3) = model.alpha;
        let (b0, b1, b2, b3) = model.beta;

        let amp = (a0 + phi_m * (a1 + phi_m * (a2 + phi_m * a3))).max(0.0);
        let per = (b0 + phi_m * (b1 + phi_m * (b2 + phi_m * b3))).max(72.0E3);

        let x = 2.0 * PI * (t_s - 50.4E3) / per;

        let delay_s = if x.abs() < 1.57 {
            5.0E-9 + amp * (1.0 + x * x * (-0.5 + x * x / 24.0))
        } else {
            5.0E-9
        };

        SPEED_OF_LIGHT_M_S * f * delay_s
    }
}
