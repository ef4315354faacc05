use log::debug;

use crate::{
    cfg::{IonosphereOption, TroposphereOption},
    position::Position,
    prelude::{Constellation, Epoch, SV},
};

mod environment;
mod iono;
mod spaceborn;
mod tropo;

pub use environment::EnvironmentalBias;
pub use iono::KbModel;
pub use spaceborn::{CodeBias, GroupDelay, SpacebornBias};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Broadcast ionosphere model error factor
const BROADCAST_IONO_ERROR_FACTOR: f64 = 0.5;

/// Uncompensated ionosphere delay std (m)
const IONO_ERROR_M: f64 = 5.0;

/// Uncompensated troposphere delay std (m)
const TROPO_ERROR_M: f64 = 3.0;

/// Saastamoinen model error std (m)
const SAASTAMOINEN_ERROR_M: f64 = 0.3;

/// [BiasRuntime] describes the ongoing conditions
/// when an atmosphere model is evaluated.
#[derive(Debug, Clone, Copy)]
pub struct BiasRuntime {
    /// Sampling [Epoch]
    pub t: Epoch,
    /// Satellite
    pub sv: SV,
    /// Receiver [Position]
    pub position: Position,
    /// Satellite azimuth (rad)
    pub azimuth_rad: f64,
    /// Satellite elevation (rad)
    pub elevation_rad: f64,
}

/// Atmospheric delay (m) and its variance (m²)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AtmosphereDelay {
    /// Delay (m)
    pub delay_m: f64,
    /// Variance (m²)
    pub variance_m2: f64,
}

impl AtmosphereDelay {
    pub fn new(delay_m: f64, variance_m2: f64) -> Self {
        Self {
            delay_m,
            variance_m2,
        }
    }

    /// Delay that is not compensated, with given a priori std (m)
    fn uncompensated(std_m: f64) -> Self {
        Self::new(0.0, std_m * std_m)
    }

    /// Rescales both delay and variance
    pub(crate) fn scaled(&self, factor: f64) -> Self {
        Self::new(self.delay_m * factor, self.variance_m2 * factor)
    }
}

/// Ionospheric delay on L1, as defined by the [IonosphereOption].
/// None when the selected model could not be evaluated.
pub(crate) fn ionosphere_correction<B: EnvironmentalBias>(
    option: IonosphereOption,
    environment: &B,
    rtm: &BiasRuntime,
) -> Option<AtmosphereDelay> {
    let broadcast = |model: KbModel| {
        let delay_m = model.bias_m(rtm);
        let std_m = delay_m * BROADCAST_IONO_ERROR_FACTOR;
        AtmosphereDelay::new(delay_m, std_m * std_m)
    };

    match option {
        IonosphereOption::Broadcast => {
            let model = environment
                .klobuchar(rtm.t, Constellation::GPS)
                .unwrap_or_default();
            Some(broadcast(model))
        },
        IonosphereOption::Sbas => {
            let delay = environment.sbas_ionosphere(rtm);
            if delay.is_none() {
                debug!("{} ({}) - sbas ionosphere unavailable", rtm.t, rtm.sv);
            }
            delay
        },
        IonosphereOption::Ionex => {
            let delay = environment.ionex_ionosphere(rtm);
            if delay.is_none() {
                debug!("{} ({}) - ionex ionosphere unavailable", rtm.t, rtm.sv);
            }
            delay
        },
        IonosphereOption::Qzss => {
            let delay = environment
                .klobuchar(rtm.t, Constellation::QZSS)
                .filter(|model| !model.is_null())
                .map(broadcast)
                .unwrap_or_default();
            Some(delay)
        },
        IonosphereOption::Off => Some(AtmosphereDelay::uncompensated(IONO_ERROR_M)),
        IonosphereOption::IonosphereFree | IonosphereOption::Estimated => {
            Some(AtmosphereDelay::default())
        },
    }
}

/// Tropospheric delay, as defined by the [TroposphereOption].
/// None when the selected model could not be evaluated.
pub(crate) fn troposphere_correction<B: EnvironmentalBias>(
    option: TroposphereOption,
    environment: &B,
    rtm: &BiasRuntime,
) -> Option<AtmosphereDelay> {
    match option {
        TroposphereOption::Saastamoinen | TroposphereOption::Estimated => {
            let delay_m = tropo::saastamoinen(rtm, tropo::RELATIVE_HUMIDITY);
            let std_m = SAASTAMOINEN_ERROR_M / (rtm.elevation_rad.sin() + 0.1);
            Some(AtmosphereDelay::new(delay_m, std_m * std_m))
        },
        TroposphereOption::Sbas => {
            let delay = environment.sbas_troposphere(rtm);
            if delay.is_none() {
                debug!("{} ({}) - sbas troposphere unavailable", rtm.t, rtm.sv);
            }
            delay
        },
        TroposphereOption::Off => Some(AtmosphereDelay::uncompensated(TROPO_ERROR_M)),
    }
}
