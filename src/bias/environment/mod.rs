use crate::{
    bias::{AtmosphereDelay, BiasRuntime, KbModel},
    prelude::{Constellation, Epoch},
};

#[cfg(doc)]
use crate::prelude::{IonosphereOption, TroposphereOption};

/// [EnvironmentalBias] gives access to the atmosphere models
/// that are not evaluated internally. Every method has a default
/// implementation, so you only need to implement the ones
/// your [IonosphereOption] and [TroposphereOption] require.
pub trait EnvironmentalBias {
    /// Provide the Klobuchar coefficients broadcast by this [Constellation]
    /// (GPS or QZSS). When GPS coefficients are not known, the default
    /// coefficients are used; when QZSS coefficients are not known,
    /// the ionosphere is not compensated.
    fn klobuchar(&self, _t: Epoch, _constellation: Constellation) -> Option<KbModel> {
        None
    }

    /// Provide the L1 ionospheric delay and its variance, from the SBAS
    /// ionosphere grid, for this [BiasRuntime].
    /// Returning None excludes the satellite.
    fn sbas_ionosphere(&self, _rtm: &BiasRuntime) -> Option<AtmosphereDelay> {
        None
    }

    /// Provide the L1 ionospheric delay and its variance, from IONEX
    /// total electron content maps, for this [BiasRuntime].
    /// Returning None excludes the satellite.
    fn ionex_ionosphere(&self, _rtm: &BiasRuntime) -> Option<AtmosphereDelay> {
        None
    }

    /// Provide the tropospheric delay and its variance, from the SBAS
    /// troposphere model, for this [BiasRuntime].
    /// Returning None excludes the satellite.
    fn sbas_troposphere(&self, _rtm: &BiasRuntime) -> Option<AtmosphereDelay> {
        None
    }
}
