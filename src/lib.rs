#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod bias;
mod carrier;
mod cfg;
mod constants;
mod ephemeris;
mod error;
mod export;
mod navigation;
mod observation;
mod position;
mod pseudo_range;
mod solutions;
mod solver;
mod system;
mod variance;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::bias::{
        AtmosphereDelay, BiasRuntime, CodeBias, EnvironmentalBias, GroupDelay, KbModel,
        SpacebornBias,
    };
    pub use crate::carrier::Carrier;
    pub use crate::cfg::{
        Config, EphemerisSelection, IonosphereOption, MeasurementErrors, Method, SnrMask,
        TroposphereOption,
    };
    pub use crate::constants::{
        EARTH_ANGULAR_VEL_RAD, EARTH_SEMI_MAJOR_AXIS_WGS84, SPEED_OF_LIGHT_M_S,
    };
    pub use crate::ephemeris::{EphemerisSource, Health, SatelliteState};
    pub use crate::error::Error;
    pub use crate::export::RawMeasurement;
    pub use crate::observation::{Code, Observation, Signal};
    pub use crate::position::Position;
    pub use crate::solutions::{
        InvalidationCause, Output, PVTSolution, Resolution, SatelliteStatus, SolutionStatus,
    };
    pub use crate::solver::Solver;
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::Vector3;
}

// pub export
pub use error::Error;
