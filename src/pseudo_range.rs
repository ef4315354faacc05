//! Pseudo range bias correction and combination
use log::trace;

use crate::{
    bias::{CodeBias, GroupDelay, SpacebornBias},
    carrier::Carrier,
    cfg::Config,
    constants::SPEED_OF_LIGHT_M_S,
    observation::{Code, Observation},
    system::System,
};

/// Code bias error std (m)
const CODE_BIAS_ERROR_M: f64 = 0.3;

/// Corrected pseudo range
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PseudoRange {
    /// Corrected value (m)
    pub value_m: f64,
    /// Bias correction variance (m²)
    pub variance_m2: f64,
}

/// Squared frequency ratio
fn gamma(f1: Carrier, f2: Carrier) -> f64 {
    (f1.frequency() / f2.frequency()).powi(2)
}

/// Ionosphere free combination
fn iono_free(p1: f64, p2: f64, gamma: f64) -> f64 {
    (p2 - gamma * p1) / (1.0 - gamma)
}

/// BeiDou group delay (m) that applies to the primary signal
fn beidou_primary_delay_m<S: SpacebornBias>(biases: &S, observation: &Observation) -> f64 {
    let (t, sv) = (observation.epoch, observation.sv);
    let tgd_m = |delay| biases.group_delay(t, sv, delay).to_seconds() * SPEED_OF_LIGHT_M_S;

    let code = observation.primary.code;

    if code.is(2, 'I') {
        tgd_m(GroupDelay::TgdB1I)
    } else if code.is(1, 'P') {
        tgd_m(GroupDelay::TgdB1Cp)
    } else {
        tgd_m(GroupDelay::TgdB1Cp) + tgd_m(GroupDelay::IscB1Cd)
    }
}

/// Corrects the pseudo range of this [Observation], for the on-board
/// biases, or forms the ionosphere free combination (dual frequency).
/// None when the required pseudo ranges were not sampled.
pub(crate) fn corrected_pseudo_range<S: SpacebornBias>(
    observation: &Observation,
    biases: &S,
    cfg: &Config,
) -> Option<PseudoRange> {
    let (t, sv) = (observation.epoch, observation.sv);
    let system = System::from_constellation(sv.constellation)?;

    let dual_freq = cfg.ionosphere_free();

    let mut p1 = observation.primary.pseudo_range_m;
    let mut p2 = observation.secondary_pseudo_range_m();

    if p1 == 0.0 || (dual_freq && p2 == 0.0) {
        trace!("{} ({}) - missing pseudo range", t, sv);
        return None;
    }

    let tgd_m = |delay| biases.group_delay(t, sv, delay).to_seconds() * SPEED_OF_LIGHT_M_S;

    if matches!(system, System::GPS | System::Glonass) {
        if observation.primary.code == Code::new(1, 'C') {
            p1 += biases.code_bias_m(t, sv, CodeBias::P1C1);
        }
        let secondary_code = observation.secondary.map(|signal| signal.code);
        if secondary_code == Some(Code::new(2, 'C')) {
            p2 += biases.code_bias_m(t, sv, CodeBias::P2C2);
        }
    }

    if dual_freq {
        let value_m = match system {
            System::GPS | System::QZSS => iono_free(p1, p2, gamma(Carrier::L1, Carrier::L2)),
            System::Glonass => iono_free(p1, p2, gamma(Carrier::G1(0), Carrier::G2(0))),
            System::Galileo => {
                if cfg.galileo_fnav {
                    p2 -= tgd_m(GroupDelay::BgdE5aE1) - tgd_m(GroupDelay::BgdE5bE1);
                }
                iono_free(p1, p2, gamma(Carrier::E1, Carrier::E5B))
            },
            System::BeiDou => {
                let f1 = if observation.primary.code.is(2, 'I') {
                    Carrier::B1I
                } else {
                    Carrier::B1aB1c
                };
                let gamma = gamma(f1, Carrier::B2iB2b);
                let b1 = beidou_primary_delay_m(biases, observation);
                let b2 = tgd_m(GroupDelay::TgdB2I);
                ((p2 - gamma * p1) - (b2 - gamma * b1)) / (1.0 - gamma)
            },
            System::IRNSS => iono_free(p1, p2, gamma(Carrier::L5, Carrier::S)),
            System::SBAS => p1,
        };

        Some(PseudoRange {
            value_m,
            variance_m2: 0.0,
        })
    } else {
        let value_m = match system {
            System::GPS | System::QZSS => p1 - tgd_m(GroupDelay::Tgd),
            System::Glonass => {
                let gamma = gamma(Carrier::G1(0), Carrier::G2(0));
                let b1 = -tgd_m(GroupDelay::GlonassDtauN);
                p1 - b1 / (gamma - 1.0)
            },
            System::Galileo => {
                if cfg.galileo_fnav {
                    p1 - tgd_m(GroupDelay::BgdE5aE1)
                } else {
                    p1 - tgd_m(GroupDelay::BgdE5bE1)
                }
            },
            System::BeiDou => p1 - beidou_primary_delay_m(biases, observation),
            System::IRNSS => p1 - gamma(Carrier::S, Carrier::L5) * tgd_m(GroupDelay::Tgd),
            System::SBAS => p1,
        };

        Some(PseudoRange {
            value_m,
            variance_m2: CODE_BIAS_ERROR_M * CODE_BIAS_ERROR_M,
        })
    }
}
