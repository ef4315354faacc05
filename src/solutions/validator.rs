use log::debug;
use nalgebra::DVector;
use thiserror::Error;

use crate::{cfg::Config, constants::POSITION_STATE_DIM, navigation::DilutionOfPrecision};

/// Chi-square critical values (α = 0.001), indexed by degrees of freedom - 1
const CHISQR: [f64; 100] = [
    10.8, 13.8, 16.3, 18.5, 20.5, 22.5, 24.3, 26.1, 27.9, 29.6, 31.3, 32.9, 34.5, 36.1, 37.7, 39.3,
    40.8, 42.3, 43.8, 45.3, 46.8, 48.3, 49.7, 51.2, 52.6, 54.1, 55.5, 56.9, 58.3, 59.7, 61.1, 62.5,
    63.9, 65.2, 66.6, 68.0, 69.3, 70.7, 72.1, 73.4, 74.7, 76.0, 77.3, 78.6, 80.0, 81.3, 82.6, 84.0,
    85.4, 86.7, 88.0, 89.3, 90.6, 91.9, 93.3, 94.7, 96.0, 97.4, 98.7, 100.0, 101.0, 102.0, 103.0,
    104.0, 105.0, 107.0, 108.0, 109.0, 110.0, 112.0, 113.0, 114.0, 115.0, 116.0, 118.0, 119.0,
    120.0, 122.0, 123.0, 125.0, 126.0, 127.0, 128.0, 129.0, 131.0, 132.0, 133.0, 134.0, 135.0,
    137.0, 138.0, 139.0, 140.0, 142.0, 143.0, 144.0, 145.0, 147.0, 148.0, 149.0,
];

/// Reasons a converged solution may be rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidationCause {
    /// Residuals are not consistent with the measurement error model
    #[error("chi-square error nv={nv} vv={vv:.1} cs={critical:.1}")]
    ChiSquare {
        /// Number of rows
        nv: usize,
        /// Sum of squared weighted residuals
        vv: f64,
        /// Critical value
        critical: f64,
    },
    /// Poor geometry
    #[error("gdop error nv={nv} gdop={gdop:.1}")]
    Gdop {
        /// Number of rows
        nv: usize,
        /// Geometric dilution of precision
        gdop: f64,
    },
}

/// Chi-square critical value for this number of degrees of freedom
fn chi_square_critical(dof: usize) -> f64 {
    CHISQR
        .get(dof.saturating_sub(1))
        .copied()
        .unwrap_or(CHISQR[CHISQR.len() - 1])
}

pub(crate) struct SolutionValidator<'a> {
    /// Weighted residuals
    residuals: &'a DVector<f64>,
    /// Geometry
    dop: &'a DilutionOfPrecision,
}

impl<'a> SolutionValidator<'a> {
    pub fn new(residuals: &'a DVector<f64>, dop: &'a DilutionOfPrecision) -> Self {
        Self { residuals, dop }
    }

    /// Solution validation process
    pub fn validate(&self, cfg: &Config) -> Result<(), InvalidationCause> {
        let nv = self.residuals.len();
        let vv = self.residuals.dot(self.residuals);

        if nv > POSITION_STATE_DIM {
            let critical = chi_square_critical(nv - POSITION_STATE_DIM);
            if vv > critical {
                debug!("chi-square test failed: vv={:.3} > {:.3}", vv, critical);
                return Err(InvalidationCause::ChiSquare { nv, vv, critical });
            }
        }

        let gdop = self.dop.gdop;
        if gdop <= 0.0 || gdop > cfg.max_gdop {
            return Err(InvalidationCause::Gdop { nv, gdop });
        }

        Ok(())
    }
}
