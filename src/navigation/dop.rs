use nalgebra::DMatrix;

use crate::navigation::SatelliteFit;

/// [DilutionOfPrecision] of the geometry that formed a solution.
/// All terms are null when the geometry does not allow to define them.
#[derive(Debug, Clone, Default, Copy, PartialEq)]
pub(crate) struct DilutionOfPrecision {
    /// Geometric DOP
    pub gdop: f64,

    /// Position DOP
    pub pdop: f64,

    /// Horizontal DOP
    pub hdop: f64,

    /// Vertical DOP
    pub vdop: f64,

    /// Temporal DOP
    pub tdop: f64,
}

impl DilutionOfPrecision {
    /// Creates new [DilutionOfPrecision] from the satellites that
    /// contributed, in local (ENU) geometry. Satellites below the
    /// elevation mask, or on/below the horizon, do not count.
    pub fn new(fits: &[SatelliteFit], elevation_mask_rad: f64) -> Self {
        let rows = fits
            .iter()
            .filter(|fit| {
                fit.used && fit.elevation_rad >= elevation_mask_rad && fit.elevation_rad > 0.0
            })
            .flat_map(|fit| {
                let (sin_az, cos_az) = fit.azimuth_rad.sin_cos();
                let (sin_el, cos_el) = fit.elevation_rad.sin_cos();
                [cos_el * sin_az, cos_el * cos_az, sin_el, 1.0]
            })
            .collect::<Vec<_>>();

        let n = rows.len() / 4;
        if n < 4 {
            return Self::default();
        }

        let g = DMatrix::from_row_slice(n, 4, &rows);

        let Some(q) = (g.transpose() * &g).try_inverse() else {
            return Self::default();
        };

        Self {
            gdop: q.trace().sqrt(),
            pdop: (q[(0, 0)] + q[(1, 1)] + q[(2, 2)]).sqrt(),
            hdop: (q[(0, 0)] + q[(1, 1)]).sqrt(),
            vdop: q[(2, 2)].sqrt(),
            tdop: q[(3, 3)].sqrt(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::DilutionOfPrecision;
    use crate::navigation::SatelliteFit;

    fn fit(azimuth_deg: f64, elevation_deg: f64) -> SatelliteFit {
        SatelliteFit {
            azimuth_rad: azimuth_deg.to_radians(),
            elevation_rad: elevation_deg.to_radians(),
            used: true,
            residual_m: 0.0,
        }
    }

    #[test]
    fn insufficient_geometry() {
        let fits = [fit(0.0, 45.0), fit(120.0, 45.0), fit(240.0, 45.0)];
        let dop = DilutionOfPrecision::new(&fits, 0.0);
        assert_eq!(dop, DilutionOfPrecision::default());

        // 4th satellite below the mask does not count
        let fits = [
            fit(0.0, 45.0),
            fit(120.0, 45.0),
            fit(240.0, 45.0),
            fit(60.0, 10.0),
        ];
        let dop = DilutionOfPrecision::new(&fits, 15.0_f64.to_radians());
        assert_eq!(dop.gdop, 0.0);
    }

    #[test]
    fn zenith_and_ring() {
        let fits = [
            fit(0.0, 90.0),
            fit(0.0, 30.0),
            fit(90.0, 30.0),
            fit(180.0, 30.0),
            fit(270.0, 30.0),
        ];
        let dop = DilutionOfPrecision::new(&fits, 0.0);
        assert!(dop.gdop > 1.0);
        assert!(dop.gdop < 10.0);
        assert!((dop.pdop.powi(2) - dop.hdop.powi(2) - dop.vdop.powi(2)).abs() < 1.0E-9);
        assert!((dop.gdop.powi(2) - dop.pdop.powi(2) - dop.tdop.powi(2)).abs() < 1.0E-9);
        assert!(dop.hdop > 0.0);
    }

    #[test]
    fn unused_satellites() {
        let mut fits = vec![
            fit(0.0, 90.0),
            fit(0.0, 30.0),
            fit(90.0, 30.0),
            fit(180.0, 30.0),
        ];
        assert!(DilutionOfPrecision::new(&fits, 0.0).gdop > 0.0);
        fits[0].used = false;
        assert_eq!(DilutionOfPrecision::new(&fits, 0.0).gdop, 0.0);
    }
}
