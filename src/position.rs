/// 3D Position coordinates
use crate::{
    constants::{EARTH_ANGULAR_VEL_RAD, EARTH_SEMI_MAJOR_AXIS_WGS84, SPEED_OF_LIGHT_M_S},
    prelude::Vector3,
};

use map_3d::{ecef2geodetic, geodetic2ecef, Ellipsoid};
use nalgebra::Matrix3;

use std::f64::consts::{FRAC_PI_2, PI};

/// [Position] expressed both in ECEF and geodetic coordinates.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// ECEF coordinates in meters
    pub(crate) ecef: Vector3<f64>,
    /// Geodetic coordinates in radians
    pub(crate) geodetic: Vector3<f64>,
}

impl Position {
    /// Builds new [Position] from ECEF coordinates expressed in meter.
    pub fn from_ecef(ecef: Vector3<f64>) -> Self {
        let geodetic = if ecef.norm() > 0.0 {
            let (lat, lon, h) = ecef2geodetic(ecef[0], ecef[1], ecef[2], Ellipsoid::WGS84);
            Vector3::new(lat, lon, h)
        } else {
            // Earth center: latitude is undefined and the
            // position sits one radius below the surface
            Vector3::new(-FRAC_PI_2, 0.0, -EARTH_SEMI_MAJOR_AXIS_WGS84)
        };
        Self { ecef, geodetic }
    }

    /// Builds new [Position] from Geodetic coordinates
    /// - latitude [rad]
    /// - longitude [rad]
    /// - altitude above sea level [m]
    pub fn from_geo(geodetic: Vector3<f64>) -> Self {
        let (lat, lon, alt) = (geodetic[0], geodetic[1], geodetic[2]);
        let (x, y, z) = geodetic2ecef(lat, lon, alt, Ellipsoid::WGS84);
        Self {
            geodetic,
            ecef: Vector3::new(x, y, z),
        }
    }

    /// Returns ECEF coordinates.
    pub fn ecef(&self) -> Vector3<f64> {
        self.ecef
    }

    /// Returns Geodetic coordinates
    /// - latitude [rad]
    /// - longitude [rad]
    /// - altitude above sea level [m]
    pub fn geodetic(&self) -> Vector3<f64> {
        self.geodetic
    }

    /// Copies this [Position] with altitude floored to `min_altitude_m`.
    /// Only the geodetic coordinates are modified.
    pub(crate) fn with_min_altitude(&self, min_altitude_m: f64) -> Self {
        let mut geodetic = self.geodetic;
        geodetic[2] = geodetic[2].max(min_altitude_m);
        Self {
            ecef: self.ecef,
            geodetic,
        }
    }

    /// ECEF to local East North Up rotation matrix
    pub(crate) fn enu_rotation(&self) -> Matrix3<f64> {
        let (lat, lon) = (self.geodetic[0], self.geodetic[1]);
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        Matrix3::new(
            -sin_lon,
            cos_lon,
            0.0,
            -sin_lat * cos_lon,
            -sin_lat * sin_lon,
            cos_lat,
            cos_lat * cos_lon,
            cos_lat * sin_lon,
            sin_lat,
        )
    }

    /// Azimuth and elevation (radians) of a line of sight unit vector (ECEF).
    /// Azimuth is within [0, 2π[.
    pub(crate) fn azimuth_elevation(&self, los: &Vector3<f64>) -> (f64, f64) {
        if self.geodetic[2] <= -EARTH_SEMI_MAJOR_AXIS_WGS84 {
            return (0.0, FRAC_PI_2);
        }

        let enu = self.enu_rotation() * los;

        let azimuth = if enu.dot(&enu) < 1.0E-12 {
            0.0
        } else {
            enu[0].atan2(enu[1])
        };

        let azimuth = if azimuth < 0.0 {
            azimuth + 2.0 * PI
        } else {
            azimuth
        };

        (azimuth, enu[2].asin())
    }

    /// ECEF line of sight unit vector from azimuth and elevation (radians)
    pub(crate) fn line_of_sight(&self, azimuth: f64, elevation: f64) -> Vector3<f64> {
        let (sin_az, cos_az) = azimuth.sin_cos();
        let (sin_el, cos_el) = elevation.sin_cos();
        let enu = Vector3::new(sin_az * cos_el, cos_az * cos_el, sin_el);
        self.enu_rotation().transpose() * enu
    }
}

/// Geometric range (m) between satellite and receiver, including the
/// Earth rotation (Sagnac) correction, and receiver to satellite unit vector.
/// None when the satellite position is not valid (inside the Earth).
pub(crate) fn geometric_range(
    satellite: &Vector3<f64>,
    receiver: &Vector3<f64>,
) -> Option<(f64, Vector3<f64>)> {
    if satellite.norm() < EARTH_SEMI_MAJOR_AXIS_WGS84 {
        return None;
    }

    let delta = satellite - receiver;
    let r = delta.norm();

    if r == 0.0 {
        return None;
    }

    let sagnac = EARTH_ANGULAR_VEL_RAD
        * (satellite[0] * receiver[1] - satellite[1] * receiver[0])
        / SPEED_OF_LIGHT_M_S;

    Some((r + sagnac, delta / r))
}

#[cfg(test)]
mod test {
    use super::{geometric_range, Position};
    use crate::prelude::Vector3;

    #[test]
    fn geodetic_round_trip() {
        let geo = Vector3::new(43.6_f64.to_radians(), 1.44_f64.to_radians(), 150.0);
        let pos = Position::from_geo(geo);
        let back = Position::from_ecef(pos.ecef());
        assert!((back.geodetic()[0] - geo[0]).abs() < 1.0E-9);
        assert!((back.geodetic()[1] - geo[1]).abs() < 1.0E-9);
        assert!((back.geodetic()[2] - geo[2]).abs() < 1.0E-3);
    }

    #[test]
    fn azimuth_elevation() {
        let pos = Position::from_geo(Vector3::new(0.0, 0.0, 0.0));

        // local vertical at (0, 0) is +X
        let (_, el) = pos.azimuth_elevation(&Vector3::new(1.0, 0.0, 0.0));
        assert!((el - std::f64::consts::FRAC_PI_2).abs() < 1.0E-9);

        // north is +Z
        let (az, el) = pos.azimuth_elevation(&Vector3::new(0.0, 0.0, 1.0));
        assert!(az.abs() < 1.0E-9);
        assert!(el.abs() < 1.0E-9);

        // west is -Y
        let (az, _) = pos.azimuth_elevation(&Vector3::new(0.0, -1.0, 0.0));
        assert!((az - 270.0_f64.to_radians()).abs() < 1.0E-9);

        let los = pos.line_of_sight(az, 0.0);
        assert!((los - Vector3::new(0.0, -1.0, 0.0)).norm() < 1.0E-9);
    }

    #[test]
    fn earth_center_geometry() {
        let center = Position::from_ecef(Vector3::zeros());
        let (_, el) = center.azimuth_elevation(&Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(el, std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn sagnac_range() {
        let sat = Vector3::new(2.0E7, 1.0E7, 1.0E7);
        let rx = Vector3::new(6.378E6, 0.0, 0.0);
        let (r, e) = geometric_range(&sat, &rx).unwrap();
        let sagnac = 7.2921151467E-5 * (2.0E7 * 0.0 - 1.0E7 * 6.378E6) / 299792458.0;
        assert!((r - ((sat - rx).norm() + sagnac)).abs() < 1.0E-6);
        assert!((e.norm() - 1.0).abs() < 1.0E-12);

        assert!(geometric_range(&Vector3::new(1.0E6, 0.0, 0.0), &rx).is_none());
    }
}
