use crate::bias::BiasRuntime;

use log::trace;
use std::f64::consts::FRAC_PI_2;

/// Relative humidity of the standard atmosphere
pub(crate) const RELATIVE_HUMIDITY: f64 = 0.7;

/// Saastamoinen model, with standard atmosphere
/// (1013.25 hPa and 15°C at sea level). Returns the slant
/// tropospheric delay (m), null outside [-100m; 10km] altitude.
pub(crate) fn saastamoinen(rtm: &BiasRuntime, humidity: f64) -> f64 {
    const TEMPERATURE_SEA_LEVEL_C: f64 = 15.0;

    let geodetic = rtm.position.geodetic();
    let (lat_rad, alt_m) = (geodetic[0], geodetic[2]);

    if !(-100.0..=1.0E4).contains(&alt_m) || rtm.elevation_rad <= 0.0 {
        return 0.0;
    }

    let h = alt_m.max(0.0);

    let pressure = 1013.25 * (1.0 - 2.2557E-5 * h).powf(5.2568);
    let temperature = TEMPERATURE_SEA_LEVEL_C - 6.5E-3 * h + 273.16;
    let water_vapour =
        6.108 * humidity * ((17.15 * temperature - 4684.0) / (temperature - 38.45)).exp();

    let zenith_angle = FRAC_PI_2 - rtm.elevation_rad;

    let dry = 0.0022768 * pressure
        / (1.0 - 0.00266 * (2.0 * lat_rad).cos() - 0.00028 * h / 1.0E3)
        / zenith_angle.cos();

    let wet = 0.002277 * (1255.0 / temperature + 0.05) * water_vapour / zenith_angle.cos();

    trace!(
        "{} ({}) - saastamoinen dry={:.3}m wet={:.3}m",
        rtm.t,
        rtm.sv,
        dry,
        wet
    );

    dry + wet
}

#[cfg(test)]
mod test {
    use super::{saastamoinen, RELATIVE_HUMIDITY};
    use crate::{
        bias::BiasRuntime,
        position::Position,
        prelude::{Constellation, Epoch, Vector3, SV},
    };
    use std::str::FromStr;

    fn runtime(alt_m: f64, elevation_deg: f64) -> BiasRuntime {
        BiasRuntime {
            t: Epoch::from_str("2020-06-25T12:00:00 GPST").unwrap(),
            sv: SV::new(Constellation::Galileo, 1),
            position: Position::from_geo(Vector3::new(45.0_f64.to_radians(), 0.0, alt_m)),
            azimuth_rad: 0.0,
            elevation_rad: elevation_deg.to_radians(),
        }
    }

    #[test]
    fn zenith_delay() {
        let zenith = saastamoinen(&runtime(0.0, 90.0), RELATIVE_HUMIDITY);
        assert!(
            zenith > 2.3 && zenith < 2.7,
            "zenith delay {} is not realistic",
            zenith
        );

        let mountain = saastamoinen(&runtime(3000.0, 90.0), RELATIVE_HUMIDITY);
        assert!(mountain < zenith, "delay should decrease with altitude");

        let slant = saastamoinen(&runtime(0.0, 15.0), RELATIVE_HUMIDITY);
        assert!(slant > 3.5 * zenith, "slant delay {} is not realistic", slant);
    }

    #[test]
    fn out_of_range() {
        assert_eq!(saastamoinen(&runtime(-150.0, 45.0), RELATIVE_HUMIDITY), 0.0);
        assert_eq!(saastamoinen(&runtime(10.5E3, 45.0), RELATIVE_HUMIDITY), 0.0);
        assert_eq!(saastamoinen(&runtime(10.0, 0.0), RELATIVE_HUMIDITY), 0.0);

        // below sea level (down to -100m) is computed at sea level
        assert_eq!(
            saastamoinen(&runtime(-50.0, 45.0), RELATIVE_HUMIDITY),
            saastamoinen(&runtime(0.0, 45.0), RELATIVE_HUMIDITY),
        );
    }
}
