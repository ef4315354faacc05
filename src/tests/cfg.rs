use std::str::FromStr;

use crate::prelude::{
    Config, EphemerisSelection, Error, IonosphereOption, Method, TroposphereOption,
};

#[test]
fn method_parsing() {
    for (desc, expected) in [
        ("spp", Method::SPP),
        ("SPP", Method::SPP),
        (" single ", Method::SPP),
        ("precise", Method::Precise),
    ] {
        assert_eq!(Method::from_str(desc).unwrap(), expected);
    }

    assert_eq!(Method::from_str("rtk"), Err(Error::UnknownNavigationMethod));
}

#[test]
fn ephemeris_selection_parsing() {
    for selection in [
        EphemerisSelection::Broadcast,
        EphemerisSelection::Precise,
        EphemerisSelection::Sbas,
        EphemerisSelection::SsrApc,
        EphemerisSelection::SsrCom,
    ] {
        let parsed = EphemerisSelection::from_str(&selection.to_string()).unwrap();
        assert_eq!(parsed, selection);
    }

    assert_eq!(
        EphemerisSelection::from_str("brdc+sbas").unwrap(),
        EphemerisSelection::Sbas
    );
    assert_eq!(
        EphemerisSelection::from_str("almanac"),
        Err(Error::UnknownEphemerisSelection("almanac".to_string()))
    );
}

#[test]
fn default_config() {
    let cfg = Config::default();
    assert_eq!(cfg.method, Method::SPP);
    assert_eq!(cfg.ionosphere, IonosphereOption::Broadcast);
    assert_eq!(cfg.troposphere, TroposphereOption::Saastamoinen);
    assert_eq!(cfg.ephemeris, EphemerisSelection::Broadcast);
    assert!((cfg.elevation_mask_rad - 15.0_f64.to_radians()).abs() < 1.0E-12);
    assert_eq!(cfg.max_gdop, 30.0);
    assert!(!cfg.raim);
    assert!(!cfg.snr_mask.enabled);
    assert_eq!(cfg.errors.code_phase_ratio, 100.0);
    assert_eq!(cfg.errors.doppler_hz, 1.0);
}

#[cfg(feature = "serde")]
mod serdes {
    use crate::prelude::{Config, IonosphereOption, Method, SnrMask};

    #[test]
    fn json_round_trip() {
        let cfg = Config::default()
            .with_navigation_method(Method::Precise)
            .with_ionosphere(IonosphereOption::Off)
            .with_raim(true)
            .with_snr_mask(SnrMask::uniform(35.0));

        let content = serde_json::to_string_pretty(&cfg).unwrap();
        let mut parsed: Config = serde_json::from_str(&content).unwrap();

        assert!((parsed.elevation_mask_rad - cfg.elevation_mask_rad).abs() < 1.0E-12);
        parsed.elevation_mask_rad = cfg.elevation_mask_rad;

        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_description() {
        let content = r#"
        {
            "method": "Precise",
            "raim": true,
            "max_gdop": 10.0
        }"#;

        let cfg: Config = serde_json::from_str(content).unwrap();
        let default = Config::default();

        assert_eq!(cfg.method, Method::Precise);
        assert!(cfg.raim);
        assert_eq!(cfg.max_gdop, 10.0);

        assert_eq!(cfg.ionosphere, default.ionosphere);
        assert_eq!(cfg.troposphere, default.troposphere);
        assert_eq!(cfg.errors, default.errors);
        assert_eq!(cfg.constellations, default.constellations);
        assert!(cfg.excluded.is_empty());
        assert!((cfg.elevation_mask_rad - default.elevation_mask_rad).abs() < 1.0E-12);
    }
}
