//! Synthetic, noise free, observation scenario
use std::str::FromStr;

use crate::{
    bias::{ionosphere_correction, troposphere_correction, BiasRuntime},
    carrier::Carrier,
    cfg::{EphemerisSelection, IonosphereOption, TroposphereOption},
    constants::{EARTH_ANGULAR_VEL_RAD, SPEED_OF_LIGHT_M_S},
    ephemeris::{EphemerisSource, SatelliteState},
    observation::{Code, Observation, Signal},
    position::{geometric_range, Position},
    prelude::{Constellation, Epoch, Vector3, SV},
    tests::NullEnvironment,
};

/// Orbital radius of the synthetic satellites, from the receiver (m)
const SATELLITE_DISTANCE_M: f64 = 2.2E7;

#[derive(Debug, Clone, Copy)]
struct Satellite {
    sv: SV,
    azimuth_deg: f64,
    elevation_deg: f64,
    /// Pseudo range fault (m)
    fault_m: f64,
    snr_dbhz: f64,
    /// Ephemeris can be resolved
    ephemeris: bool,
}

/// [Scenario] describes the receiver and the satellites it tracks.
/// Observations are generated with the very same models the
/// solver uses, so the solution should match the truth.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub t: Epoch,
    pub truth: Position,
    pub velocity: Vector3<f64>,
    pub clock_bias_m: f64,
    pub clock_drift_m_s: f64,
    pub ionosphere: IonosphereOption,
    pub troposphere: TroposphereOption,
    satellites: Vec<Satellite>,
}

impl Scenario {
    /// Static receiver in Toulouse (France), no satellites
    pub fn new() -> Self {
        Self {
            t: Epoch::from_str("2020-06-25T12:00:00 GPST").unwrap(),
            truth: Position::from_geo(Vector3::new(
                43.6_f64.to_radians(),
                1.44_f64.to_radians(),
                150.0,
            )),
            velocity: Vector3::zeros(),
            clock_bias_m: 3000.0,
            clock_drift_m_s: 0.0,
            ionosphere: IonosphereOption::Broadcast,
            troposphere: TroposphereOption::Saastamoinen,
            satellites: Vec::new(),
        }
    }

    /// Inter system offset of this [Constellation] (m)
    pub fn offset_m(constellation: Constellation) -> f64 {
        match constellation {
            Constellation::Glonass => 12.0,
            Constellation::Galileo => -7.5,
            Constellation::BeiDou => 21.0,
            _ => 0.0,
        }
    }

    pub fn with_satellite(mut self, sv: SV, azimuth_deg: f64, elevation_deg: f64) -> Self {
        self.satellites.push(Satellite {
            sv,
            azimuth_deg,
            elevation_deg,
            fault_m: 0.0,
            snr_dbhz: 45.0,
            ephemeris: true,
        });
        self
    }

    /// Adds 8 GPS satellites
    pub fn gps(self) -> Self {
        [
            (1, 10.0, 80.0),
            (3, 45.0, 35.0),
            (7, 100.0, 50.0),
            (8, 160.0, 25.0),
            (11, 210.0, 60.0),
            (14, 260.0, 30.0),
            (17, 310.0, 45.0),
            (22, 20.0, 20.0),
        ]
        .into_iter()
        .fold(self, |s, (prn, az, el)| {
            s.with_satellite(SV::new(Constellation::GPS, prn), az, el)
        })
    }

    /// Adds 4 Galileo satellites
    pub fn galileo(self) -> Self {
        [
            (2, 70.0, 40.0),
            (5, 190.0, 30.0),
            (9, 290.0, 70.0),
            (12, 130.0, 22.0),
        ]
        .into_iter()
        .fold(self, |s, (prn, az, el)| {
            s.with_satellite(SV::new(Constellation::Galileo, prn), az, el)
        })
    }

    /// Adds 4 BeiDou satellites
    pub fn beidou(self) -> Self {
        [
            (20, 30.0, 55.0),
            (25, 150.0, 45.0),
            (30, 240.0, 27.0),
            (35, 340.0, 35.0),
        ]
        .into_iter()
        .fold(self, |s, (prn, az, el)| {
            s.with_satellite(SV::new(Constellation::BeiDou, prn), az, el)
        })
    }

    /// Only keeps the first `n` satellites
    pub fn truncated(mut self, n: usize) -> Self {
        self.satellites.truncate(n);
        self
    }

    /// Biases the pseudo range of this satellite
    pub fn with_fault(mut self, sv: SV, fault_m: f64) -> Self {
        for sat in self.satellites.iter_mut().filter(|sat| sat.sv == sv) {
            sat.fault_m = fault_m;
        }
        self
    }

    pub fn with_snr(mut self, sv: SV, snr_dbhz: f64) -> Self {
        for sat in self.satellites.iter_mut().filter(|sat| sat.sv == sv) {
            sat.snr_dbhz = snr_dbhz;
        }
        self
    }

    /// Ephemeris of this satellite cannot be resolved
    pub fn without_ephemeris(mut self, sv: SV) -> Self {
        for sat in self.satellites.iter_mut().filter(|sat| sat.sv == sv) {
            sat.ephemeris = false;
        }
        self
    }

    /// Moves the receiver (geodetic rad, rad, m)
    pub fn with_truth(mut self, geodetic: Vector3<f64>) -> Self {
        self.truth = Position::from_geo(geodetic);
        self
    }

    pub fn with_velocity(mut self, velocity: Vector3<f64>, clock_drift_m_s: f64) -> Self {
        self.velocity = velocity;
        self.clock_drift_m_s = clock_drift_m_s;
        self
    }

    pub fn with_atmosphere(
        mut self,
        ionosphere: IonosphereOption,
        troposphere: TroposphereOption,
    ) -> Self {
        self.ionosphere = ionosphere;
        self.troposphere = troposphere;
        self
    }

    fn code(sv: SV) -> Code {
        match sv.constellation {
            Constellation::BeiDou => Code::new(2, 'I'),
            _ => Code::new(1, 'C'),
        }
    }

    fn state(&self, sat: &Satellite) -> SatelliteState {
        let prn = sat.sv.prn as f64;
        let los = self
            .truth
            .line_of_sight(sat.azimuth_deg.to_radians(), sat.elevation_deg.to_radians());

        SatelliteState::from_position(self.truth.ecef() + SATELLITE_DISTANCE_M * los)
            .with_velocity(Vector3::new(
                1200.0 - 100.0 * prn,
                -800.0 + 50.0 * prn,
                2500.0 - 30.0 * prn,
            ))
            .with_clock(prn * 1.0E-6, prn * 1.0E-11)
    }

    /// Generates the [Observation]s
    pub fn observations(&self) -> Vec<Observation> {
        let rx = self.truth.ecef();

        self.satellites
            .iter()
            .map(|sat| {
                let sv = sat.sv;
                let state = self.state(sat);
                let code = Self::code(sv);
                let carrier = Carrier::from_code(sv.constellation, code, None).unwrap();
                let frequency = carrier.frequency();

                let (r, los) = geometric_range(&state.position, &rx).unwrap();
                let (azimuth_rad, elevation_rad) = self.truth.azimuth_elevation(&los);

                let rtm = BiasRuntime {
                    t: self.t,
                    sv,
                    position: self.truth,
                    azimuth_rad,
                    elevation_rad,
                };

                let iono_m = ionosphere_correction(self.ionosphere, &NullEnvironment, &rtm)
                    .unwrap()
                    .delay_m
                    * (Carrier::L1.frequency() / frequency).powi(2);

                let tropo_m = troposphere_correction(self.troposphere, &NullEnvironment, &rtm)
                    .unwrap()
                    .delay_m;

                let pr = r + self.clock_bias_m + Self::offset_m(sv.constellation)
                    - SPEED_OF_LIGHT_M_S * state.clock_bias_s
                    + iono_m
                    + tropo_m
                    + sat.fault_m;

                let sat_pos = state.position;
                let sat_vel = state.velocity.unwrap();
                let v = self.velocity;

                let rate = (sat_vel - v).dot(&los)
                    + EARTH_ANGULAR_VEL_RAD / SPEED_OF_LIGHT_M_S
                        * (sat_vel[1] * rx[0] + sat_pos[1] * v[0]
                            - sat_vel[0] * rx[1]
                            - sat_pos[0] * v[1]);

                let doppler_hz = -(rate + self.clock_drift_m_s
                    - SPEED_OF_LIGHT_M_S * state.clock_drift_s_s)
                    * frequency
                    / SPEED_OF_LIGHT_M_S;

                Observation::new(
                    self.t,
                    sv,
                    Signal::pseudo_range(code, pr)
                        .with_doppler(doppler_hz)
                        .with_phase(pr / carrier.wavelength())
                        .with_snr(sat.snr_dbhz),
                )
            })
            .collect()
    }

    /// Satellite position (ECEF m)
    pub fn satellite_position(&self, sv: SV) -> Option<Vector3<f64>> {
        self.satellites
            .iter()
            .find(|sat| sat.sv == sv)
            .map(|sat| self.state(sat).position)
    }
}

impl EphemerisSource for Scenario {
    fn satellite_state(
        &self,
        _: Epoch,
        observation: &Observation,
        _: EphemerisSelection,
    ) -> Option<SatelliteState> {
        self.satellites
            .iter()
            .find(|sat| sat.sv == observation.sv && sat.ephemeris)
            .map(|sat| self.state(sat))
    }
}
