use anise::constants::SPEED_OF_LIGHT_KM_S;

/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = SPEED_OF_LIGHT_KM_S * 1000.0;

/// Earth angular velocity, in WGS84 frame rad/s
pub const EARTH_ANGULAR_VEL_RAD: f64 = 7.2921151467E-5;

/// WGS84 Earth Frame Ellipsoid semi-major axis (meters)
pub const EARTH_SEMI_MAJOR_AXIS_WGS84: f64 = 6378137.0_f64;

/// Number of unknowns of the position solver:
/// ECEF coordinates, reference clock and 4 inter system offsets.
pub(crate) const POSITION_STATE_DIM: usize = 8;

/// Number of unknowns of the velocity solver: ECEF velocity and clock drift.
pub(crate) const VELOCITY_STATE_DIM: usize = 4;

/// Maximal number of Gauss-Newton iterations
pub(crate) const MAX_ITERATIONS: usize = 10;

/// Position solver convergence criteria (norm of the correction, meters)
pub(crate) const POSITION_CONVERGENCE_M: f64 = 1.0E-4;

/// Velocity solver convergence criteria (norm of the correction, m.s⁻¹)
pub(crate) const VELOCITY_CONVERGENCE_M_S: f64 = 1.0E-6;

/// Variance of the constraint applied to inter system offsets
/// of systems we did not observe (m²)
pub(crate) const UNSEEN_SYSTEM_VARIANCE_M2: f64 = 0.01;

/// Ephemeris variance above which a satellite is discarded (m²)
pub(crate) const MAX_EPHEMERIS_VARIANCE_M2: f64 = 300.0 * 300.0;

/// RAIM residual RMS upper bound (meters)
pub(crate) const RAIM_MAX_RMS_M: f64 = 100.0;

/// Minimal number of valid satellites to accept a RAIM exclusion
pub(crate) const RAIM_MIN_VALID_SATELLITES: usize = 5;

/// Minimal number of observations to attempt RAIM
pub(crate) const RAIM_MIN_OBSERVATIONS: usize = 6;

/// Altitude floor applied to the atmosphere inputs of the raw measurement export (meters)
pub(crate) const EXPORT_MIN_ALTITUDE_M: f64 = -100.0;
