//! Fixed constants shared across chart derivation

/// Degrees in a full turn of the ecliptic
pub const FULL_CIRCLE_DEG: f64 = 360.0;

/// Width of one zodiac sign in degrees
pub const SIGN_WIDTH_DEG: f64 = 30.0;

/// Number of zodiac signs
pub const SIGN_COUNT: usize = 12;

/// Number of houses (and cusps) in a house system
pub const HOUSE_COUNT: usize = 12;

/// Default aspect orb in degrees
pub const DEFAULT_ORB_DEG: f64 = 6.0;

/// Name used for the rising point; classified by sign but never by house
pub const ASCENDANT: &str = "Ascendant";

/// Bodies supplied by the ephemeris for a natal chart, Sun through Pluto
pub const STANDARD_POINTS: [&str; 10] = [
    "Sun", "Moon", "Mercury", "Venus", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune", "Pluto",
];

/// Tolerance used when checking that cusps span exactly one full turn
pub const CUSP_SPAN_TOLERANCE_DEG: f64 = 1e-9;

/// Environment variable overriding the aspect orb
pub const ENV_ORB: &str = "RUST_CHART_ORB";

/// Environment variable listing points excluded from aspects (comma separated)
pub const ENV_ASPECT_EXCLUDE: &str = "RUST_CHART_ASPECT_EXCLUDE";

/// Environment variable listing points excluded from distributions (comma separated)
pub const ENV_DISTRIBUTION_EXCLUDE: &str = "RUST_CHART_DISTRIBUTION_EXCLUDE";
