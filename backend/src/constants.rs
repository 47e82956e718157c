// =============================================================================
// Nearby Backend Constants
// =============================================================================
// Tunables for discovery, presence and profile validation. Values that can be
// overridden at runtime are read through `Config::from_env`.

// =============================================================================
// SERVER CONFIGURATION
// =============================================================================

/// Default HTTP port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Default size of the Postgres connection pool
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Log directives used when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "nearby=info,tower_http=debug,server=debug,seed=info,migrate=info";

/// Header set by the upstream auth gateway with the caller's user id
pub const USER_ID_HEADER: &str = "x-user-id";

// =============================================================================
// GEOGRAPHY
// =============================================================================

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Approximate length of one degree of latitude
pub const KM_PER_DEGREE_LATITUDE: f64 = 111.0;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

// =============================================================================
// DISCOVERY
// =============================================================================

/// Search radius used when the client does not send `maxDistance`
pub const NEARBY_DEFAULT_DISTANCE_KM: f64 = 50.0;

/// Upper bound for `maxDistance` (half the Earth's circumference, roughly)
pub const NEARBY_MAX_DISTANCE_KM: f64 = 20_000.0;

/// Result size when the client does not send `limit`
pub const NEARBY_DEFAULT_LIMIT: usize = 20;

/// Hard cap on `limit`
pub const NEARBY_MAX_LIMIT: usize = 100;

/// A traveler counts as online if active within this many seconds
pub const ONLINE_WINDOW_SECS: i64 = 300;

// =============================================================================
// PROFILES
// =============================================================================

pub const MAX_DISPLAY_NAME_CHARS: usize = 64;

pub const MAX_INTERESTS: usize = 30;

pub const MAX_INTEREST_CHARS: usize = 32;
