use crate::constants::*;

/// Great-circle distance in kilometres between two lat/lon points.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();
    EARTH_RADIUS_KM * c
}

pub fn is_valid_latitude(lat: f64) -> bool {
    lat.is_finite() && (MIN_LATITUDE..=MAX_LATITUDE).contains(&lat)
}

pub fn is_valid_longitude(lon: f64) -> bool {
    lon.is_finite() && (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&lon)
}

/// Coarse rectangular prefilter for candidate lookups.
///
/// The box always contains the full circle of `radius_km` around the centre,
/// so exact filtering by haversine afterwards never loses a candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Returns `None` when the box would touch a pole or wrap the
    /// antimeridian; callers then scan without a prefilter.
    pub fn around(lat: f64, lon: f64, radius_km: f64) -> Option<Self> {
        let lat_change = radius_km / KM_PER_DEGREE_LATITUDE * 1.01;
        let min_lat = lat - lat_change;
        let max_lat = lat + lat_change;
        if min_lat <= MIN_LATITUDE || max_lat >= MAX_LATITUDE {
            return None;
        }

        // Longitude degrees shrink towards the poles, so size by the widest edge
        let widest = min_lat.abs().max(max_lat.abs()).to_radians().cos();
        let lon_change = lat_change / widest;
        let min_lon = lon - lon_change;
        let max_lon = lon + lon_change;
        if min_lon <= MIN_LONGITUDE || max_lon >= MAX_LONGITUDE {
            return None;
        }

        Some(Self { min_lat, max_lat, min_lon, max_lon })
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}
