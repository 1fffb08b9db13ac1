//! Coordinate normalization between storage space and display space.
//!
//! Both surfaces display in Web Mercator (EPSG:3857) metres. RAW datasets are
//! already expressed in that plane (their CRS is overridden to 3857 at
//! ingestion), so RAW coordinates pass through unchanged. REF coordinates are
//! stored as EPSG:4326 `[lon, lat]` and projected only for display.
//!
//! Every conversion of a pair member or a placement goes through
//! [`DatasetSide::to_display`] / [`DatasetSide::to_stored`] so that the stored
//! and displayed coordinate can never drift apart.

use crate::types::{Coord, DatasetSide};

/// WGS84 semi-major axis used by EPSG:3857.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;
/// Half the width of the Web Mercator square.
pub const MERCATOR_HALF_SIZE: f64 = std::f64::consts::PI * EARTH_RADIUS_M;
/// Latitude at which Web Mercator's square extent ends.
pub const MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_6;

/// `[lon, lat]` degrees → EPSG:3857 metres. Latitudes beyond the Mercator
/// extent are clamped to its edge.
#[inline]
pub fn lonlat_to_mercator(c: Coord) -> Coord {
    let x = EARTH_RADIUS_M * c[0].to_radians();
    let lat = c[1].clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT);
    let y = EARTH_RADIUS_M * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    [x, y.clamp(-MERCATOR_HALF_SIZE, MERCATOR_HALF_SIZE)]
}

/// EPSG:3857 metres → `[lon, lat]` degrees. Longitude is wrapped into
/// `[-180, 180)` so views panned across the antimeridian store valid values.
#[inline]
pub fn mercator_to_lonlat(c: Coord) -> Coord {
    let lon = wrap_longitude((c[0] / EARTH_RADIUS_M).to_degrees());
    let lat = (2.0 * (c[1] / EARTH_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    [lon, lat]
}

#[inline]
pub fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

impl DatasetSide {
    /// Storage coordinate → display projection.
    #[inline]
    pub fn to_display(self, stored: Coord) -> Coord {
        match self {
            DatasetSide::Raw => stored,
            DatasetSide::Ref => lonlat_to_mercator(stored),
        }
    }

    /// Display projection → storage coordinate.
    #[inline]
    pub fn to_stored(self, display: Coord) -> Coord {
        match self {
            DatasetSide::Raw => display,
            DatasetSide::Ref => mercator_to_lonlat(display),
        }
    }

    /// Projects a native `[minX, minY, maxX, maxY]` box into display space.
    /// Returns `None` for boxes that are not four finite, ordered values.
    pub fn bounds_to_display(self, bounds: &[f64]) -> Option<[f64; 4]> {
        let [min_x, min_y, max_x, max_y]: [f64; 4] = bounds.try_into().ok()?;
        if ![min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite())
            || min_x > max_x
            || min_y > max_y
        {
            return None;
        }
        let lo = self.to_display([min_x, min_y]);
        let hi = self.to_display([max_x, max_y]);
        Some([lo[0], lo[1], hi[0], hi[1]])
    }
}
