//! Normalized Web Mercator coordinates.
//!
//! The map engine renders in a square world where `x` and `y` run from 0 to 1
//! (`y` grows southwards) and `z` is altitude expressed in the same units. This
//! module mirrors that convention exactly so matrices produced by the map can be
//! combined with positions produced here.

use super::Vec3;

/// Mean Earth radius used by the map engine (meters).
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;
/// Equatorial circumference for [`EARTH_MEAN_RADIUS_M`] (meters).
pub const EARTH_CIRCUMFERENCE_M: f64 = 2.0 * std::f64::consts::PI * EARTH_MEAN_RADIUS_M;
/// Latitude at which the Mercator world becomes square (degrees).
pub const MERCATOR_MAX_LAT_DEG: f64 = 85.051_128_779_806_59;

/// Circumference of the parallel at `lat_deg` (meters).
pub fn circumference_at_latitude(lat_deg: f64) -> f64 {
    EARTH_CIRCUMFERENCE_M * lat_deg.to_radians().cos()
}

pub fn mercator_x_from_lng(lng_deg: f64) -> f64 {
    (180.0 + lng_deg) / 360.0
}

pub fn mercator_y_from_lat(lat_deg: f64) -> f64 {
    let lat = lat_deg.to_radians();
    (180.0 - (std::f64::consts::FRAC_PI_4 + 0.5 * lat).tan().ln().to_degrees()) / 360.0
}

pub fn mercator_z_from_altitude(altitude_m: f64, lat_deg: f64) -> f64 {
    altitude_m / circumference_at_latitude(lat_deg)
}

pub fn lng_from_mercator_x(x: f64) -> f64 {
    x * 360.0 - 180.0
}

pub fn lat_from_mercator_y(y: f64) -> f64 {
    let y2 = 180.0 - y * 360.0;
    (360.0 / std::f64::consts::PI) * y2.to_radians().exp().atan() - 90.0
}

/// `1 / cos(lat)`: how much the projection stretches distances at `lat_deg`.
pub fn mercator_scale(lat_deg: f64) -> f64 {
    1.0 / lat_deg.to_radians().cos()
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MercatorCoordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl MercatorCoordinate {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_lng_lat(lng_deg: f64, lat_deg: f64, altitude_m: f64) -> Self {
        Self {
            x: mercator_x_from_lng(lng_deg),
            y: mercator_y_from_lat(lat_deg),
            z: mercator_z_from_altitude(altitude_m, lat_deg),
        }
    }

    pub fn to_lng_lat(self) -> (f64, f64) {
        (lng_from_mercator_x(self.x), lat_from_mercator_y(self.y))
    }

    pub fn to_altitude(self) -> f64 {
        self.z * circumference_at_latitude(lat_from_mercator_y(self.y))
    }

    /// Size of one real-world meter in Mercator units at this coordinate.
    ///
    /// Depends only on latitude; altitude does not change it.
    pub fn meter_in_mercator_units(self) -> f64 {
        (1.0 / EARTH_CIRCUMFERENCE_M) * mercator_scale(lat_from_mercator_y(self.y))
    }

    pub fn as_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}
