//! Placement of real-world-sized models in the map's Mercator world.

use foundation::math::{Euler, MERCATOR_MAX_LAT_DEG, MercatorCoordinate, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::AnchorError;

/// Geographic point a model is attached to.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoAnchor {
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default)]
    pub altitude_m: f64,
}

impl GeoAnchor {
    pub const fn new(longitude: f64, latitude: f64, altitude_m: f64) -> Self {
        Self {
            longitude,
            latitude,
            altitude_m,
        }
    }

    pub fn validate(&self) -> Result<(), AnchorError> {
        if !(self.longitude.is_finite() && self.latitude.is_finite() && self.altitude_m.is_finite())
        {
            return Err(AnchorError::NonFinite);
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(AnchorError::LongitudeOutOfRange(self.longitude));
        }
        if !(-MERCATOR_MAX_LAT_DEG..=MERCATOR_MAX_LAT_DEG).contains(&self.latitude) {
            return Err(AnchorError::LatitudeOutOfRange(self.latitude));
        }
        Ok(())
    }

    pub fn to_mercator(&self) -> MercatorCoordinate {
        MercatorCoordinate::from_lng_lat(self.longitude, self.latitude, self.altitude_m)
    }
}

/// Translation, rotation and uniform scale taking model meters into Mercator
/// units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ModelTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub translate_z: f64,
    pub rotate_x: f64,
    pub rotate_y: f64,
    pub rotate_z: f64,
    pub scale: f64,
}

impl ModelTransform {
    /// Place a model at `anchor`, shifted by `offset_m` meters.
    ///
    /// Units-per-meter is sampled once at the anchor and used for both the
    /// offset and the scale.
    pub fn from_anchor(
        anchor: GeoAnchor,
        offset_m: Vec3,
        rotation: Euler,
        scale_multiplier: f64,
    ) -> Self {
        let origin = anchor.to_mercator();
        let units_per_meter = origin.meter_in_mercator_units();
        let translate = origin.as_vec3() + offset_m * units_per_meter;

        Self {
            translate_x: translate.x,
            translate_y: translate.y,
            translate_z: translate.z,
            rotate_x: rotation.x,
            rotate_y: rotation.y,
            rotate_z: rotation.z,
            scale: units_per_meter * scale_multiplier,
        }
    }

    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.translate_x, self.translate_y, self.translate_z)
    }

    pub fn rotation(&self) -> Euler {
        Euler::new(self.rotate_x, self.rotate_y, self.rotate_z)
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoAnchor, ModelTransform};
    use crate::error::AnchorError;
    use foundation::math::{EARTH_CIRCUMFERENCE_M, Euler, Vec3};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    const KYIV: GeoAnchor = GeoAnchor::new(30.5107, 50.4174, 0.0);

    #[test]
    fn kyiv_beam_placement() {
        let t = ModelTransform::from_anchor(
            KYIV,
            Vec3::new(0.7, 0.7, 0.3),
            Euler::new(FRAC_PI_2, FRAC_PI_2, 0.0),
            3.0,
        );

        // Expected values computed straight from the projection formulas.
        let lat = 50.4174_f64.to_radians();
        let x = (180.0 + 30.5107) / 360.0;
        let y = (180.0 - (180.0 / PI) * (PI / 4.0 + lat / 2.0).tan().ln()) / 360.0;
        let upm = 1.0 / (EARTH_CIRCUMFERENCE_M * lat.cos());

        assert_close(t.translate_x, x + 0.7 * upm, 1e-15);
        assert_close(t.translate_y, y + 0.7 * upm, 1e-15);
        assert_close(t.translate_z, 0.3 * upm, 1e-20);
        assert_close(t.scale, 3.0 * upm, 1e-20);
        assert_eq!(t.rotation(), Euler::new(FRAC_PI_2, FRAC_PI_2, 0.0));
    }

    #[test]
    fn placement_is_deterministic() {
        let make = || ModelTransform::from_anchor(KYIV, Vec3::new(0.7, 0.7, 0.3), Euler::default(), 3.0);
        assert_eq!(make(), make());
    }

    #[test]
    fn scale_is_positive_and_proportional() {
        let one = ModelTransform::from_anchor(KYIV, Vec3::ZERO, Euler::default(), 1.0);
        let three = ModelTransform::from_anchor(KYIV, Vec3::ZERO, Euler::default(), 3.0);
        assert!(one.scale > 0.0);
        assert_close(three.scale / one.scale, 3.0, 1e-12);
        assert_close(one.scale, KYIV.to_mercator().meter_in_mercator_units(), 0.0);
    }

    #[test]
    fn altitude_raises_z_without_changing_scale() {
        let ground = ModelTransform::from_anchor(KYIV, Vec3::ZERO, Euler::default(), 1.0);
        let raised = ModelTransform::from_anchor(
            GeoAnchor::new(KYIV.longitude, KYIV.latitude, 100.0),
            Vec3::ZERO,
            Euler::default(),
            1.0,
        );
        assert_close(raised.translate_z, 100.0 * raised.scale, 1e-18);
        assert_eq!(ground.scale, raised.scale);
    }

    #[test]
    fn validate_rejects_bad_coordinates() {
        assert_eq!(KYIV.validate(), Ok(()));
        assert_eq!(
            GeoAnchor::new(181.0, 0.0, 0.0).validate(),
            Err(AnchorError::LongitudeOutOfRange(181.0))
        );
        assert_eq!(
            GeoAnchor::new(0.0, 89.0, 0.0).validate(),
            Err(AnchorError::LatitudeOutOfRange(89.0))
        );
        assert_eq!(
            GeoAnchor::new(f64::NAN, 0.0, 0.0).validate(),
            Err(AnchorError::NonFinite)
        );
    }
}
