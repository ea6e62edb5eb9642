use std::f64::consts::FRAC_PI_2;

use foundation::math::{Euler, Vec3};
use scene::prefabs::BeamDimensions;
use serde::{Deserialize, Serialize};

use crate::error::LayerError;
use crate::model_transform::{GeoAnchor, ModelTransform};

/// Settings for a [`crate::beam::BeamLayer`].
///
/// Angles are radians; offsets are meters east, south and up from the anchor
/// in the Mercator frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamLayerConfig {
    pub id: String,
    pub anchor: GeoAnchor,
    pub offset_m: [f64; 3],
    pub rotation_rad: [f64; 3],
    pub scale_multiplier: f64,
    /// Local rotation of the beam mesh inside the model.
    pub mesh_rotation_rad: [f64; 3],
    pub beam: BeamDimensions,
    /// Positions of the two white directional lights; normalized on use.
    pub light_positions: Vec<[f64; 3]>,
}

impl Default for BeamLayerConfig {
    fn default() -> Self {
        Self {
            id: "3d-model".to_string(),
            anchor: GeoAnchor::new(30.5107, 50.4174, 0.0),
            offset_m: [0.7, 0.7, 0.3],
            rotation_rad: [FRAC_PI_2, FRAC_PI_2, 0.0],
            scale_multiplier: 3.0,
            mesh_rotation_rad: [-FRAC_PI_2, 0.0, 0.0],
            beam: BeamDimensions::default(),
            light_positions: vec![[0.0, -70.0, 100.0], [0.0, 70.0, 100.0]],
        }
    }
}

impl BeamLayerConfig {
    pub fn validate(&self) -> Result<(), LayerError> {
        if self.id.is_empty() {
            return Err(LayerError::InvalidConfig {
                layer: self.id.clone(),
                reason: "id must not be empty".to_string(),
            });
        }
        self.anchor
            .validate()
            .map_err(|source| LayerError::InvalidAnchor {
                layer: self.id.clone(),
                source,
            })?;
        if !(self.scale_multiplier.is_finite() && self.scale_multiplier > 0.0) {
            return Err(LayerError::InvalidConfig {
                layer: self.id.clone(),
                reason: format!("scale multiplier {} must be positive", self.scale_multiplier),
            });
        }
        let vectors = [
            ("offset_m", self.offset_m),
            ("rotation_rad", self.rotation_rad),
            ("mesh_rotation_rad", self.mesh_rotation_rad),
        ];
        let lights = self.light_positions.iter().map(|&p| ("light_positions", p));
        for (field, v) in vectors.into_iter().chain(lights) {
            if !v.iter().all(|c| c.is_finite()) {
                return Err(LayerError::InvalidConfig {
                    layer: self.id.clone(),
                    reason: format!("{field} {v:?} must be finite"),
                });
            }
        }
        let dims = self.beam;
        if !(dims.height_m > 0.0 && dims.bottom_m >= 0.0 && dims.top_m >= 0.0) {
            return Err(LayerError::InvalidConfig {
                layer: self.id.clone(),
                reason: "beam dimensions must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn model_transform(&self) -> ModelTransform {
        ModelTransform::from_anchor(
            self.anchor,
            Vec3::from(self.offset_m),
            euler(self.rotation_rad),
            self.scale_multiplier,
        )
    }

    pub fn mesh_rotation(&self) -> Euler {
        euler(self.mesh_rotation_rad)
    }
}

fn euler(v: [f64; 3]) -> Euler {
    Euler::new(v[0], v[1], v[2])
}
