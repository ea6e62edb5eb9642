use std::fmt;
use std::path::{Path, PathBuf};

use foundation::math::MERCATOR_MAX_LAT_DEG;
use layers::{BeamLayerConfig, LayerError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_STYLE_URL: &str = "https://drsrvsyvyuem5.cloudfront.net/freya_map_fake_s3.json";

/// Host map settings. Style and tile protocols are carried through for the
/// record; the headless host does not fetch or draw them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    pub style_url: String,
    /// `[longitude, latitude]` in degrees.
    pub center: [f64; 2],
    pub zoom: f64,
    pub pitch_deg: f64,
    pub bearing_deg: f64,
    pub attribution_compact: bool,
    pub render_world_copies: bool,
    pub show_logo: bool,
    pub tile_protocols: Vec<String>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            style_url: DEFAULT_STYLE_URL.to_string(),
            center: [30.5107, 50.4174],
            zoom: 20.0,
            pitch_deg: 60.0,
            bearing_deg: 0.0,
            attribution_compact: true,
            render_world_copies: false,
            show_logo: true,
            tile_protocols: vec!["pmtiles".to_string()],
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub map: MapOptions,
    pub viewport: Viewport,
    /// Upper bound on rendered frames. The beam asks for a repaint every frame,
    /// so without a bound the loop never ends.
    pub frames: u64,
    pub beam: BeamLayerConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            map: MapOptions::default(),
            viewport: Viewport::default(),
            frames: 120,
            beam: BeamLayerConfig::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    Invalid(String),
    Layer(LayerError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse config {}: {source}", path.display())
            }
            ConfigError::Invalid(reason) => write!(f, "invalid config: {reason}"),
            ConfigError::Layer(err) => write!(f, "invalid layer config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Layer(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frames == 0 {
            return Err(ConfigError::Invalid("frames must be at least 1".to_string()));
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "viewport {}x{} has no area",
                self.viewport.width, self.viewport.height
            )));
        }
        let map = &self.map;
        if !(0.0..=24.0).contains(&map.zoom) {
            return Err(ConfigError::Invalid(format!("zoom {} outside 0..=24", map.zoom)));
        }
        if !(0.0..85.0).contains(&map.pitch_deg) {
            return Err(ConfigError::Invalid(format!(
                "pitch {} outside 0..85 degrees",
                map.pitch_deg
            )));
        }
        if !(map.center[0].is_finite() && map.center[1].is_finite() && map.bearing_deg.is_finite())
        {
            return Err(ConfigError::Invalid("map center and bearing must be finite".to_string()));
        }
        if !(-MERCATOR_MAX_LAT_DEG..=MERCATOR_MAX_LAT_DEG).contains(&map.center[1]) {
            return Err(ConfigError::Invalid(format!(
                "map center latitude {} outside the Mercator range",
                map.center[1]
            )));
        }
        self.beam.validate().map_err(ConfigError::Layer)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ViewerConfig};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_json_is_the_default_scene() {
        let cfg: ViewerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, ViewerConfig::default());
        assert_eq!(cfg.map.zoom, 20.0);
        assert_eq!(cfg.map.pitch_deg, 60.0);
        assert_eq!(cfg.map.tile_protocols, vec!["pmtiles".to_string()]);
        assert!(!cfg.map.render_world_copies);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn nested_sections_override_independently() {
        let cfg: ViewerConfig = serde_json::from_str(
            r#"{
                "viewport": { "width": 640 },
                "frames": 3,
                "beam": { "scale_multiplier": 5.0 }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.viewport.width, 640);
        assert_eq!(cfg.viewport.height, 720);
        assert_eq!(cfg.frames, 3);
        assert_eq!(cfg.beam.scale_multiplier, 5.0);
        assert_eq!(cfg.beam.id, "3d-model");
    }

    #[test]
    fn zero_viewport_is_invalid() {
        let mut cfg = ViewerConfig::default();
        cfg.viewport.height = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn polar_map_center_is_invalid_even_with_a_valid_anchor() {
        let mut cfg = ViewerConfig::default();
        cfg.map.center[1] = 89.9;
        assert!(cfg.beam.anchor.validate().is_ok());
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn bad_beam_anchor_surfaces_as_layer_error() {
        let mut cfg = ViewerConfig::default();
        cfg.beam.anchor.latitude = 89.9;
        assert!(matches!(cfg.validate(), Err(ConfigError::Layer(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ViewerConfig::load(std::path::Path::new("/nonexistent/beacon.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/beacon.json"));
    }
}
