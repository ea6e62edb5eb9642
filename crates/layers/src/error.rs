use std::fmt;

use gpu::GpuError;

#[derive(Debug, Clone, PartialEq)]
pub enum AnchorError {
    NonFinite,
    LongitudeOutOfRange(f64),
    LatitudeOutOfRange(f64),
}

impl fmt::Display for AnchorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorError::NonFinite => write!(f, "anchor coordinates must be finite"),
            AnchorError::LongitudeOutOfRange(v) => {
                write!(f, "longitude {v} outside [-180, 180]")
            }
            AnchorError::LatitudeOutOfRange(v) => {
                write!(f, "latitude {v} outside the Mercator range")
            }
        }
    }
}

impl std::error::Error for AnchorError {}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerError {
    NotAttached(String),
    AlreadyAttached(String),
    DuplicateId(String),
    UnknownLayer(String),
    InvalidAnchor { layer: String, source: AnchorError },
    InvalidConfig { layer: String, reason: String },
    Gpu { layer: String, source: GpuError },
}

impl fmt::Display for LayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerError::NotAttached(id) => write!(f, "layer {id} is not attached"),
            LayerError::AlreadyAttached(id) => write!(f, "layer {id} is already attached"),
            LayerError::DuplicateId(id) => write!(f, "a layer with id {id} already exists"),
            LayerError::UnknownLayer(id) => write!(f, "no layer with id {id}"),
            LayerError::InvalidAnchor { layer, source } => {
                write!(f, "layer {layer} has an invalid anchor: {source}")
            }
            LayerError::InvalidConfig { layer, reason } => {
                write!(f, "layer {layer} is misconfigured: {reason}")
            }
            LayerError::Gpu { layer, source } => write!(f, "layer {layer} failed to render: {source}"),
        }
    }
}

impl std::error::Error for LayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LayerError::InvalidAnchor { source, .. } => Some(source),
            LayerError::Gpu { source, .. } => Some(source),
            _ => None,
        }
    }
}
