use std::fmt;

use scene::MeshId;
use scene::components::GeometryError;

#[derive(Debug, Clone, PartialEq)]
pub enum GpuError {
    InvalidGeometry {
        mesh: MeshId,
        source: GeometryError,
    },
    /// The renderer was bound with a depth format but the frame has no depth view.
    MissingDepthTarget,
    Adapter(String),
    Device(String),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::InvalidGeometry { mesh, source } => {
                write!(f, "mesh {} has invalid geometry: {source}", mesh.0)
            }
            GpuError::MissingDepthTarget => write!(f, "frame target has no depth attachment"),
            GpuError::Adapter(msg) => write!(f, "adapter request failed: {msg}"),
            GpuError::Device(msg) => write!(f, "device request failed: {msg}"),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::InvalidGeometry { source, .. } => Some(source),
            _ => None,
        }
    }
}
