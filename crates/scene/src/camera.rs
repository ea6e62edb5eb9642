use foundation::math::Mat4;

/// Camera whose view matrix is identity.
///
/// Custom map layers receive a complete view-projection from the host, so the
/// whole camera lives in `projection_matrix` and is replaced every frame.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Camera {
    pub projection_matrix: Mat4,
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix
    }
}
