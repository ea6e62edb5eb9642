use foundation::math::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    /// Unit vector pointing from the scene towards the light.
    pub direction: Vec3,
}

impl DirectionalLight {
    /// White light shining from `position` towards the origin.
    pub fn white_from(position: Vec3) -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            direction: position.normalize(),
        }
    }
}
