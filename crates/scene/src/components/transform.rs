use foundation::math::{Euler, Mat4, Vec3};

/// Local transform of a scene node.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Euler,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Euler::default(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn translate(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    pub fn rotate(rotation: Euler) -> Self {
        Self {
            rotation,
            ..Self::identity()
        }
    }

    /// `T * R * S`.
    pub fn matrix(&self) -> Mat4 {
        let p = self.position;
        let s = self.scale;
        Mat4::translation(p.x, p.y, p.z) * self.rotation.to_matrix() * Mat4::scale(s.x, s.y, s.z)
    }
}
