use foundation::math::Mat4;

use crate::components::{BasicMaterial, Geometry, Transform};

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: BasicMaterial,
    pub transform: Transform,
    pub visible: bool,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: BasicMaterial) -> Self {
        Self {
            geometry,
            material,
            transform: Transform::identity(),
            visible: true,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn local_matrix(&self) -> Mat4 {
        self.transform.matrix()
    }
}
