use crate::components::DirectionalLight;
use crate::entity::{LightId, MeshId};
use crate::mesh::Mesh;

/// Flat scene graph: directional lights plus meshes, both in insertion order.
#[derive(Debug, Default, Clone)]
pub struct Scene {
    next_mesh: u32,
    next_light: u32,
    lights: Vec<(LightId, DirectionalLight)>,
    meshes: Vec<(MeshId, Mesh)>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_light(&mut self, light: DirectionalLight) -> LightId {
        let id = LightId(self.next_light);
        self.next_light += 1;
        self.lights.push((id, light));
        id
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        let id = MeshId(self.next_mesh);
        self.next_mesh += 1;
        self.meshes.push((id, mesh));
        id
    }

    pub fn remove_mesh(&mut self, id: MeshId) -> Option<Mesh> {
        let pos = self.meshes.iter().position(|(m, _)| *m == id)?;
        Some(self.meshes.remove(pos).1)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.iter().find(|(m, _)| *m == id).map(|(_, mesh)| mesh)
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes
            .iter_mut()
            .find(|(m, _)| *m == id)
            .map(|(_, mesh)| mesh)
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        self.meshes.iter().map(|(id, mesh)| (*id, mesh))
    }

    pub fn lights(&self) -> impl Iterator<Item = (LightId, &DirectionalLight)> {
        self.lights.iter().map(|(id, light)| (*id, light))
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }
}
