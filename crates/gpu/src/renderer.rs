use foundation::math::Mat4;
use scene::components::BasicMaterial;
use scene::{Camera, MeshId, Scene};

use crate::error::GpuError;

/// Options fixed when a renderer is bound to a host context.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RendererOptions {
    /// Request multisampling. Honoured only if the host's targets are multisampled.
    pub antialias: bool,
    /// Clear the color and depth attachments before drawing. Must stay off when
    /// drawing into buffers the host owns.
    pub auto_clear: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            antialias: false,
            auto_clear: true,
        }
    }
}

impl RendererOptions {
    /// Settings for drawing into a host map's shared context.
    pub fn shared_context() -> Self {
        Self {
            antialias: true,
            auto_clear: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub draw_calls: u32,
    pub triangles: u32,
}

/// One mesh draw with its final clip-space matrix.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawMesh {
    pub mesh: MeshId,
    pub mvp: Mat4,
    pub material: BasicMaterial,
    pub index_count: u32,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderFrame {
    pub draws: Vec<DrawMesh>,
}

impl RenderFrame {
    /// Build the draw list for `scene` as seen by `camera`.
    ///
    /// Opaque meshes come first, then transparent ones; insertion order is kept
    /// inside each group so the list is deterministic.
    pub fn collect(scene: &Scene, camera: &Camera) -> Self {
        let view_proj = camera.view_projection();
        let mut opaque = Vec::new();
        let mut transparent = Vec::new();

        for (id, mesh) in scene.meshes() {
            if !mesh.visible || mesh.geometry.indices.is_empty() {
                continue;
            }
            let draw = DrawMesh {
                mesh: id,
                mvp: view_proj * mesh.local_matrix(),
                material: mesh.material,
                index_count: mesh.geometry.indices.len() as u32,
            };
            if mesh.material.transparent {
                transparent.push(draw);
            } else {
                opaque.push(draw);
            }
        }

        opaque.extend(transparent);
        Self { draws: opaque }
    }

    pub fn stats(&self) -> RenderStats {
        RenderStats {
            draw_calls: self.draws.len() as u32,
            triangles: self.draws.iter().map(|d| d.index_count / 3).sum(),
        }
    }
}

/// A renderer that draws a [`Scene`] into a rendering context it does not own.
///
/// The host context is borrowed on every call; implementations must not keep
/// it past the call or clear buffers unless `auto_clear` was requested.
pub trait SceneRenderer: Sized {
    /// Shared context owned by the host (device, queue, formats).
    type Context;
    /// Per-frame attachments the host is currently drawing into.
    type Target;

    fn bind(ctx: &Self::Context, options: RendererOptions) -> Result<Self, GpuError>;

    fn options(&self) -> RendererOptions;

    /// Forget any state the renderer assumes about the context. Called before
    /// every render because the host draws in between.
    fn reset_state(&mut self);

    fn render(
        &mut self,
        ctx: &Self::Context,
        target: &Self::Target,
        scene: &Scene,
        camera: &Camera,
    ) -> Result<RenderStats, GpuError>;
}

pub(crate) fn validate_scene(scene: &Scene) -> Result<(), GpuError> {
    for (id, mesh) in scene.meshes() {
        mesh.geometry
            .validate()
            .map_err(|source| GpuError::InvalidGeometry { mesh: id, source })?;
    }
    Ok(())
}
