//! Contract between a host map and the custom layers drawn inside it.

use foundation::math::Mat4;
use gpu::SceneRenderer;
use runtime::Frame;

use crate::error::LayerError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum RenderingMode {
    TwoD,
    #[default]
    ThreeD,
}

/// What a custom layer may ask of the map hosting it.
pub trait MapHandle {
    /// Schedule another repaint. Without this a layer draws once and stops.
    fn request_repaint(&mut self);
}

/// Per-repaint arguments handed to custom layers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameArgs {
    pub frame: Frame,
    /// Host view-projection: normalized Mercator coordinates to clip space.
    pub main_matrix: Mat4,
}

/// A layer that draws with its own renderer into the map's context.
///
/// The host calls `on_attach` once after it is ready, `on_render` on every
/// repaint and `on_remove` when the layer is taken out. Calls are serial and on
/// the host's thread.
pub trait CustomLayer<R: SceneRenderer> {
    fn id(&self) -> &str;

    fn rendering_mode(&self) -> RenderingMode {
        RenderingMode::ThreeD
    }

    fn is_attached(&self) -> bool;

    fn on_attach(&mut self, map: &mut dyn MapHandle, ctx: &R::Context) -> Result<(), LayerError>;

    fn on_render(
        &mut self,
        map: &mut dyn MapHandle,
        ctx: &R::Context,
        target: &R::Target,
        args: &FrameArgs,
    ) -> Result<(), LayerError>;

    fn on_remove(&mut self) {}
}
