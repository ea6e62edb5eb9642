use scene::{Camera, Scene};
use tracing::trace;

use crate::error::GpuError;
use crate::renderer::{
    RenderFrame, RenderStats, RendererOptions, SceneRenderer, validate_scene,
};

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    ResetState,
    Render(RenderFrame),
}

/// Backend that records calls instead of touching a GPU.
///
/// Useful wherever no adapter is available; the draw lists it keeps are the
/// same ones the wgpu backend would submit.
#[derive(Debug, Clone)]
pub struct RecordingRenderer {
    options: RendererOptions,
    calls: Vec<RecordedCall>,
}

impl RecordingRenderer {
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    pub fn frames(&self) -> impl Iterator<Item = &RenderFrame> {
        self.calls.iter().filter_map(|c| match c {
            RecordedCall::Render(frame) => Some(frame),
            RecordedCall::ResetState => None,
        })
    }

    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.frames().last()
    }

    pub fn take_calls(&mut self) -> Vec<RecordedCall> {
        std::mem::take(&mut self.calls)
    }
}

impl SceneRenderer for RecordingRenderer {
    type Context = ();
    type Target = ();

    fn bind(_ctx: &(), options: RendererOptions) -> Result<Self, GpuError> {
        Ok(Self {
            options,
            calls: Vec::new(),
        })
    }

    fn options(&self) -> RendererOptions {
        self.options
    }

    fn reset_state(&mut self) {
        self.calls.push(RecordedCall::ResetState);
    }

    fn render(
        &mut self,
        _ctx: &(),
        _target: &(),
        scene: &Scene,
        camera: &Camera,
    ) -> Result<RenderStats, GpuError> {
        validate_scene(scene)?;
        let frame = RenderFrame::collect(scene, camera);
        let stats = frame.stats();
        trace!(draw_calls = stats.draw_calls, "recorded frame");
        self.calls.push(RecordedCall::Render(frame));
        Ok(stats)
    }
}
