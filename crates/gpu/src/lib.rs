pub mod error;
pub mod recording;
pub mod renderer;
mod wgpu;

pub use error::*;
pub use recording::*;
pub use renderer::*;
pub use crate::wgpu::{FrameTargets, HostGpu, WgpuSceneRenderer};
