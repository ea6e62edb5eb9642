//! Windowless wgpu device and render targets standing in for the map canvas.

use gpu::{FrameTargets, GpuError, HostGpu};
use tracing::info;

use crate::config::Viewport;

pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Background the host paints before custom layers draw.
pub const MAP_BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.06,
    b: 0.09,
    a: 1.0,
};

pub struct Offscreen {
    pub gpu: HostGpu,
    pub targets: FrameTargets,
    _color: wgpu::Texture,
    _depth: wgpu::Texture,
}

impl Offscreen {
    pub fn new(viewport: Viewport) -> Result<Self, GpuError> {
        pollster::block_on(Self::request(viewport))
    }

    async fn request(viewport: Viewport) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| GpuError::Adapter(e.to_string()))?;

        let adapter_info = adapter.get_info();
        info!(
            adapter = %adapter_info.name,
            backend = ?adapter_info.backend,
            "gpu adapter selected"
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("beacon-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await
            .map_err(|e| GpuError::Device(e.to_string()))?;

        let size = wgpu::Extent3d {
            width: viewport.width,
            height: viewport.height,
            depth_or_array_layers: 1,
        };
        let color = create_attachment(&device, "beacon-color", size, COLOR_FORMAT);
        let depth = create_attachment(&device, "beacon-depth", size, DEPTH_FORMAT);
        let targets = FrameTargets {
            color: color.create_view(&wgpu::TextureViewDescriptor::default()),
            depth: Some(depth.create_view(&wgpu::TextureViewDescriptor::default())),
        };

        Ok(Self {
            gpu: HostGpu {
                device,
                queue,
                color_format: COLOR_FORMAT,
                depth_format: Some(DEPTH_FORMAT),
                sample_count: 1,
            },
            targets,
            _color: color,
            _depth: depth,
        })
    }

    /// The map's own pass: clear color and depth before layers draw on top.
    pub fn clear(&self, color: wgpu::Color) {
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("beacon-map-clear"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("beacon-map-clear-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.color,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: self.targets.depth.as_ref().map(|view| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });
        }
        self.gpu.queue.submit(Some(encoder.finish()));
    }
}

fn create_attachment(
    device: &wgpu::Device,
    label: &str,
    size: wgpu::Extent3d,
    format: wgpu::TextureFormat,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}
