use std::borrow::Cow;
use std::collections::HashMap;

use ::wgpu::util::DeviceExt;
use scene::components::{BasicMaterial, Side};
use scene::{Camera, Mesh, MeshId, Scene};
use tracing::{debug, trace};

use crate::error::GpuError;
use crate::renderer::{
    RenderFrame, RenderStats, RendererOptions, SceneRenderer, validate_scene,
};

const MESH_SHADER: &str = r#"
struct DrawUniforms {
    mvp: mat4x4<f32>,
    tint: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> draw: DrawUniforms;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) color: vec4<f32>) -> VsOut {
    return VsOut(draw.mvp * vec4<f32>(position, 1.0), color * draw.tint);
}

@fragment
fn fs_main(fs_in: VsOut) -> @location(0) vec4<f32> {
    return fs_in.color;
}
"#;

/// GPU context owned by the host map. The renderer only borrows it.
#[derive(Debug)]
pub struct HostGpu {
    pub device: ::wgpu::Device,
    pub queue: ::wgpu::Queue,
    pub color_format: ::wgpu::TextureFormat,
    pub depth_format: Option<::wgpu::TextureFormat>,
    pub sample_count: u32,
}

/// Attachments the host is drawing into this frame.
#[derive(Debug)]
pub struct FrameTargets {
    pub color: ::wgpu::TextureView,
    pub depth: Option<::wgpu::TextureView>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MeshVertex {
    position: [f32; 3],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct DrawUniforms {
    mvp: [[f32; 4]; 4],
    tint: [f32; 4],
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct PipelineKey {
    side: Side,
    transparent: bool,
    depth_write: bool,
}

impl PipelineKey {
    fn for_material(material: &BasicMaterial) -> Self {
        Self {
            side: material.side,
            transparent: material.transparent,
            depth_write: material.depth_write,
        }
    }
}

#[derive(Debug)]
struct GpuMesh {
    vertex_buffer: ::wgpu::Buffer,
    index_buffer: ::wgpu::Buffer,
    uniform_buffer: ::wgpu::Buffer,
    bind_group: ::wgpu::BindGroup,
}

/// wgpu backend drawing into a host-owned device and attachments.
///
/// Mesh geometry is uploaded the first time a mesh is drawn and assumed static
/// afterwards; removing a mesh from the scene frees its buffers on the next
/// render.
#[derive(Debug)]
pub struct WgpuSceneRenderer {
    options: RendererOptions,
    color_format: ::wgpu::TextureFormat,
    depth_format: Option<::wgpu::TextureFormat>,
    sample_count: u32,
    shader: ::wgpu::ShaderModule,
    bind_group_layout: ::wgpu::BindGroupLayout,
    pipeline_layout: ::wgpu::PipelineLayout,
    pipelines: HashMap<PipelineKey, ::wgpu::RenderPipeline>,
    meshes: HashMap<MeshId, GpuMesh>,
    bound_pipeline: Option<PipelineKey>,
}

impl WgpuSceneRenderer {
    fn create_pipeline(&self, device: &::wgpu::Device, key: PipelineKey) -> ::wgpu::RenderPipeline {
        let blend = if key.transparent {
            ::wgpu::BlendState::ALPHA_BLENDING
        } else {
            ::wgpu::BlendState::REPLACE
        };
        let cull_mode = match key.side {
            Side::Front => Some(::wgpu::Face::Back),
            Side::Back => Some(::wgpu::Face::Front),
            Side::Double => None,
        };
        let depth_stencil = self.depth_format.map(|format| ::wgpu::DepthStencilState {
            format,
            depth_write_enabled: key.depth_write,
            depth_compare: ::wgpu::CompareFunction::LessEqual,
            stencil: ::wgpu::StencilState::default(),
            bias: ::wgpu::DepthBiasState::default(),
        });

        device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some("beacon-mesh-pipeline"),
            layout: Some(&self.pipeline_layout),
            vertex: ::wgpu::VertexState {
                module: &self.shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[::wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<MeshVertex>() as ::wgpu::BufferAddress,
                    step_mode: ::wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        ::wgpu::VertexAttribute {
                            format: ::wgpu::VertexFormat::Float32x3,
                            offset: 0,
                            shader_location: 0,
                        },
                        ::wgpu::VertexAttribute {
                            format: ::wgpu::VertexFormat::Float32x4,
                            offset: 12,
                            shader_location: 1,
                        },
                    ],
                }],
            },
            fragment: Some(::wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format: self.color_format,
                    blend: Some(blend),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: ::wgpu::PrimitiveState {
                topology: ::wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: ::wgpu::FrontFace::Ccw,
                cull_mode,
                polygon_mode: ::wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil,
            multisample: ::wgpu::MultisampleState {
                count: self.sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview_mask: None,
            cache: None,
        })
    }

    fn upload_mesh(&self, device: &::wgpu::Device, mesh: &Mesh) -> GpuMesh {
        let geometry = &mesh.geometry;
        let use_vertex_colors = mesh.material.vertex_colors;
        let vertices: Vec<MeshVertex> = geometry
            .positions
            .iter()
            .enumerate()
            .map(|(i, &position)| {
                let color = match &geometry.colors {
                    Some(colors) if use_vertex_colors => colors[i],
                    _ => [1.0, 1.0, 1.0, 1.0],
                };
                MeshVertex { position, color }
            })
            .collect();

        let vertex_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("beacon-mesh-vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: ::wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("beacon-mesh-indices"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: ::wgpu::BufferUsages::INDEX,
        });
        let uniform_buffer = device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some("beacon-mesh-uniforms"),
            size: std::mem::size_of::<DrawUniforms>() as u64,
            usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("beacon-mesh-bg"),
            layout: &self.bind_group_layout,
            entries: &[::wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        GpuMesh {
            vertex_buffer,
            index_buffer,
            uniform_buffer,
            bind_group,
        }
    }
}

impl SceneRenderer for WgpuSceneRenderer {
    type Context = HostGpu;
    type Target = FrameTargets;

    fn bind(ctx: &HostGpu, options: RendererOptions) -> Result<Self, GpuError> {
        if options.antialias && ctx.sample_count <= 1 {
            debug!("antialias requested but host targets are single-sampled");
        }

        let shader = ctx
            .device
            .create_shader_module(::wgpu::ShaderModuleDescriptor {
                label: Some("beacon-mesh-shader"),
                source: ::wgpu::ShaderSource::Wgsl(Cow::Borrowed(MESH_SHADER)),
            });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
                    label: Some("beacon-mesh-bgl"),
                    entries: &[::wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: ::wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: ::wgpu::BindingType::Buffer {
                            ty: ::wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
                label: Some("beacon-mesh-pipeline-layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        Ok(Self {
            options,
            color_format: ctx.color_format,
            depth_format: ctx.depth_format,
            sample_count: ctx.sample_count.max(1),
            shader,
            bind_group_layout,
            pipeline_layout,
            pipelines: HashMap::new(),
            meshes: HashMap::new(),
            bound_pipeline: None,
        })
    }

    fn options(&self) -> RendererOptions {
        self.options
    }

    fn reset_state(&mut self) {
        // wgpu keeps no bound state between passes, so the host's draws cannot
        // leak into ours; only our own binding cache goes stale.
        self.bound_pipeline = None;
    }

    fn render(
        &mut self,
        ctx: &HostGpu,
        target: &FrameTargets,
        scene: &Scene,
        camera: &Camera,
    ) -> Result<RenderStats, GpuError> {
        if self.depth_format.is_some() && target.depth.is_none() {
            return Err(GpuError::MissingDepthTarget);
        }
        validate_scene(scene)?;

        let frame = RenderFrame::collect(scene, camera);
        self.meshes.retain(|id, _| scene.mesh(*id).is_some());

        for draw in &frame.draws {
            if !self.meshes.contains_key(&draw.mesh) {
                let Some(mesh) = scene.mesh(draw.mesh) else {
                    continue;
                };
                let gpu_mesh = self.upload_mesh(&ctx.device, mesh);
                trace!(mesh = draw.mesh.0, "uploaded mesh");
                self.meshes.insert(draw.mesh, gpu_mesh);
            }
            let key = PipelineKey::for_material(&draw.material);
            if !self.pipelines.contains_key(&key) {
                let pipeline = self.create_pipeline(&ctx.device, key);
                self.pipelines.insert(key, pipeline);
            }

            let uniforms = DrawUniforms {
                mvp: draw.mvp.to_f32_cols(),
                tint: draw.material.tint(),
            };
            if let Some(gpu_mesh) = self.meshes.get(&draw.mesh) {
                ctx.queue
                    .write_buffer(&gpu_mesh.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
            }
        }

        let load_color = if self.options.auto_clear {
            ::wgpu::LoadOp::Clear(::wgpu::Color::TRANSPARENT)
        } else {
            ::wgpu::LoadOp::Load
        };
        let load_depth = if self.options.auto_clear {
            ::wgpu::LoadOp::Clear(1.0)
        } else {
            ::wgpu::LoadOp::Load
        };

        let mut encoder = ctx
            .device
            .create_command_encoder(&::wgpu::CommandEncoderDescriptor {
                label: Some("beacon-layer-encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&::wgpu::RenderPassDescriptor {
                label: Some("beacon-layer-pass"),
                color_attachments: &[Some(::wgpu::RenderPassColorAttachment {
                    view: &target.color,
                    resolve_target: None,
                    depth_slice: None,
                    ops: ::wgpu::Operations {
                        load: load_color,
                        store: ::wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: match (&self.depth_format, &target.depth) {
                    (Some(_), Some(view)) => Some(::wgpu::RenderPassDepthStencilAttachment {
                        view,
                        depth_ops: Some(::wgpu::Operations {
                            load: load_depth,
                            store: ::wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    _ => None,
                },
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            for draw in &frame.draws {
                let Some(gpu_mesh) = self.meshes.get(&draw.mesh) else {
                    continue;
                };
                let key = PipelineKey::for_material(&draw.material);
                if self.bound_pipeline != Some(key) {
                    let Some(pipeline) = self.pipelines.get(&key) else {
                        continue;
                    };
                    rpass.set_pipeline(pipeline);
                    self.bound_pipeline = Some(key);
                }
                rpass.set_bind_group(0, &gpu_mesh.bind_group, &[]);
                rpass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));
                rpass.set_index_buffer(gpu_mesh.index_buffer.slice(..), ::wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..draw.index_count, 0, 0..1);
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        // A new pass starts unbound next time regardless of reset_state.
        self.bound_pipeline = None;

        Ok(frame.stats())
    }
}
