use std::{mem::size_of, num::NonZeroU64};

use bytemuck::{Pod, Zeroable};
use glam::{Affine2, Mat4, UVec2, Vec2, Vec4};
use wgpu::util::DeviceExt;

use crate::quad::Vertex;

use super::{DrawCall, RenderSink};

/// A glyph atlas uploaded to the GPU.
///
/// Glyph coverage is read from the red channel.
#[derive(Debug)]
pub struct AtlasTexture {
    view: wgpu::TextureView,
    size: UVec2,
}

impl AtlasTexture {
    pub fn new(view: wgpu::TextureView, size: UVec2) -> Self {
        Self { view, size }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Size in pixels. Vertex texture coordinates are divided by it.
    pub fn size(&self) -> UVec2 {
        self.size
    }
}

#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
struct Locals {
    transform: Mat4,
    atlas_size: Vec2,
    _pad: Vec2,
}

/// Renderer for laid out text blocks.
///
/// Each block is drawn as a plain triangle list straight from its
/// vertex buffer.
pub struct TextRenderer {
    sampler: wgpu::Sampler,
    bg_layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
}

impl TextRenderer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, sample_count: u32) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("text_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            lod_min_clamp: 0.,
            lod_max_clamp: 100.,
            compare: None,
            anisotropy_clamp: None,
            border_color: None,
        });

        let bg_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("text_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(size_of::<Locals>() as u64),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler {
                        filtering: true,
                        comparison: false,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&bg_layout],
            push_constant_ranges: &[],
        });

        let module = device.create_shader_module(&wgpu::include_wgsl!("../../shaders/text.wgsl"));

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("text_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: "vs_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Unorm8x4],
                }],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Cw,
                // negative scales flip the winding
                cull_mode: None,
                clamp_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: "fs_main",
                targets: &[wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::SrcAlpha,
                            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                }],
            }),
        });

        Self {
            sampler,
            bg_layout,
            pipeline,
        }
    }

    /// Starts a batch of draws onto a target of `target_size` logical pixels,
    /// with the origin at the top-left corner and y pointing down.
    pub fn create_batch<'a>(&'a self, device: &'a wgpu::Device, target_size: Vec2) -> TextBatch<'a> {
        TextBatch {
            renderer: self,
            device,
            projection: Mat4::orthographic_lh(0., target_size.x, target_size.y, 0., -1., 1.),
            draws: Vec::new(),
        }
    }

    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, batch: &'a PreparedTextBatch) {
        if batch.draws.is_empty() {
            return;
        }

        pass.set_pipeline(&self.pipeline);
        for draw in &batch.draws {
            pass.set_bind_group(0, &draw.bind_group, &[]);
            pass.set_vertex_buffer(0, draw.vertices.slice(..));
            pass.draw(0..draw.vertex_count, 0..1);
        }
    }
}

/// Collects text blocks for one frame. Pass it to
/// [`TextBlock::draw`](crate::TextBlock::draw) for every block,
/// then [`finish`](Self::finish) it.
pub struct TextBatch<'a> {
    renderer: &'a TextRenderer,
    device: &'a wgpu::Device,
    projection: Mat4,
    draws: Vec<PreparedDraw>,
}

impl<'a> TextBatch<'a> {
    pub fn finish(self) -> PreparedTextBatch {
        PreparedTextBatch { draws: self.draws }
    }
}

impl<'a> RenderSink<AtlasTexture> for TextBatch<'a> {
    fn draw(&mut self, call: DrawCall<'_, AtlasTexture>) {
        let atlas = match call.texture {
            Some(atlas) if !call.vertices.is_empty() => atlas,
            _ => return,
        };

        let locals = Locals {
            transform: self.projection * affine_to_mat4(call.transform),
            atlas_size: atlas.size.as_f32(),
            _pad: Vec2::ZERO,
        };
        let locals = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("text_locals"),
            contents: bytemuck::bytes_of(&locals),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let vertices = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("text_vertices"),
            contents: bytemuck::cast_slice(call.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: None,
            layout: &self.renderer.bg_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &locals,
                        offset: 0,
                        size: None,
                    }),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&atlas.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.renderer.sampler),
                },
            ],
        });

        log::debug!("Allocated text buffers for {} vertices", call.vertices.len());

        self.draws.push(PreparedDraw {
            bind_group,
            vertices,
            vertex_count: call.vertices.len() as u32,
        });
    }
}

fn affine_to_mat4(affine: Affine2) -> Mat4 {
    Mat4::from_cols(
        affine.matrix2.x_axis.extend(0.).extend(0.),
        affine.matrix2.y_axis.extend(0.).extend(0.),
        Vec4::Z,
        affine.translation.extend(0.).extend(1.),
    )
}

struct PreparedDraw {
    bind_group: wgpu::BindGroup,
    vertices: wgpu::Buffer,
    vertex_count: u32,
}

/// GPU resources for a finished [`TextBatch`].
pub struct PreparedTextBatch {
    draws: Vec<PreparedDraw>,
}
