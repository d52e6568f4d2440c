//! Draws every body as an instanced, camera-facing quad: shaded sphere
//! impostors up close, fixed-size points far away, and a ring for selection.

use super::{CameraBinding, GrowableBuffer};
use crate::data::types::BodyInstance;
use wgpu::util::DeviceExt;

pub struct BodiesPipeline {
    pipeline:  wgpu::RenderPipeline,
    quad_vb:   wgpu::Buffer,
    instances: GrowableBuffer,
}

impl BodiesPipeline {
    pub fn new(
        device:    &wgpu::Device,
        color_fmt: wgpu::TextureFormat,
        depth_fmt: wgpu::TextureFormat,
        camera:    &CameraBinding,
    ) -> Self {
        // Unit quad (two triangles); corners double as impostor UVs.
        let corners: [[f32; 2]; 6] = [
            [-1.0, -1.0], [1.0, -1.0], [1.0, 1.0],
            [-1.0, -1.0], [1.0, 1.0],  [-1.0, 1.0],
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label:    Some("Body Quad VB"),
            contents: bytemuck::cast_slice(&corners),
            usage:    wgpu::BufferUsages::VERTEX,
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label:  Some("Bodies WGSL"),
            source: wgpu::ShaderSource::Wgsl(BODIES_WGSL.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label:                Some("Bodies Pipeline Layout"),
            bind_group_layouts:   &[&camera.layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label:  Some("Bodies Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module:      &shader,
                entry_point: "vs_main",
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                        step_mode:    wgpu::VertexStepMode::Vertex,
                        attributes:   &wgpu::vertex_attr_array![0 => Float32x2],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<BodyInstance>() as u64,
                        step_mode:    wgpu::VertexStepMode::Instance,
                        attributes:   &wgpu::vertex_attr_array![
                            1 => Float32x3, // center
                            2 => Float32,   // radius
                            3 => Float32x3, // color
                            4 => Uint32,    // kind
                        ],
                    },
                ],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module:      &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format:     color_fmt,
                    blend:      None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format:              depth_fmt,
                depth_write_enabled: true,
                depth_compare:       wgpu::CompareFunction::Less,
                stencil:             wgpu::StencilState::default(),
                bias:                wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview:   None,
        });

        Self {
            pipeline,
            quad_vb,
            instances: GrowableBuffer::new(
                device,
                "Body Instance Buffer",
                64 * std::mem::size_of::<BodyInstance>() as u64,
            ),
        }
    }

    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bodies: &[BodyInstance]) {
        self.instances.upload(device, queue, bodies);
    }

    pub fn draw<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>, camera: &'a CameraBinding) {
        if self.instances.is_empty() {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &camera.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        rpass.set_vertex_buffer(1, self.instances.slice());
        rpass.draw(0..6, 0..self.instances.len());
    }
}

const BODIES_WGSL: &str = r#"
struct Camera {
    view:          mat4x4<f32>,
    proj:          mat4x4<f32>,
    viewport_size: vec2<f32>,
    point_size_px: f32,
    outline_scale: f32,
};

@group(0) @binding(0) var<uniform> cam: Camera;

const KIND_POINT:   u32 = 1u;
const KIND_OUTLINE: u32 = 2u;

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec3<f32>,
    @location(2) @interpolate(flat) kind: u32,
};

@vertex
fn vs_main(
    @location(0) corner: vec2<f32>,
    @location(1) center: vec3<f32>,
    @location(2) radius: f32,
    @location(3) color:  vec3<f32>,
    @location(4) kind:   u32,
) -> VsOut {
    var out: VsOut;
    let view_center = cam.view * vec4<f32>(center, 1.0);

    if (kind == KIND_POINT) {
        // Constant screen size regardless of depth.
        let clip = cam.proj * view_center;
        let offset = corner * cam.point_size_px / cam.viewport_size * clip.w;
        out.clip = vec4<f32>(clip.xy + offset, clip.zw);
    } else {
        var r = radius;
        if (kind == KIND_OUTLINE) {
            r = radius * cam.outline_scale;
        }
        out.clip = cam.proj * (view_center + vec4<f32>(corner * r, 0.0, 0.0));
    }

    out.uv = corner;
    out.color = color;
    out.kind = kind;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let r2 = dot(in.uv, in.uv);
    if (r2 > 1.0) {
        discard;
    }

    if (in.kind == KIND_POINT) {
        return vec4<f32>(in.color, 1.0);
    }

    if (in.kind == KIND_OUTLINE) {
        let inner = 1.0 / cam.outline_scale;
        if (r2 < inner * inner) {
            discard;
        }
        return vec4<f32>(in.color, 1.0);
    }

    let n = vec3<f32>(in.uv, sqrt(1.0 - r2));
    let light = normalize(vec3<f32>(0.4, 0.6, 0.7));
    let shade = 0.35 + 0.65 * max(dot(n, light), 0.0);
    return vec4<f32>(in.color * shade, 1.0);
}
"#;
