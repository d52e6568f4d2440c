//! Orbit paths (uploaded once) and overlay segments (rewritten every frame).

use super::{CameraBinding, GrowableBuffer};
use crate::data::types::LineVertex;

pub struct LinesPipeline {
    pipeline: wgpu::RenderPipeline,
    orbits:   GrowableBuffer,
    overlay:  GrowableBuffer,
}

impl LinesPipeline {
    pub fn new(
        device:    &wgpu::Device,
        color_fmt: wgpu::TextureFormat,
        depth_fmt: wgpu::TextureFormat,
        camera:    &CameraBinding,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label:  Some("Lines WGSL"),
            source: wgpu::ShaderSource::Wgsl(LINES_WGSL.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label:                Some("Lines Pipeline Layout"),
            bind_group_layouts:   &[&camera.layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label:  Some("Lines Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module:      &shader,
                entry_point: "vs_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineVertex>() as u64,
                    step_mode:    wgpu::VertexStepMode::Vertex,
                    attributes:   &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module:      &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format:     color_fmt,
                    blend:      Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format:              depth_fmt,
                depth_write_enabled: false, // Lines never occlude bodies
                depth_compare:       wgpu::CompareFunction::LessEqual,
                stencil:             wgpu::StencilState::default(),
                bias:                wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview:   None,
        });

        let vertex = std::mem::size_of::<LineVertex>() as u64;
        Self {
            pipeline,
            orbits: GrowableBuffer::new(device, "Orbit Line Buffer", 1024 * vertex),
            overlay: GrowableBuffer::new(device, "Overlay Line Buffer", 16 * vertex),
        }
    }

    /// Replaces the orbit paths. `vertices` are segment pairs.
    pub fn set_orbits(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, vertices: &[LineVertex]) {
        self.orbits.upload(device, queue, vertices);
        log::info!("Uploaded {} orbit segments", vertices.len() / 2);
    }

    pub fn set_overlay(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, vertices: &[LineVertex]) {
        self.overlay.upload(device, queue, vertices);
    }

    pub fn draw<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>, camera: &'a CameraBinding) {
        if self.orbits.is_empty() && self.overlay.is_empty() {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &camera.bind_group, &[]);

        for buffer in [&self.orbits, &self.overlay] {
            if !buffer.is_empty() {
                rpass.set_vertex_buffer(0, buffer.slice());
                rpass.draw(0..buffer.len(), 0..1);
            }
        }
    }
}

const LINES_WGSL: &str = r#"
struct Camera {
    view:          mat4x4<f32>,
    proj:          mat4x4<f32>,
    viewport_size: vec2<f32>,
    point_size_px: f32,
    outline_scale: f32,
};

@group(0) @binding(0) var<uniform> cam: Camera;

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) color: vec3<f32>) -> VsOut {
    var out: VsOut;
    out.clip = cam.proj * cam.view * vec4<f32>(position, 1.0);
    out.color = color;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color, 0.85);
}
"#;
