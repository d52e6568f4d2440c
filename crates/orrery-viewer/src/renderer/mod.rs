//! The main rendering orchestrator. Owns the GPU context, the depth target,
//! the scene pipelines and the egui renderer.

pub mod context;
pub mod pipelines;
pub mod targets;

use self::{
    context::GfxContext,
    pipelines::{bodies::BodiesPipeline, lines::LinesPipeline, CameraBinding},
    targets::Targets,
};
use crate::data::types::{BodyInstance, CameraUniform, LineVertex};
use std::sync::Arc;
use winit::window::Window;

/// Everything the scene pass needs for one frame.
pub struct FrameData<'a> {
    pub camera:  CameraUniform,
    pub bodies:  &'a [BodyInstance],
    pub overlay: &'a [LineVertex],
}

/// Owns all rendering-related state.
pub struct Renderer {
    pub gfx: GfxContext,
    pub targets: Targets,
    pub camera: CameraBinding,
    pub bodies: BodiesPipeline,
    pub lines: LinesPipeline,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let gfx = GfxContext::new(window).await?;
        let size = gfx.size;

        let targets = Targets::new(&gfx.device, size);
        let camera = CameraBinding::new(&gfx.device);
        let bodies = BodiesPipeline::new(&gfx.device, gfx.config.format, targets.depth_fmt, &camera);
        let lines = LinesPipeline::new(&gfx.device, gfx.config.format, targets.depth_fmt, &camera);

        let egui_renderer =
            egui_wgpu::Renderer::new(&gfx.device, gfx.config.format, None, 1);

        Ok(Self {
            gfx,
            targets,
            camera,
            bodies,
            lines,
            egui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gfx.resize(new_size);
            self.targets.resize(&self.gfx.device, new_size);
        }
    }

    pub fn set_orbits(&mut self, vertices: &[LineVertex]) {
        self.lines.set_orbits(&self.gfx.device, &self.gfx.queue, vertices);
    }

    pub fn render(&mut self, swap_view: &wgpu::TextureView, frame: &FrameData<'_>) {
        self.camera.write(&self.gfx.queue, &frame.camera);
        self.bodies.upload(&self.gfx.device, &self.gfx.queue, frame.bodies);
        self.lines.set_overlay(&self.gfx.device, &self.gfx.queue, frame.overlay);

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Bodies first so orbit lines depth-test against them.
            self.bodies.draw(&mut pass, &self.camera);
            self.lines.draw(&mut pass, &self.camera);
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
    }
}
