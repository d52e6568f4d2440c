use crate::{
    camera::{Camera, CameraController},
    data::types::{BodyInstance, LineVertex, KIND_OUTLINE, KIND_POINT, KIND_SPHERE},
    overlay::{Overlay, OverlayLabel},
    renderer::{FrameData, Renderer},
    ui::{self, HudModel, UiIntent},
};
use anyhow::Result;
use glam::DVec3;
use orrery::{EntityRegistry, Orrery, PickOutcome, PositionStore, Representation};
use std::{sync::Arc, time::Instant};
use winit::{event::WindowEvent, window::Window};

/// Initial camera position (scaled units), looking at the central body.
const INITIAL_EYE: DVec3 = DVec3::new(0.0, -1.0e4, 1.0e4);
/// On-screen size of a body drawn as a point.
const POINT_SIZE_PX: f32 = 4.0;

const OUTLINE_COLOR: [f32; 3] = [1.0, 0.0, 0.0];
const ORBIT_COLOR: [f32; 3] = [0.35, 0.35, 0.4];
const MEASURE_COLOR: [f32; 3] = [0.0, 1.0, 0.0];

pub struct App {
    pub renderer: Renderer,
    pub camera: Camera,
    pub camera_controller: CameraController,
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    pub orrery: Orrery,
    pub overlay: Overlay,
}

impl App {
    pub async fn new(window: Arc<Window>, orrery: Orrery) -> Result<Self> {
        let mut renderer = Renderer::new(window.clone()).await?;
        let size = renderer.gfx.size;

        let camera = Camera::looking_at(
            INITIAL_EYE,
            DVec3::ZERO,
            size.width as f64 / size.height.max(1) as f64,
        );
        let camera_controller = CameraController::new();

        renderer.set_orbits(&orbit_vertices(orrery.registry(), orrery.positions()));

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            None,
            None,
        );

        log::info!(
            "Viewer ready: {} bodies, date {}",
            orrery.registry().len(),
            orrery.date_label()
        );

        Ok(Self {
            renderer,
            camera,
            camera_controller,
            egui_ctx,
            egui_state,
            orrery,
            overlay: Overlay::new(),
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.renderer.resize(new_size);
            self.camera.set_aspect(new_size.width, new_size.height);
        }
    }

    /// Returns true when egui consumed the event.
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        if response.consumed {
            return true;
        }

        if let Some((x, y)) = self.camera_controller.handle_event(event, &mut self.camera) {
            self.pick_at(x, y);
        }

        if let WindowEvent::Resized(physical_size) = event {
            self.resize(*physical_size);
        }

        false
    }

    fn pick_at(&mut self, x: f64, y: f64) {
        let viewport = self.viewport();
        let ray = self.camera.screen_ray(x, y, viewport);

        match self.orrery.pick(&ray, &mut self.overlay) {
            PickOutcome::Ignored => {}
            PickOutcome::Missed => log::debug!("Click at ({x:.0}, {y:.0}) hit nothing"),
            PickOutcome::Picked(state) => log::debug!("Selection is now {state:?}"),
        }
    }

    /// Advances playback if its timer is due.
    pub fn tick(&mut self, now: Instant) {
        match self.orrery.tick(now) {
            Ok(Some(changed)) => log::trace!("Playback -> {}", changed.label),
            Ok(None) => {}
            Err(e) => {
                log::error!("Playback step failed: {e}");
                self.orrery.pause();
            }
        }
    }

    fn viewport(&self) -> [f64; 2] {
        let [w, h] = self.renderer.gfx.viewport();
        [w as f64, h as f64]
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        self.orrery.frame(self.camera.position(), &mut self.overlay);

        let bodies = body_instances(self.orrery.registry());
        let overlay_lines: Vec<LineVertex> = self
            .overlay
            .lines()
            .flat_map(|(from, to)| [line_vertex(from, MEASURE_COLOR), line_vertex(to, MEASURE_COLOR)])
            .collect();
        let labels: Vec<OverlayLabel> = self.overlay.labels().collect();

        let frame = self.renderer.gfx.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let viewport = self.viewport();
        let frame_data = FrameData {
            camera: self.camera.uniform(self.renderer.gfx.viewport(), POINT_SIZE_PX),
            bodies: &bodies,
            overlay: &overlay_lines,
        };
        self.renderer.render(&swap_view, &frame_data);

        let model = HudModel::from_orrery(&self.orrery);
        let egui_input = self.egui_state.take_egui_input(window);
        self.egui_ctx.begin_frame(egui_input);

        ui::draw_labels(&self.egui_ctx, &self.camera, viewport, &labels);
        let intents = ui::draw_controls(&self.egui_ctx, &model);

        let egui_output = self.egui_ctx.end_frame();
        self.egui_state
            .handle_platform_output(window, egui_output.platform_output);
        let shapes = self
            .egui_ctx
            .tessellate(egui_output.shapes, self.egui_ctx.pixels_per_point());

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [
                self.renderer.gfx.config.width,
                self.renderer.gfx.config.height,
            ],
            pixels_per_point: self.egui_ctx.pixels_per_point(),
        };

        let mut encoder = self
            .renderer
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("UI Encoder"),
            });

        for (id, delta) in &egui_output.textures_delta.set {
            self.renderer.egui_renderer.update_texture(
                &self.renderer.gfx.device,
                &self.renderer.gfx.queue,
                *id,
                delta,
            );
        }

        self.renderer.egui_renderer.update_buffers(
            &self.renderer.gfx.device,
            &self.renderer.gfx.queue,
            &mut encoder,
            &shapes,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("EGUI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.renderer
                .egui_renderer
                .render(&mut render_pass, &shapes, &screen_descriptor);
        }

        for id in &egui_output.textures_delta.free {
            self.renderer.egui_renderer.free_texture(id);
        }

        self.renderer
            .gfx
            .queue
            .submit(std::iter::once(encoder.finish()));
        frame.present();

        self.apply_intents(intents);
        Ok(())
    }

    fn apply_intents(&mut self, intents: Vec<UiIntent>) {
        for intent in intents {
            match intent {
                UiIntent::SeekDate(index) => {
                    if let Err(e) = self.orrery.set_date_index(index) {
                        log::warn!("Ignoring date slider input: {e}");
                    }
                }
                UiIntent::TogglePlayback => {
                    self.orrery.toggle_playback(Instant::now());
                }
                UiIntent::SetStepSize(days) => {
                    if let Err(e) = self.orrery.set_step_size(days) {
                        log::warn!("Ignoring step size input: {e}");
                    }
                }
                UiIntent::ToggleMeasure => {
                    let active = self.orrery.toggle_selection_mode(&mut self.overlay);
                    log::info!("Distance calculator {}", if active { "on" } else { "off" });
                }
            }
        }
    }
}

fn line_vertex(position: DVec3, color: [f32; 3]) -> LineVertex {
    LineVertex {
        position: position.as_vec3().to_array(),
        color,
    }
}

/// GPU instances for every body shown this frame. Absent bodies are skipped.
pub fn body_instances(registry: &EntityRegistry) -> Vec<BodyInstance> {
    let mut out = Vec::with_capacity(registry.len() * 2);
    for entity in registry.iter().filter(|e| e.is_present()) {
        let instance = |kind, color| BodyInstance {
            center: entity.position().as_vec3().to_array(),
            radius: entity.radius as f32,
            color,
            kind,
        };
        if entity.shows(Representation::Volumetric) {
            out.push(instance(KIND_SPHERE, entity.color));
        }
        if entity.shows(Representation::Point) {
            out.push(instance(KIND_POINT, entity.color));
        }
        if entity.shows(Representation::Outline) {
            out.push(instance(KIND_OUTLINE, OUTLINE_COLOR));
        }
    }
    out
}

/// Orbit paths as line-list segment pairs, one polyline per dataset body.
pub fn orbit_vertices(registry: &EntityRegistry, positions: &PositionStore) -> Vec<LineVertex> {
    let mut out = Vec::new();
    for entity in registry.iter() {
        let path = positions.trajectory(&entity.name);
        for pair in path.windows(2) {
            out.push(line_vertex(pair[0], ORBIT_COLOR));
            out.push(line_vertex(pair[1], ORBIT_COLOR));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> EntityRegistry {
        let mut registry = EntityRegistry::default();
        registry.insert("Sun", 10.0, [1.0, 0.9, 0.3]);
        let earth = registry.insert("Earth", 10.0, [0.2, 0.4, 1.0]);
        let mars = registry.insert("Mars", 10.0, [0.8, 0.3, 0.2]);

        registry
            .get_mut(earth)
            .unwrap()
            .apply_position(Some(DVec3::new(150.0, 0.0, 0.0)));
        registry.get_mut(mars).unwrap().apply_position(None);
        registry
    }

    #[test]
    fn absent_bodies_are_not_drawn() {
        let instances = body_instances(&registry());

        assert_eq!(instances.len(), 2);
        assert!(instances.iter().all(|i| i.kind == KIND_SPHERE));
        assert_eq!(instances[1].center, [150.0, 0.0, 0.0]);
    }

    #[test]
    fn selected_body_gets_an_outline_instance() {
        let mut registry = registry();
        let earth = registry.id_of("Earth").unwrap();
        let entity = registry.get_mut(earth).unwrap();
        entity.set_visible(Representation::Volumetric, false);
        entity.set_visible(Representation::Point, true);
        entity.set_visible(Representation::Outline, true);

        let kinds: Vec<u32> = body_instances(&registry)
            .iter()
            .filter(|i| i.center == [150.0, 0.0, 0.0])
            .map(|i| i.kind)
            .collect();
        assert_eq!(kinds, vec![KIND_POINT, KIND_OUTLINE]);
    }

    #[test]
    fn orbits_skip_central_body_and_pair_segments() {
        let positions = PositionStore::from_json_str(
            r#"{
                "1800-01-03": { "Earth": [1e8, 0.0, 0.0] },
                "1800-01-08": { "Earth": [0.0, 1e8, 0.0] },
                "1800-01-13": { "Earth": [-1e8, 0.0, 0.0] }
            }"#,
            1e6,
            "Sun",
        )
        .unwrap();

        let vertices = orbit_vertices(&registry(), &positions);

        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[0].position, [100.0, 0.0, 0.0]);
        assert_eq!(vertices[1].position, vertices[2].position);
    }
}
