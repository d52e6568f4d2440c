use crate::data::types::CameraUniform;
use glam::{DMat4, DVec2, DVec3, DVec4};
use orrery::Ray;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Pointer travel (pixels) below which a press/release pair counts as a click.
const CLICK_SLOP_PX: f64 = 4.0;

/// Selection ring radius relative to the body.
const OUTLINE_SCALE: f32 = 1.1;

#[derive(Debug, Clone)]
pub struct Camera {
    // --- Orbital Parameters (Primary State) ---
    /// The scene point the camera orbits around (scaled units).
    pub target: DVec3,
    /// Distance from the camera to the target.
    pub radius: f64,
    /// Azimuth around +Y, measured from +Z towards +X (radians).
    pub azimuth_rad: f64,
    /// Elevation above the XZ plane (radians).
    pub elevation_rad: f64,

    // --- Derived Properties (Updated by `update()`) ---
    position: DVec3,

    // --- Projection ---
    pub fov_y_rad: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    /// Creates an orbital camera at `position` looking at `target`, Y up.
    pub fn looking_at(position: DVec3, target: DVec3, aspect: f64) -> Self {
        let offset = position - target;
        let radius = offset.length().max(1e-6);

        let mut camera = Self {
            target,
            radius,
            azimuth_rad: offset.x.atan2(offset.z),
            elevation_rad: (offset.y / radius).clamp(-1.0, 1.0).asin(),
            position,
            fov_y_rad: 35f64.to_radians(),
            aspect,
            near: 0.5,
            far: 1.0e6,
        };

        camera.update();
        camera
    }

    /// Recalculates the camera position from its orbital parameters. Must be
    /// called after any orbital parameter changes.
    pub fn update(&mut self) {
        let (sin_az, cos_az) = self.azimuth_rad.sin_cos();
        let (sin_el, cos_el) = self.elevation_rad.sin_cos();
        let offset = DVec3::new(
            self.radius * cos_el * sin_az,
            self.radius * sin_el,
            self.radius * cos_el * cos_az,
        );
        self.position = self.target + offset;
    }

    /// Camera position in scaled scene units.
    #[inline]
    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f64 / height.max(1) as f64;
    }

    pub fn view(&self) -> DMat4 {
        DMat4::look_at_rh(self.position, self.target, DVec3::Y)
    }

    /// WebGPU-style projection (depth in [0, 1]).
    pub fn proj(&self) -> DMat4 {
        DMat4::perspective_rh(self.fov_y_rad, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> DMat4 {
        self.proj() * self.view()
    }

    pub fn uniform(&self, viewport_size: [f32; 2], point_size_px: f32) -> CameraUniform {
        CameraUniform {
            view: self.view().as_mat4().to_cols_array_2d(),
            proj: self.proj().as_mat4().to_cols_array_2d(),
            viewport_size,
            point_size_px,
            outline_scale: OUTLINE_SCALE,
        }
    }

    /// Unprojects a window position (physical pixels) into a pick ray.
    pub fn screen_ray(&self, px: f64, py: f64, viewport: [f64; 2]) -> Ray {
        let ndc = DVec2::new(
            2.0 * px / viewport[0].max(1.0) - 1.0,
            1.0 - 2.0 * py / viewport[1].max(1.0),
        );
        let far = self
            .view_proj()
            .inverse()
            .project_point3(DVec3::new(ndc.x, ndc.y, 1.0));

        Ray::through(self.position, far)
    }

    /// Projects a scene point to window pixels. Returns the pixel position and
    /// the view-space depth, or `None` behind the camera.
    pub fn project(&self, point: DVec3, viewport: [f64; 2]) -> Option<(DVec2, f64)> {
        let clip = self.view_proj() * DVec4::from((point, 1.0));
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let px = DVec2::new(
            (ndc.x + 1.0) * 0.5 * viewport[0],
            (1.0 - ndc.y) * 0.5 * viewport[1],
        );
        Some((px, clip.w))
    }

    /// Screen pixels covered by one scene unit at view depth `depth`.
    pub fn pixels_per_unit(&self, depth: f64, viewport_height: f64) -> f64 {
        viewport_height / (2.0 * (self.fov_y_rad * 0.5).tan() * depth.max(self.near))
    }
}

pub struct CameraController {
    mouse_down: bool,
    last_mouse: Option<(f64, f64)>,
    press_at: Option<(f64, f64)>,
}

impl CameraController {
    /// Creates a new controller with default state.
    pub fn new() -> Self {
        Self {
            mouse_down: false,
            last_mouse: None,
            press_at: None,
        }
    }

    /// Handles window events and updates the camera. Returns the pointer
    /// position when a left click (press and release without dragging) ends.
    pub fn handle_event(&mut self, event: &WindowEvent, camera: &mut Camera) -> Option<(f64, f64)> {
        match event {
            WindowEvent::MouseInput { button, state, .. } if *button == MouseButton::Left => {
                self.mouse_down = *state == ElementState::Pressed;
                match state {
                    ElementState::Pressed => self.press_at = self.last_mouse,
                    ElementState::Released => return self.take_click(),
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor_orbit((position.x, position.y), camera);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 120.0,
                };

                self.handle_scroll(scroll, camera);
            }
            _ => {}
        }
        None
    }

    fn take_click(&mut self) -> Option<(f64, f64)> {
        let press = self.press_at.take()?;
        let release = self.last_mouse?;
        let travel = ((release.0 - press.0).powi(2) + (release.1 - press.1).powi(2)).sqrt();
        (travel < CLICK_SLOP_PX).then_some(release)
    }

    /// Adjusts camera orbit radius based on scroll input.
    fn handle_scroll(&mut self, delta: f32, camera: &mut Camera) {
        // Positive delta = scroll up = zoom in = decrease radius.
        let zoom = 1.1_f64.powf(-delta as f64);
        camera.radius = (camera.radius * zoom).clamp(1.0, 2.0e5);
        camera.update();
    }

    /// Rotates the camera around the target while the left mouse button is held.
    fn handle_cursor_orbit(&mut self, xy: (f64, f64), camera: &mut Camera) {
        if let Some(last) = self.last_mouse {
            if self.mouse_down {
                let dx = (xy.0 - last.0) * 0.005;
                let dy = (last.1 - xy.1) * 0.005;

                camera.azimuth_rad -= dx;
                camera.elevation_rad -= dy;

                // Keep away from the poles so the Y-up view never flips.
                camera.elevation_rad = camera
                    .elevation_rad
                    .clamp(-89.0f64.to_radians(), 89.0f64.to_radians());

                camera.update();
            }
        }
        self.last_mouse = Some(xy);
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initial() -> Camera {
        Camera::looking_at(DVec3::new(0.0, -1e4, 1e4), DVec3::ZERO, 16.0 / 9.0)
    }

    #[test]
    fn orbit_parameters_reproduce_initial_position() {
        let cam = initial();

        assert!((cam.elevation_rad + 45f64.to_radians()).abs() < 1e-12);
        assert!(cam.azimuth_rad.abs() < 1e-12);
        assert!(cam.position().distance(DVec3::new(0.0, -1e4, 1e4)) < 1e-6);
    }

    #[test]
    fn center_ray_points_at_target() {
        let cam = initial();
        let ray = cam.screen_ray(640.0, 360.0, [1280.0, 720.0]);
        let to_target = (cam.target - cam.position()).normalize();

        assert!(ray.direction.dot(to_target) > 1.0 - 1e-9);
    }

    #[test]
    fn project_and_unproject_agree() {
        let cam = initial();
        let viewport = [1280.0, 720.0];
        let point = DVec3::new(300.0, 50.0, -200.0);

        let (px, _) = cam.project(point, viewport).unwrap();
        let ray = cam.screen_ray(px.x, px.y, viewport);
        let expected = (point - cam.position()).normalize();

        assert!(ray.direction.dot(expected) > 1.0 - 1e-9);
    }

    #[test]
    fn points_behind_camera_do_not_project() {
        let cam = initial();
        let behind = cam.position() * 2.0;
        assert!(cam.project(behind, [800.0, 600.0]).is_none());
    }
}
