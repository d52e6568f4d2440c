//! GPU-side data layouts. Each struct must match its WGSL counterpart in
//! `renderer::pipelines`.

/// `BodyInstance::kind` for the shaded sphere impostor.
pub const KIND_SPHERE: u32 = 0;
/// `BodyInstance::kind` for the constant-size point.
pub const KIND_POINT: u32 = 1;
/// `BodyInstance::kind` for the selection ring.
pub const KIND_OUTLINE: u32 = 2;

/// Per-instance data for the bodies pipeline.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct BodyInstance {
    /// Scene position (scaled units).
    pub center: [f32; 3],
    /// Sphere radius (scaled units). Ignored for points.
    pub radius: f32,
    pub color: [f32; 3],
    pub kind: u32,
}

/// One end of a line segment.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Camera uniform shared by all pipelines, std140 layout.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    /// Size of the viewport in physical pixels.
    pub viewport_size: [f32; 2],
    /// Diameter of far-away body points in pixels.
    pub point_size_px: f32,
    /// Outline ring radius relative to the sphere.
    pub outline_scale: f32,
}

// Buffer sizes must match the WGSL-reflected sizes.
const _: [(); 32] = [(); core::mem::size_of::<BodyInstance>()];
const _: [(); 24] = [(); core::mem::size_of::<LineVertex>()];
const _: [(); 144] = [(); core::mem::size_of::<CameraUniform>()];
