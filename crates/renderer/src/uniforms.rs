use bytemuck::{Pod, Zeroable};
use effect::UniformState;

/// GPU copy of the uniform block, mirrored from [`effect::UniformState`]
/// on every draw.
///
/// Field order and padding must match the std140 `GridParams` block in
/// `shader.rs`; the layout test below pins the byte offsets. Boolean flags
/// travel as 0.0/1.0 floats.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct GridUniforms {
    resolution: [f32; 2],
    time: f32,
    ripple_intensity: f32,
    grid_color: [f32; 3],
    grid_size: f32,
    grid_thickness: f32,
    fade_distance: f32,
    vignette_strength: f32,
    glow_intensity: f32,
    opacity: f32,
    rotation_degrees: f32,
    rainbow: f32,
    mouse_interaction: f32,
    mouse_position: [f32; 2],
    mouse_influence: f32,
    mouse_radius: f32,
}

unsafe impl Zeroable for GridUniforms {}
unsafe impl Pod for GridUniforms {}

impl GridUniforms {
    pub(crate) fn from_state(state: &UniformState) -> Self {
        Self {
            resolution: state.resolution,
            time: state.time,
            ripple_intensity: state.ripple_intensity,
            grid_color: state.grid_color,
            grid_size: state.grid_size,
            grid_thickness: state.grid_thickness,
            fade_distance: state.fade_distance,
            vignette_strength: state.vignette_strength,
            glow_intensity: state.glow_intensity,
            opacity: state.opacity,
            rotation_degrees: state.rotation_degrees,
            rainbow: f32::from(u8::from(state.rainbow)),
            mouse_interaction: f32::from(u8::from(state.mouse_interaction)),
            mouse_position: state.mouse,
            mouse_influence: state.mouse_influence,
            mouse_radius: state.mouse_interaction_radius,
        }
    }
}
