use crate::config::EffectConfig;

/// CPU-side mirror of the values bound to the shader program.
///
/// Owned by the effect instance and updated by the animation loop; the
/// renderer copies it into the GPU uniform block on every draw. Only the
/// pointer-derived fields change after init (via smoothing targets, never
/// direct writes); the config-derived constants are set once.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformState {
    /// Elapsed time in seconds.
    pub time: f32,
    /// Surface resolution in physical pixels.
    pub resolution: [f32; 2],
    /// Smoothed pointer position in [0,1]², bottom-up Y.
    pub mouse: [f32; 2],
    /// Smoothed pointer influence in [0,1].
    pub mouse_influence: f32,
    pub rainbow: bool,
    pub grid_color: [f32; 3],
    pub ripple_intensity: f32,
    pub grid_size: f32,
    pub grid_thickness: f32,
    pub fade_distance: f32,
    pub vignette_strength: f32,
    pub glow_intensity: f32,
    pub opacity: f32,
    pub rotation_degrees: f32,
    pub mouse_interaction: bool,
    pub mouse_interaction_radius: f32,
}

impl UniformState {
    /// Seeds the uniform set from the resolved config and initial size.
    pub fn new(config: &EffectConfig, width: f32, height: f32) -> Self {
        Self {
            time: 0.0,
            resolution: [width, height],
            mouse: [0.5, 0.5],
            mouse_influence: 0.0,
            rainbow: config.rainbow,
            grid_color: config.grid_color,
            ripple_intensity: config.ripple_intensity,
            grid_size: config.grid_size,
            grid_thickness: config.grid_thickness,
            fade_distance: config.fade_distance,
            vignette_strength: config.vignette_strength,
            glow_intensity: config.glow_intensity,
            opacity: config.opacity,
            rotation_degrees: config.rotation_degrees,
            mouse_interaction: config.mouse_interaction,
            mouse_interaction_radius: config.mouse_interaction_radius,
        }
    }

    pub fn set_resolution(&mut self, width: f32, height: f32) {
        self.resolution = [width, height];
    }
}
