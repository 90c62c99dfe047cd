use std::path::PathBuf;

use clap::Parser;
use effect::EffectOptions;

#[derive(Parser, Debug)]
#[command(
    name = "ripplegrid",
    author,
    version,
    about = "Animated ripple-grid shader background",
    arg_required_else_help = false
)]
pub struct Args {
    /// TOML preset with effect options; explicit flags override it.
    #[arg(long, value_name = "PATH", env = "RIPPLEGRID_PRESET")]
    pub preset: Option<PathBuf>,

    /// Window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", default_value = "960x540")]
    pub size: String,

    /// Cycle the grid tint through a time/coordinate-driven rainbow.
    #[arg(long)]
    pub rainbow: bool,

    /// Grid color as a hex string (e.g. `#33ccff`).
    #[arg(long, value_name = "HEX")]
    pub grid_color: Option<String>,

    /// Strength of the radial ripple displacement.
    #[arg(long, value_name = "FLOAT")]
    pub ripple_intensity: Option<f32>,

    /// Number of grid cells across the surface.
    #[arg(long, value_name = "FLOAT")]
    pub grid_size: Option<f32>,

    /// Sharpness of the grid lines.
    #[arg(long, value_name = "FLOAT")]
    pub grid_thickness: Option<f32>,

    /// Exponent shaping the centre-distance fade.
    #[arg(long, value_name = "FLOAT")]
    pub fade_distance: Option<f32>,

    /// Exponent shaping the edge vignette.
    #[arg(long, value_name = "FLOAT")]
    pub vignette_strength: Option<f32>,

    /// Additive glow around the grid lines.
    #[arg(long, value_name = "FLOAT")]
    pub glow_intensity: Option<f32>,

    /// Overall output opacity.
    #[arg(long, value_name = "FLOAT")]
    pub opacity: Option<f32>,

    /// Static grid rotation in degrees.
    #[arg(long, value_name = "DEGREES")]
    pub rotation: Option<f32>,

    /// Disable pointer interaction entirely.
    #[arg(long)]
    pub no_mouse: bool,

    /// Radius of the pointer's Gaussian ripple falloff.
    #[arg(long, value_name = "FLOAT")]
    pub mouse_radius: Option<f32>,
}

impl Args {
    /// Maps the explicit flags onto an overrides struct; unset flags stay
    /// `None` so a preset underneath can still supply them.
    pub fn effect_options(&self) -> EffectOptions {
        EffectOptions {
            enable_rainbow: self.rainbow.then_some(true),
            grid_color: self.grid_color.clone(),
            ripple_intensity: self.ripple_intensity,
            grid_size: self.grid_size,
            grid_thickness: self.grid_thickness,
            fade_distance: self.fade_distance,
            vignette_strength: self.vignette_strength,
            glow_intensity: self.glow_intensity,
            opacity: self.opacity,
            grid_rotation: self.rotation,
            mouse_interaction: self.no_mouse.then_some(false),
            mouse_interaction_radius: self.mouse_radius,
            container_selector: None,
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

/// Parses a `WIDTHxHEIGHT` string into physical pixels.
pub fn parse_surface_size(value: &str) -> Result<(u32, u32), String> {
    let mut parts = value.trim().splitn(2, ['x', 'X']);
    let width = parts
        .next()
        .and_then(|part| part.trim().parse::<u32>().ok());
    let height = parts
        .next()
        .and_then(|part| part.trim().parse::<u32>().ok());
    match (width, height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => Ok((width, height)),
        _ => Err(format!(
            "invalid size '{value}'; expected WIDTHxHEIGHT (e.g. 1280x720)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_size_parses_common_forms() {
        assert_eq!(parse_surface_size("1280x720"), Ok((1280, 720)));
        assert_eq!(parse_surface_size(" 640 X 360 "), Ok((640, 360)));
        assert!(parse_surface_size("1280").is_err());
        assert!(parse_surface_size("0x720").is_err());
        assert!(parse_surface_size("widexhigh").is_err());
    }

    #[test]
    fn unset_flags_leave_options_empty() {
        let args = Args::parse_from(["ripplegrid"]);
        let options = args.effect_options();
        assert!(options.enable_rainbow.is_none());
        assert!(options.mouse_interaction.is_none());
        assert!(options.grid_color.is_none());
    }

    #[test]
    fn flags_map_onto_overrides() {
        let args = Args::parse_from([
            "ripplegrid",
            "--rainbow",
            "--no-mouse",
            "--grid-color",
            "#ff0000",
            "--opacity",
            "0.5",
            "--rotation",
            "45",
        ]);
        let options = args.effect_options();
        assert_eq!(options.enable_rainbow, Some(true));
        assert_eq!(options.mouse_interaction, Some(false));
        assert_eq!(options.grid_color.as_deref(), Some("#ff0000"));
        assert_eq!(options.opacity, Some(0.5));
        assert_eq!(options.grid_rotation, Some(45.0));
    }
}
