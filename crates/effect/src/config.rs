use serde::{Deserialize, Serialize};

use crate::error::ConfigParseError;

/// Caller overrides for the effect. Every field is optional; unspecified
/// keys take the documented defaults when resolved into an [`EffectConfig`].
///
/// Derives serde so a preset can be loaded from TOML and merged before CLI
/// flags are applied on top.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EffectOptions {
    pub enable_rainbow: Option<bool>,
    /// Grid color as a hex string (`#rgb` or `#rrggbb`).
    pub grid_color: Option<String>,
    pub ripple_intensity: Option<f32>,
    pub grid_size: Option<f32>,
    pub grid_thickness: Option<f32>,
    pub fade_distance: Option<f32>,
    pub vignette_strength: Option<f32>,
    pub glow_intensity: Option<f32>,
    pub opacity: Option<f32>,
    /// Static rotation of the grid in degrees.
    pub grid_rotation: Option<f32>,
    pub mouse_interaction: Option<bool>,
    pub mouse_interaction_radius: Option<f32>,
    pub container_selector: Option<String>,
}

impl EffectOptions {
    /// Parses a TOML preset into an options struct.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigParseError> {
        Ok(toml::from_str(input)?)
    }

    /// Overlays `other` on top of `self`, field by field. Values present in
    /// `other` win; used to apply CLI flags over a preset file.
    pub fn merged_with(self, other: EffectOptions) -> Self {
        Self {
            enable_rainbow: other.enable_rainbow.or(self.enable_rainbow),
            grid_color: other.grid_color.or(self.grid_color),
            ripple_intensity: other.ripple_intensity.or(self.ripple_intensity),
            grid_size: other.grid_size.or(self.grid_size),
            grid_thickness: other.grid_thickness.or(self.grid_thickness),
            fade_distance: other.fade_distance.or(self.fade_distance),
            vignette_strength: other.vignette_strength.or(self.vignette_strength),
            glow_intensity: other.glow_intensity.or(self.glow_intensity),
            opacity: other.opacity.or(self.opacity),
            grid_rotation: other.grid_rotation.or(self.grid_rotation),
            mouse_interaction: other.mouse_interaction.or(self.mouse_interaction),
            mouse_interaction_radius: other
                .mouse_interaction_radius
                .or(self.mouse_interaction_radius),
            container_selector: other.container_selector.or(self.container_selector),
        }
    }
}

/// Default container selector used when the caller does not name one.
pub const DEFAULT_CONTAINER_SELECTOR: &str = "#ripple-grid";

/// Immutable configuration for one effect instance.
///
/// Built once by [`EffectConfig::resolve`] and never mutated afterwards; a
/// new configuration implies a new instance. Numeric values are accepted
/// as-is with no range validation.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectConfig {
    pub rainbow: bool,
    /// Grid color as linear RGB in [0,1].
    pub grid_color: [f32; 3],
    pub ripple_intensity: f32,
    pub grid_size: f32,
    pub grid_thickness: f32,
    pub fade_distance: f32,
    pub vignette_strength: f32,
    pub glow_intensity: f32,
    pub opacity: f32,
    /// Static grid rotation in degrees.
    pub rotation_degrees: f32,
    pub mouse_interaction: bool,
    pub mouse_interaction_radius: f32,
    pub container_selector: String,
}

impl EffectConfig {
    /// Merges caller overrides with the documented defaults.
    ///
    /// A grid color that fails to parse falls back to white with a warning;
    /// everything else is a pure merge.
    pub fn resolve(overrides: &EffectOptions) -> Self {
        let grid_color = match overrides.grid_color.as_deref() {
            Some(raw) => parse_hex_color(raw).unwrap_or_else(|| {
                tracing::warn!(color = raw, "unparseable grid color; using white");
                [1.0, 1.0, 1.0]
            }),
            None => [1.0, 1.0, 1.0],
        };

        Self {
            rainbow: overrides.enable_rainbow.unwrap_or(false),
            grid_color,
            ripple_intensity: overrides.ripple_intensity.unwrap_or(0.05),
            grid_size: overrides.grid_size.unwrap_or(10.0),
            grid_thickness: overrides.grid_thickness.unwrap_or(15.0),
            fade_distance: overrides.fade_distance.unwrap_or(1.5),
            vignette_strength: overrides.vignette_strength.unwrap_or(2.0),
            glow_intensity: overrides.glow_intensity.unwrap_or(0.1),
            opacity: overrides.opacity.unwrap_or(0.8),
            rotation_degrees: overrides.grid_rotation.unwrap_or(0.0),
            mouse_interaction: overrides.mouse_interaction.unwrap_or(true),
            mouse_interaction_radius: overrides.mouse_interaction_radius.unwrap_or(1.2),
            container_selector: overrides
                .container_selector
                .clone()
                .unwrap_or_else(|| DEFAULT_CONTAINER_SELECTOR.to_string()),
        }
    }
}

/// Parses `#rgb` or `#rrggbb` into RGB floats in [0,1].
pub fn parse_hex_color(raw: &str) -> Option<[f32; 3]> {
    let digits = raw.strip_prefix('#')?;
    if !digits.is_ascii() {
        return None;
    }
    let expand = |value: u8| value << 4 | value;
    let (r, g, b) = match digits.len() {
        3 => {
            let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok();
            (
                expand(nibble(0)?),
                expand(nibble(1)?),
                expand(nibble(2)?),
            )
        }
        6 => {
            let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
            (byte(0)?, byte(2)?, byte(4)?)
        }
        _ => return None,
    };
    Some([
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_overrides_take_documented_defaults() {
        let config = EffectConfig::resolve(&EffectOptions::default());
        assert!(!config.rainbow);
        assert_eq!(config.grid_color, [1.0, 1.0, 1.0]);
        assert_eq!(config.ripple_intensity, 0.05);
        assert_eq!(config.grid_size, 10.0);
        assert_eq!(config.grid_thickness, 15.0);
        assert_eq!(config.fade_distance, 1.5);
        assert_eq!(config.vignette_strength, 2.0);
        assert_eq!(config.glow_intensity, 0.1);
        assert_eq!(config.opacity, 0.8);
        assert_eq!(config.rotation_degrees, 0.0);
        assert!(config.mouse_interaction);
        assert_eq!(config.mouse_interaction_radius, 1.2);
        assert_eq!(config.container_selector, DEFAULT_CONTAINER_SELECTOR);
    }

    #[test]
    fn out_of_range_numerics_are_accepted_unchanged() {
        let overrides = EffectOptions {
            grid_thickness: Some(-40.0),
            opacity: Some(7.5),
            ..EffectOptions::default()
        };
        let config = EffectConfig::resolve(&overrides);
        assert_eq!(config.grid_thickness, -40.0);
        assert_eq!(config.opacity, 7.5);
    }

    #[test]
    fn hex_colors_parse_in_both_widths() {
        assert_eq!(parse_hex_color("#ff0000"), Some([1.0, 0.0, 0.0]));
        assert_eq!(parse_hex_color("#f00"), Some([1.0, 0.0, 0.0]));
        let teal = parse_hex_color("#008080").expect("teal");
        assert_eq!(teal[0], 0.0);
        assert!((teal[1] - 128.0 / 255.0).abs() < 1e-6);
        assert!((teal[2] - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn invalid_hex_color_falls_back_to_white() {
        assert_eq!(parse_hex_color("red"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color("#ffff"), None);
        // Non-ASCII payloads whose byte length looks like a valid width.
        assert_eq!(parse_hex_color("#\u{e9}5"), None);
        assert_eq!(parse_hex_color("#\u{e9}\u{e9}\u{e9}"), None);

        let overrides = EffectOptions {
            grid_color: Some("not-a-color".to_string()),
            ..EffectOptions::default()
        };
        let config = EffectConfig::resolve(&overrides);
        assert_eq!(config.grid_color, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn preset_toml_parses_into_options() {
        let options = EffectOptions::from_toml_str(
            r##"
enable-rainbow = true
grid-color = "#00ff88"
ripple-intensity = 0.12
mouse-interaction = false
"##,
        )
        .expect("preset parses");
        assert_eq!(options.enable_rainbow, Some(true));
        assert_eq!(options.grid_color.as_deref(), Some("#00ff88"));
        assert_eq!(options.ripple_intensity, Some(0.12));
        assert_eq!(options.mouse_interaction, Some(false));
        assert!(options.grid_size.is_none());
    }

    #[test]
    fn merge_prefers_explicit_values() {
        let preset = EffectOptions {
            opacity: Some(0.4),
            grid_size: Some(6.0),
            ..EffectOptions::default()
        };
        let flags = EffectOptions {
            opacity: Some(0.9),
            ..EffectOptions::default()
        };
        let merged = preset.merged_with(flags);
        assert_eq!(merged.opacity, Some(0.9));
        assert_eq!(merged.grid_size, Some(6.0));
    }
}
