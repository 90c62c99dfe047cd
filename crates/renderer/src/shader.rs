use std::borrow::Cow;

use effect::{EffectError, ShaderStageKind};
use wgpu::naga;

/// Compiles the static full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule, EffectError> {
    validate_source(VERTEX_SHADER_GLSL, ShaderStageKind::Vertex)?;
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fullscreen triangle vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: naga::ShaderStage::Vertex,
            defines: &[],
        },
    }))
}

/// Compiles the ripple-grid fragment kernel.
pub(crate) fn compile_fragment_shader(
    device: &wgpu::Device,
) -> Result<wgpu::ShaderModule, EffectError> {
    validate_source(FRAGMENT_SHADER_GLSL, ShaderStageKind::Fragment)?;
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("ripple grid fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(FRAGMENT_SHADER_GLSL),
            stage: naga::ShaderStage::Fragment,
            defines: &[],
        },
    }))
}

/// Parses and validates a GLSL stage up-front so compile failures surface
/// as a fatal [`EffectError::ShaderCompile`] with stage and diagnostic text
/// instead of a deferred device error.
pub(crate) fn validate_source(
    source: &str,
    stage: ShaderStageKind,
) -> Result<(), EffectError> {
    let naga_stage = match stage {
        ShaderStageKind::Vertex => naga::ShaderStage::Vertex,
        ShaderStageKind::Fragment => naga::ShaderStage::Fragment,
    };
    let mut frontend = naga::front::glsl::Frontend::default();
    let options = naga::front::glsl::Options::from(naga_stage);
    let module = frontend
        .parse(&options, source)
        .map_err(|errors| EffectError::ShaderCompile {
            stage,
            log: errors.to_string(),
        })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    );
    validator
        .validate(&module)
        .map_err(|error| EffectError::ShaderCompile {
            stage,
            log: error.into_inner().to_string(),
        })?;
    Ok(())
}

/// Minimal full-screen triangle vertex shader.
pub(crate) const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    vec2 pos = positions[vertex_index];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";

/// Ripple-grid fragment kernel.
///
/// The composition order is load-bearing: rotated aspect-corrected
/// coordinate, radial ripple displacement, pointer displacement, grid
/// evaluation, glow, centre fade, vignette, tint. Reordering changes the
/// visible result. The uniform block must byte-match `GridUniforms` in
/// `uniforms.rs`.
pub(crate) const FRAGMENT_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 out_color;

layout(std140, set = 0, binding = 0) uniform GridParams {
    vec2 resolution;
    float time;
    float ripple_intensity;
    vec3 grid_color;
    float grid_size;
    float grid_thickness;
    float fade_distance;
    float vignette_strength;
    float glow_intensity;
    float opacity;
    float rotation_degrees;
    float rainbow;
    float mouse_interaction;
    vec2 mouse_position;
    float mouse_influence;
    float mouse_radius;
} ubo;

const float PI = 3.14159265358979;

mat2 rotate(float angle) {
    float s = sin(angle);
    float c = cos(angle);
    return mat2(c, -s, s, c);
}

void main() {
    float aspect = ubo.resolution.x / max(ubo.resolution.y, 1.0);
    vec2 uv = v_uv * 2.0 - 1.0;
    uv.x *= aspect;
    if (ubo.rotation_degrees != 0.0) {
        uv = rotate(ubo.rotation_degrees * PI / 180.0) * uv;
    }

    float dist = length(uv);
    float wave = sin(PI * (ubo.time - dist));
    vec2 ripple_uv = uv + uv * wave * ubo.ripple_intensity;

    if (ubo.mouse_interaction > 0.5 && ubo.mouse_influence > 0.0) {
        vec2 mouse_uv = ubo.mouse_position * 2.0 - 1.0;
        mouse_uv.x *= aspect;
        vec2 from_mouse = uv - mouse_uv;
        float mouse_dist = length(from_mouse);
        // The pixel under the pointer has no direction to displace along.
        if (mouse_dist > 1e-4) {
            float falloff = ubo.mouse_influence
                * exp(-mouse_dist * mouse_dist / (ubo.mouse_radius * ubo.mouse_radius));
            float mouse_wave = sin(PI * (ubo.time * 2.0 - mouse_dist * 3.0)) * falloff;
            ripple_uv += (from_mouse / mouse_dist) * mouse_wave * ubo.ripple_intensity * 0.3;
        }
    }

    vec2 grid = sin(ubo.grid_size * 0.5 * PI * ripple_uv - vec2(PI / 2.0));
    vec2 edges = vec2(
        smoothstep(0.0, 0.5, abs(grid.x)),
        smoothstep(0.0, 0.5, abs(grid.y)));

    vec3 lines = vec3(0.0);
    lines += vec3(exp(-ubo.grid_thickness * edges.x * (0.8 + 0.5 * sin(PI * ubo.time))));
    lines += vec3(exp(-ubo.grid_thickness * edges.y));
    lines += vec3(0.5 * exp(-(ubo.grid_thickness / 4.0) * sin(edges.x)));
    lines += vec3(0.5 * exp(-(ubo.grid_thickness / 3.0) * edges.y));
    if (ubo.glow_intensity > 0.0) {
        lines += vec3(ubo.glow_intensity * exp(-ubo.grid_thickness * 0.5 * edges.x));
        lines += vec3(ubo.glow_intensity * exp(-ubo.grid_thickness * 0.5 * edges.y));
    }

    float fade = exp(-2.0 * clamp(pow(dist, ubo.fade_distance), 0.0, 1.0));
    float vignette_dist = length(v_uv - vec2(0.5));
    float vignette = clamp(1.0 - pow(vignette_dist * 2.0, ubo.vignette_strength), 0.0, 1.0);

    vec3 tint = ubo.grid_color;
    if (ubo.rainbow > 0.5) {
        tint = vec3(
            uv.x * 0.5 + 0.5 * sin(ubo.time),
            uv.y * 0.5 + 0.5 * cos(ubo.time),
            pow(abs(cos(ubo.time)), 4.0)) + vec3(0.5);
    }

    float strength = fade * vignette;
    float alpha = length(lines) * strength * ubo.opacity;
    out_color = vec4(lines * tint * strength * ubo.opacity, alpha);
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_stage_parses_and_validates() {
        validate_source(VERTEX_SHADER_GLSL, ShaderStageKind::Vertex).expect("vertex stage valid");
    }

    #[test]
    fn fragment_stage_parses_and_validates() {
        validate_source(FRAGMENT_SHADER_GLSL, ShaderStageKind::Fragment)
            .expect("fragment stage valid");
    }

    #[test]
    fn broken_source_reports_stage_and_diagnostics() {
        let result = validate_source("void main() { bogus; }", ShaderStageKind::Fragment);
        match result {
            Err(EffectError::ShaderCompile { stage, log }) => {
                assert_eq!(stage, ShaderStageKind::Fragment);
                assert!(!log.is_empty());
            }
            other => panic!("expected shader compile error, got {other:?}"),
        }
    }

    #[test]
    fn pointer_displacement_guards_the_zero_length_direction() {
        // Displacement divides by the pointer distance; the guard must sit
        // between computing it and using it.
        let guard = FRAGMENT_SHADER_GLSL
            .find("mouse_dist > 1e-4")
            .expect("guard present");
        let division = FRAGMENT_SHADER_GLSL
            .find("from_mouse / mouse_dist")
            .expect("division present");
        assert!(guard < division);
        assert!(!FRAGMENT_SHADER_GLSL.contains("normalize("));
    }

    #[test]
    fn fragment_kernel_keeps_its_composition_stages() {
        // Ripple before grid evaluation, grid before glow, fade before
        // vignette: verified by source order of the defining expressions.
        let ripple = FRAGMENT_SHADER_GLSL.find("ripple_uv = uv").expect("ripple");
        let grid = FRAGMENT_SHADER_GLSL.find("grid = sin(").expect("grid");
        let glow = FRAGMENT_SHADER_GLSL.find("glow_intensity * exp").expect("glow");
        let fade = FRAGMENT_SHADER_GLSL.find("fade = exp(-2.0").expect("fade");
        let vignette = FRAGMENT_SHADER_GLSL.find("vignette = clamp(").expect("vignette");
        assert!(ripple < grid && grid < glow && glow < fade && fade < vignette);
    }
}
