use std::fmt;

/// Fatal setup-time failures reported by [`create_background_effect`].
///
/// Anything that happens after the animation loop has started is contained
/// locally (see [`FrameError`] and [`ReleaseError`]) and never reaches the
/// caller through this type.
///
/// [`create_background_effect`]: crate::create_background_effect
#[derive(Debug, thiserror::Error)]
pub enum EffectError {
    #[error("container '{0}' did not resolve to an element")]
    Config(String),
    #[error("failed to compile {stage} shader: {log}")]
    ShaderCompile { stage: ShaderStageKind, log: String },
    #[error("failed to acquire GPU surface: {0}")]
    Surface(String),
}

/// Which shader stage failed to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStageKind {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStageKind::Vertex => f.write_str("vertex"),
            ShaderStageKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// A single draw call failed. Recoverable: the frame is skipped and the
/// loop continues.
#[derive(Debug, thiserror::Error)]
#[error("frame draw failed: {0}")]
pub struct FrameError(pub String);

/// Releasing the GPU surface failed. Best-effort: logged and swallowed so
/// teardown always completes.
#[derive(Debug, thiserror::Error)]
#[error("surface release failed: {0}")]
pub struct ReleaseError(pub String);

/// Failure to parse an options preset.
#[derive(Debug, thiserror::Error)]
pub enum ConfigParseError {
    #[error("failed to parse preset: {0}")]
    Parse(#[from] toml::de::Error),
}
