//! Core state machine for the ripple-grid background effect.
//!
//! This crate carries everything about the effect that is not GPU-specific:
//! configuration resolution, pointer tracking and smoothing, the per-frame
//! animation loop, the frame-scheduler abstraction, and the lifecycle
//! controller tying them together. The flow per instance is:
//!
//! ```text
//!   EffectOptions
//!        │ EffectConfig::resolve
//!        ▼
//!   create_background_effect ──▶ EffectHost::attach_surface ──▶ GpuSurface
//!        │                                │
//!        ├─▶ InputTracker (pointer targets, listener tokens)
//!        └─▶ AnimationLoop ──▶ frame(t): smooth ▶ uniforms ▶ draw ▶ reschedule
//! ```
//!
//! The GPU side lives behind the [`GpuSurface`] trait (implemented by the
//! `renderer` crate); frame scheduling lives behind [`FrameScheduler`] so
//! the loop can be driven by a real display callback or stepped manually in
//! tests. Everything runs on one logical event loop: targets are written by
//! event handlers between frames, smoothed values once per frame, and the
//! uniform writes for a frame always happen before that frame's draw call.

mod animation;
mod config;
mod error;
mod host;
mod instance;
mod pointer;
mod sched;
mod uniforms;

pub use animation::{AnimationLoop, INFLUENCE_SMOOTHING, POSITION_SMOOTHING};
pub use config::{parse_hex_color, EffectConfig, EffectOptions, DEFAULT_CONTAINER_SELECTOR};
pub use error::{ConfigParseError, EffectError, FrameError, ReleaseError, ShaderStageKind};
pub use host::{ContainerRect, EffectHost, GpuSurface, ListenerToken, PointerEvent};
pub use instance::{create_background_effect, EffectInstance};
pub use pointer::{InputTracker, PointerState};
pub use sched::{FrameScheduler, FrameToken, ManualScheduler};
pub use uniforms::UniformState;
