use crate::config::EffectConfig;
use crate::error::{EffectError, FrameError, ReleaseError};
use crate::uniforms::UniformState;

/// Client box of the resolved container, in the host's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ContainerRect {
    pub fn from_size(width: f64, height: f64) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }
}

/// Pointer event kinds the tracker may subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Move,
    Enter,
    Leave,
}

/// Opaque handle for a registered pointer listener. The instance stores
/// every token it receives and hands exactly those back on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerToken(pub u64);

/// Environment the effect runs inside.
///
/// The production host wraps a window (see the `ripplegrid` binary); tests
/// substitute a counting fake. Registration is explicit so `destroy` can
/// unregister exactly what was registered.
pub trait EffectHost {
    /// Resolves the configured selector to a container, or `None` when no
    /// such element exists.
    fn resolve_container(&mut self, selector: &str) -> Option<ContainerRect>;

    /// Allocates the rendering surface sized to the container. Shader
    /// compilation happens here; failures are fatal to `init`.
    fn attach_surface(
        &mut self,
        container: &ContainerRect,
        config: &EffectConfig,
    ) -> Result<Box<dyn GpuSurface>, EffectError>;

    /// Subscribes to a pointer event on the container.
    fn register_pointer(&mut self, event: PointerEvent) -> ListenerToken;

    /// Drops a previously registered subscription. Unknown tokens are
    /// ignored.
    fn unregister_pointer(&mut self, token: ListenerToken);

    /// Creates the frame scheduler driving this instance's loop.
    fn create_scheduler(&mut self) -> Box<dyn crate::sched::FrameScheduler>;
}

/// Exclusive handle to the allocated GPU surface and program.
///
/// One surface per instance, never shared. `release` is effective at most
/// once; later calls are no-ops.
pub trait GpuSurface {
    /// Current surface size in physical pixels.
    fn size(&self) -> (u32, u32);

    /// Resizes the backing swapchain to the container's new client box.
    fn resize(&mut self, width: u32, height: u32);

    /// Writes the uniform values and issues one full-surface draw call.
    fn draw(&mut self, uniforms: &UniformState) -> Result<(), FrameError>;

    /// Frees the underlying context and detaches the backing surface.
    fn release(&mut self) -> Result<(), ReleaseError>;
}
