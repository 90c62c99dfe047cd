use std::sync::Arc;

use effect::{
    ContainerRect, EffectConfig, EffectError, EffectHost, FrameScheduler, FrameToken, GpuSurface,
    ListenerToken, PointerEvent,
};
use renderer::SurfaceManager;
use winit::window::Window;

/// [`EffectHost`] backed by a winit window.
///
/// The window itself is the container, so the selector always resolves to
/// the current inner size. Listener registration is bookkeeping only: winit
/// delivers pointer events unconditionally and the event loop forwards them
/// to the instance, which ignores them when interaction is disabled.
pub struct WindowHost {
    window: Arc<Window>,
    listeners: Vec<(ListenerToken, PointerEvent)>,
    next_token: u64,
}

impl WindowHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            listeners: Vec::new(),
            next_token: 0,
        }
    }
}

impl EffectHost for WindowHost {
    fn resolve_container(&mut self, _selector: &str) -> Option<ContainerRect> {
        let size = self.window.inner_size();
        Some(ContainerRect::from_size(
            f64::from(size.width),
            f64::from(size.height),
        ))
    }

    fn attach_surface(
        &mut self,
        container: &ContainerRect,
        config: &EffectConfig,
    ) -> Result<Box<dyn GpuSurface>, EffectError> {
        let manager = SurfaceManager::attach(
            self.window.as_ref(),
            container.width as u32,
            container.height as u32,
            config,
        )?;
        Ok(Box::new(manager))
    }

    fn register_pointer(&mut self, event: PointerEvent) -> ListenerToken {
        let token = ListenerToken(self.next_token);
        self.next_token += 1;
        self.listeners.push((token, event));
        tracing::debug!(?event, token = token.0, "pointer listener registered");
        token
    }

    fn unregister_pointer(&mut self, token: ListenerToken) {
        self.listeners.retain(|(held, _)| *held != token);
    }

    fn create_scheduler(&mut self) -> Box<dyn FrameScheduler> {
        Box::new(RedrawScheduler::new(Arc::clone(&self.window)))
    }
}

/// [`FrameScheduler`] that maps frame requests onto winit redraws.
///
/// winit cannot retract a redraw once requested, so `cancel` clears the
/// outstanding token instead; the animation loop refuses callbacks that
/// arrive without a matching pending token.
pub struct RedrawScheduler {
    window: Arc<Window>,
    next: u64,
    pending: Option<u64>,
}

impl RedrawScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next: 0,
            pending: None,
        }
    }
}

impl FrameScheduler for RedrawScheduler {
    fn schedule_next(&mut self) -> FrameToken {
        self.window.request_redraw();
        let token = FrameToken(self.next);
        self.next += 1;
        self.pending = Some(token.0);
        token
    }

    fn cancel(&mut self, token: FrameToken) {
        if self.pending == Some(token.0) {
            self.pending = None;
        }
    }
}
