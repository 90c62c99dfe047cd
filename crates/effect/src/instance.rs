use crate::animation::AnimationLoop;
use crate::config::{EffectConfig, EffectOptions};
use crate::error::EffectError;
use crate::host::{EffectHost, GpuSurface};
use crate::pointer::{InputTracker, PointerState};
use crate::sched::FrameScheduler;
use crate::uniforms::UniformState;

/// Creates and starts a background effect inside the host's container.
///
/// Resolves the configuration, attaches the GPU surface, compiles the
/// program, wires pointer tracking when enabled, and schedules the first
/// frame. Returns `Ok(None)` when the configured container does not resolve
/// to an element (non-fatal by design: nothing is started). Shader
/// compilation and surface failures propagate.
pub fn create_background_effect(
    options: &EffectOptions,
    mut host: Box<dyn EffectHost>,
) -> Result<Option<EffectInstance>, EffectError> {
    let config = EffectConfig::resolve(options);

    let Some(rect) = host.resolve_container(&config.container_selector) else {
        tracing::warn!(
            selector = %config.container_selector,
            "container did not resolve; effect not started"
        );
        return Ok(None);
    };

    let surface = host.attach_surface(&rect, &config)?;
    let (width, height) = surface.size();
    tracing::info!(
        width,
        height,
        selector = %config.container_selector,
        rainbow = config.rainbow,
        interaction = config.mouse_interaction,
        "background effect attached"
    );

    let uniforms = UniformState::new(&config, width as f32, height as f32);
    let tracker = InputTracker::attach(host.as_mut(), rect, config.mouse_interaction);
    let mut scheduler = host.create_scheduler();
    let mut animation = AnimationLoop::new();
    animation.start(scheduler.as_mut());

    Ok(Some(EffectInstance {
        config,
        host,
        scheduler,
        surface: Some(surface),
        tracker,
        animation,
        pointer: PointerState::default(),
        uniforms,
        destroyed: false,
    }))
}

/// One running effect: exclusive owner of its surface, uniform state, and
/// scheduler token. Multiple instances are fully independent.
pub struct EffectInstance {
    config: EffectConfig,
    host: Box<dyn EffectHost>,
    scheduler: Box<dyn FrameScheduler>,
    surface: Option<Box<dyn GpuSurface>>,
    tracker: InputTracker,
    animation: AnimationLoop,
    pointer: PointerState,
    uniforms: UniformState,
    destroyed: bool,
}

impl EffectInstance {
    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    pub fn uniforms(&self) -> &UniformState {
        &self.uniforms
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Host entry point for a scheduled frame callback at `timestamp_ms`.
    pub fn frame(&mut self, timestamp_ms: f64) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        self.animation.frame(
            timestamp_ms,
            &mut self.pointer,
            &mut self.uniforms,
            surface.as_mut(),
            self.scheduler.as_mut(),
        );
    }

    /// Host entry point for pointer movement in host coordinates.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.tracker.pointer_moved(x, y, &mut self.pointer);
    }

    pub fn pointer_entered(&mut self) {
        self.tracker.pointer_entered(&mut self.pointer);
    }

    pub fn pointer_left(&mut self) {
        self.tracker.pointer_left(&mut self.pointer);
    }

    /// Host entry point for container size changes. Reconfigures the
    /// swapchain and sets the resolution uniform to exactly the new client
    /// size.
    pub fn resized(&mut self, width: u32, height: u32) {
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(width, height);
        }
        self.uniforms.set_resolution(width as f32, height as f32);
        self.tracker
            .container_resized(f64::from(width), f64::from(height));
        tracing::debug!(width, height, "effect surface resized");
    }

    /// Stops the loop, removes listeners, and releases the surface.
    ///
    /// Idempotent: a second call is a no-op. Safe at any lifecycle phase;
    /// release failures are logged and swallowed so teardown completes.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;

        self.animation.stop(self.scheduler.as_mut());
        self.tracker.detach(self.host.as_mut());
        if let Some(mut surface) = self.surface.take() {
            if let Err(err) = surface.release() {
                tracing::warn!(error = %err, "surface release failed during teardown");
            }
        }
        tracing::info!("background effect destroyed");
    }
}

impl Drop for EffectInstance {
    fn drop(&mut self) {
        self.destroy();
    }
}
