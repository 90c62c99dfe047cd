use crate::host::{ContainerRect, EffectHost, ListenerToken, PointerEvent};

/// Raw and smoothed pointer state feeding the mouse uniforms.
///
/// Targets are written by the tracker's event handlers; the smoothed values
/// are advanced once per frame by the animation loop. Coordinates live in
/// [0,1]² with Y pointing up, matching the shader's convention.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerState {
    pub target: [f32; 2],
    pub smoothed: [f32; 2],
    pub target_influence: f32,
    pub smoothed_influence: f32,
}

impl Default for PointerState {
    /// Starts centred so the first interaction does not lurch from a corner.
    fn default() -> Self {
        Self {
            target: [0.5, 0.5],
            smoothed: [0.5, 0.5],
            target_influence: 0.0,
            smoothed_influence: 0.0,
        }
    }
}

impl PointerState {
    /// Advances the smoothed values one exponential-interpolation step
    /// toward their targets.
    pub fn smooth(&mut self, position_factor: f32, influence_factor: f32) {
        for axis in 0..2 {
            self.smoothed[axis] += (self.target[axis] - self.smoothed[axis]) * position_factor;
        }
        self.smoothed_influence +=
            (self.target_influence - self.smoothed_influence) * influence_factor;
    }
}

/// Observes pointer move/enter/leave on the container.
///
/// Listeners are registered with the host only when interaction is enabled,
/// and the returned tokens are stored so teardown unregisters exactly what
/// was registered. With interaction disabled the tracker registers nothing
/// and ignores every event.
#[derive(Debug)]
pub struct InputTracker {
    rect: ContainerRect,
    listeners: Vec<ListenerToken>,
    enabled: bool,
}

impl InputTracker {
    pub fn attach(host: &mut dyn EffectHost, rect: ContainerRect, enabled: bool) -> Self {
        let mut listeners = Vec::new();
        if enabled {
            for event in [PointerEvent::Move, PointerEvent::Enter, PointerEvent::Leave] {
                listeners.push(host.register_pointer(event));
            }
            tracing::debug!(count = listeners.len(), "registered pointer listeners");
        }
        Self {
            rect,
            listeners,
            enabled,
        }
    }

    /// Tracks the container's new client size after a resize, keeping the
    /// offset captured at attach.
    pub fn container_resized(&mut self, width: f64, height: f64) {
        self.rect.width = width;
        self.rect.height = height;
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Normalises a host-space position into the pointer target.
    ///
    /// Y is flipped to the shader's bottom-up convention and both axes are
    /// clamped into [0,1].
    pub fn pointer_moved(&self, x: f64, y: f64, pointer: &mut PointerState) {
        if !self.enabled {
            return;
        }
        let width = self.rect.width.max(1.0);
        let height = self.rect.height.max(1.0);
        let nx = ((x - self.rect.left) / width).clamp(0.0, 1.0);
        let ny = (1.0 - (y - self.rect.top) / height).clamp(0.0, 1.0);
        pointer.target = [nx as f32, ny as f32];
    }

    pub fn pointer_entered(&self, pointer: &mut PointerState) {
        if self.enabled {
            pointer.target_influence = 1.0;
        }
    }

    pub fn pointer_left(&self, pointer: &mut PointerState) {
        if self.enabled {
            pointer.target_influence = 0.0;
        }
    }

    /// Unregisters every stored listener token.
    pub fn detach(&mut self, host: &mut dyn EffectHost) {
        for token in self.listeners.drain(..) {
            host.unregister_pointer(token);
        }
    }
}
