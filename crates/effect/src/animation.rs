use crate::host::GpuSurface;
use crate::pointer::PointerState;
use crate::sched::{FrameScheduler, FrameToken};
use crate::uniforms::UniformState;

/// Per-frame exponential interpolation factor for the pointer position.
pub const POSITION_SMOOTHING: f32 = 0.1;
/// Per-frame exponential interpolation factor for the pointer influence.
pub const INFLUENCE_SMOOTHING: f32 = 0.05;

/// Drives the per-frame update/draw cycle.
///
/// The loop holds at most one pending scheduler token. `frame` only runs
/// when the loop is started and a frame is actually pending, so a display
/// callback delivered after `stop` is ignored and no frame ever executes
/// after teardown.
#[derive(Debug, Default)]
pub struct AnimationLoop {
    running: bool,
    pending: Option<FrameToken>,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Starts the loop and schedules the first frame.
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.running {
            return;
        }
        self.running = true;
        self.pending = Some(scheduler.schedule_next());
    }

    /// Stops the loop, cancelling the pending callback synchronously.
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.running = false;
        if let Some(token) = self.pending.take() {
            scheduler.cancel(token);
        }
    }

    /// Runs one frame at timestamp `t` (milliseconds since the loop epoch):
    /// advances the smoothed pointer values, writes the uniforms, issues
    /// one draw call, and schedules the next frame.
    ///
    /// A draw failure is logged and the frame's output skipped; the loop
    /// keeps running. Returns whether a frame actually ran.
    pub fn frame(
        &mut self,
        timestamp_ms: f64,
        pointer: &mut PointerState,
        uniforms: &mut UniformState,
        surface: &mut dyn GpuSurface,
        scheduler: &mut dyn FrameScheduler,
    ) -> bool {
        if !self.running || self.pending.take().is_none() {
            return false;
        }

        uniforms.time = (timestamp_ms / 1000.0) as f32;
        pointer.smooth(POSITION_SMOOTHING, INFLUENCE_SMOOTHING);
        uniforms.mouse = pointer.smoothed;
        uniforms.mouse_influence = pointer.smoothed_influence;

        // Uniform writes above happen-before the draw for this frame.
        if let Err(err) = surface.draw(uniforms) {
            tracing::warn!(error = %err, "frame draw failed; skipping frame");
        }

        if self.running {
            self.pending = Some(scheduler.schedule_next());
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FrameError, ReleaseError};
    use crate::sched::ManualScheduler;

    struct CountingSurface {
        draws: u32,
        fail: bool,
    }

    impl CountingSurface {
        fn new() -> Self {
            Self {
                draws: 0,
                fail: false,
            }
        }
    }

    impl GpuSurface for CountingSurface {
        fn size(&self) -> (u32, u32) {
            (640, 480)
        }

        fn resize(&mut self, _width: u32, _height: u32) {}

        fn draw(&mut self, _uniforms: &UniformState) -> Result<(), FrameError> {
            self.draws += 1;
            if self.fail {
                Err(FrameError("synthetic".to_string()))
            } else {
                Ok(())
            }
        }

        fn release(&mut self) -> Result<(), ReleaseError> {
            Ok(())
        }
    }

    fn test_uniforms() -> UniformState {
        let config = crate::config::EffectConfig::resolve(&crate::config::EffectOptions::default());
        UniformState::new(&config, 640.0, 480.0)
    }

    fn run_frames(n: u32, pointer: &mut PointerState) {
        let mut animation = AnimationLoop::new();
        let mut scheduler = ManualScheduler::new();
        let mut surface = CountingSurface::new();
        let mut uniforms = test_uniforms();
        animation.start(&mut scheduler);
        for frame in 0..n {
            scheduler.fire();
            animation.frame(
                f64::from(frame) * 16.0,
                pointer,
                &mut uniforms,
                &mut surface,
                &mut scheduler,
            );
        }
        animation.stop(&mut scheduler);
    }

    #[test]
    fn influence_approaches_target_exponentially() {
        for n in [1u32, 10, 60] {
            let mut pointer = PointerState::default();
            pointer.target_influence = 1.0;
            run_frames(n, &mut pointer);
            let expected = 1.0 - 0.95f32.powi(n as i32);
            assert!(
                (pointer.smoothed_influence - expected).abs() < 1e-5,
                "after {n} frames: {} vs {expected}",
                pointer.smoothed_influence
            );
        }
    }

    #[test]
    fn position_moves_a_tenth_of_the_gap_per_frame() {
        let mut pointer = PointerState::default();
        pointer.smoothed = [0.5, 0.5];
        pointer.target = [0.8, 0.2];
        run_frames(1, &mut pointer);
        assert!((pointer.smoothed[0] - 0.53).abs() < 1e-6);
        assert!((pointer.smoothed[1] - 0.47).abs() < 1e-6);
    }

    #[test]
    fn frame_writes_time_and_mouse_uniforms_before_draw() {
        let mut animation = AnimationLoop::new();
        let mut scheduler = ManualScheduler::new();
        let mut surface = CountingSurface::new();
        let mut uniforms = test_uniforms();
        let mut pointer = PointerState::default();
        pointer.target = [1.0, 0.0];
        pointer.target_influence = 1.0;

        animation.start(&mut scheduler);
        scheduler.fire();
        let ran = animation.frame(2500.0, &mut pointer, &mut uniforms, &mut surface, &mut scheduler);

        assert!(ran);
        assert_eq!(surface.draws, 1);
        assert!((uniforms.time - 2.5).abs() < 1e-6);
        assert_eq!(uniforms.mouse, pointer.smoothed);
        assert_eq!(uniforms.mouse_influence, pointer.smoothed_influence);
    }

    #[test]
    fn draw_failure_is_contained_and_loop_continues() {
        let mut animation = AnimationLoop::new();
        let mut scheduler = ManualScheduler::new();
        let mut surface = CountingSurface::new();
        surface.fail = true;
        let mut uniforms = test_uniforms();
        let mut pointer = PointerState::default();

        animation.start(&mut scheduler);
        scheduler.fire();
        let ran = animation.frame(16.0, &mut pointer, &mut uniforms, &mut surface, &mut scheduler);

        assert!(ran);
        assert!(animation.is_running());
        assert_eq!(scheduler.pending(), 1, "loop reschedules after a bad frame");
    }

    #[test]
    fn no_frame_runs_once_stopped() {
        let mut animation = AnimationLoop::new();
        let mut scheduler = ManualScheduler::new();
        let mut surface = CountingSurface::new();
        let mut uniforms = test_uniforms();
        let mut pointer = PointerState::default();

        animation.start(&mut scheduler);
        animation.stop(&mut scheduler);
        assert_eq!(scheduler.pending(), 0);

        let ran = animation.frame(16.0, &mut pointer, &mut uniforms, &mut surface, &mut scheduler);
        assert!(!ran);
        assert_eq!(surface.draws, 0);
    }

    #[test]
    fn callback_delivered_after_mid_loop_stop_is_ignored() {
        let mut animation = AnimationLoop::new();
        let mut scheduler = ManualScheduler::new();
        let mut surface = CountingSurface::new();
        let mut uniforms = test_uniforms();
        let mut pointer = PointerState::default();

        animation.start(&mut scheduler);
        scheduler.fire();
        animation.frame(16.0, &mut pointer, &mut uniforms, &mut surface, &mut scheduler);
        assert_eq!(surface.draws, 1);

        // A redraw already queued by the platform can still arrive after
        // stop; it carries no pending token and must not draw.
        animation.stop(&mut scheduler);
        animation.frame(32.0, &mut pointer, &mut uniforms, &mut surface, &mut scheduler);
        assert_eq!(surface.draws, 1);
        assert_eq!(scheduler.pending(), 0);
    }
}
