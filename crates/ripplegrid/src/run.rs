use std::fs;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use effect::{create_background_effect, EffectOptions};
use tracing_subscriber::EnvFilter;
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::cli::{parse_surface_size, Args};
use crate::host::WindowHost;

pub fn run(args: Args) -> Result<()> {
    initialise_tracing();

    let (width, height) = parse_surface_size(&args.size).map_err(|err| anyhow!(err))?;
    let options = resolve_options(&args)?;

    let event_loop = EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let window = WindowBuilder::new()
        .with_title("Ripple Grid")
        .with_inner_size(PhysicalSize::new(width, height))
        .with_transparent(true)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window: Arc<Window> = Arc::new(window);

    let host = WindowHost::new(Arc::clone(&window));
    let mut instance = create_background_effect(&options, Box::new(host))?
        .ok_or_else(|| anyhow!("window container did not resolve"))?;

    let start = Instant::now();
    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);
            if let Event::WindowEvent { window_id, event } = event {
                if window_id != window.id() {
                    return;
                }
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                        instance.destroy();
                        elwt.exit();
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        instance.pointer_moved(position.x, position.y);
                    }
                    WindowEvent::CursorEntered { .. } => {
                        instance.pointer_entered();
                    }
                    WindowEvent::CursorLeft { .. } => {
                        instance.pointer_left();
                    }
                    WindowEvent::Resized(new_size) => {
                        instance.resized(new_size.width, new_size.height);
                    }
                    WindowEvent::RedrawRequested => {
                        let timestamp_ms = start.elapsed().as_secs_f64() * 1000.0;
                        instance.frame(timestamp_ms);
                    }
                    _ => {}
                }
            }
        })
        .map_err(|err| anyhow!("event loop terminated with an error: {err}"))
}

/// Loads the preset (when given) and overlays the explicit CLI flags.
fn resolve_options(args: &Args) -> Result<EffectOptions> {
    let preset = match args.preset.as_deref() {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read preset {}", path.display()))?;
            EffectOptions::from_toml_str(&raw)
                .with_context(|| format!("failed to parse preset {}", path.display()))?
        }
        None => EffectOptions::default(),
    };
    Ok(preset.merged_with(args.effect_options()))
}

fn initialise_tracing() {
    let default_filter = "info,naga=error,wgpu=error,wgpu_core=error,wgpu_hal=error,winit=error";
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
