//! wgpu surface manager for the ripple-grid background effect.
//!
//! [`SurfaceManager`] owns every GPU resource backing one effect instance:
//!
//! ```text
//!   window handle ─▶ Surface ─▶ Device ─▶ Queue
//!                                 │
//!                                 ├─▶ RenderPipeline (fullscreen triangle)
//!                                 └─▶ uniform buffer / bind group
//! ```
//!
//! The inline GLSL stages live in `shader.rs`; the std140 uniform block in
//! `uniforms.rs`. The manager implements [`effect::GpuSurface`] so the core
//! crate can drive it without a wgpu dependency.

mod shader;
mod uniforms;

use effect::{EffectConfig, EffectError, FrameError, GpuSurface, ReleaseError, UniformState};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use crate::uniforms::GridUniforms;

/// Owns the surface, device, pipeline, and uniform buffer for one effect.
pub struct SurfaceManager {
    _instance: wgpu::Instance,
    limits: wgpu::Limits,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: (u32, u32),
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    released: bool,
}

impl SurfaceManager {
    /// Creates a surface sized to the container's client box, compiles both
    /// shader stages, builds the alpha-blended full-screen pipeline, and
    /// seeds the uniform buffer from the resolved config.
    ///
    /// Setup failures are fatal: surface/adapter problems map to
    /// [`EffectError::Surface`], shader problems to
    /// [`EffectError::ShaderCompile`].
    pub fn attach<T>(
        target: &T,
        width: u32,
        height: u32,
        effect_config: &EffectConfig,
    ) -> Result<Self, EffectError>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let instance = wgpu::Instance::default();
        let raw_window_handle = target
            .window_handle()
            .map_err(|err| EffectError::Surface(format!("failed to acquire window handle: {err}")))?
            .as_raw();
        let raw_display_handle = target
            .display_handle()
            .map_err(|err| EffectError::Surface(format!("failed to acquire display handle: {err}")))?
            .as_raw();
        let surface = unsafe {
            instance.create_surface_unsafe(wgpu::SurfaceTargetUnsafe::RawHandle {
                raw_display_handle,
                raw_window_handle,
            })
        }
        .map_err(|err| EffectError::Surface(format!("failed to create rendering surface: {err}")))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|err| EffectError::Surface(format!("no suitable GPU adapter: {err}")))?;

        let limits = adapter.limits();
        let width = width.max(1);
        let height = height.max(1);
        let max_dimension = limits.max_texture_dimension_2d;
        if width > max_dimension || height > max_dimension {
            return Err(EffectError::Surface(format!(
                "GPU max texture dimension is {max_dimension}, requested surface is {width}x{height}"
            )));
        }

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("ripple grid device"),
            required_features: wgpu::Features::empty(),
            required_limits: limits.clone(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::default(),
        }))
        .map_err(|err| EffectError::Surface(format!("failed to create GPU device: {err}")))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&device, &config);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("grid uniform buffer"),
            size: std::mem::size_of::<GridUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let seed = GridUniforms::from_state(&UniformState::new(
            effect_config,
            width as f32,
            height as f32,
        ));
        queue.write_buffer(&uniform_buffer, 0, bytemuck::bytes_of(&seed));

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("grid uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("grid uniform bind group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("grid pipeline layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let vertex_module = shader::compile_vertex_shader(&device)?;
        let fragment_module = shader::compile_fragment_shader(&device)?;

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("grid pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        tracing::info!(width, height, format = ?surface_format, "grid surface attached");

        Ok(Self {
            _instance: instance,
            limits,
            surface,
            device,
            queue,
            config,
            size: (width, height),
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            released: false,
        })
    }
}

impl GpuSurface for SurfaceManager {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.released || width == 0 || height == 0 {
            return;
        }

        let max_dimension = self.limits.max_texture_dimension_2d;
        if width > max_dimension || height > max_dimension {
            tracing::warn!(
                width,
                height,
                max_dimension,
                "requested resize exceeds GPU limits; keeping previous size"
            );
            return;
        }

        self.size = (width, height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn draw(&mut self, uniforms: &UniformState) -> Result<(), FrameError> {
        if self.released {
            return Err(FrameError("surface already released".to_string()));
        }

        let data = GridUniforms::from_state(uniforms);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&data));

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Reconfigure now; the skipped frame recovers on the next tick.
                self.surface.configure(&self.device, &self.config);
                return Err(FrameError("surface lost; reconfigured".to_string()));
            }
            Err(other) => return Err(FrameError(other.to_string())),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("grid render encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("grid render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        tracing::trace!(width = self.size.0, height = self.size.1, "presented frame");
        Ok(())
    }

    fn release(&mut self) -> Result<(), ReleaseError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        // Context-loss path: tear the device down now instead of waiting
        // for the last handle to drop.
        self.device.destroy();
        tracing::debug!("grid surface released");
        Ok(())
    }
}
