//! Windowed presentation shell: key bindings, timers, textured-quad display.
//!
//! Everything runs on the event-loop thread. Auto-advance and the resize
//! debounce are deadline slots polled from `about_to_wait` and mapped onto
//! `ControlFlow::WaitUntil`, so nothing here blocks.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use tracing::{error, info, warn};
use wgpu::util::DeviceExt;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowAttributes, WindowId},
};

use crate::error::Error;
use crate::navigation::{Navigator, PlayMode};
use crate::render::loader::{self, PreparedImage};
use crate::state::{self, PersistedPosition};
use crate::timer::Timers;

const RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);
const DEFAULT_WINDOW_SIZE: (f64, f64) = (1024.0, 768.0);

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    pos: [f32; 2],
    uv: [f32; 2],
}

const QUAD: [Vertex; 4] = [
    //   NDC pos         UV
    Vertex {
        pos: [-1.0, -1.0],
        uv: [0.0, 1.0],
    }, // bottom-left
    Vertex {
        pos: [1.0, -1.0],
        uv: [1.0, 1.0],
    }, // bottom-right
    Vertex {
        pos: [-1.0, 1.0],
        uv: [0.0, 0.0],
    }, // top-left
    Vertex {
        pos: [1.0, 1.0],
        uv: [1.0, 0.0],
    }, // top-right
];

/// Shell configuration carried over from the CLI.
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    /// Start fullscreen.
    pub fullscreen: bool,
    /// Scan root, needed for the state-store key at shutdown.
    pub root: PathBuf,
    /// Where to persist the viewing position.
    pub state_file: PathBuf,
}

/// Run the slideshow until the user quits, then persist the position.
///
/// # Errors
/// Returns an error if the window or rendering backend fails to
/// initialize, or if every image in the sequence fails to load.
pub fn run_slideshow(nav: Navigator, opts: ViewerOptions) -> Result<(), Error> {
    info!(count = nav.len(), "starting slideshow");
    let event_loop = EventLoop::new().map_err(|e| Error::Render(e.into()))?;
    let mut app = App::new(nav, opts);
    event_loop
        .run_app(&mut app)
        .map_err(|e| Error::Render(e.into()))?;
    match app.fatal.take() {
        Some(e) => Err(Error::Render(e)),
        None => Ok(()),
    }
}

struct Tex {
    view: wgpu::TextureView,
    w: u32,
    h: u32,
}

struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    pipeline: wgpu::RenderPipeline,
    bind_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    vbuf: wgpu::Buffer,
    params: wgpu::Buffer,
    sampler: wgpu::Sampler,
    tex: Tex,
}

struct App {
    nav: Navigator,
    opts: ViewerOptions,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    timers: Timers,
    fatal: Option<anyhow::Error>,
}

impl App {
    fn new(nav: Navigator, opts: ViewerOptions) -> Self {
        Self {
            nav,
            opts,
            window: None,
            gpu: None,
            timers: Timers::default(),
            fatal: None,
        }
    }

    fn status_line(&self) -> String {
        let mode = match self.nav.mode() {
            PlayMode::AutoPlay => "AUTO",
            PlayMode::Manual => "MANUAL",
        };
        format!(
            "{} | {}/{} | {}",
            mode,
            self.nav.index() + 1,
            self.nav.len(),
            self.nav.current().relative.display()
        )
    }

    /// Load and present the current image, skipping unloadable files.
    ///
    /// Cancels any pending advance and re-derives the schedule from the
    /// navigator, so manual navigation resets the auto-advance countdown.
    fn show_current(&mut self, event_loop: &ActiveEventLoop) {
        self.timers.advance.cancel();
        let Some(window) = self.window.clone() else {
            return;
        };
        let PhysicalSize { width, height } = window.inner_size();
        let target = (width.max(1), height.max(1));

        let mut failures = 0usize;
        loop {
            let current = self.nav.current();
            match loader::prepare(&current.path, target, self.nav.rotation()) {
                Ok(img) => {
                    if let Some(gpu) = &mut self.gpu {
                        gpu.upload(img);
                    }
                    window.set_title(&self.status_line());
                    window.request_redraw();
                    if self.nav.wants_auto_advance() {
                        self.timers.advance.schedule(
                            Instant::now(),
                            Duration::from_secs(self.nav.delay_secs()),
                        );
                    }
                    return;
                }
                Err(e) => {
                    warn!(path = %current.path.display(), error = %e, "failed to load image; skipping");
                    failures += 1;
                    if failures >= self.nav.len() {
                        error!("every image in the sequence failed to load");
                        self.fatal = Some(anyhow!("every image in the sequence failed to load"));
                        self.shutdown(event_loop);
                        return;
                    }
                    self.nav.next();
                }
            }
        }
    }

    /// Persist the viewing position and leave the event loop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.timers.advance.cancel();
        self.timers.resize.cancel();
        let position = PersistedPosition {
            last_image_path: self.nav.current().relative.clone(),
            last_index: self.nav.index(),
            total_images: self.nav.len(),
            last_updated: chrono::Utc::now(),
        };
        match state::record_position(&self.opts.state_file, &self.opts.root, position) {
            Ok(()) => info!(path = %self.opts.state_file.display(), "saved viewing position"),
            Err(e) => warn!(error = %e, "could not save viewing position"),
        }
        event_loop.exit();
    }

    fn toggle_fullscreen(&self) {
        if let Some(window) = &self.window {
            if window.fullscreen().is_some() {
                window.set_fullscreen(None);
            } else {
                window.set_fullscreen(Some(Fullscreen::Borderless(None)));
            }
        }
    }

    fn draw(&mut self) {
        let Some(gpu) = &self.gpu else { return };
        let Ok(frame) = gpu.surface.get_current_texture() else {
            return;
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&gpu.pipeline);
            rpass.set_bind_group(0, &gpu.bind_group, &[]);
            rpass.set_vertex_buffer(0, gpu.vbuf.slice(..));
            rpass.draw(0..4, 0..1);
        }
        gpu.queue.submit([encoder.finish()]);
        frame.present();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title("rust-slideshow")
            .with_inner_size(LogicalSize::new(
                DEFAULT_WINDOW_SIZE.0,
                DEFAULT_WINDOW_SIZE.1,
            ));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fatal = Some(anyhow::Error::new(e).context("create window"));
                event_loop.exit();
                return;
            }
        };
        if self.opts.fullscreen {
            window.set_fullscreen(Some(Fullscreen::Borderless(window.current_monitor())));
        }
        self.window = Some(window.clone());

        match pollster::block_on(Gpu::new(window)) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                self.fatal = Some(e.context("GPU init"));
                event_loop.exit();
                return;
            }
        }

        self.show_current(event_loop);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.window.as_ref().map(|w| w.id()) != Some(id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                match code {
                    KeyCode::ArrowRight => {
                        self.nav.next();
                        self.show_current(event_loop);
                    }
                    KeyCode::ArrowLeft => {
                        self.nav.previous();
                        self.show_current(event_loop);
                    }
                    KeyCode::KeyR => {
                        self.nav.rotate(90);
                        self.show_current(event_loop);
                    }
                    KeyCode::Space => {
                        self.nav.toggle_auto_play();
                        if self.nav.wants_auto_advance() {
                            // restart the countdown from now
                            self.show_current(event_loop);
                        } else {
                            self.timers.advance.cancel();
                            if let Some(window) = &self.window {
                                window.set_title(&self.status_line());
                            }
                        }
                    }
                    KeyCode::KeyF => self.toggle_fullscreen(),
                    KeyCode::KeyQ | KeyCode::Escape => self.shutdown(event_loop),
                    _ => {}
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(gpu) = &mut self.gpu
                    && width > 0
                    && height > 0
                {
                    gpu.resize(width, height);
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                    // Re-fit the image once the user settles on a size.
                    self.timers.resize.schedule(Instant::now(), RESIZE_DEBOUNCE);
                }
            }
            WindowEvent::RedrawRequested => self.draw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if self.timers.resize.fire(now) {
            self.show_current(event_loop);
        }
        if self.timers.advance.fire(now) {
            self.nav.next();
            self.show_current(event_loop);
        }
        match self.timers.next_deadline() {
            Some(at) => event_loop.set_control_flow(ControlFlow::WaitUntil(at)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

impl Gpu {
    async fn new(window: Arc<Window>) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible GPU adapter found")?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .unwrap_or(caps.formats[0]);
        let PhysicalSize { width, height } = window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&device, &config);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        // uv scale uniform (32 bytes to match WGSL)
        let params = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("params"),
            size: 32,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let vbuf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad"),
            contents: bytemuck::cast_slice(&QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/photo.wgsl").into()),
        });

        let bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bind_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        // black placeholder until the first prepared image arrives
        let tex = upload_texture(&device, &queue, &[0, 0, 0, 255], 1, 1);
        let bind_group = make_bind_group(&device, &bind_layout, &tex, &sampler, &params);

        let vlayout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2],
        };

        let pip_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipe_layout"),
            bind_group_layouts: &[&bind_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pipeline"),
            layout: Some(&pip_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[vlayout],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let gpu = Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            bind_layout,
            bind_group,
            vbuf,
            params,
            sampler,
            tex,
        };
        gpu.write_scale();
        Ok(gpu)
    }

    fn upload(&mut self, img: PreparedImage) {
        self.tex = upload_texture(
            &self.device,
            &self.queue,
            &img.pixels,
            img.size.0,
            img.size.1,
        );
        self.bind_group = make_bind_group(
            &self.device,
            &self.bind_layout,
            &self.tex,
            &self.sampler,
            &self.params,
        );
        self.write_scale();
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.write_scale();
    }

    fn write_scale(&self) {
        let scale = compute_uv_scale(self.config.width, self.config.height, self.tex.w, self.tex.h);
        let mut block = [0f32; 8]; // 8 * 4 = 32 bytes
        block[0..4].copy_from_slice(&scale);
        self.queue
            .write_buffer(&self.params, 0, bytemuck::bytes_of(&block));
    }
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pixels: &[u8],
    w: u32,
    h: u32,
) -> Tex {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("photo"),
        size: wgpu::Extent3d {
            width: w,
            height: h,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        tex.as_image_copy(),
        pixels,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * w),
            rows_per_image: Some(h),
        },
        wgpu::Extent3d {
            width: w,
            height: h,
            depth_or_array_layers: 1,
        },
    );
    Tex {
        view: tex.create_view(&wgpu::TextureViewDescriptor::default()),
        w,
        h,
    }
}

fn make_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    tex: &Tex,
    sampler: &wgpu::Sampler,
    params: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("bind_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&tex.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: params.as_entire_binding(),
            },
        ],
    })
}

#[allow(clippy::cast_precision_loss)]
fn compute_uv_scale(win_w: u32, win_h: u32, img_w: u32, img_h: u32) -> [f32; 4] {
    let ww = win_w as f32;
    let wh = win_h as f32;
    let iw = img_w as f32;
    let ih = img_h as f32;

    if ww == 0.0 || wh == 0.0 || iw == 0.0 || ih == 0.0 {
        return [1.0, 1.0, 0.0, 0.0];
    }

    let win_ar = ww / wh;
    let img_ar = iw / ih;

    if img_ar > win_ar {
        // Image is wider than the window: stretch UV Y so the sampled
        // region shrinks vertically (bars top and bottom).
        [1.0, img_ar / win_ar, 0.0, 0.0]
    } else {
        // Image is taller than the window: bars left and right.
        [win_ar / img_ar, 1.0, 0.0, 0.0]
    }
}
