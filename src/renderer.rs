//! wgpu Renderer
//!
//! Presents the window contents: the window fill, the frame line, and the
//! backing canvas copied 1:1 onto the drawing area. The canvas lives on the
//! CPU; only the damaged part is uploaded to its GPU texture before each
//! frame.

use crate::app::WindowState;
use crate::canvas::{BackingCanvas, Rect};
use crate::config::ShellConfig;
use crate::damage::Damage;
use crate::error::{Error, Result};
use crate::layout::FrameLayout;

/// Outcome of one attempt to composite a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// The frame reached the screen
    Presented,
    /// The surface was not ready; draw again on the next turn of the loop
    Retry,
    /// Nothing could be drawn and retrying will not help
    Dropped,
}

impl FrameStatus {
    /// How a failed surface acquire affects the frame
    pub fn from_surface_error(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Timeout => {
                FrameStatus::Retry
            }
            _ => FrameStatus::Dropped,
        }
    }

    pub fn needs_redraw(self) -> bool {
        self == FrameStatus::Retry
    }
}

/// GPU copy of the backing canvas
struct CanvasTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    size: (u32, u32),
}

/// Renderer wraps the wgpu device, queue, and surface
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    max_texture_dimension: u32,
    canvas_format: wgpu::TextureFormat,
    window_clear: wgpu::Color,

    // Blit pipeline shared by the frame line and the canvas
    blit_pipeline: wgpu::RenderPipeline,
    blit_bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,

    // 1x1 texture in the frame colour, stretched over the frame rectangle
    frame_bind_group: wgpu::BindGroup,

    canvas: Option<CanvasTexture>,
}

impl Renderer {
    /// Create a new renderer for `window` with its current inner size
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: winit::dpi::PhysicalSize<u32>,
        shell: &ShellConfig,
    ) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;
        log::debug!("Surface created");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let adapter_info = adapter.get_info();
        log::info!("Adapter acquired: {:?} (backend: {:?})", adapter_info.name, adapter_info.backend);

        let adapter_limits = adapter.limits();
        let max_texture_dimension = adapter_limits.max_texture_dimension_2d;
        log::debug!("Max texture dimension: {}", max_texture_dimension);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Scribble Canvas Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter_limits),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        log::debug!(
            "Surface capabilities: formats={:?}, present_modes={:?}",
            surface_caps.formats,
            surface_caps.present_modes
        );

        // Prefer an sRGB surface so canvas bytes come out unchanged
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(Error::NoSurfaceFormat)?;
        let canvas_format = if surface_format.is_srgb() {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };
        log::info!("Surface format: {:?}, canvas format: {:?}", surface_format, canvas_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.min(max_texture_dimension),
            height: size.height.min(max_texture_dimension),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        // Only configure if size is valid, otherwise wait for resize
        if config.width > 0 && config.height > 0 {
            surface.configure(&device, &config);
        } else {
            log::warn!("Skipping surface configuration (invalid size: {}x{})", config.width, config.height);
        }

        let (blit_pipeline, blit_bind_group_layout) = Self::create_blit_pipeline(&device, surface_format);

        // Nearest filtering: the canvas is always drawn at 1:1
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Blit Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let frame_texture = Self::create_texture(&device, 1, 1, canvas_format, "Frame Texture");
        Self::upload(
            &queue,
            &frame_texture,
            bytemuck::bytes_of(&shell.frame_color),
            0,
            4,
            Rect::of_size(1, 1),
        );
        let frame_bind_group =
            Self::create_bind_group(&device, &blit_bind_group_layout, &frame_texture, &sampler, "Frame Bind Group");

        log::info!("Renderer initialized: {}x{}", size.width, size.height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            max_texture_dimension,
            canvas_format,
            window_clear: shell.window_color.to_linear_wgpu(),
            blit_pipeline,
            blit_bind_group_layout,
            sampler,
            frame_bind_group,
            canvas: None,
        })
    }

    /// Create the blit pipeline used for both the frame and the canvas
    fn create_blit_pipeline(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
    ) -> (wgpu::RenderPipeline, wgpu::BindGroupLayout) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blit.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Blit Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blit Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Blit Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
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
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group_layout)
    }

    fn create_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        label: &str,
    ) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        texture: &wgpu::Texture,
        sampler: &wgpu::Sampler,
        label: &str,
    ) -> wgpu::BindGroup {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    /// Copy `rect` of a tightly packed RGBA8 image into `texture`
    ///
    /// `offset` is the byte offset of the rect's top-left pixel in `data`.
    fn upload(
        queue: &wgpu::Queue,
        texture: &wgpu::Texture,
        data: &[u8],
        offset: u64,
        bytes_per_row: u32,
        rect: Rect,
    ) {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: rect.x0 as u32,
                    y: rect.y0 as u32,
                    z: 0,
                },
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(rect.height()),
            },
            wgpu::Extent3d {
                width: rect.width(),
                height: rect.height(),
                depth_or_array_layers: 1,
            },
        );
    }

    /// Resize the surface
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        let width = new_size.width.min(self.max_texture_dimension);
        let height = new_size.height.min(self.max_texture_dimension);
        if width != new_size.width || height != new_size.height {
            log::warn!(
                "Resize {}x{} exceeds max texture size {}, clamping to {}x{}",
                new_size.width,
                new_size.height,
                self.max_texture_dimension,
                width,
                height
            );
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        log::debug!("Surface resized to: {}x{}", width, height);
    }

    /// Bring the canvas texture in line with the backing canvas
    ///
    /// Recreates the texture when the canvas size changed and uploads the
    /// damaged part of the canvas.
    fn sync_canvas(&mut self, canvas: Option<&BackingCanvas>, mut damage: Damage) {
        let Some(canvas) = canvas else {
            self.canvas = None;
            return;
        };
        let size = canvas.size();
        if size.0 > self.max_texture_dimension || size.1 > self.max_texture_dimension {
            log::warn!("Canvas {}x{} exceeds max texture size, not presenting it", size.0, size.1);
            self.canvas = None;
            return;
        }

        if self.canvas.as_ref().map(|c| c.size) != Some(size) {
            let texture = Self::create_texture(&self.device, size.0, size.1, self.canvas_format, "Canvas Texture");
            let bind_group = Self::create_bind_group(
                &self.device,
                &self.blit_bind_group_layout,
                &texture,
                &self.sampler,
                "Canvas Bind Group",
            );
            self.canvas = Some(CanvasTexture {
                texture,
                bind_group,
                size,
            });
            damage = Damage::Full;
            log::debug!("Canvas texture created: {}x{}", size.0, size.1);
        }

        let (Some(target), Some(rect)) = (&self.canvas, damage.clip_to(canvas.bounds())) else {
            return;
        };
        Self::upload(
            &self.queue,
            &target.texture,
            canvas.as_bytes(),
            canvas.byte_offset(rect.x0 as u32, rect.y0 as u32),
            canvas.bytes_per_row(),
            rect,
        );
        log::trace!("Uploaded canvas region {:?}", rect);
    }

    /// Whether `rect` lies inside the configured surface
    fn fits_surface(&self, rect: &Rect) -> bool {
        !rect.is_empty()
            && rect.x0 >= 0
            && rect.y0 >= 0
            && rect.x1 as u32 <= self.config.width
            && rect.y1 as u32 <= self.config.height
    }

    /// Composite one frame
    ///
    /// The canvas is blitted first and the frame line around it is the
    /// window's own drawing. A `Retry` status means the surface was not
    /// ready and the caller must request another redraw; the canvas texture
    /// is already up to date, so the next frame shows everything.
    pub fn render(&mut self, state: &mut WindowState, layout: &FrameLayout) -> FrameStatus {
        let damage = state.take_damage();
        self.sync_canvas(state.canvas(), damage);

        if self.config.width == 0 || self.config.height == 0 {
            return FrameStatus::Dropped;
        }

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(e) => {
                let status = FrameStatus::from_surface_error(&e);
                match e {
                    wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                        log::debug!("Surface lost or outdated, reconfiguring");
                        self.surface.configure(&self.device, &self.config);
                    }
                    wgpu::SurfaceError::Timeout => {
                        log::warn!("Timed out waiting for surface texture, retrying");
                    }
                    e => log::error!("Failed to get surface texture: {:?}", e),
                }
                return status;
            }
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Window Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.window_clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            render_pass.set_pipeline(&self.blit_pipeline);

            if self.fits_surface(&layout.frame) {
                set_viewport(&mut render_pass, &layout.frame);
                render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
                render_pass.draw(0..6, 0..1);
            }

            if let Some(canvas) = &self.canvas {
                let dest = Rect::new(
                    layout.drawing_area.x0,
                    layout.drawing_area.y0,
                    layout.drawing_area.x0 + canvas.size.0 as i32,
                    layout.drawing_area.y0 + canvas.size.1 as i32,
                );
                if self.fits_surface(&dest) {
                    set_viewport(&mut render_pass, &dest);
                    render_pass.set_bind_group(0, &canvas.bind_group, &[]);
                    render_pass.draw(0..6, 0..1);
                } else {
                    log::debug!("Canvas {:?} does not fit the surface yet, skipping blit", dest);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        FrameStatus::Presented
    }
}

fn set_viewport(render_pass: &mut wgpu::RenderPass<'_>, rect: &Rect) {
    render_pass.set_viewport(
        rect.x0 as f32,
        rect.y0 as f32,
        rect.width() as f32,
        rect.height() as f32,
        0.0,
        1.0,
    );
}
