pub mod atlas;
pub mod instance;
pub mod pipeline;

use std::sync::Arc;
use winit::window::Window;

use self::atlas::SpriteAtlas;
use self::instance::SpriteInstance;
use self::pipeline::{BackgroundPipeline, SpritePipeline};
use crate::assets::FrameImage;

/// Core GPU state — device, queue, surface, the two passes.
pub struct GpuState {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub background_pipeline: BackgroundPipeline,
    pub sprite_pipeline: SpritePipeline,
}

impl GpuState {
    /// Initialize wgpu, upload the atlas and background, build both passes.
    /// `world_w`/`world_h` fix the sprite coordinate space (the preset's
    /// window size) independent of the physical surface resolution.
    pub fn new(
        window: Arc<Window>,
        world_w: f32,
        world_h: f32,
        atlas: &SpriteAtlas,
        background: &FrameImage,
    ) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let surface = instance
            .create_surface(window)
            .expect("failed to create wgpu surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("no suitable GPU adapter found");

        log::info!(
            "GPU adapter: {:?} ({:?})",
            adapter.get_info().name,
            adapter.get_info().backend
        );

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("herotoy_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
        ))
        .expect("failed to create wgpu device");

        let surface_caps = surface.get_capabilities(&adapter);

        let format = surface_caps
            .formats
            .iter()
            .find(|f| **f == wgpu::TextureFormat::Bgra8UnormSrgb)
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Surface format: {format:?}");

        // Fifo everywhere — vsync paces the render loop, the sim runs on
        // its own fixed-timestep accumulator.
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let background_pipeline = BackgroundPipeline::new(&device, &queue, format, background);
        let sprite_pipeline = SpritePipeline::new(&device, &queue, format, atlas);

        sprite_pipeline.update_screen_size(&queue, world_w, world_h);

        Self {
            device,
            queue,
            surface,
            surface_config,
            background_pipeline,
            sprite_pipeline,
        }
    }

    /// Resize the surface. The sprite coordinate space stays fixed; the
    /// surface just stretches it.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Upload sprite instance data for this frame.
    pub fn update_instances(&mut self, instances: &[SpriteInstance]) {
        self.sprite_pipeline
            .update_instances(&self.queue, instances);
    }

    /// Draw one frame: background first, sprites on top, present.
    pub fn render_frame(&mut self) {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface
                    .configure(&self.device, &self.surface_config);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                return;
            }
            Err(e) => {
                log::warn!("Surface error: {e:?}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        // Background pass — clears and covers the whole viewport.
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("background_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.background_pipeline.pipeline);
            pass.set_bind_group(0, &self.background_pipeline.bind_group, &[]);
            pass.draw(0..3, 0..1); // fullscreen triangle
        }

        // Sprite pass — alpha-blended over the background.
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sprite_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let p = &self.sprite_pipeline;
            if p.num_instances > 0 {
                pass.set_pipeline(&p.pipeline);
                pass.set_bind_group(0, &p.bind_group, &[]);
                pass.set_vertex_buffer(0, p.vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, p.instance_buffer.slice(..));
                pass.set_index_buffer(p.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..6, 0, 0..p.num_instances);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}
