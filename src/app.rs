use std::path::Path;
use std::sync::Arc;

use instant::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::assets::{self, FrameImage};
use crate::config::Preset;
use crate::hero::animation::AnimationSet;
use crate::hero::Hero;
use crate::input::InputState;
use crate::render::atlas::SpriteAtlas;
use crate::render::instance::SpriteInstance;
use crate::render::GpuState;

/// Target simulation tick rate (seconds per tick).
const TICK_RATE: f64 = 1.0 / 60.0;
/// Max accumulated time before we clamp (prevents spiral of death).
const MAX_ACCUMULATOR: f64 = 0.25;
/// How often to log FPS (seconds).
const FPS_LOG_INTERVAL: f64 = 5.0;
/// Where the sprite sheets and background live.
const ASSET_DIR: &str = "assets";

// ---------------------------------------------------------------------------
// Frame timing
// ---------------------------------------------------------------------------

struct FrameStats {
    last_log_time: Instant,
    frame_time_sum: f64,
    frames_since_log: u32,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            last_log_time: Instant::now(),
            frame_time_sum: 0.0,
            frames_since_log: 0,
        }
    }

    fn record_frame(&mut self, dt: f64) {
        self.frames_since_log += 1;
        self.frame_time_sum += dt;

        let elapsed = self.last_log_time.elapsed().as_secs_f64();
        if elapsed >= FPS_LOG_INTERVAL {
            let avg_ms = (self.frame_time_sum / self.frames_since_log as f64) * 1000.0;
            let fps = self.frames_since_log as f64 / elapsed;
            log::info!("FPS: {fps:.0} | avg frame: {avg_ms:.2}ms");
            self.last_log_time = Instant::now();
            self.frame_time_sum = 0.0;
            self.frames_since_log = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Top-level application state — everything the tick loop touches, owned
/// in one place rather than scattered globals.
struct App {
    preset: Preset,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,

    // Sim
    hero: Hero,
    anims: AnimationSet,
    atlas: SpriteAtlas,
    input: InputState,

    // Fixed timestep
    last_frame_time: Option<Instant>,
    accumulator: f64,
    tick_count: u64,

    frame_stats: FrameStats,
}

impl App {
    fn new(preset: Preset) -> Self {
        // Asset loading is synchronous and infallible: missing art turns
        // into placeholder frames, never a startup error.
        let anims = AnimationSet::load(Path::new(ASSET_DIR), &preset);
        let atlas = SpriteAtlas::build(&anims);

        Self {
            hero: Hero::new(&preset),
            preset,
            window: None,
            gpu: None,
            anims,
            atlas,
            input: InputState::new(),
            last_frame_time: None,
            accumulator: 0.0,
            tick_count: 0,
            frame_stats: FrameStats::new(),
        }
    }

    /// Run fixed-timestep simulation ticks. Discrete action events go to
    /// the first tick of the frame; later catch-up ticks see an empty queue.
    fn run_fixed_update(&mut self, dt: f64) {
        self.accumulator += dt;

        if self.accumulator > MAX_ACCUMULATOR {
            self.accumulator = MAX_ACCUMULATOR;
        }

        while self.accumulator >= TICK_RATE {
            self.hero.update(
                self.input.snapshot(),
                self.input.events(),
                &self.anims,
                &self.preset,
            );
            self.input.clear_events();

            self.accumulator -= TICK_RATE;
            self.tick_count += 1;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.preset.title)
            .with_resizable(false)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.preset.window_w,
                self.preset.window_h,
            ));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .expect("failed to create window"),
        );

        log::info!(
            "Window created: {}x{} ({})",
            self.preset.window_w,
            self.preset.window_h,
            self.preset.title
        );

        let background = assets::load_background(
            Path::new(ASSET_DIR),
            self.preset.window_w,
            self.preset.window_h,
        )
        .unwrap_or_else(|| FrameImage::solid(self.preset.backdrop_fill));

        let gpu = GpuState::new(
            window.clone(),
            self.preset.window_w as f32,
            self.preset.window_h as f32,
            &self.atlas,
            &background,
        );
        self.gpu = Some(gpu);
        log::info!("wgpu + sprite pipeline initialized");

        // Continuous game loop
        event_loop.set_control_flow(ControlFlow::Poll);
        self.window = Some(window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                    && event.state == ElementState::Pressed
                {
                    log::info!("ESC pressed, exiting");
                    event_loop.exit();
                    return;
                }
                self.input.handle_key(&event);
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                // --- Timing ---
                let now = Instant::now();
                if let Some(last) = self.last_frame_time {
                    let dt = now.duration_since(last).as_secs_f64();
                    self.frame_stats.record_frame(dt);
                    self.run_fixed_update(dt);
                }
                self.last_frame_time = Some(now);

                // --- Render ---
                let inst = SpriteInstance::from_hero(&self.hero, &self.atlas);
                if let Some(gpu) = &mut self.gpu {
                    gpu.update_instances(&[inst]);
                    gpu.render_frame();
                }
            }
            _ => {}
        }
    }
}

/// Entry point — create event loop and run until quit.
pub fn run(preset: Preset) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(preset);
    event_loop.run_app(&mut app)?;
    Ok(())
}
