//! Spectraflow - audio-reactive flow-field particles
//!
//! Microphone frequency bands pick a dominant band each frame; its energy
//! spawns colored particles that drift along a Perlin flow field.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use spectraflow::audio::AudioSystem;
use spectraflow::params::AnalyserConfig;
use spectraflow::rendering::{scene_labels, tessellate, RenderSystem};
use spectraflow::sketch::{Sketch, SketchConfig};

const TITLE: &str = "Spectraflow";
const STATS_INTERVAL: Duration = Duration::from_secs(1);

/// Main application state
struct App {
    sketch: Sketch,
    analyser: AnalyserConfig,

    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    /// Microphone capture, once requested and opened
    audio: Option<AudioSystem>,

    caption: Option<String>,
    last_stats: Instant,
    frames_since_stats: u32,

    /// Fatal setup error to report after the event loop exits
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: SketchConfig, analyser: AnalyserConfig) -> Self {
        let sketch = Sketch::new(
            config.render.window_width as f32,
            config.render.window_height as f32,
            config,
        );

        Self {
            sketch,
            analyser,
            window: None,
            render_system: None,
            audio: None,
            caption: None,
            last_stats: Instant::now(),
            frames_since_stats: 0,
            error: None,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (width, height) = self.sketch.size();
        let window_attributes = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(PhysicalSize::new(width, height));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create window")?,
        );

        let render_system = pollster::block_on(RenderSystem::new(Arc::clone(&window)))
            .context("failed to initialise GPU renderer")?;

        let size = window.inner_size();
        let (width, height) = (size.width as f32, size.height as f32);
        if (width, height) != self.sketch.size() {
            self.sketch.resize(width, height);
        }
        log::info!("Window created: {}x{}", size.width, size.height);
        log::info!("Click to start audio input, right-click toggles the legend, ESC quits");

        self.window = Some(window);
        self.render_system = Some(render_system);
        Ok(())
    }

    /// Open the microphone; failure drops the sketch into fallback mode
    fn start_audio(&mut self) {
        match AudioSystem::open(self.analyser.clone()) {
            Ok(audio) => {
                log::info!("Microphone open at {} Hz", audio.sample_rate());
                self.sketch.audio_started();
                self.audio = Some(audio);
            }
            Err(err) => self.sketch.audio_failed(&err),
        }
    }

    fn poll_audio(&mut self) {
        let Some(polled) = self.audio.as_ref().map(AudioSystem::latest) else {
            return;
        };
        match polled {
            Ok(Some(spectrum)) => self.sketch.feed_spectrum(spectrum),
            Ok(None) => {}
            Err(err) => {
                self.sketch.audio_failed(&err);
                self.audio = None;
            }
        }
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        self.poll_audio();
        let scene = self.sketch.frame();

        let caption = scene.caption();
        if caption != self.caption {
            if let Some(window) = &self.window {
                window.set_title(&match &caption {
                    Some(text) => format!("{TITLE} - {text}"),
                    None => TITLE.to_string(),
                });
            }
            self.caption = caption;
        }

        let vertices = tessellate(&scene);
        let labels = scene_labels(&scene);
        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };
        match render_system.render(&vertices, &labels) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                render_system.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Skipping frame: {:?}", e),
        }

        self.frames_since_stats += 1;
        if self.last_stats.elapsed() >= STATS_INTERVAL {
            let stats = self.sketch.stats();
            log::debug!(
                "{} fps, {} particles, level {:.2}, dominant {:?}",
                self.frames_since_stats,
                stats.live_particles,
                stats.level,
                stats.dominant
            );
            self.frames_since_stats = 0;
            self.last_stats = Instant::now();
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }
        if let Err(err) = self.init_window(event_loop) {
            log::error!("{:#}", err);
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    if let Some(render_system) = self.render_system.as_mut() {
                        render_system.resize(size.width, size.height);
                    }
                    self.sketch.resize(size.width as f32, size.height as f32);
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => {
                if self.sketch.pointer_pressed() {
                    self.start_audio();
                }
                if button == MouseButton::Right {
                    self.sketch.toggle_legend();
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

/// Simulate without a window in fallback mode and log statistics
fn run_headless(config: SketchConfig, frames: u64) {
    let (width, height) = (
        config.render.window_width as f32,
        config.render.window_height as f32,
    );
    let mut sketch = Sketch::new(width, height, config);
    let started = Instant::now();
    let mut total_spawned = 0usize;
    let mut peak_particles = 0usize;
    let mut total_vertices = 0usize;
    let mut total_labels = 0usize;

    for _ in 0..frames {
        let scene = sketch.frame();
        total_vertices += tessellate(&scene).len();
        total_labels += scene_labels(&scene).len();

        let stats = sketch.stats();
        total_spawned += stats.spawned;
        peak_particles = peak_particles.max(stats.live_particles);
        if stats.frame % 60 == 0 {
            log::info!(
                "frame {}: {} particles, level {:.2}, dominant {:?}",
                stats.frame,
                stats.live_particles,
                stats.level,
                stats.dominant
            );
        }
    }

    log::info!(
        "Headless run: {} frames in {:.2?}, {} spawned, peak {} particles, {} final, {} vertices, {} labels",
        sketch.frame_count(),
        started.elapsed(),
        total_spawned,
        peak_particles,
        sketch.particles().len(),
        total_vertices,
        total_labels
    );
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = cli::Args::parse();
    let config = args.sketch_config();

    if let Some(frames) = args.headless {
        run_headless(config, frames);
        return Ok(());
    }

    let analyser = AnalyserConfig::default();
    analyser.validate()?;

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, analyser);
    event_loop.run_app(&mut app).context("event loop failed")?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
