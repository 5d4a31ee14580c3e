// Tribal Skies: two flying tribes battle over floating islands.
// Window, GPU and frame loop; every gameplay rule lives in game::Game.
// Optional first argument: path to a JSON game config.

mod engine;
mod game;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use winit::{
    event::{Event as WinitEvent, WindowEvent, ElementState, KeyEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use engine::audio::{AudioSink, SoundBank};
use engine::debug_overlay::{DebugOverlay, DebugStats};
use engine::draw::DrawList;
use engine::input::InputState;
use engine::renderer::QuadRenderer;
use game::events::{route_events, update_wind, WIND_LOOP};
use game::{Game, GameConfig};

const SOUND_DIR: &str = "assets/sounds";
const SOUNDS: &[&str] = &["shoot", "land", "hit", "death", "hurt", "respawn", WIND_LOOP];

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct State {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    window: Arc<Window>,
    quads: QuadRenderer,
    overlay: DebugOverlay,
    draw: DrawList,

    game: Game,
    input: InputState,
    audio: SoundBank,
    started: Instant,

    // Frame timing for the F3 panel
    frame_count: u32,
    fps: u32,
    last_fps_update: Instant,
    last_frame: Instant,
    frame_times_ms: Vec<f32>,
    frame_time_stats: (f32, f32, f32),
}

/// Route cues only for sounds whose file is present. Cues are logged at
/// trace level; no output device is opened.
fn load_sounds(bank: &mut SoundBank, dir: &Path) {
    for name in SOUNDS {
        if dir.join(format!("{name}.ogg")).is_file() {
            bank.register(name);
        }
    }
    log::info!(
        "sound cues routed: {}/{} (files found in {}, no playback device)",
        SOUNDS.iter().filter(|n| bank.is_loaded(n)).count(),
        SOUNDS.len(),
        dir.display()
    );
}

impl State {
    async fn new(window: Arc<Window>, game_config: GameConfig) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible GPU adapter")?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .context("request GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let quads = QuadRenderer::new(&device, surface_format);
        let overlay = DebugOverlay::new(&window, &device, surface_format);

        let canvas = (game_config.world.viewport_width, game_config.world.viewport_height);
        let mut input = InputState::new(canvas);
        input.window_size = (size.width, size.height);

        let mut audio = SoundBank::new();
        load_sounds(&mut audio, Path::new(SOUND_DIR));
        audio.start_loop(WIND_LOOP, 0.1);

        let now = Instant::now();
        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            quads,
            overlay,
            draw: DrawList::new(),
            game: Game::new(game_config),
            input,
            audio,
            started: now,
            frame_count: 0,
            fps: 0,
            last_fps_update: now,
            last_frame: now,
            frame_times_ms: Vec::new(),
            frame_time_stats: (0.0, 0.0, 0.0),
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn update(&mut self) {
        let now = Instant::now();
        self.frame_times_ms.push((now - self.last_frame).as_secs_f32() * 1000.0);
        self.last_frame = now;

        let snapshot = self.input.snapshot();
        let timestamp = (now - self.started).as_secs_f64();
        if !self.game.frame(timestamp, &snapshot) {
            return;
        }

        let events: Vec<_> = self.game.events.drain().collect();
        route_events(&events, &mut self.audio);
        update_wind(&mut self.audio, self.game.player.velocity.length());
        for (name, volume) in self.audio.take_played() {
            log::trace!("cue {name} at {volume:.2}");
        }
    }

    fn tick_fps(&mut self) {
        self.frame_count += 1;
        let now = Instant::now();
        if (now - self.last_fps_update).as_secs_f32() >= 1.0 {
            self.fps = self.frame_count;
            let samples = &self.frame_times_ms;
            if !samples.is_empty() {
                let avg = samples.iter().sum::<f32>() / samples.len() as f32;
                let min = samples.iter().copied().fold(f32::MAX, f32::min);
                let max = samples.iter().copied().fold(0.0, f32::max);
                self.frame_time_stats = (avg, min, max);
            }
            self.frame_times_ms.clear();
            self.frame_count = 0;
            self.last_fps_update = now;
        }
    }

    fn debug_stats(&self) -> DebugStats {
        let stats = &self.game.stats;
        let camera = &self.game.camera;
        let (avg, min, max) = self.frame_time_stats;
        DebugStats {
            fps: self.fps,
            frame_time_avg_ms: avg,
            frame_time_min_ms: min,
            frame_time_max_ms: max,
            green_units: stats.green_units,
            blue_units: stats.blue_units,
            projectiles: stats.projectiles,
            particles: stats.particles,
            islands: stats.islands,
            draw_quads: self.draw.len(),
            resolution: (self.size.width, self.size.height),
            camera_position: (camera.position().x, camera.position().y),
            camera_zoom_pct: camera.zoom() * 100.0,
            target_zoom_pct: camera.target_zoom() * 100.0,
            dilation: camera.dilation(),
            focused: self.game.is_focused(),
            dragging: self.game.is_dragging(),
            wind: self.audio.loop_voice(WIND_LOOP),
            trauma: camera.trauma(),
            skipped_frames: stats.skipped_frames,
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.game.build_draw_list(&mut self.draw);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let viewport = self.game.camera.viewport;
        self.quads.render(
            &self.device,
            &self.queue,
            &mut encoder,
            &view,
            &self.draw,
            (viewport.x, viewport.y),
            wgpu::Color::BLACK,
        );

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };
        let meters = self.game.meters();
        let stats = self.overlay.visible.then(|| self.debug_stats());
        self.overlay.render(
            &self.device,
            &self.queue,
            &mut encoder,
            &self.window,
            &view,
            &screen_descriptor,
            &meters,
            stats.as_ref(),
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn load_config() -> Result<GameConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let config = GameConfig::load(&path)?;
            log::info!("game config loaded from {path}");
            Ok(config)
        }
        None => {
            log::info!("using default game config");
            Ok(GameConfig::default())
        }
    }
}

fn run() -> Result<()> {
    let game_config = load_config()?;
    let event_loop = EventLoop::new().map_err(|e| anyhow!("create event loop: {e}"))?;

    let window_attributes = Window::default_attributes()
        .with_title("Tribal Skies")
        .with_inner_size(winit::dpi::LogicalSize::new(
            game_config.world.viewport_width,
            game_config.world.viewport_height,
        ));

    let window = Arc::new(
        event_loop
            .create_window(window_attributes)
            .map_err(|e| anyhow!("create window: {e}"))?,
    );

    let mut state = pollster::block_on(State::new(window.clone(), game_config))?;

    event_loop
        .run(move |event, control_flow| match event {
            WinitEvent::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                let _ = state.overlay.handle_window_event(&window, event);
                state.input.process_event(event);

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
                    } => control_flow.exit(),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                state: ElementState::Pressed,
                                physical_key: PhysicalKey::Code(KeyCode::F3),
                                repeat: false,
                                ..
                            },
                        ..
                    } => state.overlay.toggle(),
                    WindowEvent::Resized(physical_size) => {
                        state.resize(*physical_size);
                    }
                    WindowEvent::RedrawRequested => {
                        state.update();
                        match state.render() {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => state.resize(state.size),
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("GPU out of memory");
                                control_flow.exit();
                            }
                            Err(e) => log::warn!("surface error: {e:?}"),
                        }
                        state.tick_fps();
                    }
                    _ => {}
                }
            }
            WinitEvent::AboutToWait => {
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow!("run event loop: {e}"))?;

    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}
