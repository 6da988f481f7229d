//! Omega Access - hold the scanner, watch the override scroll in
//!
//! A biometric scan splash: press and hold the fingerprint until the ring
//! fills, then a terminal reveals the navigation override line by line.

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use glam::Vec2;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

use omega_access::audio::{export_cues, AudioSystem};
use omega_access::cli::Args;
use omega_access::error::Error;
use omega_access::feedback::DesktopFeedback;
use omega_access::input::PointerRouter;
use omega_access::params::{AudioConfig, RenderConfig, ScanGeometry};
use omega_access::rendering::{build_frame, Frame, Layout, RenderSystem};
use omega_access::scene::{Scene, SceneConfig};

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    layout: Layout,
    frame: Frame,

    // Experience
    scene: Scene,
    feedback: DesktopFeedback,

    // Pointer and touch routing
    pointer: PointerRouter,

    // Configuration
    render_config: RenderConfig,

    // Time tracking
    last_frame: Instant,

    /// Fatal failure surfaced after the loop exits
    error: Option<Error>,
}

impl App {
    fn new(
        render_config: RenderConfig,
        scene_config: SceneConfig,
        audio: &'static AudioSystem,
    ) -> Self {
        let size = Vec2::new(
            render_config.window_width as f32,
            render_config.window_height as f32,
        );
        let layout = Layout {
            size,
            geometry: ScanGeometry::default(),
            config: render_config.clone(),
            char_advance_px: render_config.terminal_font_px * 0.6,
        };

        Self {
            window: None,
            render_system: None,
            layout,
            frame: Frame::default(),
            scene: Scene::new(scene_config, size.x, size.y),
            feedback: DesktopFeedback::new(audio),
            pointer: PointerRouter::new(),
            render_config,
            last_frame: Instant::now(),
            error: None,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Error> {
        let window_attributes = Window::default_attributes()
            .with_title("ALIENS# SYSTEM ACCESS")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ))
            .with_fullscreen(
                self.render_config
                    .fullscreen
                    .then_some(Fullscreen::Borderless(None)),
            );

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let mut render_system = pollster::block_on(RenderSystem::new(Arc::clone(&window)))?;

        self.layout.char_advance_px =
            render_system.char_advance_px(self.render_config.terminal_font_px);
        let (width, height) = render_system.logical_size();
        self.apply_size(width, height);

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.last_frame = Instant::now();
        Ok(())
    }

    /// Propagate a logical window size to the layout and scene
    fn apply_size(&mut self, width: f32, height: f32) {
        self.layout.size = Vec2::new(width, height);
        self.scene.resize(width, height);
        self.scene.set_terminal_metrics(
            self.layout.terminal_viewport_px(),
            self.render_config.terminal_line_px,
        );
    }

    fn to_logical(&self, position: PhysicalPosition<f64>) -> Vec2 {
        let scale = self
            .render_system
            .as_ref()
            .map_or(1.0, RenderSystem::scale_factor);
        Vec2::new(position.x as f32, position.y as f32) / scale
    }

    /// Render a single frame
    fn render_frame(&mut self) -> Result<(), Error> {
        let now = Instant::now();
        let dt = now
            .duration_since(self.last_frame)
            .min(self.render_config.max_frame_step);
        self.last_frame = now;

        self.scene.update(dt, &mut self.feedback);

        let Some(render_system) = self.render_system.as_mut() else {
            return Ok(());
        };
        build_frame(&self.scene, &self.layout, &mut self.frame);
        render_system.render(&self.frame)
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

        match self.init_window(event_loop) {
            Ok(()) => {
                println!("\nOmega Access is running!");
                println!("Hold the scanner to authenticate, ESC to quit\n");
            }
            Err(e) => {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                let scale = self
                    .window
                    .as_ref()
                    .map_or(1.0, |w| w.scale_factor() as f32);
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height, scale);
                    let (width, height) = render_system.logical_size();
                    self.apply_size(width, height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let point = self.to_logical(position);
                self.pointer.moved(point, &self.layout, &mut self.scene);
            }
            WindowEvent::CursorLeft { .. } => self.pointer.left(&mut self.scene),
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.pointer.pressed(
                    button.into(),
                    &self.layout,
                    &mut self.scene,
                    &mut self.feedback,
                ),
                ElementState::Released => self.pointer.released(button.into(), &mut self.scene),
            },
            WindowEvent::Touch(touch) => {
                let point = self.to_logical(touch.location);
                self.pointer.touch(
                    touch.id,
                    touch.phase,
                    point,
                    &self.layout,
                    &mut self.scene,
                    &mut self.feedback,
                );
            }
            WindowEvent::RedrawRequested => match self.render_frame() {
                Ok(()) => {}
                Err(e) if e.is_fatal() => {
                    error!("Render error: {}", e);
                    self.error = Some(e);
                    event_loop.exit();
                }
                // Skip the frame and keep going
                Err(e) => warn!("Render error: {}", e),
            },
            _ => {}
        }
    }
}

fn run() -> Result<(), Error> {
    let args = Args::parse();
    let seed = args.seed();

    if let Some(dir) = &args.export_cues {
        let written = export_cues(dir, AudioConfig::default().fallback_sample_rate_hz, seed)?;
        println!("Exported {} cues to {}", written.len(), dir.display());
        return Ok(());
    }

    println!("Omega Access - biometric scan splash");
    println!("Initializing systems...\n");
    info!("seed {}", seed);

    let audio = AudioSystem::init(args.audio_config());
    let mut app = App::new(args.render_config(), args.scene_config(seed)?, audio);

    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
