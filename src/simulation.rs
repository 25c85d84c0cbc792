//! Simulation builder and runner

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::emitter::EmitterOptions;
use crate::error::SimulationError;
use crate::gpu::{Camera, GpuState};
use crate::gradient::Gradient;
use crate::random::NoiseTable;
use crate::render::{ColorMode, RenderConfig, SizeMode};
use crate::store::ParticleStore;
use crate::time::Clock;

/// A fountain simulation builder.
///
/// Use method chaining to configure, then call `.run()` to open a window.
///
/// ```ignore
/// Simulation::new()
///     .with_emitter(EmitterOptions::default().with_particle_count(2_000))
///     .with_gradient(Gradient::fireball())
///     .run()?;
/// ```
pub struct Simulation {
    options: EmitterOptions,
    render: RenderConfig,
    noise_seed: u64,
    particle_seed: Option<u64>,
    title: String,
}

impl Simulation {
    /// Create a simulation with default emitter settings and the cosine palette.
    pub fn new() -> Self {
        Self {
            options: EmitterOptions::default(),
            render: RenderConfig::default(),
            noise_seed: 0,
            particle_seed: None,
            title: "Sparkfall".to_string(),
        }
    }

    /// Replace the emitter configuration.
    pub fn with_emitter(mut self, options: EmitterOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the color mode.
    pub fn with_color_mode(mut self, color: ColorMode) -> Self {
        self.render.color = color;
        self
    }

    /// Set the size mode.
    pub fn with_size_mode(mut self, size: SizeMode) -> Self {
        self.render.size = size;
        self
    }

    /// Shorthand for `with_color_mode(ColorMode::Gradient(gradient))`.
    pub fn with_gradient(mut self, gradient: Gradient) -> Self {
        self.render.color = ColorMode::Gradient(gradient);
        self
    }

    /// Seed for the random table the update pass reads from.
    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = seed;
        self
    }

    /// Seed for the initial lifetimes. Unseeded pools use the thread RNG.
    pub fn with_particle_seed(mut self, seed: u64) -> Self {
        self.particle_seed = Some(seed);
        self
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Emitter configuration this simulation will run with.
    pub fn options(&self) -> &EmitterOptions {
        &self.options
    }

    /// Render configuration this simulation will run with.
    pub fn render_config(&self) -> &RenderConfig {
        &self.render
    }

    /// Run the simulation. This blocks until the window is closed.
    pub fn run(self) -> Result<(), SimulationError> {
        let noise = NoiseTable::with_seed(self.noise_seed);
        self.options.validate(noise.capacity())?;

        let store = match self.particle_seed {
            Some(seed) => ParticleStore::with_seed(&self.options, seed),
            None => ParticleStore::new(&self.options),
        };

        log::info!(
            "Starting simulation: {} particles, {} color, {:?} size",
            store.capacity(),
            match self.render.color {
                ColorMode::Palette => "palette",
                ColorMode::Gradient(_) => "gradient",
            },
            self.render.size
        );

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self, store, noise);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    sim: Simulation,
    store: ParticleStore,
    noise: NoiseTable,
    clock: Clock,
    camera: Camera,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    error: Option<SimulationError>,
}

impl App {
    fn new(sim: Simulation, store: ParticleStore, noise: NoiseTable) -> Self {
        Self {
            window: None,
            gpu_state: None,
            sim,
            store,
            noise,
            clock: Clock::new(),
            camera: Camera::new(),
            mouse_pressed: false,
            last_mouse_pos: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: SimulationError) {
        log::error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SimulationError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.sim.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.window = Some(window.clone());

        let gpu_state = pollster::block_on(GpuState::new(
            window,
            &self.store,
            self.sim.options,
            &self.noise,
            &self.sim.render,
        ))?;
        self.gpu_state = Some(gpu_state);

        // Timing starts once the first frame can actually be drawn.
        self.clock = Clock::new();
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };

        self.clock.tick();
        if let Some(dt) = self.clock.step_delta() {
            gpu_state.update(dt);
        }

        self.camera.follow_orbit(self.clock.elapsed());
        let view = self.camera.view_matrix();
        let projection = self.camera.projection_matrix(gpu_state.aspect());

        match gpu_state.render(view, projection) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu_state.resize(winit::dpi::PhysicalSize {
                    width: gpu_state.config.width,
                    height: gpu_state.config.height,
                })
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {e:?}"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                self.fail(event_loop, err);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::debug!(
                    "Closing after {} frames, {} update passes",
                    self.clock.frame(),
                    self.gpu_state.as_ref().map_or(0, GpuState::generation)
                );
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Space => self.clock.toggle_pause(),
                KeyCode::KeyO => self.camera = Camera::new(),
                KeyCode::Escape => event_loop.exit(),
                _ => {}
            },
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = (position.x - last_x) as f32;
                        let dy = (position.y - last_y) as f32;
                        self.camera.drag(dx, dy);
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                self.camera.zoom(scroll);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
