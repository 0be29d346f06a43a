use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::config::{AppConfig, WindowConfig};
use crate::device::{GlContext, GlowApi, GraphicsApi, Viewport};
use crate::input::platform::translate_key_event;
use crate::render::{LoopControl, Mesh, RenderLoop};
use crate::shader::{ShaderPair, ShaderProgramBuilder};
use crate::time::MonotonicClock;

/// Window/runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub window: WindowConfig,
    /// Treat compile/link failures as fatal instead of drawing with a broken program.
    pub strict_shaders: bool,
}

impl From<&AppConfig> for RuntimeConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            window: config.window.clone(),
            strict_shaders: config.shaders.strict,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, builds `shaders` into a program and renders until the
    /// window is closed or Escape is released.
    pub fn run(config: RuntimeConfig, shaders: ShaderPair) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, shaders);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// `render_loop` is declared first so it is dropped before the context it draws into.
struct Active {
    render_loop: RenderLoop<GlowApi>,
    gl: GlContext,
}

struct AppState {
    config: RuntimeConfig,
    /// Consumed when the window is created.
    shaders: Option<ShaderPair>,
    active: Option<Active>,
    clock: MonotonicClock,
    failure: Option<anyhow::Error>,
}

impl AppState {
    fn new(config: RuntimeConfig, shaders: ShaderPair) -> Self {
        Self {
            config,
            shaders: Some(shaders),
            active: None,
            clock: MonotonicClock::new(),
            failure: None,
        }
    }

    fn window_attributes(&self, event_loop: &ActiveEventLoop) -> WindowAttributes {
        let cfg = &self.config.window;
        let mut attrs = Window::default_attributes()
            .with_title(cfg.title.clone())
            .with_inner_size(PhysicalSize::new(cfg.width, cfg.height));

        if cfg.fullscreen {
            let monitor = event_loop.primary_monitor();
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(monitor)));
        }

        attrs
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let shaders = self.shaders.take().context("render loop was already started")?;

        let (gl, api) = GlContext::create(event_loop, self.window_attributes(event_loop))?;
        log::debug!("window created: {:?}", gl.window().id());
        log::info!("GL_VERSION  : {}", api.version());
        log::info!("GL_RENDERER : {}", api.renderer());

        let report = ShaderProgramBuilder::new(&api)
            .build_pair(shaders)
            .context("failed to allocate shader objects")?;
        let program = if self.config.strict_shaders {
            report.into_linked()?
        } else {
            if !report.is_ok() {
                log::warn!("continuing with an unusable shader program: {}", report.status);
            }
            report.program
        };

        let viewport = initial_viewport(gl.viewport(), &self.config.window);
        let render_loop = RenderLoop::new(api, program, &Mesh::triangle(), viewport)
            .context("failed to upload mesh")?;

        self.clock.reset();
        gl.window().request_redraw();
        self.active = Some(Active { render_loop, gl });
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.active = None;
        self.failure = Some(err);
        event_loop.exit();
    }
}

/// The window's real drawable size, which differs from the configured one in
/// fullscreen. Falls back to the configured size while the window reports zero.
fn initial_viewport(actual: Viewport, configured: &WindowConfig) -> Viewport {
    if actual.width == 0 || actual.height == 0 {
        Viewport::new(configured.width, configured.height)
    } else {
        actual
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.active.is_some() || self.failure.is_some() {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e.context("failed to start render loop"));
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Continuous redraw; no frame limiting.
        event_loop.set_control_flow(ControlFlow::Poll);

        if let Some(active) = &self.active {
            active.gl.window().request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(active) = self.active.as_mut() else {
            return;
        };

        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                active.render_loop.on_key_event(translate_key_event(&event));
            }

            WindowEvent::CloseRequested => active.render_loop.request_close(),

            WindowEvent::Resized(size) => {
                active.gl.resize(size);
                active.render_loop.set_viewport(Viewport::new(size.width, size.height));
            }

            WindowEvent::RedrawRequested => {
                match active.render_loop.tick(&self.clock, &mut active.gl) {
                    Ok(LoopControl::Continue) => {
                        self.clock.tick();
                    }
                    Ok(LoopControl::Exit) => {
                        log::info!("render loop closed after {} frames", self.clock.ticks());
                        self.active = None;
                        event_loop.exit();
                    }
                    Err(e) => self.fail(event_loop, e),
                }
            }

            _ => {}
        }
    }
}
