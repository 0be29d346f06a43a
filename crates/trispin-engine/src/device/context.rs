use std::num::NonZeroU32;

use anyhow::{anyhow, Context, Result};
use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContext, PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use super::api::Viewport;
use super::glow_api::GlowApi;

/// Something that can present a finished frame.
pub trait Present {
    fn present(&mut self) -> Result<()>;
}

/// A window together with its current GLES context and presentable surface.
///
/// Field order matters for teardown: the surface and context are dropped
/// before the window they were created for.
pub struct GlContext {
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

impl GlContext {
    /// Creates the window described by `attrs`, an OpenGL ES 2.0 context for it
    /// (any GLES version as fallback) and makes the context current.
    ///
    /// Returns the context and a [`GlowApi`] loaded from it.
    pub fn create(
        event_loop: &ActiveEventLoop,
        attrs: WindowAttributes,
    ) -> Result<(Self, GlowApi)> {
        let template = ConfigTemplateBuilder::new();
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attrs))
            // The picker has no error path; an empty list means the display
            // exposes no GL config at all.
            .build(event_loop, template, |configs| {
                configs
                    .max_by_key(|c| c.num_samples())
                    .expect("display exposes no GL config")
            })
            .map_err(|e| anyhow!("failed to create GL display: {e}"))?;

        let window = window.context("display builder did not create a window")?;
        let raw_handle = window
            .window_handle()
            .context("window has no raw handle")?
            .as_raw();

        let display = gl_config.display();
        let gles2 = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::Gles(Some(Version::new(2, 0))))
            .build(Some(raw_handle));
        let gles_any = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::Gles(None))
            .build(Some(raw_handle));

        // SAFETY: `raw_handle` belongs to `window`, which outlives the context
        // because both end up in the same `GlContext`.
        let not_current = unsafe {
            display.create_context(&gl_config, &gles2).or_else(|err| {
                log::warn!("GLES 2.0 context unavailable ({err}), trying any GLES version");
                display.create_context(&gl_config, &gles_any)
            })
        }
        .context("failed to create GLES context")?;

        let surface_attrs = window
            .build_surface_attributes(Default::default())
            .context("failed to describe window surface")?;
        // SAFETY: same window ownership argument as above.
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attrs) }
            .context("failed to create window surface")?;

        let context = not_current
            .make_current(&surface)
            .context("failed to make GLES context current")?;

        // SAFETY: the context was just made current on this thread.
        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name))
        };
        // SAFETY: as above; `GlContext` keeps the context current for its lifetime.
        let api = unsafe { GlowApi::new(gl) };

        Ok((
            Self {
                surface,
                context,
                window,
            },
            api,
        ))
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Current drawable size of the window.
    pub fn viewport(&self) -> Viewport {
        let size = self.window.inner_size();
        Viewport::new(size.width, size.height)
    }

    /// Resizes the surface; zero-sized requests (minimized windows) are ignored.
    pub fn resize(&self, size: PhysicalSize<u32>) {
        if let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
            self.surface.resize(&self.context, w, h);
        }
    }
}

impl Present for GlContext {
    fn present(&mut self) -> Result<()> {
        self.window.pre_present_notify();
        self.surface
            .swap_buffers(&self.context)
            .context("failed to swap buffers")
    }
}
