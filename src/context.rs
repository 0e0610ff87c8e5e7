//! Window and OpenGL context bootstrap.
//!
//! This module provides [`GlContext`], which owns the window, the GL
//! context/surface pair, and the loaded function table. It is created once
//! at startup and lives until shutdown; the window and all GL calls belong
//! to the single thread that created it.
//!
//! # Initialization
//!
//! Creation performs the whole bootstrap sequence:
//! 1. Creates a fixed-size, non-resizable window
//! 2. Requests an OpenGL >= 4.5 core-profile context (no legacy features)
//! 3. Makes the context current and enables vsync (swap interval 1)
//! 4. Loads the glow function table from the display
//! 5. Enables back-face culling and installs the diagnostic callback
//!
//! Failures here are unrecoverable host-environment problems and panic with
//! a descriptive message; there is nothing to retry.

use std::num::NonZeroU32;
use std::sync::Arc;

use glutin::context::{ContextApi, GlProfile, NotCurrentGlContext, PossiblyCurrentContext, Version};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use winit::event_loop::ActiveEventLoop;
use winit::raw_window_handle::HasWindowHandle;
use winit::window::Window;

use crate::app::AppConfig;
use crate::debug::{self, DebugSink};

/// The window, its GL context, and the loaded function table.
///
/// Exactly one of these exists at a time. The glow context is shared with
/// the overlay painter via `Arc`, but every call still happens on the one
/// owning thread; GL contexts are not safely shareable across threads.
pub struct GlContext {
    /// The OS window. Dropped last, after the UI overlay is torn down.
    pub window: Window,
    /// The loaded GL function table.
    pub gl: Arc<glow::Context>,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
}

impl GlContext {
    /// Create the window and GL context and route driver diagnostics
    /// into `sink`.
    ///
    /// # Panics
    ///
    /// Panics if window creation, context/surface creation, or making the
    /// context current fails.
    pub fn new(event_loop: &ActiveEventLoop, config: &AppConfig, sink: Box<dyn DebugSink>) -> Self {
        let window_attributes = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height))
            .with_resizable(false);

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(window_attributes))
            .build(
                event_loop,
                glutin::config::ConfigTemplateBuilder::new(),
                |mut configs| configs.next().expect("no suitable GL config"),
            )
            .expect("failed to create window");
        let window = window.expect("failed to create window");

        let raw_window_handle = window
            .window_handle()
            .expect("window has no native handle")
            .as_raw();

        let gl_display = gl_config.display();

        let context_attributes = glutin::context::ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(4, 5))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .expect("failed to create GL context");

        let surface_attributes = window
            .build_surface_attributes(<_>::default())
            .expect("failed to build surface attributes");
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
            .expect("failed to create GL surface");

        let gl_context = not_current
            .make_current(&gl_surface)
            .expect("failed to make GL context current");

        // Present calls block until the next display refresh.
        if let Err(e) =
            gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
        {
            log::warn!("could not enable vsync: {e}");
        }

        let mut gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| gl_display.get_proc_address(symbol))
        };

        unsafe {
            use glow::HasContext;
            gl.enable(glow::CULL_FACE);
        }
        debug::install(&mut gl, sink);
        let gl = Arc::new(gl);

        Self {
            window,
            gl,
            gl_context,
            gl_surface,
        }
    }

    /// Present the composed framebuffer.
    ///
    /// With swap interval 1 this blocks until the vsync-aligned swap
    /// completes, bounding the loop to the display refresh rate.
    pub fn swap_buffers(&self) {
        self.gl_surface
            .swap_buffers(&self.gl_context)
            .expect("failed to swap buffers");
    }
}
