//! Immediate-mode debug overlay.
//!
//! One egui window with a single button that toggles the library-provided
//! demo panel. The overlay is always painted after the quad so scene
//! geometry never occludes it. The toggle flag lives here as an ordinary
//! field, not as process-global state.

use std::sync::Arc;

use egui_glow::EguiGlow;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

/// The overlay's egui context, glow painter, and widget state.
pub struct Overlay {
    egui_glow: EguiGlow,
    demo: egui_demo_lib::DemoWindows,
    demo_open: bool,
}

impl Overlay {
    /// Set up the egui context, winit input binding, and glow painter.
    pub fn new(event_loop: &ActiveEventLoop, gl: Arc<glow::Context>) -> Self {
        let egui_glow = EguiGlow::new(event_loop, gl, None, None, true);
        // The classic look rather than egui's default dark theme.
        egui_glow.egui_ctx.set_visuals(egui::Visuals::light());

        Self {
            egui_glow,
            demo: egui_demo_lib::DemoWindows::default(),
            demo_open: false,
        }
    }

    /// Feed a window event to the overlay's input binding.
    ///
    /// The loop redraws continuously, so the binding's repaint hint is not
    /// consulted.
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) {
        let _ = self.egui_glow.on_window_event(window, event);
    }

    /// Build this frame's widget tree.
    pub fn run_frame(&mut self, window: &Window) {
        let Self {
            egui_glow,
            demo,
            demo_open,
        } = self;

        egui_glow.run(window, |ctx| {
            egui::Window::new("Example").show(ctx, |ui| {
                if ui.button("Show/Hide demo").clicked() {
                    *demo_open = !*demo_open;
                }
            });
            if *demo_open {
                demo.ui(ctx);
            }
        });
    }

    /// Render this frame's draw data on top of whatever is already in the
    /// framebuffer.
    pub fn paint(&mut self, window: &Window) {
        self.egui_glow.paint(window);
    }

    /// Tear down the overlay's GL objects.
    ///
    /// Must run before the window and GL context are destroyed; the input
    /// binding holds a back-reference to the window.
    pub fn destroy(&mut self) {
        self.egui_glow.destroy();
    }
}
