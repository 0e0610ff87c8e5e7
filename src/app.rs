//! Application lifecycle: setup sequence and frame loop.
//!
//! Control flows strictly bootstrap -> shader build -> geometry setup ->
//! frame loop. The loop itself is the three-phase machine in [`LoopPhase`]:
//! a close request observed while an iteration is in flight lets that
//! iteration finish (including present) before the loop terminates, and
//! nothing draws afterwards.

use std::thread;
use std::time::Duration;

use glow::HasContext;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use crate::context::GlContext;
use crate::debug::{DebugSink, LogSink};
use crate::geometry::Quad;
use crate::overlay::Overlay;
use crate::shader::{QUAD_FRAGMENT_SHADER, QUAD_VERTEX_SHADER, ShaderError, ShaderProgram};

/// Configuration for the demo window and loop pacing.
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Fixed yield at the end of every iteration, so the loop does not
    /// monopolize a core on hosts where presentation fails to block.
    pub frame_yield: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Example".to_string(),
            width: 800,
            height: 600,
            frame_yield: Duration::from_millis(1),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn frame_yield(mut self, frame_yield: Duration) -> Self {
        self.frame_yield = frame_yield;
        self
    }
}

/// Run the demo until the window is closed.
///
/// Driver diagnostics go to the default [`LogSink`]. Returns `Err` when the
/// embedded shader pair fails to compile or link, in which case the frame
/// loop is never entered.
///
/// # Panics
///
/// Panics on unrecoverable environment errors: event loop or window
/// creation failure, GL context creation failure.
pub fn run(config: AppConfig) -> Result<(), ShaderError> {
    run_with_sink(config, Box::new(LogSink))
}

/// Run the demo with a custom diagnostic sink.
pub fn run_with_sink(config: AppConfig, sink: Box<dyn DebugSink>) -> Result<(), ShaderError> {
    let event_loop = EventLoop::new().expect("failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::Pending {
        config,
        sink: Some(sink),
    };
    event_loop.run_app(&mut app).expect("event loop error");

    match app {
        App::Failed(err) => Err(err),
        _ => Ok(()),
    }
}

/// Frame loop phases. The only transition trigger is a close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopPhase {
    Running,
    ClosingRequested,
    Terminated,
}

impl LoopPhase {
    /// Record a close request. The current iteration still completes.
    fn request_close(&mut self) {
        if *self == LoopPhase::Running {
            *self = LoopPhase::ClosingRequested;
        }
    }

    /// Called at the end of each iteration; returns true once the loop
    /// must stop scheduling further iterations.
    fn finish_iteration(&mut self) -> bool {
        match *self {
            LoopPhase::Running => false,
            LoopPhase::ClosingRequested | LoopPhase::Terminated => {
                *self = LoopPhase::Terminated;
                true
            }
        }
    }

    fn is_terminated(self) -> bool {
        self == LoopPhase::Terminated
    }
}

enum App {
    Pending {
        config: AppConfig,
        sink: Option<Box<dyn DebugSink>>,
    },
    Running(RunState),
    Failed(ShaderError),
}

struct RunState {
    context: GlContext,
    program: ShaderProgram,
    quad: Quad,
    overlay: Overlay,
    phase: LoopPhase,
    frame_yield: Duration,
}

impl RunState {
    /// One frame-loop iteration: restore scene state, draw, overlay,
    /// present, clear, yield.
    fn frame(&mut self) {
        let gl = &self.context.gl;

        // The overlay painter disabled back-face culling, enabled blending,
        // and left its own pipeline bound last frame; re-assert the global
        // enables and the static bindings before drawing.
        unsafe {
            gl.enable(glow::CULL_FACE);
            gl.disable(glow::BLEND);
        }
        self.program.bind(gl);
        self.quad.bind(gl);
        self.quad.draw(gl);

        self.overlay.run_frame(&self.context.window);
        self.overlay.paint(&self.context.window);

        self.context.swap_buffers();

        unsafe {
            gl.clear(glow::COLOR_BUFFER_BIT);
        }

        thread::sleep(self.frame_yield);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let App::Pending { config, sink } = self else {
            return;
        };
        let sink = sink.take().expect("setup ran twice");
        let frame_yield = config.frame_yield;

        let context = GlContext::new(event_loop, config, sink);
        let overlay = Overlay::new(event_loop, context.gl.clone());

        let program =
            match ShaderProgram::build(&context.gl, QUAD_VERTEX_SHADER, QUAD_FRAGMENT_SHADER) {
                Ok(program) => program,
                Err(err) => {
                    // Controlled early return: report, never enter the loop.
                    *self = App::Failed(err);
                    event_loop.exit();
                    return;
                }
            };

        let quad = Quad::new(&context.gl);
        program.bind(&context.gl);

        unsafe {
            let gl = &context.gl;
            gl.clear_color(1.0, 1.0, 1.0, 1.0);
            // Blank canvas for the first iteration, same as every later one.
            gl.clear(glow::COLOR_BUFFER_BIT);
        }

        context.window.request_redraw();

        *self = App::Running(RunState {
            context,
            program,
            quad,
            overlay,
            phase: LoopPhase::Running,
            frame_yield,
        });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let App::Running(state) = self else {
            return;
        };

        state.overlay.on_window_event(&state.context.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                state.phase.request_close();
            }
            WindowEvent::RedrawRequested => {
                if state.phase.is_terminated() {
                    return;
                }
                state.frame();
                if state.phase.finish_iteration() {
                    event_loop.exit();
                } else {
                    state.context.window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let App::Running(state) = self {
            // UI teardown first; its input binding references the window.
            state.overlay.destroy();
            state.phase = LoopPhase::Terminated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_until_close_is_requested() {
        let mut phase = LoopPhase::Running;
        for _ in 0..3 {
            assert!(!phase.finish_iteration());
            assert_eq!(phase, LoopPhase::Running);
        }
    }

    #[test]
    fn close_request_lets_the_current_iteration_complete() {
        let mut phase = LoopPhase::Running;
        phase.request_close();
        // Still mid-iteration: not terminated yet.
        assert_eq!(phase, LoopPhase::ClosingRequested);
        assert!(phase.finish_iteration());
        assert!(phase.is_terminated());
    }

    #[test]
    fn no_iterations_run_after_termination() {
        let mut phase = LoopPhase::Running;
        phase.request_close();
        assert!(phase.finish_iteration());
        // Any further check keeps reporting terminated.
        assert!(phase.finish_iteration());
        assert!(phase.is_terminated());
    }

    #[test]
    fn duplicate_close_requests_are_idempotent() {
        let mut phase = LoopPhase::Running;
        phase.request_close();
        phase.request_close();
        assert_eq!(phase, LoopPhase::ClosingRequested);
    }

    #[test]
    fn default_config_matches_the_fixed_window() {
        let config = AppConfig::default();
        assert_eq!(config.title, "Example");
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.frame_yield, Duration::from_millis(1));
    }

    #[test]
    fn config_builder_overrides_fields() {
        let config = AppConfig::new()
            .title("Other")
            .size(1024, 768)
            .frame_yield(Duration::from_millis(2));
        assert_eq!(config.title, "Other");
        assert_eq!((config.width, config.height), (1024, 768));
        assert_eq!(config.frame_yield, Duration::from_millis(2));
    }
}
