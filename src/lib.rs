//! # redquad
//!
//! **A minimal OpenGL demo harness: one window, one quad, one debug overlay.**
//!
//! Opens an 800x600 window with an OpenGL 4.5 core-profile context, compiles
//! a trivial shader pair, and draws a red quad on a white background every
//! frame with an egui overlay composited on top. Driver diagnostics are
//! decoded and logged; shader build failures abort setup with the captured
//! info log before the frame loop ever runs.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> Result<(), redquad::ShaderError> {
//!     redquad::run(redquad::AppConfig::default())
//! }
//! ```
//!
//! Everything is single-threaded: one thread owns the window, the GL
//! context, and every GL call. The only blocking points are event polling,
//! the vsync-bound buffer swap, and a short fixed yield per iteration.

mod app;
mod context;
mod debug;
mod geometry;
mod overlay;
mod shader;

pub use app::{AppConfig, run, run_with_sink};
pub use context::GlContext;
pub use debug::{DebugKind, DebugMessage, DebugSeverity, DebugSink, DebugSource, LogSink};
pub use geometry::{QUAD_INDICES, QUAD_VERTICES, Quad};
pub use overlay::Overlay;
pub use shader::{
    QUAD_FRAGMENT_SHADER, QUAD_VERTEX_SHADER, ShaderError, ShaderProgram, ShaderStage,
};
