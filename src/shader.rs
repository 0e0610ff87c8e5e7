//! Shader program compilation and linking.
//!
//! The demo uses exactly one program: a vertex stage consuming a vec2
//! position at attribute location 0 and a fragment stage writing a constant
//! opaque red. Both sources are embedded at build time. Any compile or link
//! failure captures the driver's info log (bounded to 512 bytes) and aborts
//! the setup sequence before the frame loop is entered.

use glow::HasContext;

/// Embedded vertex stage source (GLSL 450 core).
pub const QUAD_VERTEX_SHADER: &str = include_str!("shaders/quad.vert");
/// Embedded fragment stage source (GLSL 450 core).
pub const QUAD_FRAGMENT_SHADER: &str = include_str!("shaders/quad.frag");

/// Info logs longer than this are truncated before being reported.
const INFO_LOG_LIMIT: usize = 512;

/// Which pipeline stage a compile error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_type(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// Errors that can occur while building the shader program.
#[derive(Debug)]
pub enum ShaderError {
    /// A stage failed to compile. Carries the stage and its info log.
    Compile { stage: ShaderStage, log: String },
    /// The program failed to link. Carries the program info log.
    Link { log: String },
    /// The driver refused to allocate a shader or program object.
    Allocate(String),
}

impl std::fmt::Display for ShaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderError::Compile { stage, log } => {
                write!(f, "{stage} shader compilation failed:\n{log}")
            }
            ShaderError::Link { log } => write!(f, "shader linking failed:\n{log}"),
            ShaderError::Allocate(msg) => write!(f, "shader object allocation failed: {msg}"),
        }
    }
}

impl std::error::Error for ShaderError {}

/// The linked GPU program for the quad.
///
/// Built once after context creation and bound for the process lifetime.
/// The individual stage objects are detached once linking succeeds; only
/// the program handle is retained.
pub struct ShaderProgram {
    program: glow::Program,
}

impl ShaderProgram {
    /// Compile both stages and link them into one program.
    ///
    /// On failure, GL objects created before the failure point are left for
    /// the driver to reclaim at process exit; the caller is expected to bail
    /// out of setup entirely.
    pub fn build(
        gl: &glow::Context,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self, ShaderError> {
        let vertex = compile_stage(gl, ShaderStage::Vertex, vertex_src)?;
        let fragment = compile_stage(gl, ShaderStage::Fragment, fragment_src)?;

        unsafe {
            let program = gl.create_program().map_err(ShaderError::Allocate)?;
            gl.attach_shader(program, vertex);
            gl.attach_shader(program, fragment);
            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                return Err(ShaderError::Link {
                    log: bounded_log(gl.get_program_info_log(program)),
                });
            }

            // The compiled stage objects are no longer needed once linked.
            gl.detach_shader(program, vertex);
            gl.detach_shader(program, fragment);

            Ok(Self { program })
        }
    }

    /// Make this the active program.
    pub fn bind(&self, gl: &glow::Context) {
        unsafe { gl.use_program(Some(self.program)) }
    }
}

fn compile_stage(
    gl: &glow::Context,
    stage: ShaderStage,
    source: &str,
) -> Result<glow::Shader, ShaderError> {
    unsafe {
        let shader = gl.create_shader(stage.gl_type()).map_err(ShaderError::Allocate)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            return Err(ShaderError::Compile {
                stage,
                log: bounded_log(gl.get_shader_info_log(shader)),
            });
        }

        Ok(shader)
    }
}

/// Truncate a driver info log to [`INFO_LOG_LIMIT`] bytes on a char boundary.
fn bounded_log(mut log: String) -> String {
    if log.len() > INFO_LOG_LIMIT {
        let mut end = INFO_LOG_LIMIT;
        while !log.is_char_boundary(end) {
            end -= 1;
        }
        log.truncate(end);
    }
    log
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_logs_pass_through_unchanged() {
        let log = "0:3(1): error: syntax error".to_owned();
        assert_eq!(bounded_log(log.clone()), log);
    }

    #[test]
    fn long_logs_are_bounded() {
        let log = "e".repeat(2000);
        let bounded = bounded_log(log);
        assert_eq!(bounded.len(), 512);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // Put a multi-byte char straddling the 512-byte limit.
        let mut log = "a".repeat(511);
        log.push_str("é is not ascii");
        let bounded = bounded_log(log);
        assert!(bounded.len() <= 512);
        assert!(bounded.is_char_boundary(bounded.len()));
        assert!(bounded.ends_with('a'));
    }

    #[test]
    fn compile_error_names_the_failing_stage() {
        let err = ShaderError::Compile {
            stage: ShaderStage::Fragment,
            log: "0:5(2): error: 'vec5' undeclared".to_owned(),
        };
        let text = err.to_string();
        assert!(text.contains("fragment shader compilation failed"));
        assert!(text.contains("vec5"));
    }

    #[test]
    fn link_error_carries_the_program_log() {
        let err = ShaderError::Link {
            log: "error: vertex/fragment interface mismatch".to_owned(),
        };
        assert!(err.to_string().contains("interface mismatch"));
    }

    #[test]
    fn embedded_sources_declare_version_450_and_location_0() {
        assert!(QUAD_VERTEX_SHADER.starts_with("#version 450"));
        assert!(QUAD_FRAGMENT_SHADER.starts_with("#version 450"));
        assert!(QUAD_VERTEX_SHADER.contains("layout (location = 0) in vec2"));
    }
}
