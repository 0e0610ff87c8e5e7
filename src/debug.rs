//! Driver diagnostic routing.
//!
//! OpenGL reports warnings and errors through a callback registered with
//! `glDebugMessageCallback`. This module decodes the raw KHR_debug
//! enumerations into closed Rust enums, drops pure informational notices,
//! and forwards everything else to a [`DebugSink`] — an injected capability
//! so the renderer depends only on "something that accepts a structured
//! diagnostic record", not on a concrete logging backend.
//!
//! The driver invokes the callback synchronously on the calling thread
//! during GL calls. The callback must never panic; it is diagnosing the
//! renderer, not crashing it.

use glow::HasContext;

/// Subsystem that produced a driver message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugSource {
    Api,
    WindowSystem,
    ShaderCompiler,
    ThirdParty,
    Application,
    Other,
    Unknown,
}

impl DebugSource {
    fn from_raw(raw: u32) -> Self {
        match raw {
            glow::DEBUG_SOURCE_API => Self::Api,
            glow::DEBUG_SOURCE_WINDOW_SYSTEM => Self::WindowSystem,
            glow::DEBUG_SOURCE_SHADER_COMPILER => Self::ShaderCompiler,
            glow::DEBUG_SOURCE_THIRD_PARTY => Self::ThirdParty,
            glow::DEBUG_SOURCE_APPLICATION => Self::Application,
            glow::DEBUG_SOURCE_OTHER => Self::Other,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for DebugSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Api => "API",
            Self::WindowSystem => "WINDOW SYSTEM",
            Self::ShaderCompiler => "SHADER COMPILER",
            Self::ThirdParty => "THIRD PARTY",
            Self::Application => "APPLICATION",
            Self::Other => "OTHER",
            Self::Unknown => "UNKNOWN SOURCE",
        })
    }
}

/// What kind of condition a driver message describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugKind {
    Error,
    DeprecatedBehavior,
    UndefinedBehavior,
    Portability,
    Performance,
    Marker,
    Other,
    Unknown,
}

impl DebugKind {
    fn from_raw(raw: u32) -> Self {
        match raw {
            glow::DEBUG_TYPE_ERROR => Self::Error,
            glow::DEBUG_TYPE_DEPRECATED_BEHAVIOR => Self::DeprecatedBehavior,
            glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR => Self::UndefinedBehavior,
            glow::DEBUG_TYPE_PORTABILITY => Self::Portability,
            glow::DEBUG_TYPE_PERFORMANCE => Self::Performance,
            glow::DEBUG_TYPE_MARKER => Self::Marker,
            glow::DEBUG_TYPE_OTHER => Self::Other,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for DebugKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Error => "ERROR",
            Self::DeprecatedBehavior => "DEPRECATED_BEHAVIOR",
            Self::UndefinedBehavior => "UNDEFINED_BEHAVIOR",
            Self::Portability => "PORTABILITY",
            Self::Performance => "PERFORMANCE",
            Self::Marker => "MARKER",
            Self::Other => "OTHER",
            Self::Unknown => "UNKNOWN TYPE",
        })
    }
}

/// How serious the driver considers a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugSeverity {
    Notification,
    Low,
    Medium,
    High,
    Unknown,
}

impl DebugSeverity {
    fn from_raw(raw: u32) -> Self {
        match raw {
            glow::DEBUG_SEVERITY_NOTIFICATION => Self::Notification,
            glow::DEBUG_SEVERITY_LOW => Self::Low,
            glow::DEBUG_SEVERITY_MEDIUM => Self::Medium,
            glow::DEBUG_SEVERITY_HIGH => Self::High,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for DebugSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Notification => "NOTIFICATION",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Unknown => "UNKNOWN SEVERITY",
        })
    }
}

/// A decoded driver diagnostic.
///
/// Displays as `<SOURCE>, <TYPE>, <SEVERITY>, <id>: <message>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugMessage {
    pub source: DebugSource,
    pub kind: DebugKind,
    pub severity: DebugSeverity,
    pub id: u32,
    pub message: String,
}

impl DebugMessage {
    fn from_raw(source: u32, kind: u32, id: u32, severity: u32, message: &str) -> Self {
        Self {
            source: DebugSource::from_raw(source),
            kind: DebugKind::from_raw(kind),
            severity: DebugSeverity::from_raw(severity),
            id,
            message: message.to_owned(),
        }
    }

    /// Whether this is a pure informational notice, which is never reported.
    pub fn is_notice(&self) -> bool {
        self.severity == DebugSeverity::Notification
    }
}

impl std::fmt::Display for DebugMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}: {}",
            self.source, self.kind, self.severity, self.id, self.message
        )
    }
}

/// Receives decoded driver diagnostics.
///
/// Supplied at context bootstrap; see [`run_with_sink`](crate::run_with_sink).
pub trait DebugSink: Send {
    fn report(&mut self, message: &DebugMessage);
}

/// Default sink: one `log::warn!` line per message.
pub struct LogSink;

impl DebugSink for LogSink {
    fn report(&mut self, message: &DebugMessage) {
        log::warn!("{message}");
    }
}

/// Filter-then-forward step between the raw callback and the sink.
fn forward(message: DebugMessage, sink: &mut dyn DebugSink) {
    if message.is_notice() {
        return;
    }
    sink.report(&message);
}

/// Enable debug output on the context and route messages into `sink`.
///
/// The driver invokes the hook synchronously during GL calls, zero or more
/// times, for the lifetime of the context.
pub fn install(gl: &mut glow::Context, sink: Box<dyn DebugSink>) {
    let sink = std::sync::Mutex::new(sink);
    unsafe {
        gl.enable(glow::DEBUG_OUTPUT);
        gl.debug_message_callback(move |source, kind, id, severity, message| {
            let mut sink = sink.lock().unwrap();
            forward(
                DebugMessage::from_raw(source, kind, id, severity, message),
                sink.as_mut(),
            );
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        lines: Vec<String>,
    }

    impl DebugSink for Recorder {
        fn report(&mut self, message: &DebugMessage) {
            self.lines.push(message.to_string());
        }
    }

    fn message(severity: DebugSeverity) -> DebugMessage {
        DebugMessage {
            source: DebugSource::Api,
            kind: DebugKind::Error,
            severity,
            id: 1281,
            message: "invalid operation".to_owned(),
        }
    }

    #[test]
    fn decodes_known_codes() {
        let msg = DebugMessage::from_raw(
            glow::DEBUG_SOURCE_SHADER_COMPILER,
            glow::DEBUG_TYPE_PERFORMANCE,
            7,
            glow::DEBUG_SEVERITY_MEDIUM,
            "slow path",
        );
        assert_eq!(msg.source, DebugSource::ShaderCompiler);
        assert_eq!(msg.kind, DebugKind::Performance);
        assert_eq!(msg.severity, DebugSeverity::Medium);
        assert_eq!(msg.id, 7);
        assert_eq!(msg.message, "slow path");
    }

    #[test]
    fn unrecognized_codes_render_as_unknown() {
        let msg = DebugMessage::from_raw(0xdead, 0xbeef, 0, 0xcafe, "?");
        assert_eq!(
            msg.to_string(),
            "UNKNOWN SOURCE, UNKNOWN TYPE, UNKNOWN SEVERITY, 0: ?"
        );
    }

    #[test]
    fn formats_one_line_with_all_fields() {
        let msg = message(DebugSeverity::High);
        assert_eq!(msg.to_string(), "API, ERROR, HIGH, 1281: invalid operation");
    }

    #[test]
    fn notifications_are_discarded() {
        let mut recorder = Recorder::default();
        forward(message(DebugSeverity::Notification), &mut recorder);
        assert!(recorder.lines.is_empty());
    }

    #[test]
    fn non_notifications_produce_exactly_one_line() {
        let mut recorder = Recorder::default();
        forward(message(DebugSeverity::Low), &mut recorder);
        forward(message(DebugSeverity::Medium), &mut recorder);
        forward(message(DebugSeverity::High), &mut recorder);
        assert_eq!(recorder.lines.len(), 3);
        assert_eq!(recorder.lines[0], "API, ERROR, LOW, 1281: invalid operation");
    }

    #[test]
    fn driver_errors_are_logged_not_fatal() {
        // Even driver-classified errors only produce a report; the callback
        // path has no abort branch.
        let mut recorder = Recorder::default();
        forward(message(DebugSeverity::High), &mut recorder);
        assert_eq!(recorder.lines.len(), 1);
        assert!(recorder.lines[0].contains("ERROR"));
    }
}
