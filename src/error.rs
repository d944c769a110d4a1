use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    /// The external tool could not be spawned, exited non-zero, or its output
    /// could not be captured. Callers see one failure kind; `reason` says which.
    #[error("Command `{command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP server error: {0}")]
    Server(String),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

/// Output was captured but does not match the expected layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected} lines, found {found}")]
    LineCount { expected: usize, found: usize },

    #[error("{} malformed line(s): {}", .0.len(), join_lines(.0))]
    Lines(Vec<LineError>),
}

/// A single malformed line. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: field `{field}` is not an unsigned integer: {value:?}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: use percentage must be 0-100 followed by '%': {value:?}")]
    InvalidPercent { line: usize, value: String },

    #[error("line {line}: duplicate path {path:?}")]
    DuplicatePath { line: usize, path: String },

    #[error("line {line}: not valid UTF-8")]
    InvalidEncoding { line: usize },
}

impl LineError {
    pub fn line(&self) -> usize {
        match self {
            LineError::FieldCount { line, .. }
            | LineError::InvalidNumber { line, .. }
            | LineError::InvalidPercent { line, .. }
            | LineError::DuplicatePath { line, .. }
            | LineError::InvalidEncoding { line } => *line,
        }
    }
}

fn join_lines(errors: &[LineError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ExporterError>;
