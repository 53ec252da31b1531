use std::fmt;
use std::path::PathBuf;

/// Error types for GPS log parsing and map export
#[derive(Debug)]
pub enum GpsMapError {
    /// Input log does not exist or cannot be opened
    MissingInputFile {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A marker line failed schema validation
    MalformedRecord { line: u64, reason: String },
    /// Invalid configuration value or schema definition
    Config(String),
    /// The map could not be rendered or written
    Render(String),
    /// I/O errors
    Io(std::io::Error),
    /// Tab-delimited reader/writer errors
    Csv(csv::Error),
    /// JSON encoding errors
    Json(serde_json::Error),
}

impl fmt::Display for GpsMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpsMapError::MissingInputFile { path, source } => {
                write!(f, "Cannot read input log {}: {}", path.display(), source)
            }
            GpsMapError::MalformedRecord { line, reason } => {
                write!(f, "Malformed record on line {}: {}", line, reason)
            }
            GpsMapError::Config(msg) => write!(f, "Configuration error: {}", msg),
            GpsMapError::Render(msg) => write!(f, "Render error: {}", msg),
            GpsMapError::Io(err) => write!(f, "I/O error: {}", err),
            GpsMapError::Csv(err) => write!(f, "CSV error: {}", err),
            GpsMapError::Json(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for GpsMapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpsMapError::MissingInputFile { source, .. } => Some(source),
            GpsMapError::Io(err) => Some(err),
            GpsMapError::Csv(err) => Some(err),
            GpsMapError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GpsMapError {
    fn from(err: std::io::Error) -> Self {
        GpsMapError::Io(err)
    }
}

impl From<csv::Error> for GpsMapError {
    fn from(err: csv::Error) -> Self {
        GpsMapError::Csv(err)
    }
}

impl From<serde_json::Error> for GpsMapError {
    fn from(err: serde_json::Error) -> Self {
        GpsMapError::Json(err)
    }
}

pub type Result<T> = std::result::Result<T, GpsMapError>;
