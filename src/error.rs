use std::fmt::Display;
use std::path::PathBuf;

/// All fatal conditions of a csh run
#[derive(Debug)]
pub enum CshError {
    /// Input file could not be read
    ReadError(PathBuf, std::io::Error),
    /// Input file is not UTF-8
    EncodingError(PathBuf),
    /// Input file is not well-formed XML
    ParseError(PathBuf, roxmltree::Error),
    /// Output directory or file could not be written
    WriteError(PathBuf, std::io::Error),
    /// Invalid configuration
    ConfigError(String),
    /// Anomaly in the input data (only raised in strict mode)
    DataError(String),
    SerializationError(serde_json::Error),
}

impl From<serde_json::Error> for CshError {
    fn from(error: serde_json::Error) -> Self {
        Self::SerializationError(error)
    }
}

impl Display for CshError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::ReadError(path, e) => {
                write!(f, "Error reading XML file {}: {}", path.display(), e)
            }
            Self::EncodingError(path) => {
                write!(f, "XML file {} is not valid UTF-8", path.display())
            }
            Self::ParseError(path, e) => {
                write!(f, "Error parsing XML file {}: {}", path.display(), e)
            }
            Self::WriteError(path, e) => {
                write!(f, "Error writing {}: {}", path.display(), e)
            }
            Self::ConfigError(e) => write!(f, "Configuration error: {}", e),
            Self::DataError(e) => e.fmt(f),
            Self::SerializationError(e) => write!(f, "Error serializing csh data: {}", e),
        }
    }
}

impl std::error::Error for CshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadError(_, e) | Self::WriteError(_, e) => Some(e),
            Self::ParseError(_, e) => Some(e),
            Self::SerializationError(e) => Some(e),
            _ => None,
        }
    }
}
