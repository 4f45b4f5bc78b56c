use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    /// Reading or writing a config file failed.
    Io { path: PathBuf, message: String },
    /// A config file exists but could not be parsed.
    Parse { path: PathBuf, message: String },
    /// Serializing a value for storage failed.
    Serialize(String),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io { path: path.into(), message: err.to_string() }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        Self::Parse { path: path.into(), message: message.to_string() }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "{}: {message}", path.display()),
            Self::Parse { path, message } => write!(f, "cannot parse {}: {message}", path.display()),
            Self::Serialize(msg) => write!(f, "serialize error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
