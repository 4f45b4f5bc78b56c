use std::fmt;
use std::panic::{self, AssertUnwindSafe};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// A source reported that it could not produce results.
    Failed { name: &'static str, message: String },
    /// A source panicked while being polled.
    Panicked { name: &'static str },
}

impl SourceError {
    pub fn failed(name: &'static str, message: impl Into<String>) -> Self {
        Self::Failed { name, message: message.into() }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { name, message } => write!(f, "source '{name}' failed: {message}"),
            Self::Panicked { name } => write!(f, "source '{name}' panicked"),
        }
    }
}

impl std::error::Error for SourceError {}

/// Poll one source so that its failure costs only its own results.
pub(crate) fn poll_isolated<T>(
    name: &'static str,
    poll: impl FnOnce() -> Result<Vec<T>, SourceError>,
) -> Vec<T> {
    let error = match panic::catch_unwind(AssertUnwindSafe(poll)) {
        Ok(Ok(items)) => return items,
        Ok(Err(e)) => e,
        Err(_) => SourceError::Panicked { name },
    };
    log::warn!("{}; skipping its results", error);
    Vec::new()
}
