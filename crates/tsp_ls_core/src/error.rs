use std::io;

use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced to callers. Construction-time validation is the common
/// case; the search itself has no error paths once built.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Caller-supplied points, tours or CLI values that fail validation.
    #[error("rejected input: {0}")]
    Input(String),
    /// A cost table that breaks its own contract.
    #[error("rejected data: {0}")]
    Data(String),
    /// Environment wiring problems (logger, worker pool).
    #[error("setup failed: {0}")]
    Setup(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::Data(message.into())
    }

    pub fn setup(message: impl Into<String>) -> Self {
        Self::Setup(message.into())
    }
}
