use std::io;
use thiserror::Error;

/// Error types for frame dispatch and handler management
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No handler registered for id {0}")]
    NoDevice(u8),

    #[error("Handler id {0} is already registered")]
    AlreadyRegistered(u8),

    #[error("Handler id {0} is reserved")]
    ReservedId(u8),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Handler error: {0}")]
    Handler(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Creates a new handler error
    pub fn handler(msg: impl Into<String>) -> Self {
        Error::Handler(msg.into())
    }

    /// Creates a new protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Error::Protocol(msg.into())
    }

    /// Creates a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}
