use core::fmt::{self, Debug};

use crate::config::ConfigError;
use crate::framebuffer::CodecError;

/// Error type for the panel drivers, wrapping the transport's own error.
#[derive(Debug, PartialEq, Eq)]
pub enum DriverError<E> {
    /// The bus write failed; page flags touched by the call stay dirty.
    Transport(E),
    Codec(CodecError),
    Config(ConfigError),
}

impl<E> From<CodecError> for DriverError<E> {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

impl<E> From<ConfigError> for DriverError<E> {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl<E: Debug> fmt::Display for DriverError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Transport(e) => write!(f, "transport error: {e:?}"),
            DriverError::Codec(e) => write!(f, "{e}"),
            DriverError::Config(e) => write!(f, "{e}"),
        }
    }
}

impl<E: Debug> core::error::Error for DriverError<E> {}
