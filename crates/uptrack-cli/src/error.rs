//! CLI-specific error types and mappings.
//!
//! This module provides the error type for the CLI adapter and maps it to
//! exit codes and user-facing messages.

use thiserror::Error;

use uptrack_core::ConfigError;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument validation error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error while collecting files or writing output.
    #[error("IO error: {0}")]
    Io(String),

    /// Engine configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Output could not be rendered.
    #[error("Output error: {0}")]
    Output(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Output(_) => 1,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::Io(err.to_string())
        } else {
            Self::Output(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Arguments("x".into()).exit_code(), 2);
        assert_eq!(CliError::Io("x".into()).exit_code(), 74);
        assert_eq!(CliError::Config("x".into()).exit_code(), 78);
        assert_eq!(CliError::Output("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_config_error_maps_to_config() {
        let err: CliError = ConfigError::ZeroTickInterval.into();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("Tick interval"));
    }

    #[test]
    fn test_io_error_maps_to_io() {
        let err: CliError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.exit_code(), 74);
        assert_eq!(err.to_string(), "IO error: gone");
    }

    #[test]
    fn test_json_write_failure_maps_to_io() {
        struct ClosedPipe;

        impl std::io::Write for ClosedPipe {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::ErrorKind::BrokenPipe.into())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err: CliError = serde_json::to_writer(ClosedPipe, &[1, 2, 3]).unwrap_err().into();
        assert_eq!(err.exit_code(), 74);
    }
}
