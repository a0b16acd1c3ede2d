//! Error types and handling for the HopeBites backend

use thiserror::Error;

/// Main error type for the HopeBites backend
#[derive(Error, Debug)]
pub enum HopeBitesError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl HopeBitesError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = HopeBitesError::config("missing region profile");
        assert!(matches!(config_err, HopeBitesError::Config { .. }));

        let validation_err = HopeBitesError::validation("empty email");
        assert!(matches!(validation_err, HopeBitesError::Validation { .. }));

        let general_err = HopeBitesError::general("boom");
        assert!(matches!(general_err, HopeBitesError::General { .. }));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: HopeBitesError = io_err.into();
        assert!(matches!(app_err, HopeBitesError::Io { .. }));
    }

    #[test]
    fn test_error_messages() {
        let err = HopeBitesError::config("bad bounding box");
        assert_eq!(err.to_string(), "Configuration error: bad bounding box");
    }
}
