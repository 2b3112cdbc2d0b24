//! Helper functions for creating specific error types

use super::types::TelemetryError;

impl TelemetryError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage(message.into())
    }

    pub fn parsing<S: Into<String>>(message: S) -> Self {
        Self::Parsing(message.into())
    }

    pub fn transport<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    /// Whether delivery of the same batch may succeed on a later attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpClient(e) => e.is_timeout() || e.is_connect(),
            Self::Transport { status, .. } => {
                crate::core::sender::is_retryable_status(*status)
            }
            _ => false,
        }
    }
}
