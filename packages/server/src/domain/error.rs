//! Domain errors.

use thiserror::Error;

/// Errors raised while building value objects from raw input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// Display name shorter than the minimum length after trimming
    #[error("client name must be at least {min} characters (got {actual})")]
    NameTooShort { min: usize, actual: usize },

    /// Message text is empty after trimming
    #[error("message content must not be empty")]
    EmptyContent,
}

/// Reasons the registry refuses to admit a client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// Another active client already holds the name
    #[error("name '{0}' is already taken")]
    NameTaken(String),

    /// The registry already holds `capacity` active clients
    #[error("server is full ({capacity} clients)")]
    ServerFull { capacity: usize },
}
