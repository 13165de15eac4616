//! Value objects of the chat domain.

use std::fmt;

use chrono::{DateTime, Local};
use tcp_chat_shared::time::format_chat_timestamp;
use uuid::Uuid;

use super::error::ValueObjectError;

/// Minimum number of characters in a display name, after trimming
pub const MIN_NAME_LENGTH: usize = 2;

/// Sender text used for announcements made by the server itself
pub const SERVER_SENDER: &str = "SERVER";

/// Opaque identity of one connection.
///
/// Generated once per accepted connection and never reused, so removal from the
/// registry works by identity even if two clients were ever to share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientHandle(Uuid);

impl ClientHandle {
    /// Generate a fresh handle
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name chosen by a client during the naming phase
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientName(String);

impl ClientName {
    /// Create a name from raw input, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ValueObjectError::NameTooShort` if fewer than
    /// [`MIN_NAME_LENGTH`] characters remain after trimming.
    pub fn new(raw: String) -> Result<Self, ValueObjectError> {
        let trimmed = raw.trim();
        let actual = trimmed.chars().count();
        if actual < MIN_NAME_LENGTH {
            return Err(ValueObjectError::NameTooShort {
                min: MIN_NAME_LENGTH,
                actual,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether this name would be indistinguishable from announcements
    pub fn is_reserved(&self) -> bool {
        self.0 == SERVER_SENDER
    }
}

impl TryFrom<String> for ClientName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ClientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text of a chat message, never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(pub(super) String);

impl MessageContent {
    /// Create message content from raw input, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ValueObjectError::EmptyContent` for empty or whitespace-only input.
    pub fn new(raw: String) -> Result<Self, ValueObjectError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyContent);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Point in time a message was sent, in server local time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Local>);

impl Timestamp {
    pub fn new(value: DateTime<Local>) -> Self {
        Self(value)
    }

    pub fn value(&self) -> DateTime<Local> {
        self.0
    }
}

/// Formats as `YYYY-MM-DD HH:MM:SS`
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_chat_timestamp(&self.0))
    }
}

/// Who a message is attributed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sender {
    /// Join/leave announcements
    Server,
    Client(ClientName),
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::Server => f.write_str(SERVER_SENDER),
            Sender::Client(name) => name.fmt(f),
        }
    }
}
