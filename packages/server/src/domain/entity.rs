//! Entities of the chat domain.

use super::value_object::{ClientHandle, ClientName, MessageContent, Sender, Timestamp};

const JOINED_SUFFIX: &str = " has joined our chat...";
const LEFT_SUFFIX: &str = " has left the chat...";

/// A client that has completed the naming phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub handle: ClientHandle,
    pub name: ClientName,
    pub joined_at: Timestamp,
}

impl Client {
    pub fn new(handle: ClientHandle, name: ClientName, joined_at: Timestamp) -> Self {
        Self {
            handle,
            name,
            joined_at,
        }
    }
}

/// One entry of the chat history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub content: MessageContent,
    pub sent_at: Timestamp,
}

impl ChatMessage {
    pub fn new(sender: Sender, content: MessageContent, sent_at: Timestamp) -> Self {
        Self {
            sender,
            content,
            sent_at,
        }
    }

    /// A message typed by a client
    pub fn from_client(name: ClientName, content: MessageContent, sent_at: Timestamp) -> Self {
        Self::new(Sender::Client(name), content, sent_at)
    }

    /// Server announcement that `name` entered the chat
    pub fn joined(name: &ClientName, sent_at: Timestamp) -> Self {
        Self::announcement(format!("{}{}", name, JOINED_SUFFIX), sent_at)
    }

    /// Server announcement that `name` left the chat
    pub fn left(name: &ClientName, sent_at: Timestamp) -> Self {
        Self::announcement(format!("{}{}", name, LEFT_SUFFIX), sent_at)
    }

    fn announcement(text: String, sent_at: Timestamp) -> Self {
        // A valid ClientName is never blank, so neither is the announcement.
        Self::new(Sender::Server, MessageContent(text), sent_at)
    }
}
