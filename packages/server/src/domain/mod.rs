//! Domain layer: chat vocabulary, the registry interface and the wire protocol.
//!
//! Nothing in here performs I/O. The registry is described as a trait so the
//! use case layer never depends on the in-memory implementation.

pub mod entity;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod value_object;

pub use entity::{ChatMessage, Client};
pub use error::{AdmissionError, ValueObjectError};
pub use registry::{
    Admission, ChatRegistry, DeliveryReport, OUTBOX_CAPACITY, PusherChannel, PusherInbox,
    pusher_channel,
};
pub use value_object::{ClientHandle, ClientName, MessageContent, Sender, Timestamp};

#[cfg(test)]
pub use registry::MockChatRegistry;
