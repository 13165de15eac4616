//! UseCase layer: what a session can ask of the chat.

mod error;
mod get_chat_status;
mod join_chat;
mod leave_chat;
mod send_message;

pub use error::{JoinError, SendMessageError};
pub use get_chat_status::{ChatStatus, GetChatStatusUseCase};
pub use join_chat::JoinChatUseCase;
pub use leave_chat::LeaveChatUseCase;
pub use send_message::SendMessageUseCase;
