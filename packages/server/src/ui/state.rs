//! Server state shared by every connection.

use std::sync::Arc;

use tcp_chat_shared::time::Clock;

use crate::{
    infrastructure::banner::Banner,
    usecase::{GetChatStatusUseCase, JoinChatUseCase, LeaveChatUseCase, SendMessageUseCase},
};

/// Shared application state
pub struct AppState {
    /// JoinChatUseCase（参加のユースケース）
    pub join_chat_usecase: Arc<JoinChatUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// LeaveChatUseCase（退出のユースケース）
    pub leave_chat_usecase: Arc<LeaveChatUseCase>,
    /// GetChatStatusUseCase（状態取得のユースケース）
    pub get_chat_status_usecase: Arc<GetChatStatusUseCase>,
    /// Logo sent in the greeting
    pub banner: Banner,
    /// Stamps the session's own prompts
    pub clock: Arc<dyn Clock>,
}
