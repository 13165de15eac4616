//! UseCase: チャット状態の取得（運用向けのステータス API 用）

use std::sync::Arc;

use crate::domain::{ChatRegistry, Client};

/// Point-in-time view of the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatStatus {
    pub capacity: usize,
    pub active_clients: Vec<Client>,
    pub history_length: usize,
}

/// チャット状態取得のユースケース
pub struct GetChatStatusUseCase {
    registry: Arc<dyn ChatRegistry>,
}

impl GetChatStatusUseCase {
    pub fn new(registry: Arc<dyn ChatRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self) -> ChatStatus {
        ChatStatus {
            capacity: self.registry.capacity(),
            active_clients: self.registry.active_clients().await,
            history_length: self.registry.history_len().await,
        }
    }
}
