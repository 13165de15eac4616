//! UseCase: チャット退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveChatUseCase::execute() メソッド
//! - Registry からの削除と退出通知
//!
//! ### なぜこのテストが必要か
//! - 切断経路が複数あっても削除と通知は 1 回だけ行われる必要がある
//! - 参加前に切断したクライアントについては何も通知しない
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の退出と通知
//! - エッジケース：同じ参加者の 2 回目の退出、未参加クライアントの退出

use std::sync::Arc;

use tcp_chat_shared::time::Clock;

use crate::domain::{ChatMessage, ChatRegistry, ClientHandle, DeliveryReport, Timestamp};

/// チャット退出のユースケース
pub struct LeaveChatUseCase {
    /// Registry（共有状態の抽象化）
    registry: Arc<dyn ChatRegistry>,
    clock: Arc<dyn Clock>,
}

impl LeaveChatUseCase {
    /// 新しい LeaveChatUseCase を作成
    pub fn new(registry: Arc<dyn ChatRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// 退出を実行
    ///
    /// # Returns
    ///
    /// * `Some(DeliveryReport)` - 削除して残りの参加者に通知した
    /// * `None` - 既に削除済み（何もしない）
    pub async fn execute(&self, handle: ClientHandle) -> Option<DeliveryReport> {
        let client = self.registry.unregister(handle).await?;
        let message = ChatMessage::left(&client.name, Timestamp::new(self.clock.now()));

        // 削除済みなので除外対象は不要
        Some(self.registry.deliver(message, None).await)
    }
}
