//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 空メッセージの破棄、送信者以外への配信、履歴への追加
//!
//! ### なぜこのテストが必要か
//! - 空白だけの入力は配信も保存もされてはならない
//! - 送信者自身にはメッセージが返ってこないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - 異常系：空白のみの入力
//! - エッジケース：送信者のみが接続している場合（ブロードキャスト対象なし）

use std::sync::Arc;

use tcp_chat_shared::time::Clock;

use crate::domain::{ChatMessage, ChatRegistry, Client, DeliveryReport, MessageContent, Timestamp};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Registry（共有状態の抽象化）
    registry: Arc<dyn ChatRegistry>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(registry: Arc<dyn ChatRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - メッセージ送信者
    /// * `raw_text` - クライアントが入力した 1 行
    ///
    /// # Returns
    ///
    /// * `Ok(DeliveryReport)` - 配信結果
    /// * `Err(SendMessageError::EmptyMessage)` - 空白のみの入力（何も起きない）
    pub async fn execute(
        &self,
        sender: &Client,
        raw_text: &str,
    ) -> Result<DeliveryReport, SendMessageError> {
        let content = MessageContent::new(raw_text.to_string())
            .map_err(|_| SendMessageError::EmptyMessage)?;
        let message = ChatMessage::from_client(
            sender.name.clone(),
            content,
            Timestamp::new(self.clock.now()),
        );

        Ok(self.registry.deliver(message, Some(sender.handle)).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ClientHandle, ClientName, MockChatRegistry, PusherChannel, pusher_channel},
        infrastructure::registry::InMemoryChatRegistry,
    };
    use chrono::{Local, TimeZone};
    use tcp_chat_shared::time::FixedClock;

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            Local
                .with_ymd_and_hms(2020, 1, 20, 16, 4, 32)
                .single()
                .unwrap(),
        ))
    }

    fn create_test_registry() -> Arc<InMemoryChatRegistry> {
        Arc::new(InMemoryChatRegistry::new(10, clock()))
    }

    async fn join(registry: &InMemoryChatRegistry, name: &str, outbox: PusherChannel) -> Client {
        registry
            .try_register(ClientName::new(name.to_string()).unwrap(), outbox)
            .await
            .unwrap()
            .client
    }

    #[tokio::test]
    async fn test_send_message_success() {
        // テスト項目: 送信者以外の全員に配信され、履歴に追加される
        // given (前提条件):
        let registry = create_test_registry();
        let usecase = SendMessageUseCase::new(registry.clone(), clock());
        let (tx_alice, mut rx_alice) = pusher_channel();
        let (tx_bob, mut rx_bob) = pusher_channel();
        let (tx_carol, mut rx_carol) = pusher_channel();
        let alice = join(&registry, "Alice", tx_alice).await;
        join(&registry, "Bob", tx_bob).await;
        join(&registry, "Carol", tx_carol).await;

        // when (操作):
        let result = usecase.execute(&alice, "  hi  \n").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Ok(DeliveryReport {
                delivered: 2,
                failed: 0
            })
        );
        assert_eq!(
            rx_bob.try_recv().unwrap(),
            "\n[2020-01-20 16:04:32][Alice]: hi\n[2020-01-20 16:04:32][Bob]: "
        );
        assert!(rx_carol.try_recv().unwrap().contains("[Alice]: hi\n"));
        assert!(rx_alice.try_recv().is_err());

        let history = registry.snapshot_history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content.as_str(), "hi");
    }

    #[tokio::test]
    async fn test_send_message_no_broadcast_targets() {
        // テスト項目: 送信者のみが接続している場合、配信先はないが履歴には追加される
        // given (前提条件):
        let registry = create_test_registry();
        let usecase = SendMessageUseCase::new(registry.clone(), clock());
        let (tx, _rx) = pusher_channel();
        let alice = join(&registry, "Alice", tx).await;

        // when (操作):
        let result = usecase.execute(&alice, "hello?").await;

        // then (期待する結果):
        assert_eq!(result, Ok(DeliveryReport::default()));
        assert_eq!(registry.snapshot_history().await.len(), 1);
    }

    #[tokio::test]
    async fn test_send_empty_message_is_dropped() {
        // テスト項目: 空白のみの入力は配信も履歴への追加もされない
        // given (前提条件):
        let mut registry = MockChatRegistry::new();
        registry.expect_deliver().never();
        let usecase = SendMessageUseCase::new(Arc::new(registry), clock());
        let alice = Client::new(
            ClientHandle::generate(),
            ClientName::new("Alice".to_string()).unwrap(),
            Timestamp::new(clock().now()),
        );

        for raw in ["", "\n", "   \r\n", "\t"] {
            // when (操作):
            let result = usecase.execute(&alice, raw).await;

            // then (期待する結果):
            assert_eq!(result, Err(SendMessageError::EmptyMessage));
        }
    }
}
