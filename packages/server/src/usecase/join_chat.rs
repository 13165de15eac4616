//! UseCase: チャット参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinChatUseCase::execute() の名前検証・重複チェック・登録
//! - JoinChatUseCase::announce_joined() による参加通知
//!
//! ### なぜこのテストが必要か
//! - 名前の一意性と定員はチャット全体の不変条件
//! - 参加者本人には参加通知が届かないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：新しい名前での参加
//! - 異常系：短すぎる名前、使用中の名前、定員超過

use std::sync::Arc;

use tcp_chat_shared::time::Clock;

use crate::domain::{
    Admission, ChatMessage, ChatRegistry, Client, ClientName, DeliveryReport, PusherChannel,
    Timestamp,
};

use super::error::JoinError;

/// チャット参加のユースケース
pub struct JoinChatUseCase {
    /// Registry（共有状態の抽象化）
    registry: Arc<dyn ChatRegistry>,
    clock: Arc<dyn Clock>,
}

impl JoinChatUseCase {
    /// 新しい JoinChatUseCase を作成
    pub fn new(registry: Arc<dyn ChatRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// 参加を実行
    ///
    /// # Arguments
    ///
    /// * `raw_name` - クライアントが入力した 1 行（改行を含んでよい）
    /// * `outbox` - 参加後にクライアントへ配信するためのチャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Admission)` - 参加成功（クライアントと再送する履歴）
    /// * `Err(JoinError)` - 参加失敗
    pub async fn execute(
        &self,
        raw_name: &str,
        outbox: PusherChannel,
    ) -> Result<Admission, JoinError> {
        // 1. 名前の検証
        let name = ClientName::new(raw_name.to_string()).map_err(|_| JoinError::WrongName)?;

        // 2. 重複チェック
        if self.registry.is_name_taken(&name).await {
            return Err(JoinError::NameTaken(name.into_string()));
        }

        // 3. 登録（重複と定員はここでもう一度アトミックに確認される）
        let admission = self.registry.try_register(name, outbox).await?;
        Ok(admission)
    }

    /// 参加したことを他の参加者にブロードキャスト
    pub async fn announce_joined(&self, client: &Client) -> DeliveryReport {
        let message = ChatMessage::joined(&client.name, Timestamp::new(self.clock.now()));
        self.registry.deliver(message, Some(client.handle)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{AdmissionError, ClientHandle, MockChatRegistry, Sender, pusher_channel},
        infrastructure::registry::InMemoryChatRegistry,
    };
    use chrono::{Local, TimeZone};
    use tcp_chat_shared::time::FixedClock;

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            Local
                .with_ymd_and_hms(2020, 1, 20, 16, 4, 10)
                .single()
                .unwrap(),
        ))
    }

    fn create_test_registry(capacity: usize) -> Arc<InMemoryChatRegistry> {
        Arc::new(InMemoryChatRegistry::new(capacity, clock()))
    }

    #[tokio::test]
    async fn test_join_success() {
        // テスト項目: 新しい名前で参加できる
        // given (前提条件):
        let registry = create_test_registry(10);
        let usecase = JoinChatUseCase::new(registry.clone(), clock());
        let (tx, _rx) = pusher_channel();

        // when (操作):
        let result = usecase.execute("Alice\n", tx).await;

        // then (期待する結果):
        let admission = result.unwrap();
        assert_eq!(admission.client.name.as_str(), "Alice");
        assert_eq!(registry.active_clients().await.len(), 1);
    }

    #[tokio::test]
    async fn test_join_as_server_is_rejected_as_taken() {
        // テスト項目: お知らせの送信者名 SERVER は使用中として拒否される
        // given (前提条件):
        let registry = create_test_registry(10);
        let usecase = JoinChatUseCase::new(registry.clone(), clock());
        let (tx, _rx) = pusher_channel();

        // when (操作):
        let result = usecase.execute("SERVER\n", tx).await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinError::NameTaken("SERVER".to_string())));
        assert!(registry.active_clients().await.is_empty());
    }

    #[tokio::test]
    async fn test_join_wrong_name() {
        // テスト項目: 短すぎる名前は WrongName で拒否され、Registry は参照されない
        // given (前提条件):
        let mut registry = MockChatRegistry::new();
        registry.expect_is_name_taken().never();
        registry.expect_try_register().never();
        let usecase = JoinChatUseCase::new(Arc::new(registry), clock());
        let (tx, _rx) = pusher_channel();

        // when (操作):
        let result = usecase.execute(" x \n", tx).await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinError::WrongName));
    }

    #[tokio::test]
    async fn test_join_name_taken_does_not_register() {
        // テスト項目: 使用中の名前は NameTaken で拒否され、登録は試みられない
        // given (前提条件):
        let mut registry = MockChatRegistry::new();
        registry
            .expect_is_name_taken()
            .withf(|name| name.as_str() == "Alice")
            .times(1)
            .returning(|_| true);
        registry.expect_try_register().never();
        let usecase = JoinChatUseCase::new(Arc::new(registry), clock());
        let (tx, _rx) = pusher_channel();

        // when (操作):
        let result = usecase.execute("Alice\n", tx).await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinError::NameTaken("Alice".to_string())));
    }

    #[tokio::test]
    async fn test_join_lost_registration_race_reports_name_taken() {
        // テスト項目: 確認後に同名クライアントが先に登録された場合も NameTaken になる
        // given (前提条件):
        let mut registry = MockChatRegistry::new();
        registry.expect_is_name_taken().returning(|_| false);
        registry
            .expect_try_register()
            .times(1)
            .returning(|name, _| Err(AdmissionError::NameTaken(name.into_string())));
        let usecase = JoinChatUseCase::new(Arc::new(registry), clock());
        let (tx, _rx) = pusher_channel();

        // when (操作):
        let result = usecase.execute("Alice\n", tx).await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinError::NameTaken("Alice".to_string())));
    }

    #[tokio::test]
    async fn test_join_server_full() {
        // テスト項目: 定員超過時は ServerFull で拒否される
        // given (前提条件):
        let registry = create_test_registry(1);
        let usecase = JoinChatUseCase::new(registry.clone(), clock());
        let (tx1, _rx1) = pusher_channel();
        let (tx2, _rx2) = pusher_channel();
        usecase.execute("Alice", tx1).await.unwrap();

        // when (操作):
        let result = usecase.execute("Bob", tx2).await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinError::ServerFull));
        assert_eq!(registry.active_clients().await.len(), 1);
    }

    #[tokio::test]
    async fn test_announce_joined_skips_newcomer() {
        // テスト項目: 参加通知は本人以外にサーバー名義で届く
        // given (前提条件):
        let registry = create_test_registry(10);
        let usecase = JoinChatUseCase::new(registry.clone(), clock());
        let (tx_alice, mut rx_alice) = pusher_channel();
        let (tx_bob, mut rx_bob) = pusher_channel();
        usecase.execute("Alice", tx_alice).await.unwrap();
        let bob = usecase.execute("Bob", tx_bob).await.unwrap();

        // when (操作):
        let report = usecase.announce_joined(&bob.client).await;

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        assert_eq!(
            rx_alice.try_recv().unwrap(),
            "\n[2020-01-20 16:04:10][SERVER]: Bob has joined our chat...\n\
             [2020-01-20 16:04:10][Alice]: "
        );
        assert!(rx_bob.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_announce_joined_excludes_by_handle() {
        // テスト項目: 参加通知の除外対象は参加者のハンドル
        // given (前提条件):
        let handle = ClientHandle::generate();
        let mut registry = MockChatRegistry::new();
        registry
            .expect_deliver()
            .withf(move |message, excluding| {
                message.sender == Sender::Server && *excluding == Some(handle)
            })
            .times(1)
            .returning(|_, _| DeliveryReport::default());
        let usecase = JoinChatUseCase::new(Arc::new(registry), clock());
        let client = Client::new(
            handle,
            ClientName::new("Alice".to_string()).unwrap(),
            Timestamp::new(clock().now()),
        );

        // when (操作):
        let report = usecase.announce_joined(&client).await;

        // then (期待する結果):
        assert_eq!(report, DeliveryReport::default());
    }
}
