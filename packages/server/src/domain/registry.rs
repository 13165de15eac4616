//! Registry trait 定義
//!
//! 接続中クライアントの集合とメッセージ履歴を保持する共有状態のインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 並行性の契約
//!
//! - すべての操作は単一のロックの内側で完結し、ネットワーク I/O を行わない
//! - クライアントへの書き込みは `PusherChannel` に積むだけで、実際の送信は
//!   各クライアント専用の writer タスクが行う

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    entity::{ChatMessage, Client},
    error::AdmissionError,
    value_object::{ClientHandle, ClientName},
};

/// Payloads a client's queue holds before further deliveries to it fail
pub const OUTBOX_CAPACITY: usize = 256;

/// Outgoing queue of one client, drained by that client's writer task
pub type PusherChannel = mpsc::Sender<String>;

/// Receiving end of a [`PusherChannel`]
pub type PusherInbox = mpsc::Receiver<String>;

/// A fresh bounded queue for one client
pub fn pusher_channel() -> (PusherChannel, PusherInbox) {
    mpsc::channel(OUTBOX_CAPACITY)
}

/// Result of a successful admission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    /// The newly active client
    pub client: Client,
    /// History as of the moment the client became visible to broadcasts
    pub replay: Vec<ChatMessage>,
}

/// Outcome of one fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Recipients whose queue accepted the message
    pub delivered: usize,
    /// Recipients whose writer had gone away or whose queue was full
    pub failed: usize,
}

/// Chat Registry trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRegistry: Send + Sync {
    /// 名前の重複と定員を確認し、問題がなければクライアントを登録する
    ///
    /// 確認・登録・履歴スナップショットの取得は 1 つのクリティカルセクションで行われる。
    async fn try_register(
        &self,
        name: ClientName,
        outbox: PusherChannel,
    ) -> Result<Admission, AdmissionError>;

    /// クライアントを削除する（存在しなければ何もしない）
    ///
    /// 実際に削除した場合のみ `Some(client)` を返す。
    async fn unregister(&self, handle: ClientHandle) -> Option<Client>;

    /// 接続中のクライアントが `name` を使用しているか（予約済みの名前は常に使用中）
    async fn is_name_taken(&self, name: &ClientName) -> bool;

    /// 現時点のメッセージ履歴を取得
    async fn snapshot_history(&self) -> Vec<ChatMessage>;

    /// 履歴の件数（履歴をコピーしない）
    async fn history_len(&self) -> usize;

    /// `excluding` 以外の全クライアントにメッセージを配信し、履歴に追加する
    async fn deliver(
        &self,
        message: ChatMessage,
        excluding: Option<ClientHandle>,
    ) -> DeliveryReport;

    /// 接続中のクライアント一覧を取得
    async fn active_clients(&self) -> Vec<Client>;

    /// 同時接続数の上限
    fn capacity(&self) -> usize;
}
