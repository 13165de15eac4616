//! InMemory Chat Registry 実装
//!
//! ドメイン層が定義する ChatRegistry trait の具体的な実装。
//! 接続中クライアントと履歴を 1 つの `Mutex` の内側に保持します。
//!
//! ## ロックの扱い
//!
//! ロック中に行うのは状態の更新と `PusherChannel` へのキューイングだけです。
//! ソケットへの書き込みは各クライアントの writer タスクがロックの外で行うため、
//! 遅いクライアントが他のクライアントへの配信を止めることはありません。
//! 配信と履歴への追加を同じクリティカルセクションで行うので、
//! どの受信者から見てもメッセージの順序は履歴の順序と一致します。

use std::sync::Arc;

use async_trait::async_trait;
use tcp_chat_shared::time::Clock;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::domain::{
    Admission, AdmissionError, ChatMessage, ChatRegistry, Client, ClientHandle, ClientName,
    DeliveryReport, PusherChannel, Timestamp, protocol,
};

/// Default maximum number of concurrently active clients
pub const DEFAULT_CAPACITY: usize = 10;

/// An active client together with its outgoing queue
struct Member {
    client: Client,
    outbox: PusherChannel,
}

#[derive(Default)]
struct RegistryState {
    members: Vec<Member>,
    history: Vec<ChatMessage>,
}

impl RegistryState {
    fn is_name_taken(&self, name: &ClientName) -> bool {
        name.is_reserved() || self.members.iter().any(|m| &m.client.name == name)
    }

    fn for_each_other_active<F>(&self, excluding: Option<ClientHandle>, f: F)
    where
        F: FnMut(&Member),
    {
        self.members
            .iter()
            .filter(|m| Some(m.client.handle) != excluding)
            .for_each(f);
    }

    fn append(&mut self, message: ChatMessage) {
        self.history.push(message);
    }
}

/// インメモリ Chat Registry 実装
pub struct InMemoryChatRegistry {
    state: Mutex<RegistryState>,
    capacity: usize,
    /// Stamps join times and the prompt redrawn after each delivery
    clock: Arc<dyn Clock>,
}

impl InMemoryChatRegistry {
    /// 新しい InMemoryChatRegistry を作成
    pub fn new(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            capacity,
            clock,
        }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now())
    }
}

#[async_trait]
impl ChatRegistry for InMemoryChatRegistry {
    async fn try_register(
        &self,
        name: ClientName,
        outbox: PusherChannel,
    ) -> Result<Admission, AdmissionError> {
        let mut state = self.state.lock().await;

        if state.is_name_taken(&name) {
            return Err(AdmissionError::NameTaken(name.into_string()));
        }
        if state.members.len() >= self.capacity {
            return Err(AdmissionError::ServerFull {
                capacity: self.capacity,
            });
        }

        let client = Client::new(ClientHandle::generate(), name, self.now());
        let replay = state.history.clone();
        state.members.push(Member {
            client: client.clone(),
            outbox,
        });
        tracing::debug!(
            "Client '{}' ({}) registered, {} active",
            client.name,
            client.handle,
            state.members.len()
        );

        Ok(Admission { client, replay })
    }

    async fn unregister(&self, handle: ClientHandle) -> Option<Client> {
        let mut state = self.state.lock().await;
        let index = state
            .members
            .iter()
            .position(|m| m.client.handle == handle)?;
        let member = state.members.remove(index);
        tracing::debug!(
            "Client '{}' ({}) unregistered, {} active",
            member.client.name,
            handle,
            state.members.len()
        );
        Some(member.client)
    }

    async fn is_name_taken(&self, name: &ClientName) -> bool {
        self.state.lock().await.is_name_taken(name)
    }

    async fn snapshot_history(&self) -> Vec<ChatMessage> {
        self.state.lock().await.history.clone()
    }

    async fn history_len(&self) -> usize {
        self.state.lock().await.history.len()
    }

    async fn deliver(
        &self,
        message: ChatMessage,
        excluding: Option<ClientHandle>,
    ) -> DeliveryReport {
        let mut state = self.state.lock().await;
        let now = self.now();
        let mut report = DeliveryReport::default();

        state.for_each_other_active(excluding, |member| {
            let payload = protocol::delivery(&message, &member.client.name, now);
            // ブロードキャストでは一部の送信失敗を許容
            match member.outbox.try_send(payload) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        "Queue of client '{}' is full, skipping",
                        member.client.name
                    );
                    report.failed += 1;
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::warn!(
                        "Failed to push message to client '{}', skipping",
                        member.client.name
                    );
                    report.failed += 1;
                }
            }
        });
        tracing::debug!(
            "Delivered message from '{}' to {} client(s)",
            message.sender,
            report.delivered
        );
        state.append(message);

        report
    }

    async fn active_clients(&self) -> Vec<Client> {
        let state = self.state.lock().await;
        state.members.iter().map(|m| m.client.clone()).collect()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
