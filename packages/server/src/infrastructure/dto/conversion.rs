//! Conversion logic between DTOs and domain entities.

use crate::{domain::Client, infrastructure::dto::http as dto, usecase::ChatStatus};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Client> for dto::ActiveClientDto {
    fn from(model: Client) -> Self {
        Self {
            name: model.name.into_string(),
            joined_at: model.joined_at.value().to_rfc3339(),
        }
    }
}

impl From<ChatStatus> for dto::ChatStatusDto {
    fn from(model: ChatStatus) -> Self {
        Self {
            capacity: model.capacity,
            active_clients: model.active_clients.into_iter().map(Into::into).collect(),
            history_length: model.history_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientHandle, ClientName, Timestamp};
    use chrono::{Local, TimeZone};

    #[test]
    fn test_chat_status_to_dto() {
        // テスト項目: ChatStatus が DTO に変換される
        // given (前提条件):
        let joined_at = Local
            .with_ymd_and_hms(2020, 1, 20, 16, 3, 43)
            .single()
            .unwrap();
        let status = ChatStatus {
            capacity: 10,
            active_clients: vec![Client::new(
                ClientHandle::generate(),
                ClientName::new("Yenlik".to_string()).unwrap(),
                Timestamp::new(joined_at),
            )],
            history_length: 3,
        };

        // when (操作):
        let dto: dto::ChatStatusDto = status.into();

        // then (期待する結果):
        assert_eq!(dto.capacity, 10);
        assert_eq!(dto.history_length, 3);
        assert_eq!(dto.active_clients.len(), 1);
        assert_eq!(dto.active_clients[0].name, "Yenlik");
        assert!(dto.active_clients[0].joined_at.starts_with("2020-01-20T16:03:43"));
    }
}
