//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveClientDto {
    pub name: String,
    /// RFC 3339
    pub joined_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatStatusDto {
    pub capacity: usize,
    pub active_clients: Vec<ActiveClientDto>,
    pub history_length: usize,
}
