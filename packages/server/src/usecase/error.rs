//! UseCase layer errors.

use thiserror::Error;

use crate::domain::AdmissionError;

/// 参加処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// 名前が短すぎる
    #[error("wrong name")]
    WrongName,

    /// 名前が使用中
    #[error("name '{0}' is already taken")]
    NameTaken(String),

    /// 定員超過
    #[error("server is full")]
    ServerFull,
}

impl From<AdmissionError> for JoinError {
    fn from(error: AdmissionError) -> Self {
        match error {
            AdmissionError::NameTaken(name) => JoinError::NameTaken(name),
            AdmissionError::ServerFull { .. } => JoinError::ServerFull,
        }
    }
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    /// 空白のみの入力（配信も履歴への追加もしない）
    #[error("message is empty")]
    EmptyMessage,
}
