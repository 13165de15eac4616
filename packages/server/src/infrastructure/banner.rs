//! ASCII-art logo shown between the welcome line and the name prompt.

use std::{fs, io, path::Path};

use thiserror::Error;

const DEFAULT_LOGO: &str = include_str!("../../assets/banner.txt");

#[derive(Debug, Error)]
pub enum BannerError {
    #[error("failed to read banner file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Logo text sent to every new connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner(String);

impl Banner {
    pub fn new(logo: impl Into<String>) -> Self {
        Self(logo.into())
    }

    /// Read the logo from a text file.
    ///
    /// Read once at startup; every session shares the same text afterwards.
    pub fn load(path: &Path) -> Result<Self, BannerError> {
        fs::read_to_string(path)
            .map(Self)
            .map_err(|source| BannerError::Read {
                path: path.display().to_string(),
                source,
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The penguin
impl Default for Banner {
    fn default() -> Self {
        Self::new(DEFAULT_LOGO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_banner_is_the_penguin() {
        // テスト項目: デフォルトのバナーは組み込みのロゴ
        // given (前提条件):

        // when (操作):
        let banner = Banner::default();

        // then (期待する結果):
        assert!(banner.as_str().starts_with("         _nnnn_\n"));
        assert!(banner.as_str().contains("dGGGGMMb"));
    }

    #[test]
    fn test_load_banner_from_file() {
        // テスト項目: ファイルからバナーを読み込める
        // given (前提条件):
        let path = std::env::temp_dir().join(format!("tcp-chat-banner-{}.txt", std::process::id()));
        fs::write(&path, "hello\n").unwrap();

        // when (操作):
        let result = Banner::load(&path);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "hello\n");
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_missing_banner() {
        // テスト項目: 存在しないファイルはエラーになる
        // given (前提条件):
        let path = Path::new("/nonexistent/tcp-chat/banner.txt");

        // when (操作):
        let result = Banner::load(path);

        // then (期待する結果):
        assert!(matches!(result, Err(BannerError::Read { .. })));
    }
}
