//! 認証トークンの管理
//!
//! トークンの保存・削除はセッションストアだけが行い、
//! データ取得側は `CredentialProvider` 経由で読むだけにする。

use crate::config::Config;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const TOKEN_ENV: &str = "FLEET_REPORT_TOKEN";

/// Bearerトークンの供給元
pub trait CredentialProvider: Send + Sync {
    /// トークンがなければ None（その場合はヘッダなしで送信）
    fn bearer_token(&self) -> Option<String>;
}

/// 固定トークン（テスト・埋め込み用）
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(pub Option<String>);

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl CredentialProvider for StaticCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionFile {
    token: Option<String>,
}

/// ファイルに保存するログインセッション
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.config/fleet-report/session.json`
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(Config::config_dir()?.join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ログイン時にトークンを保存
    pub fn login(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let session = SessionFile {
            token: Some(token.trim().to_string()),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&session)?)?;
        tracing::info!(path = %self.path.display(), "session token stored");
        Ok(())
    }

    /// ログアウト。セッションがなければ false
    pub fn logout(&self) -> Result<bool> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            tracing::info!(path = %self.path.display(), "session token cleared");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// 保存済みトークン（読めない・壊れている場合は None）
    pub fn token(&self) -> Option<String> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<SessionFile>(&content) {
            Ok(session) => session.token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("session file is unreadable, ignoring it: {}", e);
                None
            }
        }
    }
}

impl CredentialProvider for SessionStore {
    /// 環境変数を優先
    fn bearer_token(&self) -> Option<String> {
        match std::env::var(TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => Some(token.trim().to_string()),
            _ => self.token(),
        }
    }
}
