//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Filter '{name}' does not apply to category '{category}'")]
    UnknownFilter { name: String, category: String },

    #[error("Invalid page size: {0} (use 10, 25, 50 or 100)")]
    InvalidPageSize(usize),

    #[error("Excel error: {0}")]
    Excel(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
