use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetReportError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("不明なカテゴリ: {0}（`fleet-report categories` で一覧を表示）")]
    UnknownCategory(String),

    #[error("カテゴリ {category} に列 {key} はありません（`fleet-report fields {category}` で一覧を表示）")]
    UnknownColumn { key: String, category: String },

    #[error("通信エラー: {0}")]
    Network(String),

    #[error("サーバーエラー: HTTP {status} ({url})")]
    Http { status: u16, url: String },

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF生成エラー: {0}")]
    PdfGeneration(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("CSV生成エラー: {0}")]
    CsvGeneration(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] fleet_report_common::Error),
}

pub type Result<T> = std::result::Result<T, FleetReportError>;
