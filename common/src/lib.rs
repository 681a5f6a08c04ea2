//! Fleet Report Common Library
//!
//! CLIと他のフロントエンドで共有するレポート生成ロジック:
//! カテゴリ定義、フィルタ、行変換、状態判定、列選択、検索、出力用の表

pub mod category;
pub mod columns;
pub mod error;
pub mod export;
pub mod filter;
pub mod projector;
pub mod record;
pub mod search;
pub mod session;
pub mod status;

pub use category::{
    category_or_default, get_category, list_categories, CategoryFamily, Endpoint, FieldDef,
    FieldRule, ReportCategory, DEFAULT_CATEGORY_ID,
};
pub use columns::ColumnSelection;
pub use error::{Error, Result};
pub use export::{ExportFormat, ExportTable};
pub use filter::{
    renderable_filters, FilterDescriptor, FilterKind, FilterOptions, FilterSlot, FilterState,
    OptionsSource,
};
pub use projector::{project, project_all, ReportRow, PLACEHOLDER};
pub use record::{distinct_values, parse_records, RawRecord};
pub use search::{PageInfo, PAGE_SIZE_OPTIONS};
pub use session::{GenerationTicket, ReportSession, RowSet};
pub use status::{derive_status, DocumentStatus};
