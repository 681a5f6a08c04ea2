//! Export core modules shared by every output format.
//!
//! どの形式でも中身は同じ表:
//! - ヘッダ: `No` + 選択列のラベル
//! - 本文: 連番 + 選択列の値（値がなければ `-`）
//!
//! 行は検索後の全件（ページ分割前）。

pub mod csv_core;
pub mod pdf_core;
pub mod print_core;

#[cfg(feature = "excel")]
pub mod excel_core;

use crate::category::ReportCategory;
use crate::projector::ReportRow;
use chrono::NaiveDate;

/// 出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Excel,
    Csv,
    Pdf,
    Print,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Excel,
        ExportFormat::Csv,
        ExportFormat::Pdf,
        ExportFormat::Print,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Print => "html",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            "print" | "html" => Ok(ExportFormat::Print),
            _ => Err(format!("Unknown format: {}. Use excel, csv, pdf or print", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Pdf => write!(f, "pdf"),
            ExportFormat::Print => write!(f, "print"),
        }
    }
}

/// 出力ファイル名 `report-YYYY-MM-DD.<ext>`
pub fn file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!("report-{}.{}", date.format("%Y-%m-%d"), format.extension())
}

pub const INDEX_HEADER: &str = "No";

/// 出力用の表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    /// 選択列の順序どおりに表を組み立てる
    pub fn build<'a, I>(category: &ReportCategory, selected: &[String], rows: I) -> Self
    where
        I: IntoIterator<Item = &'a ReportRow>,
    {
        let headers = std::iter::once(INDEX_HEADER.to_string())
            .chain(selected.iter().map(|key| category.label_for(key).to_string()))
            .collect();

        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                std::iter::once((index + 1).to_string())
                    .chain(selected.iter().map(|key| row.get(key).to_string()))
                    .collect()
            })
            .collect();

        Self {
            title: format!("{} Report", category.display_name),
            headers,
            rows,
        }
    }

    /// 列数（No列を含む）
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
