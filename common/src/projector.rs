//! 生レコード → 表示行の変換
//!
//! カテゴリの `available_fields` に定義されたルールで1レコードを1行に変換する。
//! 出力行は必ず全フィールドのキーを持ち、値がなければ `-` を入れる。

use crate::category::{FieldRule, ReportCategory};
use crate::record::RawRecord;
use crate::status::{derive_status, parse_date_time};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// 値がないセルの表示
pub const PLACEHOLDER: &str = "-";

/// 表示用に正規化された1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// レコードID（テーブルのキー）
    pub id: Option<String>,
    values: BTreeMap<&'static str, String>,
}

impl ReportRow {
    /// セル値（未定義のキーは `-`）
    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or(PLACEHOLDER)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 1レコードを変換
pub fn project(category: &ReportCategory, record: &RawRecord, today: NaiveDate) -> ReportRow {
    let values = category
        .available_fields
        .iter()
        .map(|field| {
            let value = match field.rule {
                FieldRule::Text(paths) | FieldRule::Number(paths) => record.first_text(paths),
                FieldRule::Date(paths) => record.first_text(paths).map(|raw| format_date(&raw)),
                FieldRule::DateTime(paths) => {
                    record.first_text(paths).map(|raw| format_date_time(&raw))
                }
                FieldRule::DerivedStatus(path) => {
                    let expiry = record.text(path);
                    Some(derive_status(expiry.as_deref(), today).label().to_string())
                }
            };
            (field.key, value.unwrap_or_else(|| PLACEHOLDER.to_string()))
        })
        .collect();

    ReportRow {
        id: record.id(),
        values,
    }
}

/// レコード列をまとめて変換
pub fn project_all(category: &ReportCategory, records: &[RawRecord], today: NaiveDate) -> Vec<ReportRow> {
    records
        .iter()
        .map(|record| project(category, record, today))
        .collect()
}

/// "2024-06-01T08:00:00Z" → "2024-06-01"（読めなければそのまま）
fn format_date(raw: &str) -> String {
    match parse_date_time(raw) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => raw.to_string(),
    }
}

/// "2024-06-01 08:15:42" → "2024-06-01 08:15"
fn format_date_time(raw: &str) -> String {
    match parse_date_time(raw) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => raw.to_string(),
    }
}
