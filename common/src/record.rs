//! バックエンドから受け取った生レコード
//!
//! カテゴリごとに形が異なるため、JSONのまま保持してパスで値を引く。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(pub Value);

impl RawRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// `.` 区切りのパスでネストした値を取得
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.0, |value, segment| value.get(segment))
    }

    /// 表示用の文字列として取得（null・空文字は None）
    pub fn text(&self, path: &str) -> Option<String> {
        let value = self.get_path(path)?;
        let text = match value {
            Value::Null => return None,
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => format_number(n),
            Value::Bool(b) => b.to_string(),
            Value::Array(_) | Value::Object(_) => return None,
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// 候補パスを順に試し、最初に値があったものを返す
    pub fn first_text(&self, paths: &[&str]) -> Option<String> {
        paths.iter().find_map(|path| self.text(path))
    }

    /// 行の識別子（数値・文字列どちらも受ける）
    pub fn id(&self) -> Option<String> {
        self.text("id")
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// レスポンス本文をレコード列に変換
///
/// 配列そのもの、または `{"data": [...]}` を受け付ける。
pub fn parse_records(body: Value) -> Result<Vec<RawRecord>> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(Error::InvalidResponse(
                    "expected an array or an object with a `data` array".to_string(),
                ))
            }
        },
        other => {
            return Err(Error::InvalidResponse(format!(
                "expected an array, got {}",
                type_name(&other)
            )))
        }
    };
    Ok(items.into_iter().map(RawRecord).collect())
}

/// 指定パスの値を重複なしで収集（出現順を保持、空は除外）
pub fn distinct_values(records: &[RawRecord], path: &str) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for value in records.iter().filter_map(|r| r.text(path)) {
        if !values.contains(&value) {
            values.push(value);
        }
    }
    values
}

/// 数値の表示（整数値の浮動小数は小数点なし: 1200.0 → "1200"）
pub fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            (f as i64).to_string()
        }
        // f64 の Display は往復可能な最短表記
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
