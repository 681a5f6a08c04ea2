//! 有効期限からの状態算出
//!
//! 車検証と保険証券で同じ判定を使う。比較は日付単位（時刻は切り捨て）。

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 期限切れ間近とみなす日数（今日を含めて今日+30日まで）
pub const EXPIRY_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    Unknown,
    Expired,
    #[serde(rename = "Expiring Soon")]
    ExpiringSoon,
    Valid,
}

impl DocumentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentStatus::Unknown => "Unknown",
            DocumentStatus::Expired => "Expired",
            DocumentStatus::ExpiringSoon => "Expiring Soon",
            DocumentStatus::Valid => "Valid",
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// バックエンドの日付文字列を日付に変換
///
/// 対応形式: `2024-06-01`, `2024-06-01 13:45:00`, `2024-06-01T13:45:00`,
/// RFC 3339（タイムゾーン付きはローカル時刻に直してから日付を取る）
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_date_time(value).map(|dt| dt.date())
}

/// 日時として解釈（日付のみの場合は 00:00）
pub fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    None
}

/// 有効期限と今日の日付から状態を判定
///
/// - 空 → Unknown
/// - expiry < today → Expired
/// - today <= expiry <= today+30日 → Expiring Soon（両端を含む）
/// - それ以降 → Valid
///
/// 日付として読めない値も Unknown とする。
pub fn derive_status(expiry: Option<&str>, today: NaiveDate) -> DocumentStatus {
    let Some(expiry) = expiry.map(str::trim).filter(|s| !s.is_empty()) else {
        return DocumentStatus::Unknown;
    };
    let Some(expiry) = parse_date(expiry) else {
        return DocumentStatus::Unknown;
    };

    let window_end = today + Duration::days(EXPIRY_WINDOW_DAYS);
    if expiry < today {
        DocumentStatus::Expired
    } else if expiry <= window_end {
        DocumentStatus::ExpiringSoon
    } else {
        DocumentStatus::Valid
    }
}

/// ローカル時刻の今日
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
