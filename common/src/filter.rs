//! フィルタモデル
//!
//! 系統ごとに名前付きのフィルタ項目を持ち、バックエンドのクエリパラメータへ変換する。
//! 画面側の汎用入力欄（year欄・status欄など）は `FilterSlot` として受け、
//! 系統ごとの対応表で実際の項目に振り分ける。

use crate::category::{CategoryFamily, ReportCategory};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Text,
    Select,
}

/// セレクトの選択肢の出どころ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsSource {
    Static(&'static [&'static str]),
    /// 車両一覧から抽出した会社名
    Companies,
    /// `/api/subsidiaries`
    Subsidiaries,
    /// アラート一覧から抽出した種別
    AlertTypes,
    /// アラート一覧から抽出した状態
    AlertStatuses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FilterKind,
    pub options: Option<OptionsSource>,
}

pub const DOCUMENT_STATUS_OPTIONS: &[&str] = &["Valid", "Expired", "Expiring Soon"];
pub const POOL_STATUS_OPTIONS: &[&str] = &["Pending", "Approved", "Rejected", "Completed"];

const fn text_filter(name: &'static str, label: &'static str) -> FilterDescriptor {
    FilterDescriptor { name, label, kind: FilterKind::Text, options: None }
}

const fn select_filter(name: &'static str, label: &'static str, options: OptionsSource) -> FilterDescriptor {
    FilterDescriptor { name, label, kind: FilterKind::Select, options: Some(options) }
}

const COMPANY_FILTER: FilterDescriptor = select_filter("company", "Company", OptionsSource::Companies);

const VEHICLE_FILTERS: &[FilterDescriptor] = &[
    COMPANY_FILTER,
    select_filter("subsidiary", "Subsidiary", OptionsSource::Subsidiaries),
    text_filter("year", "Year"),
    text_filter("status", "Status"),
    text_filter("registration", "Registration"),
];

const COMPLIANCE_FILTERS: &[FilterDescriptor] = &[
    COMPANY_FILTER,
    select_filter("status", "Status", OptionsSource::Static(DOCUMENT_STATUS_OPTIONS)),
    text_filter("vehicle_number", "Vehicle Number"),
];

const DRIVER_FILTERS: &[FilterDescriptor] = &[
    COMPANY_FILTER,
    text_filter("driver_name", "Driver Name"),
    text_filter("license_number", "License Number"),
    text_filter("status", "Status"),
];

const ACCIDENT_FILTERS: &[FilterDescriptor] = &[
    COMPANY_FILTER,
    text_filter("unit_name", "Unit Name"),
    select_filter("alert_type", "Alert Type", OptionsSource::AlertTypes),
    select_filter("alert_status", "Alert Status", OptionsSource::AlertStatuses),
];

const POOL_FILTERS: &[FilterDescriptor] = &[
    text_filter("registration_number", "Registration Number"),
    select_filter("status", "Status", OptionsSource::Static(POOL_STATUS_OPTIONS)),
];

/// カテゴリで表示するフィルタ（表示順）
pub fn renderable_filters(category: &ReportCategory) -> &'static [FilterDescriptor] {
    match category.family {
        CategoryFamily::Vehicle => VEHICLE_FILTERS,
        CategoryFamily::Compliance => COMPLIANCE_FILTERS,
        CategoryFamily::Driver => DRIVER_FILTERS,
        CategoryFamily::Accident => ACCIDENT_FILTERS,
        CategoryFamily::Pool => POOL_FILTERS,
    }
}

/// 画面の汎用入力欄
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSlot {
    Company,
    Subsidiary,
    Year,
    Status,
    AlertStatus,
    Registration,
}

/// 汎用入力欄 → 系統ごとのフィルタ項目名
fn slot_target(family: CategoryFamily, slot: FilterSlot) -> Option<&'static str> {
    use CategoryFamily as F;
    use FilterSlot as S;
    match (family, slot) {
        (F::Vehicle, S::Company) => Some("company"),
        (F::Vehicle, S::Subsidiary) => Some("subsidiary"),
        (F::Vehicle, S::Year) => Some("year"),
        (F::Vehicle, S::Status) => Some("status"),
        (F::Vehicle, S::Registration) => Some("registration"),

        (F::Compliance, S::Company) => Some("company"),
        (F::Compliance, S::Status) => Some("status"),
        (F::Compliance, S::Registration) => Some("vehicle_number"),

        (F::Driver, S::Company) => Some("company"),
        (F::Driver, S::Year) => Some("driver_name"),
        (F::Driver, S::Registration) => Some("license_number"),
        (F::Driver, S::Status) => Some("status"),

        (F::Accident, S::Company) => Some("company"),
        (F::Accident, S::Year) => Some("unit_name"),
        (F::Accident, S::Status) => Some("alert_type"),
        (F::Accident, S::AlertStatus) => Some("alert_status"),

        (F::Pool, S::Year) => Some("registration_number"),
        (F::Pool, S::Status) => Some("status"),

        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleFilters {
    pub company: String,
    pub subsidiary: String,
    pub year: String,
    pub status: String,
    pub registration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplianceFilters {
    pub company: String,
    pub status: String,
    pub vehicle_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverFilters {
    pub company: String,
    pub name: String,
    pub license_number: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccidentFilters {
    pub company: String,
    pub unit_name: String,
    pub alert_type: String,
    pub alert_status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolFilters {
    pub registration_number: String,
    pub status: String,
}

/// カテゴリ系統ごとのフィルタ状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterState {
    Vehicle(VehicleFilters),
    Compliance(ComplianceFilters),
    Driver(DriverFilters),
    Accident(AccidentFilters),
    Pool(PoolFilters),
}

impl FilterState {
    pub fn for_family(family: CategoryFamily) -> Self {
        match family {
            CategoryFamily::Vehicle => FilterState::Vehicle(VehicleFilters::default()),
            CategoryFamily::Compliance => FilterState::Compliance(ComplianceFilters::default()),
            CategoryFamily::Driver => FilterState::Driver(DriverFilters::default()),
            CategoryFamily::Accident => FilterState::Accident(AccidentFilters::default()),
            CategoryFamily::Pool => FilterState::Pool(PoolFilters::default()),
        }
    }

    pub fn for_category(category: &ReportCategory) -> Self {
        Self::for_family(category.family)
    }

    pub fn family(&self) -> CategoryFamily {
        match self {
            FilterState::Vehicle(_) => CategoryFamily::Vehicle,
            FilterState::Compliance(_) => CategoryFamily::Compliance,
            FilterState::Driver(_) => CategoryFamily::Driver,
            FilterState::Accident(_) => CategoryFamily::Accident,
            FilterState::Pool(_) => CategoryFamily::Pool,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match self {
            FilterState::Vehicle(f) => match name {
                "company" => Some(&mut f.company),
                "subsidiary" => Some(&mut f.subsidiary),
                "year" => Some(&mut f.year),
                "status" => Some(&mut f.status),
                "registration" => Some(&mut f.registration),
                _ => None,
            },
            FilterState::Compliance(f) => match name {
                "company" => Some(&mut f.company),
                "status" => Some(&mut f.status),
                "vehicle_number" => Some(&mut f.vehicle_number),
                _ => None,
            },
            FilterState::Driver(f) => match name {
                "company" => Some(&mut f.company),
                "driver_name" => Some(&mut f.name),
                "license_number" => Some(&mut f.license_number),
                "status" => Some(&mut f.status),
                _ => None,
            },
            FilterState::Accident(f) => match name {
                "company" => Some(&mut f.company),
                "unit_name" => Some(&mut f.unit_name),
                "alert_type" => Some(&mut f.alert_type),
                "alert_status" => Some(&mut f.alert_status),
                _ => None,
            },
            FilterState::Pool(f) => match name {
                "registration_number" => Some(&mut f.registration_number),
                "status" => Some(&mut f.status),
                _ => None,
            },
        }
    }

    /// フィルタ項目名で値を設定
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let family = self.family();
        let field = self.field_mut(name).ok_or_else(|| Error::UnknownFilter {
            name: name.to_string(),
            category: family.name().to_string(),
        })?;
        *field = value.into();
        Ok(())
    }

    /// 汎用入力欄から値を設定。この系統で使わない欄なら false
    pub fn set_slot(&mut self, slot: FilterSlot, value: impl Into<String>) -> bool {
        match slot_target(self.family(), slot) {
            Some(name) => self.set(name, value).is_ok(),
            None => false,
        }
    }

    /// フィルタ項目名で値を取得（この系統にない項目は None）
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match self {
            FilterState::Vehicle(f) => match name {
                "company" => &f.company,
                "subsidiary" => &f.subsidiary,
                "year" => &f.year,
                "status" => &f.status,
                "registration" => &f.registration,
                _ => return None,
            },
            FilterState::Compliance(f) => match name {
                "company" => &f.company,
                "status" => &f.status,
                "vehicle_number" => &f.vehicle_number,
                _ => return None,
            },
            FilterState::Driver(f) => match name {
                "company" => &f.company,
                "driver_name" => &f.name,
                "license_number" => &f.license_number,
                "status" => &f.status,
                _ => return None,
            },
            FilterState::Accident(f) => match name {
                "company" => &f.company,
                "unit_name" => &f.unit_name,
                "alert_type" => &f.alert_type,
                "alert_status" => &f.alert_status,
                _ => return None,
            },
            FilterState::Pool(f) => match name {
                "registration_number" => &f.registration_number,
                "status" => &f.status,
                _ => return None,
            },
        };
        Some(value.as_str())
    }

    /// バックエンドのパラメータ名と値（空も含む、固定順）
    fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            FilterState::Vehicle(f) => vec![
                ("company", f.company.clone()),
                ("subsidiary", f.subsidiary.clone()),
                ("year", f.year.clone()),
                ("status", f.status.clone()),
                ("registration", f.registration.clone()),
            ],
            FilterState::Compliance(f) => vec![
                ("company", f.company.clone()),
                ("status", f.status.clone()),
                ("vehicle_number", f.vehicle_number.clone()),
            ],
            FilterState::Driver(f) => vec![
                ("company", f.company.clone()),
                ("name", f.name.clone()),
                ("license_number", f.license_number.clone()),
                ("status", f.status.clone()),
            ],
            FilterState::Accident(f) => vec![
                ("company", f.company.clone()),
                ("unit_name", f.unit_name.clone()),
                ("alert_type", f.alert_type.clone()),
                ("status", f.alert_status.clone()),
            ],
            FilterState::Pool(f) => vec![
                ("registration_number", f.registration_number.clone()),
                ("status", f.status.clone()),
            ],
        }
    }

    /// クエリパラメータ（値が空のものは含めない）
    pub fn build_query(&self) -> Vec<(&'static str, String)> {
        self.params()
            .into_iter()
            .map(|(name, value)| (name, value.trim().to_string()))
            .filter(|(_, value)| !value.is_empty())
            .collect()
    }

    /// すべての条件をクリア
    pub fn clear(&mut self) {
        *self = Self::for_family(self.family());
    }

    pub fn is_empty(&self) -> bool {
        self.build_query().is_empty()
    }
}

/// セレクトの選択肢
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub companies: Vec<String>,
    pub subsidiaries: Vec<String>,
    pub alert_types: Vec<String>,
    pub alert_statuses: Vec<String>,
}

impl FilterOptions {
    pub fn options_for(&self, source: OptionsSource) -> Vec<String> {
        match source {
            OptionsSource::Static(values) => values.iter().map(|v| v.to_string()).collect(),
            OptionsSource::Companies => self.companies.clone(),
            OptionsSource::Subsidiaries => self.subsidiaries.clone(),
            OptionsSource::AlertTypes => self.alert_types.clone(),
            OptionsSource::AlertStatuses => self.alert_statuses.clone(),
        }
    }
}
