//! レポートカテゴリ定義
//!
//! カテゴリごとに以下をひとまとめにしたテーブル:
//! - 取得先エンドポイント（認証の要否）
//! - 利用可能なフィールドと、その生レコードからの変換ルール
//! - 初期選択フィールド
//! - 検索対象フィールド
//!
//! 文字列によるカテゴリ分岐は行わず、このテーブルを引いて振る舞いを決める。

/// フィルタの系統（同じ系統のカテゴリは同じフィルタ構成を持つ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryFamily {
    Vehicle,
    /// 車検(roadworthy)・保険(insurance)
    Compliance,
    Driver,
    Accident,
    Pool,
}

impl CategoryFamily {
    pub fn name(&self) -> &'static str {
        match self {
            CategoryFamily::Vehicle => "vehicle",
            CategoryFamily::Compliance => "roadworthy/insurance",
            CategoryFamily::Driver => "driver",
            CategoryFamily::Accident => "accident",
            CategoryFamily::Pool => "pool",
        }
    }
}

/// 生レコードからセル値を作るルール
///
/// パスは `.` 区切りでネストを辿る。複数あれば先頭から順に、最初に値があるものを使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// 文字列をそのまま
    Text(&'static [&'static str]),
    /// 数値を文字列化
    Number(&'static [&'static str]),
    /// 日付 (YYYY-MM-DD)
    Date(&'static [&'static str]),
    /// 日時 (YYYY-MM-DD HH:MM)
    DateTime(&'static [&'static str]),
    /// 有効期限から状態を算出
    DerivedStatus(&'static str),
}

/// 1列分の定義
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub key: &'static str,
    pub label: &'static str,
    pub rule: FieldRule,
}

/// データ取得先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub path: &'static str,
    /// Bearerトークンを付与するか
    pub authenticated: bool,
}

pub const VEHICLES_ENDPOINT: Endpoint = Endpoint { path: "/api/vehicles", authenticated: true };
pub const ROADWORTHY_ENDPOINT: Endpoint = Endpoint { path: "/api/roadworthy", authenticated: true };
pub const INSURANCE_ENDPOINT: Endpoint = Endpoint { path: "/api/insurance", authenticated: true };
pub const DRIVERS_ENDPOINT: Endpoint = Endpoint { path: "/api/drivers", authenticated: true };
pub const ALERTS_ENDPOINT: Endpoint = Endpoint { path: "/api/alerts", authenticated: true };
pub const FUEL_REQUEST_ENDPOINT: Endpoint = Endpoint { path: "/api/fuel-request", authenticated: true };
pub const SUBSIDIARIES_ENDPOINT: Endpoint = Endpoint { path: "/api/subsidiaries", authenticated: false };

/// レポートカテゴリ
#[derive(Debug, PartialEq, Eq)]
pub struct ReportCategory {
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub family: CategoryFamily,
    pub endpoint: Endpoint,
    pub available_fields: &'static [FieldDef],
    pub default_fields: &'static [&'static str],
    pub search_fields: &'static [&'static str],
}

impl ReportCategory {
    pub fn field(&self, key: &str) -> Option<&'static FieldDef> {
        self.available_fields.iter().find(|f| f.key == key)
    }

    /// 表示ラベル（未定義のキーはキー名をそのまま返す）
    pub fn label_for<'a>(&self, key: &'a str) -> &'a str {
        match self.field(key) {
            Some(field) => field.label,
            None => key,
        }
    }

    pub fn field_keys(&self) -> impl Iterator<Item = &'static str> {
        self.available_fields.iter().map(|f| f.key)
    }

    pub fn default_selection(&self) -> Vec<String> {
        self.default_fields.iter().map(|k| k.to_string()).collect()
    }

    pub fn is_default(&self, key: &str) -> bool {
        self.default_fields.contains(&key)
    }
}

pub const DEFAULT_CATEGORY_ID: &str = "vehicle-management";

const fn text(key: &'static str, label: &'static str, paths: &'static [&'static str]) -> FieldDef {
    FieldDef { key, label, rule: FieldRule::Text(paths) }
}

const fn number(key: &'static str, label: &'static str, paths: &'static [&'static str]) -> FieldDef {
    FieldDef { key, label, rule: FieldRule::Number(paths) }
}

const fn date(key: &'static str, label: &'static str, paths: &'static [&'static str]) -> FieldDef {
    FieldDef { key, label, rule: FieldRule::Date(paths) }
}

const fn date_time(key: &'static str, label: &'static str, paths: &'static [&'static str]) -> FieldDef {
    FieldDef { key, label, rule: FieldRule::DateTime(paths) }
}

const VEHICLE_FIELDS: &[FieldDef] = &[
    text("registrationNumber", "Registration Number", &["reg_number"]),
    text("vehicleNumber", "Vehicle Number", &["vehicle_number"]),
    text("companyName", "Company", &["company_name"]),
    text("subsidiary", "Subsidiary", &["subsidiary_name", "subsidiary.name"]),
    text("make", "Make", &["make"]),
    text("model", "Model", &["model"]),
    number("year", "Year", &["year"]),
    text("vehicleType", "Vehicle Type", &["vehicle_type"]),
    text("fuelType", "Fuel Type", &["fuel_type"]),
    number("mileage", "Mileage", &["current_mileage"]),
    text("status", "Status", &["status"]),
];

const ROADWORTHY_FIELDS: &[FieldDef] = &[
    text("vehicleNumber", "Vehicle Number", &["vehicle_number"]),
    text("companyName", "Company", &["company_name"]),
    date("dateIssued", "Date Issued", &["date_issued"]),
    date("expiryDate", "Expiry Date", &["expiry_date"]),
    FieldDef { key: "status", label: "Status", rule: FieldRule::DerivedStatus("expiry_date") },
];

const INSURANCE_FIELDS: &[FieldDef] = &[
    text("vehicleNumber", "Vehicle Number", &["vehicle_number"]),
    text("companyName", "Company", &["company_name"]),
    text("insuranceCompany", "Insurance Company", &["insurance_company"]),
    text("policyNumber", "Policy Number", &["policy_number"]),
    text("policyType", "Policy Type", &["policy_type"]),
    number("premium", "Premium", &["premium"]),
    date("issueDate", "Issue Date", &["issue_date"]),
    date("expiryDate", "Expiry Date", &["expiry_date"]),
    FieldDef { key: "status", label: "Status", rule: FieldRule::DerivedStatus("expiry_date") },
];

const DRIVER_FIELDS: &[FieldDef] = &[
    text("name", "Name", &["name"]),
    text("licenseNumber", "License Number", &["license_number"]),
    text("licenseType", "License Type", &["license_type"]),
    date("licenseExpiry", "License Expiry", &["license_expiry_date"]),
    text("phone", "Phone", &["phone_number", "phone"]),
    text("companyName", "Company", &["company_name"]),
    text("status", "Status", &["status"]),
];

const ACCIDENT_FIELDS: &[FieldDef] = &[
    text("unitName", "Unit Name", &["vehicle.reg_number", "unit_name"]),
    text("alertType", "Alert Type", &["alert_type"]),
    text("alertDescription", "Alert Description", &["alert_description"]),
    text("address", "Address", &["address"]),
    number("speed", "Speed", &["speed"]),
    text("companyName", "Company", &["company_name"]),
    date_time("alertTime", "Alert Time", &["alert_time", "created_at"]),
    text("status", "Status", &["status"]),
];

const POOL_FIELDS: &[FieldDef] = &[
    text("registrationNumber", "Registration Number", &["vehicles.reg_number", "registration_number"]),
    text("requestedBy", "Requested By", &["requested_by", "user.name"]),
    text("purpose", "Purpose", &["purpose"]),
    number("fuelQuantity", "Fuel Quantity", &["quantity"]),
    number("cost", "Cost", &["amount"]),
    date("requestDate", "Request Date", &["request_date", "created_at"]),
    text("status", "Status", &["status"]),
];

static CATEGORIES: [ReportCategory; 6] = [
    ReportCategory {
        id: "vehicle-management",
        display_name: "Vehicle Management",
        description: "Fleet vehicles with registration, ownership and status",
        family: CategoryFamily::Vehicle,
        endpoint: VEHICLES_ENDPOINT,
        available_fields: VEHICLE_FIELDS,
        default_fields: &["registrationNumber", "vehicleNumber", "companyName", "make", "model", "status"],
        search_fields: &["registrationNumber", "vehicleNumber"],
    },
    ReportCategory {
        id: "roadworthy",
        display_name: "Roadworthy",
        description: "Roadworthy certificates and their validity",
        family: CategoryFamily::Compliance,
        endpoint: ROADWORTHY_ENDPOINT,
        available_fields: ROADWORTHY_FIELDS,
        default_fields: &["vehicleNumber", "companyName", "dateIssued", "expiryDate", "status"],
        search_fields: &["vehicleNumber"],
    },
    ReportCategory {
        id: "insurance",
        display_name: "Insurance",
        description: "Insurance policies and their validity",
        family: CategoryFamily::Compliance,
        endpoint: INSURANCE_ENDPOINT,
        available_fields: INSURANCE_FIELDS,
        default_fields: &["vehicleNumber", "companyName", "insuranceCompany", "policyNumber", "expiryDate", "status"],
        search_fields: &["vehicleNumber"],
    },
    ReportCategory {
        id: "driver",
        display_name: "Drivers",
        description: "Drivers, licenses and assignment status",
        family: CategoryFamily::Driver,
        endpoint: DRIVERS_ENDPOINT,
        available_fields: DRIVER_FIELDS,
        default_fields: &["name", "licenseNumber", "licenseType", "phone", "status"],
        search_fields: &["name", "licenseNumber", "licenseType"],
    },
    ReportCategory {
        id: "accident",
        display_name: "Accidents & Alerts",
        description: "Telematics alerts and reported incidents",
        family: CategoryFamily::Accident,
        endpoint: ALERTS_ENDPOINT,
        available_fields: ACCIDENT_FIELDS,
        default_fields: &["unitName", "alertType", "alertDescription", "address", "speed", "status"],
        search_fields: &["unitName", "alertType", "alertDescription", "address"],
    },
    ReportCategory {
        id: "pool",
        display_name: "Pool & Fuel Requests",
        description: "Fuel requests raised against pool vehicles",
        family: CategoryFamily::Pool,
        endpoint: FUEL_REQUEST_ENDPOINT,
        available_fields: POOL_FIELDS,
        default_fields: &["registrationNumber", "requestedBy", "purpose", "fuelQuantity", "cost", "status"],
        search_fields: &["registrationNumber"],
    },
];

/// 全カテゴリ（表示順）
pub fn list_categories() -> &'static [ReportCategory] {
    &CATEGORIES
}

pub fn get_category(id: &str) -> Option<&'static ReportCategory> {
    CATEGORIES.iter().find(|c| c.id == id)
}

/// 未指定・未知のIDは車両管理カテゴリにフォールバック
pub fn category_or_default(id: Option<&str>) -> &'static ReportCategory {
    id.and_then(get_category).unwrap_or(&CATEGORIES[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = list_categories().iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), list_categories().len());
    }

    #[test]
    fn test_defaults_are_subset_of_available() {
        for category in list_categories() {
            for key in category.default_fields {
                assert!(
                    category.field(key).is_some(),
                    "{}: default field {} is not available",
                    category.id,
                    key
                );
            }
        }
    }

    #[test]
    fn test_search_fields_exist() {
        for category in list_categories() {
            for key in category.search_fields {
                assert!(category.field(key).is_some(), "{}: {}", category.id, key);
            }
        }
    }

    #[test]
    fn test_field_keys_unique_per_category() {
        for category in list_categories() {
            let keys: HashSet<_> = category.field_keys().collect();
            assert_eq!(keys.len(), category.available_fields.len(), "{}", category.id);
        }
    }

    #[test]
    fn test_unknown_category_falls_back_to_vehicle() {
        assert_eq!(category_or_default(Some("nope")).id, DEFAULT_CATEGORY_ID);
        assert_eq!(category_or_default(None).id, DEFAULT_CATEGORY_ID);
        assert_eq!(category_or_default(Some("driver")).id, "driver");
    }

    #[test]
    fn test_compliance_categories_derive_status() {
        for id in ["roadworthy", "insurance"] {
            let category = get_category(id).unwrap();
            assert_eq!(category.family, CategoryFamily::Compliance);
            assert!(matches!(
                category.field("status").unwrap().rule,
                FieldRule::DerivedStatus("expiry_date")
            ));
        }
    }

    #[test]
    fn test_label_for_unknown_key() {
        let category = get_category("driver").unwrap();
        assert_eq!(category.label_for("licenseNumber"), "License Number");
        assert_eq!(category.label_for("mystery"), "mystery");
    }
}
