//! レポート生成の統合テスト（メモリ上の取得元を使う）

use async_trait::async_trait;
use chrono::NaiveDate;
use fleet_report::credentials::StaticCredentials;
use fleet_report::datasource::{DataSource, FetchRequest};
use fleet_report::error::{FleetReportError, Result};
use fleet_report::report::{GenerationOutcome, PendingGeneration, ReportService};
use fleet_report_common::{parse_records, FilterSlot, RawRecord, ReportSession, RowSet};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// パスごとに固定のレスポンスを返す。未登録のパスは HTTP 500
#[derive(Clone, Default)]
struct FakeSource {
    responses: Arc<Mutex<HashMap<&'static str, Value>>>,
    requests: Arc<Mutex<Vec<FetchRequest>>>,
}

impl FakeSource {
    fn with(self, path: &'static str, body: Value) -> Self {
        self.responses.lock().unwrap().insert(path, body);
        self
    }

    fn remove(&self, path: &str) {
        self.responses.lock().unwrap().remove(path);
    }

    fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataSource for FakeSource {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawRecord>> {
        self.requests.lock().unwrap().push(request.clone());
        let body = self.responses.lock().unwrap().get(request.path).cloned();
        match body {
            Some(body) => Ok(parse_records(body)?),
            None => Err(FleetReportError::Http {
                status: 500,
                url: request.path.to_string(),
            }),
        }
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn drivers() -> Value {
    json!([
        {"id": 1, "name": "Jane Mensah", "license_number": "DL-100", "license_type": "C", "status": "active"},
        {"id": 2, "name": "Kofi Boateng", "license_number": "DL-200", "license_type": "B"}
    ])
}

#[tokio::test]
async fn test_generate_sends_mapped_query_with_token() {
    let source = FakeSource::default().with("/api/drivers", drivers());
    let service = ReportService::new(source.clone(), StaticCredentials::new("secret"));

    let mut session = ReportSession::new(Some("driver"));
    assert!(session.filters_mut().set_slot(FilterSlot::Year, "Jane"));

    let outcome = service.generate(&mut session, today()).await.unwrap();
    assert_eq!(outcome, GenerationOutcome::Loaded { rows: 2 });

    let requests = source.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/api/drivers");
    assert_eq!(requests[0].query, vec![("name", "Jane".to_string())]);
    assert_eq!(requests[0].bearer.as_deref(), Some("secret"));

    let RowSet::Loaded(rows) = session.rows() else {
        panic!("rows should be loaded");
    };
    assert_eq!(rows[0].get("name"), "Jane Mensah");
    assert_eq!(rows[1].get("status"), "-");
}

#[tokio::test]
async fn test_no_token_sends_no_header() {
    let source = FakeSource::default().with("/api/drivers", drivers());
    let service = ReportService::new(source.clone(), StaticCredentials::none());

    let mut session = ReportSession::new(Some("driver"));
    service.generate(&mut session, today()).await.unwrap();
    assert_eq!(source.requests()[0].bearer, None);
}

#[tokio::test]
async fn test_empty_result_is_not_an_error() {
    let source = FakeSource::default().with("/api/fuel-request", json!({"data": []}));
    let service = ReportService::new(source, StaticCredentials::none());

    let mut session = ReportSession::new(Some("pool"));
    let outcome = service.generate(&mut session, today()).await.unwrap();
    assert_eq!(outcome, GenerationOutcome::Empty);
    assert_eq!(session.rows(), &RowSet::Loaded(Vec::new()));
}

#[tokio::test]
async fn test_failure_keeps_previous_rows() {
    let source = FakeSource::default().with("/api/drivers", drivers());
    let service = ReportService::new(source.clone(), StaticCredentials::none());

    let mut session = ReportSession::new(Some("driver"));
    service.generate(&mut session, today()).await.unwrap();
    let before = session.rows().clone();

    source.remove("/api/drivers");
    let err = service.generate(&mut session, today()).await.unwrap_err();
    assert!(matches!(err, FleetReportError::Http { status: 500, .. }));
    assert_eq!(session.rows(), &before);
}

#[tokio::test]
async fn test_compliance_rows_get_derived_status() {
    let source = FakeSource::default().with(
        "/api/roadworthy",
        json!([
            {"id": 1, "vehicle_number": "V1", "expiry_date": "2024-05-31"},
            {"id": 2, "vehicle_number": "V2", "expiry_date": "2024-07-01"},
            {"id": 3, "vehicle_number": "V3", "expiry_date": "2024-07-02"},
            {"id": 4, "vehicle_number": "V4"}
        ]),
    );
    let service = ReportService::new(source, StaticCredentials::none());

    let mut session = ReportSession::new(Some("roadworthy"));
    service.generate(&mut session, today()).await.unwrap();

    let statuses: Vec<&str> = session.visible_rows().iter().map(|r| r.get("status")).collect();
    assert_eq!(statuses, vec!["Expired", "Expiring Soon", "Valid", "Unknown"]);
}

#[tokio::test]
async fn test_filter_options_for_accident() {
    let source = FakeSource::default()
        .with(
            "/api/vehicles",
            json!([
                {"company_name": "Acme"},
                {"company_name": "Zed Logistics"},
                {"company_name": "Acme"}
            ]),
        )
        .with(
            "/api/alerts",
            json!([
                {"alert_type": "Overspeed", "status": "open"},
                {"alert_type": "Harsh Braking", "status": "closed"},
                {"alert_type": "Overspeed", "status": "open"}
            ]),
        );
    let service = ReportService::new(source.clone(), StaticCredentials::new("secret"));
    let category = fleet_report_common::get_category("accident").unwrap();

    let options = service.load_filter_options(category).await;
    assert_eq!(options.companies, vec!["Acme", "Zed Logistics"]);
    assert_eq!(options.alert_types, vec!["Overspeed", "Harsh Braking"]);
    assert_eq!(options.alert_statuses, vec!["open", "closed"]);
    assert!(options.subsidiaries.is_empty());

    // 選択肢の取得にはトークンを付けない
    assert!(source.requests().iter().all(|r| r.bearer.is_none() && r.query.is_empty()));
    assert!(!source.requests().iter().any(|r| r.path == "/api/subsidiaries"));
}

#[tokio::test]
async fn test_filter_option_failures_degrade_to_empty() {
    // 何も登録しない → すべて 500
    let source = FakeSource::default();
    let service = ReportService::new(source.clone(), StaticCredentials::none());
    let category = fleet_report_common::get_category("vehicle-management").unwrap();

    let options = service.load_filter_options(category).await;
    assert!(options.companies.is_empty());
    assert!(options.subsidiaries.is_empty());

    let paths: Vec<&str> = source.requests().iter().map(|r| r.path).collect();
    assert!(paths.contains(&"/api/vehicles"));
    assert!(paths.contains(&"/api/subsidiaries"));
}

#[tokio::test]
async fn test_overlapping_generations_keep_latest() {
    let source = FakeSource::default().with("/api/drivers", drivers());
    let service = ReportService::new(source.clone(), StaticCredentials::none());

    let mut session = ReportSession::new(Some("driver"));
    session.filters_mut().set("driver_name", "Jane").unwrap();
    let first = PendingGeneration::start(&mut session);
    session.filters_mut().clear();
    let second = PendingGeneration::start(&mut session);
    assert!(second.ticket() > first.ticket());

    // 後から始めた取得が先に終わる
    let (older, newer) = tokio::join!(service.run(&first, today()), service.run(&second, today()));
    assert_eq!(
        second.finish(&mut session, newer).unwrap(),
        GenerationOutcome::Loaded { rows: 2 }
    );
    let latest = session.rows().clone();
    assert_eq!(first.finish(&mut session, older).unwrap(), GenerationOutcome::Stale);
    assert_eq!(session.rows(), &latest);

    // 各取得は開始時点のフィルタで送られている
    let queries: Vec<_> = source.requests().into_iter().map(|r| r.query).collect();
    assert!(queries.contains(&vec![("name", "Jane".to_string())]));
    assert!(queries.contains(&Vec::new()));
}

#[tokio::test]
async fn test_category_switch_drops_inflight_response() {
    let source = FakeSource::default().with("/api/drivers", drivers());
    let service = ReportService::new(source, StaticCredentials::none());

    let mut session = ReportSession::new(Some("driver"));
    let pending = PendingGeneration::start(&mut session);
    let fetch = service.run(&pending, today());
    // 取得中にカテゴリを切り替える
    session.select_category("insurance");
    let result = fetch.await;

    assert_eq!(pending.finish(&mut session, result).unwrap(), GenerationOutcome::Stale);
    assert_eq!(session.rows(), &RowSet::NotGenerated);
    assert_eq!(session.category().id, "insurance");
}

#[tokio::test]
async fn test_superseded_failure_is_not_reported() {
    let source = FakeSource::default();
    let service = ReportService::new(source, StaticCredentials::none());

    let mut session = ReportSession::new(Some("driver"));
    let pending = PendingGeneration::start(&mut session);
    let result = service.run(&pending, today()).await;
    assert!(result.is_err());
    session.cancel();

    assert_eq!(pending.finish(&mut session, result).unwrap(), GenerationOutcome::Stale);
}
