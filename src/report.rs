//! レポート生成
//!
//! フィルタ → クエリ → 取得 → 行変換 の流れと、フィルタ選択肢の取得をまとめる。

use crate::credentials::CredentialProvider;
use crate::datasource::{DataSource, FetchRequest};
use crate::error::{FleetReportError, Result};
use chrono::NaiveDate;
use fleet_report_common::category::{
    ALERTS_ENDPOINT, SUBSIDIARIES_ENDPOINT, VEHICLES_ENDPOINT,
};
use fleet_report_common::{
    distinct_values, get_category, project_all, CategoryFamily, Endpoint, FilterOptions, FilterState,
    GenerationTicket, RawRecord, ReportCategory, ReportRow, ReportSession,
};

/// カテゴリIDを解決（CLIでは未知のIDはエラー）
pub fn resolve_category(id: &str) -> Result<&'static ReportCategory> {
    get_category(id).ok_or_else(|| FleetReportError::UnknownCategory(id.to_string()))
}

/// `--columns` の指定を検証（重複は最初の1つだけ残す）
pub fn validate_columns(category: &ReportCategory, keys: &[String]) -> Result<Vec<String>> {
    let mut columns: Vec<String> = Vec::with_capacity(keys.len());
    for key in keys.iter().map(|k| k.trim()).filter(|k| !k.is_empty()) {
        if category.field(key).is_none() {
            return Err(FleetReportError::UnknownColumn {
                key: key.to_string(),
                category: category.id.to_string(),
            });
        }
        if !columns.iter().any(|c| c == key) {
            columns.push(key.to_string());
        }
    }
    Ok(columns)
}

/// 生成結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    Loaded { rows: usize },
    /// 取得は成功したが0件（「データなし」表示）
    Empty,
    /// 後続のリクエストがあったため破棄した
    Stale,
}

/// 開始時点のカテゴリとフィルタの写し
///
/// 取得中もセッションを自由に変更でき、反映時にチケットで新旧を判定する。
#[derive(Debug, Clone)]
pub struct PendingGeneration {
    ticket: GenerationTicket,
    category: &'static ReportCategory,
    filters: FilterState,
}

impl PendingGeneration {
    /// チケットを発行して条件を写す。以前の取得はこの時点で古くなる
    pub fn start(session: &mut ReportSession) -> Self {
        let ticket = session.begin_generation();
        Self {
            ticket,
            category: session.category(),
            filters: session.filters().clone(),
        }
    }

    pub fn ticket(&self) -> GenerationTicket {
        self.ticket
    }

    pub fn category(&self) -> &'static ReportCategory {
        self.category
    }

    /// 取得結果をセッションに反映
    ///
    /// - 古い取得は成否にかかわらず捨てて `Stale`
    /// - 失敗時は行をそのまま残してエラーを返す
    pub fn finish(
        self,
        session: &mut ReportSession,
        result: Result<Vec<ReportRow>>,
    ) -> Result<GenerationOutcome> {
        let category = self.category.id;
        match result {
            Ok(rows) => {
                let count = rows.len();
                if !session.complete_generation(self.ticket, rows) {
                    return Ok(GenerationOutcome::Stale);
                }
                tracing::info!(category, rows = count, "report generated");
                if count == 0 {
                    Ok(GenerationOutcome::Empty)
                } else {
                    Ok(GenerationOutcome::Loaded { rows: count })
                }
            }
            Err(e) if !session.is_current(self.ticket) => {
                tracing::debug!(category, "ignoring failure of superseded request: {}", e);
                Ok(GenerationOutcome::Stale)
            }
            Err(e) => {
                tracing::error!(category, "report generation failed: {}", e);
                Err(e)
            }
        }
    }
}

pub struct ReportService {
    source: Box<dyn DataSource>,
    credentials: Box<dyn CredentialProvider>,
}

impl ReportService {
    pub fn new<S, C>(source: S, credentials: C) -> Self
    where
        S: DataSource + 'static,
        C: CredentialProvider + 'static,
    {
        Self {
            source: Box::new(source),
            credentials: Box::new(credentials),
        }
    }

    fn request_for(&self, endpoint: Endpoint, query: Vec<(&'static str, String)>) -> FetchRequest {
        let bearer = if endpoint.authenticated {
            self.credentials.bearer_token()
        } else {
            None
        };
        FetchRequest::new(endpoint).with_query(query).with_bearer(bearer)
    }

    /// カテゴリとフィルタで取得して行に変換
    pub async fn fetch_rows(
        &self,
        category: &ReportCategory,
        filters: &FilterState,
        today: NaiveDate,
    ) -> Result<Vec<ReportRow>> {
        let request = self.request_for(category.endpoint, filters.build_query());
        let records = self.source.fetch(&request).await?;
        Ok(project_all(category, &records, today))
    }

    /// 開始済みの取得を実行（セッションは借用しない）
    pub async fn run(&self, pending: &PendingGeneration, today: NaiveDate) -> Result<Vec<ReportRow>> {
        self.fetch_rows(pending.category, &pending.filters, today).await
    }

    /// 1回分の生成（開始 → 取得 → 反映）
    ///
    /// 同じセッションで取得を重ねるときは `PendingGeneration::start` / `run` / `finish` を使う。
    pub async fn generate(
        &self,
        session: &mut ReportSession,
        today: NaiveDate,
    ) -> Result<GenerationOutcome> {
        let pending = PendingGeneration::start(session);
        let result = self.run(&pending, today).await;
        pending.finish(session, result)
    }

    /// 失敗しても空リストで続行する取得（フィルタ選択肢用）
    async fn probe(&self, endpoint: Endpoint) -> Vec<RawRecord> {
        match self.source.fetch(&FetchRequest::new(endpoint)).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(path = endpoint.path, "filter options unavailable: {}", e);
                Vec::new()
            }
        }
    }

    /// フィルタの選択肢を取得
    ///
    /// - 会社名: 常に車両一覧から
    /// - 子会社: 車両カテゴリのみ
    /// - アラート種別・状態: 事故カテゴリのみ
    pub async fn load_filter_options(&self, category: &ReportCategory) -> FilterOptions {
        let wants_subsidiaries = category.family == CategoryFamily::Vehicle;
        let wants_alerts = category.family == CategoryFamily::Accident;

        let (vehicles, subsidiaries, alerts) = tokio::join!(
            self.probe(VEHICLES_ENDPOINT),
            async {
                if wants_subsidiaries {
                    self.probe(SUBSIDIARIES_ENDPOINT).await
                } else {
                    Vec::new()
                }
            },
            async {
                if wants_alerts {
                    self.probe(ALERTS_ENDPOINT).await
                } else {
                    Vec::new()
                }
            },
        );

        let mut subsidiary_names = distinct_values(&subsidiaries, "name");
        if subsidiary_names.is_empty() {
            subsidiary_names = distinct_values(&subsidiaries, "subsidiary_name");
        }

        FilterOptions {
            companies: distinct_values(&vehicles, "company_name"),
            subsidiaries: subsidiary_names,
            alert_types: distinct_values(&alerts, "alert_type"),
            alert_statuses: distinct_values(&alerts, "status"),
        }
    }
}
