//! データ取得アダプタ
//!
//! カテゴリごとの取得先は `ReportCategory::endpoint` が持つ。
//! ここではパス・クエリ・トークンを受けてレコード列を返すことだけを行う。

use crate::config::Config;
use crate::error::{FleetReportError, Result};
use async_trait::async_trait;
use fleet_report_common::{parse_records, Endpoint, RawRecord};
use std::time::Duration;

/// 1回分の取得リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub path: &'static str,
    pub query: Vec<(&'static str, String)>,
    pub bearer: Option<String>,
}

impl FetchRequest {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            path: endpoint.path,
            query: Vec::new(),
            bearer: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(&'static str, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }
}

#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawRecord>>;
}

/// REST バックエンド
pub struct HttpDataSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDataSource {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FleetReportError::Config(format!("HTTPクライアント初期化エラー: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.api_url(), config.timeout_seconds.map(Duration::from_secs))
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawRecord>> {
        let url = self.url_for(request.path);
        tracing::debug!(%url, query = ?request.query, auth = request.bearer.is_some(), "GET");

        let mut builder = self.client.get(&url).query(&request.query);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| FleetReportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FleetReportError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| FleetReportError::ApiParse(e.to_string()))?;
        let records = parse_records(body).map_err(|e| FleetReportError::ApiParse(e.to_string()))?;
        tracing::debug!(%url, count = records.len(), "fetched records");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_report_common::category::DRIVERS_ENDPOINT;

    #[test]
    fn test_url_for_trims_trailing_slash() {
        let source = HttpDataSource::new("http://localhost:8000/", None).unwrap();
        assert_eq!(source.url_for("/api/drivers"), "http://localhost:8000/api/drivers");
    }

    #[test]
    fn test_request_builder() {
        let request = FetchRequest::new(DRIVERS_ENDPOINT)
            .with_query(vec![("name", "Jane".to_string())])
            .with_bearer(Some("tok".to_string()));
        assert_eq!(request.path, "/api/drivers");
        assert_eq!(request.query, vec![("name", "Jane".to_string())]);
        assert_eq!(request.bearer.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // ポート1には通常何も待ち受けていない
        let source = HttpDataSource::new("http://127.0.0.1:1", Some(Duration::from_secs(2))).unwrap();
        let err = source
            .fetch(&FetchRequest::new(DRIVERS_ENDPOINT))
            .await
            .unwrap_err();
        assert!(matches!(err, FleetReportError::Network(_)));
    }
}
