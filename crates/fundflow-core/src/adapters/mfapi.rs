use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::data_source::{NavSource, RawNavFeed, RawNavRow, SchemeMeta, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{ProviderId, SchemeCode};

pub const DEFAULT_BASE_URL: &str = "https://api.mfapi.in";

/// Adapter for the public MFAPI mutual fund NAV endpoint (`/mf/{scheme_code}`).
#[derive(Clone)]
pub struct MfapiAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl Default for MfapiAdapter {
    fn default() -> Self {
        Self {
            http_client: Arc::new(ReqwestHttpClient::default()),
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: 10_000,
        }
    }
}

impl MfapiAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn history_url(&self, scheme_code: &SchemeCode) -> String {
        format!("{}/mf/{}", self.base_url, scheme_code.as_str())
    }

    async fn fetch_history(&self, scheme_code: &SchemeCode) -> Result<RawNavFeed, SourceError> {
        let url = self.history_url(scheme_code);
        debug!(%url, "requesting nav history");

        let request = HttpRequest::get(&url)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            warn!(scheme_code = %scheme_code, error = %e, "mfapi transport failure");
            SourceError::unavailable(format!("mfapi transport error: {}", e.message()))
        })?;

        match response.status {
            404 => {
                return Err(SourceError::not_found(format!(
                    "mfapi has no scheme '{scheme_code}'"
                )))
            }
            status if !response.is_success() => {
                return Err(SourceError::unavailable(format!(
                    "mfapi returned status {status}"
                )))
            }
            _ => {}
        }

        let payload: MfapiHistoryResponse = serde_json::from_str(&response.body)
            .map_err(|e| SourceError::internal(format!("failed to parse mfapi response: {e}")))?;

        if let Some(status) = payload.status.as_deref() {
            if !status.eq_ignore_ascii_case("success") {
                return Err(SourceError::not_found(format!(
                    "mfapi reported status '{status}' for scheme '{scheme_code}'"
                )));
            }
        }

        if payload.data.is_empty() {
            return Err(SourceError::not_found(format!(
                "mfapi returned no nav history for scheme '{scheme_code}'"
            )));
        }

        let rows = payload
            .data
            .into_iter()
            .map(|entry| RawNavRow::new(field_text(entry.date), field_text(entry.nav)))
            .collect::<Vec<_>>();
        debug!(scheme_code = %scheme_code, rows = rows.len(), "received nav history");

        Ok(RawNavFeed {
            scheme_code: scheme_code.clone(),
            meta: payload.meta.into(),
            rows,
        })
    }
}

impl NavSource for MfapiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Mfapi
    }

    fn nav_history<'a>(
        &'a self,
        scheme_code: &'a SchemeCode,
    ) -> Pin<Box<dyn Future<Output = Result<RawNavFeed, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_history(scheme_code))
    }
}

#[derive(Debug, Deserialize)]
struct MfapiHistoryResponse {
    #[serde(default)]
    meta: MfapiMeta,
    #[serde(default)]
    data: Vec<MfapiNavEntry>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MfapiMeta {
    fund_house: Option<String>,
    scheme_type: Option<String>,
    scheme_category: Option<String>,
    scheme_name: Option<String>,
}

impl From<MfapiMeta> for SchemeMeta {
    fn from(value: MfapiMeta) -> Self {
        Self {
            fund_house: value.fund_house,
            scheme_type: value.scheme_type,
            scheme_category: value.scheme_category,
            scheme_name: value.scheme_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MfapiNavEntry {
    #[serde(default)]
    date: Value,
    #[serde(default)]
    nav: Value,
}

/// Render a JSON scalar as the text the loader will parse. Missing or
/// structured values become an empty string, which the loader flags invalid.
fn field_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpError, HttpResponse, StaticHttpClient};

    const PAYLOAD: &str = r#"{
        "meta": {
            "fund_house": "Axis Mutual Fund",
            "scheme_type": "Open Ended Schemes",
            "scheme_category": "Equity Scheme - Large Cap Fund",
            "scheme_code": 120503,
            "scheme_name": "Axis Bluechip Fund - Direct Plan - Growth"
        },
        "data": [
            {"date": "03-01-2024", "nav": "55.10000"},
            {"date": "02-01-2024", "nav": 54.9},
            {"date": "01-01-2024", "nav": null}
        ],
        "status": "SUCCESS"
    }"#;

    fn code() -> SchemeCode {
        SchemeCode::parse("120503").expect("valid code")
    }

    #[tokio::test]
    async fn decodes_rows_and_meta_in_source_order() {
        let client = Arc::new(StaticHttpClient::respond(HttpResponse::ok_json(PAYLOAD)));
        let adapter = MfapiAdapter::with_http_client(client.clone())
            .with_base_url("https://mf.example.test/");

        let feed = adapter.nav_history(&code()).await.expect("feed");

        assert_eq!(client.requests()[0].url, "https://mf.example.test/mf/120503");
        assert_eq!(feed.meta.fund_house.as_deref(), Some("Axis Mutual Fund"));
        assert_eq!(
            feed.rows,
            vec![
                RawNavRow::new("03-01-2024", "55.10000"),
                RawNavRow::new("02-01-2024", "54.9"),
                RawNavRow::new("01-01-2024", ""),
            ]
        );
    }

    #[tokio::test]
    async fn empty_history_is_not_found() {
        let client = Arc::new(StaticHttpClient::respond(HttpResponse::ok_json(
            r#"{"meta": {}, "data": [], "status": "SUCCESS"}"#,
        )));
        let adapter = MfapiAdapter::with_http_client(client);

        let err = adapter.nav_history(&code()).await.expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::NotFound);
    }

    #[tokio::test]
    async fn non_success_status_is_not_found_even_with_rows() {
        let client = Arc::new(StaticHttpClient::respond(HttpResponse::ok_json(
            r#"{"meta": {}, "data": [{"date": "01-01-2024", "nav": "10.0"}], "status": "ERROR"}"#,
        )));
        let adapter = MfapiAdapter::with_http_client(client);

        let err = adapter.nav_history(&code()).await.expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::NotFound);
        assert!(!err.retryable());
        assert!(err.message().contains("ERROR"));
    }

    #[tokio::test]
    async fn transport_failure_is_retryable_unavailable() {
        let client = Arc::new(StaticHttpClient::fail(HttpError::new("connection refused")));
        let adapter = MfapiAdapter::with_http_client(client);

        let err = adapter.nav_history(&code()).await.expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::Unavailable);
        assert!(err.retryable());
        assert!(err.message().contains("connection refused"));
    }

    #[tokio::test]
    async fn malformed_body_is_internal_error() {
        let client = Arc::new(StaticHttpClient::respond(HttpResponse::ok_json("<html>")));
        let adapter = MfapiAdapter::with_http_client(client);

        let err = adapter.nav_history(&code()).await.expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::Internal);
    }

    #[tokio::test]
    async fn server_errors_map_to_unavailable() {
        let client = Arc::new(StaticHttpClient::respond(HttpResponse::with_status(503, "")));
        let adapter = MfapiAdapter::with_http_client(client);

        let err = adapter.nav_history(&code()).await.expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::Unavailable);
        assert!(err.message().contains("503"));
    }
}
