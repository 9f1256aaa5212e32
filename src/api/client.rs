//! HTTP implementation of the dashboard reads.

use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::api::{DashboardApi, FetchError};
use crate::config::DashboardConfig;
use crate::domain::{ChartResult, ChartType, DateRange, SummaryMetrics};

const CHART_PATH: &str = "/dashboard";
const SUMMARY_PATH: &str = "/dashboard/resumo";

pub struct DashboardClient {
    client: Client,
    base_url: String,
}

impl DashboardClient {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_url.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, ?query, "dashboard request");

        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        read_body(resp)
    }
}

impl DashboardApi for DashboardClient {
    fn fetch_chart(
        &self,
        chart_type: ChartType,
        range: &DateRange,
    ) -> Result<ChartResult, FetchError> {
        self.get(CHART_PATH, &chart_query(chart_type, range))
    }

    fn fetch_summary(&self, range: &DateRange) -> Result<SummaryMetrics, FetchError> {
        self.get(SUMMARY_PATH, &summary_query(range))
    }
}

fn chart_query(chart_type: ChartType, range: &DateRange) -> Vec<(&'static str, String)> {
    vec![
        ("tipoGrafico", chart_type.as_param().to_string()),
        ("dataInicio", range.start_iso()),
        ("dataFim", range.end_iso()),
    ]
}

fn summary_query(range: &DateRange) -> Vec<(&'static str, String)> {
    vec![("dataInicio", range.start_iso()), ("dataFim", range.end_iso())]
}

fn read_body<T: DeserializeOwned>(resp: Response) -> Result<T, FetchError> {
    let status = resp.status();
    let body = resp
        .text()
        .map_err(|e| FetchError::Transport(format!("failed to read response body: {e}")))?;

    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "dashboard request failed");
        return Err(FetchError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    decode_body(&body)
}

fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Extract `{"message": "..."}` from an error body, if present.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
        )
    }

    #[test]
    fn chart_query_uses_backend_names() {
        let q = chart_query(ChartType::Line, &range());
        assert_eq!(
            q,
            vec![
                ("tipoGrafico", "line".to_string()),
                ("dataInicio", "2024-03-01".to_string()),
                ("dataFim", "2024-03-07".to_string()),
            ]
        );
    }

    #[test]
    fn summary_query_has_only_dates() {
        let q = summary_query(&range());
        assert_eq!(q.len(), 2);
        assert_eq!(q[1], ("dataFim", "2024-03-07".to_string()));
    }

    #[test]
    fn error_message_reads_server_reason() {
        assert_eq!(
            error_message(r#"{"message":"Período inválido"}"#),
            Some("Período inválido".to_string())
        );
        assert_eq!(error_message(r#"{"error":"x"}"#), None);
        assert_eq!(error_message("<html>502</html>"), None);
        assert_eq!(error_message(r#"{"message":""}"#), None);
    }

    #[test]
    fn decode_body_maps_to_decode_error() {
        let err = decode_body::<SummaryMetrics>("not json").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));

        let chart: ChartResult = decode_body(r#"{"message":"no data"}"#).unwrap();
        assert_eq!(chart, ChartResult::Message("no data".into()));
    }

    #[test]
    fn client_keeps_normalized_base_url() {
        let cfg = DashboardConfig::with_api_url("http://localhost:3000/api/").unwrap();
        let client = DashboardClient::new(&cfg);
        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }
}
