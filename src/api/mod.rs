//! Query client: the two dashboard reads and their combined fetch.
//!
//! The controller only depends on the `DashboardApi` capability; `DashboardClient`
//! is the HTTP implementation.

use crate::domain::{ChartResult, ChartType, DateRange, SummaryMetrics};
use crate::error::AppError;

pub mod client;

pub use client::DashboardClient;

/// Why a single read failed.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The request never produced a response.
    Transport(String),
    /// Non-success HTTP status, with the server's `message` when the body carried one.
    Status { status: u16, message: Option<String> },
    /// The body did not match the expected shape.
    Decode(String),
}

impl FetchError {
    /// Reason supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            FetchError::Status {
                message: Some(m), ..
            } if !m.trim().is_empty() => Some(m.as_str()),
            _ => None,
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Transport(e) => write!(f, "request failed: {e}"),
            FetchError::Status {
                status,
                message: Some(m),
            } => write!(f, "server returned {status}: {m}"),
            FetchError::Status {
                status,
                message: None,
            } => write!(f, "server returned {status}"),
            FetchError::Decode(e) => write!(f, "failed to parse response: {e}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::new(4, format!("Dashboard fetch failed: {err}"))
    }
}

/// One submission's request selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardQuery {
    pub chart_type: ChartType,
    pub range: DateRange,
}

/// Both reads of a submission, joined.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub chart: ChartResult,
    pub summary: SummaryMetrics,
}

/// The two reads the dashboard needs.
///
/// `Sync` so both reads can run in parallel against one client.
pub trait DashboardApi: Sync {
    fn fetch_chart(
        &self,
        chart_type: ChartType,
        range: &DateRange,
    ) -> Result<ChartResult, FetchError>;

    fn fetch_summary(&self, range: &DateRange) -> Result<SummaryMetrics, FetchError>;
}

/// Run both reads in parallel and join them.
///
/// All-or-nothing: if either read fails the whole fetch fails. When both fail the
/// chart error is reported.
pub fn fetch_all<A>(api: &A, query: &DashboardQuery) -> Result<DashboardSnapshot, FetchError>
where
    A: DashboardApi + ?Sized,
{
    let (chart, summary) = rayon::join(
        || api.fetch_chart(query.chart_type, &query.range),
        || api.fetch_summary(&query.range),
    );

    Ok(DashboardSnapshot {
        chart: chart?,
        summary: summary?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct Canned {
        chart: Result<ChartResult, FetchError>,
        summary: Result<SummaryMetrics, FetchError>,
    }

    impl DashboardApi for Canned {
        fn fetch_chart(&self, _: ChartType, _: &DateRange) -> Result<ChartResult, FetchError> {
            self.chart.clone()
        }

        fn fetch_summary(&self, _: &DateRange) -> Result<SummaryMetrics, FetchError> {
            self.summary.clone()
        }
    }

    fn query() -> DashboardQuery {
        let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        DashboardQuery {
            chart_type: ChartType::Pie,
            range: DateRange::default_for(d),
        }
    }

    #[test]
    fn joins_both_reads() {
        let api = Canned {
            chart: Ok(ChartResult::Message("no data".into())),
            summary: Ok(SummaryMetrics::default()),
        };
        let snap = fetch_all(&api, &query()).unwrap();
        assert!(snap.chart.is_message());
    }

    #[test]
    fn either_failure_fails_the_whole_fetch() {
        let api = Canned {
            chart: Ok(ChartResult::Message("no data".into())),
            summary: Err(FetchError::Transport("connection refused".into())),
        };
        assert_eq!(
            fetch_all(&api, &query()).unwrap_err(),
            FetchError::Transport("connection refused".into())
        );
    }

    #[test]
    fn chart_error_is_reported_first() {
        let api = Canned {
            chart: Err(FetchError::Decode("bad chart".into())),
            summary: Err(FetchError::Transport("down".into())),
        };
        assert_eq!(
            fetch_all(&api, &query()).unwrap_err(),
            FetchError::Decode("bad chart".into())
        );
    }

    #[test]
    fn server_message_only_for_status_errors() {
        let with = FetchError::Status {
            status: 400,
            message: Some("Invalid range".into()),
        };
        assert_eq!(with.server_message(), Some("Invalid range"));

        let blank = FetchError::Status {
            status: 500,
            message: Some("  ".into()),
        };
        assert_eq!(blank.server_message(), None);
        assert_eq!(FetchError::Transport("x".into()).server_message(), None);
    }
}
