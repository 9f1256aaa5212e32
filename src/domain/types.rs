//! Request selectors and backend response shapes.
//!
//! Wire field names follow the backend (`tipoGrafico`, `qtdVendas`, `produtoTop`, ...);
//! Rust-side names are plain English and mapped with `serde(rename)`.

use chrono::{Datelike, Duration, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Number of days between the default start date and today.
pub const DEFAULT_RANGE_DAYS: i64 = 7;

/// Placeholder shown for absent names.
pub const PLACEHOLDER: &str = "-";

/// Chart kind. Selects both the backend aggregation and the rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Pie,
    Bar,
    Line,
}

impl ChartType {
    pub const ALL: [ChartType; 3] = [ChartType::Pie, ChartType::Bar, ChartType::Line];

    /// Value sent as `tipoGrafico`.
    pub fn as_param(self) -> &'static str {
        match self {
            ChartType::Pie => "pie",
            ChartType::Bar => "bar",
            ChartType::Line => "line",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ChartType::Pie => "Pie",
            ChartType::Bar => "Bar",
            ChartType::Line => "Line",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ChartType::Pie => ChartType::Bar,
            ChartType::Bar => ChartType::Line,
            ChartType::Line => ChartType::Pie,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ChartType::Pie => ChartType::Line,
            ChartType::Bar => ChartType::Pie,
            ChartType::Line => ChartType::Bar,
        }
    }
}

/// Inclusive calendar range. `start <= end` is expected but not enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `[today - DEFAULT_RANGE_DAYS, today]`.
    pub fn default_for(today: NaiveDate) -> Self {
        let start = today
            .checked_sub_signed(Duration::days(DEFAULT_RANGE_DAYS))
            .unwrap_or(today);
        Self { start, end: today }
    }

    pub fn start_iso(&self) -> String {
        to_iso(&self.start)
    }

    pub fn end_iso(&self) -> String {
        to_iso(&self.end)
    }
}

/// Format the calendar day of any date-like value as `YYYY-MM-DD`.
///
/// Only the calendar fields are read, so a time-of-day component never shifts the result.
pub fn to_iso<D: Datelike>(d: &D) -> String {
    format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day())
}

/// Parse a `YYYY-MM-DD` day.
pub fn parse_iso(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Chart payload returned when the range has data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    #[serde(rename = "type")]
    pub kind: ChartType,
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

/// Response of `GET /dashboard`.
///
/// The backend answers either with chart data or with `{ "message": ... }` when the
/// range is empty. A body carrying `message` is always the informational variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartResult {
    Data(ChartData),
    Message(String),
}

impl ChartResult {
    pub fn is_message(&self) -> bool {
        matches!(self, ChartResult::Message(_))
    }
}

#[derive(Debug, Deserialize)]
struct RawChartResponse {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<ChartType>,
    labels: Option<Vec<String>>,
    data: Option<Vec<f64>>,
}

impl TryFrom<RawChartResponse> for ChartResult {
    type Error = String;

    fn try_from(raw: RawChartResponse) -> Result<Self, Self::Error> {
        if let Some(message) = raw.message {
            return Ok(ChartResult::Message(message));
        }

        let kind = raw.kind.ok_or("chart response has neither `message` nor `type`")?;
        let labels = raw.labels.unwrap_or_default();
        let data = raw.data.unwrap_or_default();
        if labels.len() != data.len() {
            return Err(format!(
                "chart response has {} labels but {} values",
                labels.len(),
                data.len()
            ));
        }

        Ok(ChartResult::Data(ChartData { kind, labels, data }))
    }
}

impl<'de> Deserialize<'de> for ChartResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawChartResponse::deserialize(deserializer)?;
        ChartResult::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// A named top entry (product or category).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopEntry {
    #[serde(rename = "nome", default = "placeholder_name")]
    #[serde(deserialize_with = "name_or_placeholder")]
    pub name: String,
    #[serde(rename = "valor", default, deserialize_with = "null_as_default")]
    pub value: f64,
}

/// Period echoed back by the summary endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    #[serde(rename = "inicio", default = "placeholder_name")]
    #[serde(deserialize_with = "name_or_placeholder")]
    pub start: String,
    #[serde(rename = "fim", default = "placeholder_name")]
    #[serde(deserialize_with = "name_or_placeholder")]
    pub end: String,
}

impl Default for Period {
    fn default() -> Self {
        Self {
            start: placeholder_name(),
            end: placeholder_name(),
        }
    }
}

/// Response of `GET /dashboard/resumo`.
///
/// Aggregates over an empty range come back as `null`; absent or `null` numbers read
/// as zero and absent or `null` names as [`PLACEHOLDER`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: f64,
    #[serde(rename = "media", default, deserialize_with = "null_as_default")]
    pub average: f64,
    #[serde(rename = "maximo", default, deserialize_with = "null_as_default")]
    pub max: f64,
    #[serde(rename = "minimo", default, deserialize_with = "null_as_default")]
    pub min: f64,
    #[serde(rename = "qtdVendas", default, deserialize_with = "count_from_number")]
    pub sales_count: u64,
    #[serde(rename = "ticketMedio", default, deserialize_with = "null_as_default")]
    pub average_ticket: f64,
    #[serde(rename = "produtoTop", default)]
    pub top_product: Option<TopEntry>,
    #[serde(rename = "categoriaTop", default)]
    pub top_category: Option<TopEntry>,
    #[serde(rename = "periodo", default, deserialize_with = "null_as_default")]
    pub period: Period,
}

fn placeholder_name() -> String {
    PLACEHOLDER.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn name_or_placeholder<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|name| name.unwrap_or_else(placeholder_name))
}

/// Sales count sent as any JSON number (`3`, `3.0`, `null`). Negative or non-finite
/// values read as zero.
fn count_from_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let count = Option::<f64>::deserialize(deserializer)?.unwrap_or_default();
    if count.is_finite() && count > 0.0 {
        Ok(count.round() as u64)
    } else {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveTime, TimeZone};

    #[test]
    fn to_iso_ignores_time_of_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(to_iso(&day), "2024-03-05");

        let late = day.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap());
        assert_eq!(to_iso(&late), "2024-03-05");

        let local = Local
            .from_local_datetime(&day.and_hms_opt(0, 0, 1).unwrap())
            .earliest()
            .unwrap();
        assert_eq!(to_iso(&local), "2024-03-05");
    }

    #[test]
    fn default_range_spans_a_week() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let range = DateRange::default_for(today);
        assert_eq!(range.end, today);
        assert_eq!(range.start_iso(), "2024-02-27");
    }

    #[test]
    fn chart_type_cycles_both_ways() {
        for t in ChartType::ALL {
            assert_eq!(t.next().prev(), t);
        }
        assert_eq!(ChartType::Line.next(), ChartType::Pie);
    }

    #[test]
    fn chart_result_decodes_data_variant() {
        let body = r#"{"type":"bar","labels":["A","B"],"data":[10,20.5]}"#;
        let parsed: ChartResult = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed,
            ChartResult::Data(ChartData {
                kind: ChartType::Bar,
                labels: vec!["A".into(), "B".into()],
                data: vec![10.0, 20.5],
            })
        );
    }

    #[test]
    fn message_field_wins_over_data_fields() {
        let body = r#"{"message":"no data","type":"pie","labels":[],"data":[]}"#;
        let parsed: ChartResult = serde_json::from_str(body).unwrap();
        assert_eq!(parsed, ChartResult::Message("no data".into()));
        assert!(parsed.is_message());
    }

    #[test]
    fn misaligned_labels_are_rejected() {
        let body = r#"{"type":"line","labels":["A"],"data":[1,2]}"#;
        let err = serde_json::from_str::<ChartResult>(body).unwrap_err();
        assert!(err.to_string().contains("1 labels but 2 values"));
    }

    #[test]
    fn summary_defaults_missing_fields() {
        let body = r#"{
            "total": 150.5, "qtdVendas": 3,
            "produtoTop": null, "categoriaTop": {"nome": "Drinks"}
        }"#;
        let m: SummaryMetrics = serde_json::from_str(body).unwrap();
        assert_eq!(m.total, 150.5);
        assert_eq!(m.sales_count, 3);
        assert_eq!(m.average, 0.0);
        assert!(m.top_product.is_none());
        let cat = m.top_category.unwrap();
        assert_eq!(cat.name, "Drinks");
        assert_eq!(cat.value, 0.0);
        assert_eq!(m.period.start, PLACEHOLDER);
    }

    #[test]
    fn summary_reads_null_aggregates_as_zero() {
        let body = r#"{
            "total": null, "media": null, "maximo": null, "minimo": null,
            "qtdVendas": null, "ticketMedio": null,
            "produtoTop": null, "categoriaTop": null, "periodo": null
        }"#;
        let m: SummaryMetrics = serde_json::from_str(body).unwrap();
        assert_eq!(m, SummaryMetrics::default());
        assert_eq!(m.period.start, PLACEHOLDER);
    }

    #[test]
    fn null_names_fall_back_to_placeholder() {
        let body = r#"{
            "produtoTop": {"nome": null, "valor": null},
            "periodo": {"inicio": "2024-03-01", "fim": null}
        }"#;
        let m: SummaryMetrics = serde_json::from_str(body).unwrap();
        let top = m.top_product.unwrap();
        assert_eq!(top.name, PLACEHOLDER);
        assert_eq!(top.value, 0.0);
        assert_eq!(m.period.start, "2024-03-01");
        assert_eq!(m.period.end, PLACEHOLDER);
    }

    #[test]
    fn sales_count_accepts_float_encoding() {
        let m: SummaryMetrics = serde_json::from_str(r#"{"total":10,"qtdVendas":3.0}"#).unwrap();
        assert_eq!(m.total, 10.0);
        assert_eq!(m.sales_count, 3);

        let m: SummaryMetrics = serde_json::from_str(r#"{"qtdVendas":-2}"#).unwrap();
        assert_eq!(m.sales_count, 0);
    }

    #[test]
    fn summary_decodes_full_body() {
        let body = r#"{
            "total": 1000, "media": 250, "maximo": 400, "minimo": 100,
            "qtdVendas": 4, "ticketMedio": 250,
            "produtoTop": {"nome": "Coffee", "valor": 400},
            "categoriaTop": {"nome": "Beverages", "valor": 600},
            "periodo": {"inicio": "2024-03-01", "fim": "2024-03-07"}
        }"#;
        let m: SummaryMetrics = serde_json::from_str(body).unwrap();
        assert_eq!(m.max, 400.0);
        assert_eq!(m.average_ticket, 250.0);
        assert_eq!(m.top_product.unwrap().name, "Coffee");
        assert_eq!(m.period.end, "2024-03-07");
    }
}
