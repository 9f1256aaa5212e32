//! KPI card state derived from `SummaryMetrics`.

use crate::domain::types::{PLACEHOLDER, SummaryMetrics, TopEntry};

/// Display state for the KPI cards.
///
/// `Default` is the reset state: zeros and placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiState {
    pub total: f64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub sales_count: u64,
    pub average_ticket: f64,
    pub top_product: String,
    pub top_product_value: f64,
    pub top_category: String,
    pub top_category_value: f64,
    /// Share of the top product in `total`, in percent.
    pub top_product_share: f64,
    pub period: String,
}

impl Default for KpiState {
    fn default() -> Self {
        Self {
            total: 0.0,
            average: 0.0,
            max: 0.0,
            min: 0.0,
            sales_count: 0,
            average_ticket: 0.0,
            top_product: PLACEHOLDER.to_string(),
            top_product_value: 0.0,
            top_category: PLACEHOLDER.to_string(),
            top_category_value: 0.0,
            top_product_share: 0.0,
            period: PLACEHOLDER.to_string(),
        }
    }
}

impl KpiState {
    pub fn from_metrics(m: &SummaryMetrics) -> Self {
        let (top_product, top_product_value) = split_top(m.top_product.as_ref());
        let (top_category, top_category_value) = split_top(m.top_category.as_ref());

        let top_product_share = if m.total.abs() > f64::EPSILON {
            top_product_value / m.total * 100.0
        } else {
            0.0
        };

        let period = if m.period.start == PLACEHOLDER && m.period.end == PLACEHOLDER {
            PLACEHOLDER.to_string()
        } else {
            format!("{} → {}", m.period.start, m.period.end)
        };

        Self {
            total: finite_or_zero(m.total),
            average: finite_or_zero(m.average),
            max: finite_or_zero(m.max),
            min: finite_or_zero(m.min),
            sales_count: m.sales_count,
            average_ticket: finite_or_zero(m.average_ticket),
            top_product,
            top_product_value,
            top_category,
            top_category_value,
            top_product_share: finite_or_zero(top_product_share),
            period,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_reset(&self) -> bool {
        *self == Self::default()
    }
}

fn split_top(entry: Option<&TopEntry>) -> (String, f64) {
    match entry {
        Some(e) if !e.name.trim().is_empty() => (e.name.clone(), finite_or_zero(e.value)),
        Some(e) => (PLACEHOLDER.to_string(), finite_or_zero(e.value)),
        None => (PLACEHOLDER.to_string(), 0.0),
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}
