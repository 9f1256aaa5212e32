//! Plain-text output for `dash fetch`.

use crate::api::DashboardQuery;
use crate::domain::KpiState;
use crate::render::ChartConfig;

/// Money-like values: two decimals with thousands separators.
pub fn fmt_amount(v: f64) -> String {
    let negative = v < 0.0;
    let fixed = format!("{:.2}", v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}.{frac_part}")
    } else {
        format!("{grouped}.{frac_part}")
    }
}

pub fn format_header(query: &DashboardQuery) -> String {
    format!(
        "=== dash - Sales Dashboard ===\nChart: {} | Range: {} → {}\n",
        query.chart_type.display_name(),
        query.range.start_iso(),
        query.range.end_iso(),
    )
}

/// The KPI cards as aligned `label: value` lines.
pub fn format_kpis(k: &KpiState) -> String {
    let rows = [
        ("Total", fmt_amount(k.total)),
        ("Average", fmt_amount(k.average)),
        ("Max", fmt_amount(k.max)),
        ("Min", fmt_amount(k.min)),
        ("Sales", k.sales_count.to_string()),
        ("Avg ticket", fmt_amount(k.average_ticket)),
        (
            "Top product",
            format!(
                "{} ({}, {:.1}%)",
                k.top_product,
                fmt_amount(k.top_product_value),
                k.top_product_share
            ),
        ),
        (
            "Top category",
            format!("{} ({})", k.top_category, fmt_amount(k.top_category_value)),
        ),
        ("Period", k.period.clone()),
    ];

    let mut out = String::from("KPIs:\n");
    for (label, value) in rows {
        out.push_str(&format!("  {label:<13} {value}\n"));
    }
    out
}

/// One row per label with its value and assigned color.
pub fn format_chart_table(chart: &ChartConfig) -> String {
    let mut out = format!("Chart ({}):\n", chart.kind.display_name());
    let Some(ds) = chart.dataset() else {
        out.push_str("  (empty)\n");
        return out;
    };

    let width = chart
        .labels()
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(5);

    out.push_str(&format!("  {:<width$}  {:>14}  color\n", "label", "value"));
    for (i, (label, value)) in chart.labels().iter().zip(&ds.data).enumerate() {
        let color = ds
            .border_color
            .get(i)
            .or(ds.border_color.first())
            .map(|c| c.rgb())
            .or_else(|| ds.background_color.get(i).map(|p| p.top().rgb()))
            .map(|c| c.hex())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("  {label:<width$}  {:>14}  {color}\n", fmt_amount(*value)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChartType;
    use crate::render::{PALETTE, assign_colors, build_config};

    #[test]
    fn amounts_are_grouped() {
        assert_eq!(fmt_amount(0.0), "0.00");
        assert_eq!(fmt_amount(999.5), "999.50");
        assert_eq!(fmt_amount(1234567.891), "1,234,567.89");
        assert_eq!(fmt_amount(-1500.0), "-1,500.00");
    }

    #[test]
    fn kpis_render_placeholders_after_reset() {
        let text = format_kpis(&KpiState::default());
        assert!(text.contains("Total         0.00"));
        assert!(text.contains("Top product   - (0.00, 0.0%)"));
    }

    #[test]
    fn chart_table_lists_colors() {
        let labels = vec!["Coffee".to_string(), "Tea".to_string()];
        let colors = assign_colors(&PALETTE, 2);
        let cfg = build_config(ChartType::Pie, &labels, &[1200.0, 30.0], &colors);
        let text = format_chart_table(&cfg);
        assert!(text.starts_with("Chart (Pie):"));
        assert!(text.contains("Coffee"));
        assert!(text.contains("1,200.00"));
        assert!(text.contains(&PALETTE[1].hex()));
    }
}
