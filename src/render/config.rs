//! Renderer-neutral chart configuration.
//!
//! The shape follows a Chart.js v3+ configuration (`options.plugins.legend`,
//! `options.plugins.tooltip`, camelCase dataset keys) and is exported as JSON, while
//! the TUI draws the same structure with Plotters.
//!
//! Solid paints serialize as `rgba(...)` strings. Chart.js builds gradients from a
//! canvas context, so a [`VerticalGradient`] serializes as a `{"top", "bottom"}`
//! stop pair that a loader turns into a `createLinearGradient` over the chart area.

use serde::Serialize;

use crate::domain::ChartType;
use crate::render::palette::{Rgb, Rgba};

pub const PIE_OPACITY: f64 = 0.9;
pub const BAR_TOP_OPACITY: f64 = 0.95;
pub const BAR_BOTTOM_OPACITY: f64 = 0.25;
pub const BAR_BORDER_WIDTH: f64 = 1.5;
pub const LINE_BORDER_WIDTH: f64 = 2.5;
pub const LINE_FILL_TOP_OPACITY: f64 = 0.35;
pub const LINE_FILL_BOTTOM_OPACITY: f64 = 0.02;
pub const LINE_POINT_RADIUS: f64 = 4.0;
pub const LINE_POINT_HOVER_RADIUS: f64 = 6.0;
pub const LINE_TENSION: f64 = 0.35;

const DATASET_LABEL: &str = "Sales";
const LEGEND_TEXT: Rgb = Rgb::new(0xE5, 0xE7, 0xEB);
const TICK_COLOR: Rgb = Rgb::new(0x9C, 0xA3, 0xAF);
const GRID_COLOR: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
const GRID_OPACITY: f64 = 0.06;
const TOOLTIP_BG: Rgb = Rgb::new(0x11, 0x18, 0x27);

/// Background paint for one data element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Paint {
    Solid(Rgba),
    Vertical(VerticalGradient),
}

impl Paint {
    /// Color at the top of the element (the gradient's first stop for gradients).
    pub fn top(&self) -> Rgba {
        match self {
            Paint::Solid(c) => *c,
            Paint::Vertical(g) => g.top,
        }
    }

    pub fn bottom(&self) -> Rgba {
        match self {
            Paint::Solid(c) => *c,
            Paint::Vertical(g) => g.bottom,
        }
    }
}

/// Two-stop gradient running from the top of the chart area to its bottom.
///
/// Serialized as `{"top": "rgba(...)", "bottom": "rgba(...)"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerticalGradient {
    pub top: Rgba,
    pub bottom: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: Vec<Paint>,
    pub border_color: Vec<Rgba>,
    pub border_width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_hover_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_background_color: Option<Rgba>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub display: bool,
    pub label_color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub background_color: Rgba,
    pub title_color: Rgba,
    pub body_color: Rgba,
    pub padding: f64,
    pub corner_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plugins {
    pub legend: Legend,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub grid_color: Rgba,
    pub tick_color: Rgba,
    pub begin_at_zero: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub plugins: Plugins,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scales: Option<Scales>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartType,
    pub data: ChartData,
    pub options: ChartOptions,
}

impl ChartConfig {
    pub fn labels(&self) -> &[String] {
        &self.data.labels
    }

    /// The single dataset every chart carries.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.data.datasets.first()
    }
}

/// Build a full configuration for `kind` over index-aligned `labels`/`values`.
///
/// `colors` is the per-label assignment for pie and bar. A line takes the first
/// entry, so callers pass it the palette itself.
pub fn build_config(
    kind: ChartType,
    labels: &[String],
    values: &[f64],
    colors: &[Rgb],
) -> ChartConfig {
    let mut dataset = Dataset {
        label: DATASET_LABEL.to_string(),
        data: values.to_vec(),
        background_color: Vec::new(),
        border_color: Vec::new(),
        border_width: 0.0,
        fill: None,
        tension: None,
        point_radius: None,
        point_hover_radius: None,
        point_background_color: None,
    };
    style_dataset(&mut dataset, kind, colors);

    ChartConfig {
        kind,
        data: ChartData {
            labels: labels.to_vec(),
            datasets: vec![dataset],
        },
        options: options_for(kind),
    }
}

/// (Re)apply the per-type styling rules to a dataset.
pub fn style_dataset(dataset: &mut Dataset, kind: ChartType, colors: &[Rgb]) {
    dataset.fill = None;
    dataset.tension = None;
    dataset.point_radius = None;
    dataset.point_hover_radius = None;
    dataset.point_background_color = None;

    match kind {
        ChartType::Pie => {
            dataset.background_color = colors
                .iter()
                .map(|c| Paint::Solid(c.with_alpha(PIE_OPACITY)))
                .collect();
            dataset.border_color = Vec::new();
            dataset.border_width = 0.0;
        }
        ChartType::Bar => {
            dataset.background_color = colors
                .iter()
                .map(|c| {
                    Paint::Vertical(VerticalGradient {
                        top: c.with_alpha(BAR_TOP_OPACITY),
                        bottom: c.with_alpha(BAR_BOTTOM_OPACITY),
                    })
                })
                .collect();
            dataset.border_color = colors.iter().map(|c| c.with_alpha(1.0)).collect();
            dataset.border_width = BAR_BORDER_WIDTH;
        }
        ChartType::Line => {
            let Some(&base) = colors.first() else {
                dataset.background_color = Vec::new();
                dataset.border_color = Vec::new();
                dataset.border_width = 0.0;
                return;
            };
            dataset.background_color = vec![Paint::Vertical(VerticalGradient {
                top: base.with_alpha(LINE_FILL_TOP_OPACITY),
                bottom: base.with_alpha(LINE_FILL_BOTTOM_OPACITY),
            })];
            dataset.border_color = vec![base.with_alpha(1.0)];
            dataset.border_width = LINE_BORDER_WIDTH;
            dataset.fill = Some(true);
            dataset.tension = Some(LINE_TENSION);
            dataset.point_radius = Some(LINE_POINT_RADIUS);
            dataset.point_hover_radius = Some(LINE_POINT_HOVER_RADIUS);
            dataset.point_background_color = Some(base.with_alpha(1.0));
        }
    }
}

fn options_for(kind: ChartType) -> ChartOptions {
    let scales = match kind {
        ChartType::Pie => None,
        ChartType::Bar | ChartType::Line => Some(Scales {
            x: axis(),
            y: Axis {
                begin_at_zero: true,
                ..axis()
            },
        }),
    };

    ChartOptions {
        responsive: true,
        maintain_aspect_ratio: false,
        plugins: Plugins {
            legend: Legend {
                // A single line series has nothing to tell apart.
                display: kind != ChartType::Line,
                label_color: LEGEND_TEXT.with_alpha(1.0),
            },
            tooltip: Tooltip {
                background_color: TOOLTIP_BG.with_alpha(0.9),
                title_color: LEGEND_TEXT.with_alpha(1.0),
                body_color: LEGEND_TEXT.with_alpha(1.0),
                padding: 10.0,
                corner_radius: 6.0,
            },
        },
        scales,
    }
}

fn axis() -> Axis {
    Axis {
        grid_color: GRID_COLOR.with_alpha(GRID_OPACITY),
        tick_color: TICK_COLOR.with_alpha(1.0),
        begin_at_zero: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::palette::{PALETTE, assign_colors};

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("L{i}")).collect()
    }

    #[test]
    fn bar_gradients_follow_palette_order() {
        let colors = assign_colors(&PALETTE, 2);
        let cfg = build_config(ChartType::Bar, &labels(2), &[10.0, 20.0], &colors);
        let ds = cfg.dataset().unwrap();
        assert_eq!(ds.background_color.len(), 2);
        for (i, paint) in ds.background_color.iter().enumerate() {
            assert_eq!(paint.top(), PALETTE[i].with_alpha(0.95));
            assert_eq!(paint.bottom(), PALETTE[i].with_alpha(0.25));
            assert_eq!(ds.border_color[i], PALETTE[i].with_alpha(1.0));
        }
        assert_eq!(ds.border_width, 1.5);
        assert!(cfg.options.plugins.legend.display);
        assert!(cfg.options.scales.is_some());
    }

    #[test]
    fn pie_has_no_border_and_no_axes() {
        let colors = assign_colors(&PALETTE, 3);
        let cfg = build_config(ChartType::Pie, &labels(3), &[1.0, 2.0, 3.0], &colors);
        let ds = cfg.dataset().unwrap();
        assert_eq!(ds.background_color[2], Paint::Solid(PALETTE[2].with_alpha(0.9)));
        assert!(ds.border_color.is_empty());
        assert_eq!(ds.border_width, 0.0);
        assert!(cfg.options.scales.is_none());
        assert!(cfg.options.plugins.legend.display);
    }

    #[test]
    fn line_uses_first_color_only() {
        let colors = assign_colors(&PALETTE, 4);
        let cfg = build_config(ChartType::Line, &labels(4), &[1.0, 3.0, 2.0, 5.0], &colors);
        let ds = cfg.dataset().unwrap();
        assert_eq!(ds.border_color, vec![PALETTE[0].with_alpha(1.0)]);
        assert_eq!(ds.background_color.len(), 1);
        assert_eq!(ds.background_color[0].top(), PALETTE[0].with_alpha(0.35));
        assert_eq!(ds.background_color[0].bottom(), PALETTE[0].with_alpha(0.02));
        assert_eq!(ds.border_width, 2.5);
        assert_eq!(ds.tension, Some(0.35));
        assert_eq!(ds.point_radius, Some(4.0));
        assert_eq!(ds.point_hover_radius, Some(6.0));
        assert!(!cfg.options.plugins.legend.display);
    }

    #[test]
    fn empty_line_still_uses_first_palette_color() {
        let cfg = build_config(ChartType::Line, &[], &[], &PALETTE);
        let ds = cfg.dataset().unwrap();
        assert_eq!(ds.border_color, vec![PALETTE[0].with_alpha(1.0)]);
        assert_eq!(ds.border_width, 2.5);
        assert_eq!(ds.fill, Some(true));
    }

    #[test]
    fn line_without_colors_drops_stale_styling() {
        let mut cfg = build_config(ChartType::Line, &labels(2), &[1.0, 2.0], &PALETTE);
        let ds = &mut cfg.data.datasets[0];
        style_dataset(ds, ChartType::Line, &[]);
        assert!(ds.border_color.is_empty());
        assert_eq!(ds.border_width, 0.0);
        assert_eq!(ds.fill, None);
        assert_eq!(ds.tension, None);
        assert_eq!(ds.point_background_color, None);
    }

    #[test]
    fn restyling_replaces_previous_colors() {
        let colors = assign_colors(&PALETTE, 2);
        let mut cfg = build_config(ChartType::Bar, &labels(2), &[1.0, 2.0], &colors);
        let reversed = vec![PALETTE[1], PALETTE[0]];
        let ds = &mut cfg.data.datasets[0];
        style_dataset(ds, ChartType::Bar, &reversed);
        assert_eq!(ds.background_color[0].top(), PALETTE[1].with_alpha(0.95));
        assert_eq!(ds.data, vec![1.0, 2.0]);
    }

    #[test]
    fn serializes_chart_js_shape() {
        let cfg = build_config(ChartType::Bar, &labels(1), &[5.0], &[Rgb::new(255, 255, 255)]);
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["type"], "bar");
        assert_eq!(json["data"]["labels"][0], "L0");
        let ds = &json["data"]["datasets"][0];
        assert_eq!(ds["borderColor"][0], "rgba(255,255,255,1)");
        assert_eq!(ds["backgroundColor"][0]["top"], "rgba(255,255,255,0.95)");
        assert_eq!(ds["borderWidth"], 1.5);
        assert!(ds.get("tension").is_none());
        assert_eq!(json["options"]["maintainAspectRatio"], false);
        let plugins = &json["options"]["plugins"];
        assert_eq!(plugins["legend"]["display"], true);
        assert_eq!(plugins["legend"]["labelColor"], "rgba(229,231,235,1)");
        assert_eq!(plugins["tooltip"]["backgroundColor"], "rgba(17,24,39,0.9)");
        assert_eq!(plugins["tooltip"]["cornerRadius"], 6.0);
        assert!(json["options"].get("legend").is_none());
    }
}
