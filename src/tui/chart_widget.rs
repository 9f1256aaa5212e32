//! Plotters-powered dashboard chart widget for Ratatui.
//!
//! Draws a `ChartConfig` (pie, bar or line) into the Ratatui buffer through
//! `plotters-ratatui-backend`. Terminals have no alpha channel, so every RGBA
//! paint is composited over `BACKGROUND` first.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::ChartType;
use crate::render::{ChartConfig, Dataset, Paint, Rgb, Rgba};

/// Assumed terminal background for alpha compositing.
pub const BACKGROUND: Rgb = Rgb::new(0, 0, 0);

/// Horizontal bands used to approximate a vertical gradient.
const GRADIENT_BANDS: usize = 12;

/// Samples per segment of the smoothed line.
const CURVE_SAMPLES: usize = 12;

/// Arc steps per full turn for pie wedges.
const PIE_STEPS: usize = 180;

pub struct DashboardChart<'a> {
    pub config: &'a ChartConfig,
}

impl<'a> Widget for DashboardChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let Some(dataset) = self.config.dataset() else {
            return;
        };
        if dataset.data.is_empty() {
            buf.set_string(area.x, area.y, "Empty chart.", Style::default().fg(Color::Yellow));
            return;
        }

        let config = self.config;
        let widget = widget_fn(move |root| {
            match config.kind {
                ChartType::Pie => draw_pie(&root, dataset)?,
                ChartType::Bar => draw_bar(&root, config, dataset)?,
                ChartType::Line => draw_line(&root, config, dataset)?,
            }
            Ok(())
        });

        widget.render(area, buf);
    }
}

fn to_plotters(c: Rgba) -> RGBColor {
    let rgb = c.over(BACKGROUND);
    RGBColor(rgb.r, rgb.g, rgb.b)
}

/// Opacity of a vertical gradient at relative height `t` (0 = bottom, 1 = top).
fn gradient_at(paint: &Paint, t: f64) -> Rgba {
    let top = paint.top();
    let bottom = paint.bottom();
    let t = t.clamp(0.0, 1.0);
    Rgba {
        a: bottom.a + (top.a - bottom.a) * t,
        ..top
    }
}

/// Upper y bound with headroom; never below 1 so flat/zero data still draws.
fn y_upper(values: &[f64]) -> f64 {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    if max <= 0.0 { 1.0 } else { max * 1.1 }
}

fn axis_styles(config: &ChartConfig) -> (RGBColor, RGBColor) {
    match &config.options.scales {
        Some(scales) => (to_plotters(scales.y.grid_color), to_plotters(scales.y.tick_color)),
        None => (RGBColor(40, 40, 40), RGBColor(160, 160, 160)),
    }
}

fn draw_bar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    config: &ChartConfig,
    dataset: &Dataset,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let labels = config.labels();
    let n = dataset.data.len();
    let y_max = y_upper(&dataset.data);
    let (grid, ticks) = axis_styles(config);

    let mut chart = ChartBuilder::on(root)
        .margin(1)
        .set_label_area_size(LabelAreaPosition::Left, 6)
        .set_label_area_size(LabelAreaPosition::Bottom, 3)
        .build_cartesian_2d(0.0..n as f64, 0.0..y_max)?;

    let label_at = |v: &f64| {
        let idx = v.floor();
        if idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n.min(12))
        .y_labels(5)
        .x_label_formatter(&label_at)
        .y_label_formatter(&|v| format!("{v:.0}"))
        .label_style(("sans-serif", 10).into_font().color(&ticks))
        .axis_style(&ticks)
        .light_line_style(&grid)
        .bold_line_style(&grid)
        .draw()?;

    for (i, &value) in dataset.data.iter().enumerate() {
        if !value.is_finite() || value <= 0.0 {
            continue;
        }
        let x0 = i as f64 + 0.15;
        let x1 = i as f64 + 0.85;

        // Chart.js anchors bar gradients to the chart area, not to each bar.
        if let Some(paint) = dataset.background_color.get(i) {
            let band = y_max / GRADIENT_BANDS as f64;
            let mut y = 0.0;
            while y < value {
                let top = (y + band).min(value);
                let color = to_plotters(gradient_at(paint, (y + top) / 2.0 / y_max));
                let band = Rectangle::new([(x0, y), (x1, top)], color.filled());
                chart.draw_series(std::iter::once(band))?;
                y = top;
            }
        }

        if dataset.border_width > 0.0 {
            if let Some(&border) = dataset.border_color.get(i) {
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x0, 0.0), (x1, value)],
                    to_plotters(border).stroke_width(1),
                )))?;
            }
        }
    }

    Ok(())
}

fn draw_line<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    config: &ChartConfig,
    dataset: &Dataset,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let labels = config.labels();
    let n = dataset.data.len();
    let y_max = y_upper(&dataset.data);
    let (grid, ticks) = axis_styles(config);
    let (x_lo, x_hi) = if n > 1 { (0.0, (n - 1) as f64) } else { (-0.5, 0.5) };

    let mut chart = ChartBuilder::on(root)
        .margin(1)
        .set_label_area_size(LabelAreaPosition::Left, 6)
        .set_label_area_size(LabelAreaPosition::Bottom, 3)
        .build_cartesian_2d(x_lo..x_hi, 0.0..y_max)?;

    let label_at = |v: &f64| {
        let idx = v.round();
        if idx < 0.0 || (v - idx).abs() > 0.2 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    };

    chart
        .configure_mesh()
        .x_labels(n.min(12))
        .y_labels(5)
        .x_label_formatter(&label_at)
        .y_label_formatter(&|v| format!("{v:.0}"))
        .label_style(("sans-serif", 10).into_font().color(&ticks))
        .axis_style(&ticks)
        .light_line_style(&grid)
        .bold_line_style(&grid)
        .draw()?;

    let points: Vec<(f64, f64)> = dataset
        .data
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, if v.is_finite() { v.max(0.0) } else { 0.0 }))
        .collect();
    let curve = smooth_curve(&points, dataset.tension.unwrap_or(0.0));

    if let Some(fill) = dataset.background_color.first() {
        for band in 0..GRADIENT_BANDS {
            let lo = y_max * band as f64 / GRADIENT_BANDS as f64;
            let hi = y_max * (band + 1) as f64 / GRADIENT_BANDS as f64;
            let color = to_plotters(gradient_at(fill, (lo + hi) / 2.0 / y_max));

            let mut poly: Vec<(f64, f64)> =
                curve.iter().map(|&(x, y)| (x, y.clamp(lo, hi))).collect();
            poly.extend(curve.iter().rev().map(|&(x, _)| (x, lo)));
            chart.draw_series(std::iter::once(Polygon::new(poly, color.filled())))?;
        }
    }

    let stroke = dataset
        .border_color
        .first()
        .map(|&c| to_plotters(c))
        .unwrap_or(WHITE);
    chart.draw_series(LineSeries::new(curve.iter().copied(), &stroke))?;

    // Circle radii do not survive the terminal backend's coordinate mapping; a
    // colored pixel marks each data point instead.
    let point_color = dataset.point_background_color.map(to_plotters).unwrap_or(stroke);
    if dataset.point_radius.unwrap_or(0.0) > 0.0 {
        chart.draw_series(points.iter().map(|&p| Pixel::new(p, point_color)))?;
    }

    Ok(())
}

fn draw_pie<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    dataset: &Dataset,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let mut chart = ChartBuilder::on(root)
        .margin(1)
        .build_cartesian_2d(-1.1..1.1, -1.1..1.1)?;

    for (slice, paint) in pie_slices(&dataset.data).iter().zip(&dataset.background_color) {
        let color = to_plotters(paint.top());
        chart.draw_series(std::iter::once(Polygon::new(wedge(slice.0, slice.1), color.filled())))?;
    }

    Ok(())
}

/// Start/end angles (radians) per value, clockwise from 12 o'clock.
///
/// Non-positive and non-finite values get an empty slice so indices stay aligned
/// with the labels and colors.
fn pie_slices(values: &[f64]) -> Vec<(f64, f64)> {
    let total: f64 = values.iter().filter(|v| v.is_finite() && **v > 0.0).sum();
    let mut angle = std::f64::consts::FRAC_PI_2;
    values
        .iter()
        .map(|&v| {
            let share = if total > 0.0 && v.is_finite() && v > 0.0 { v / total } else { 0.0 };
            let start = angle;
            angle -= share * std::f64::consts::TAU;
            (start, angle)
        })
        .collect()
}

fn wedge(start: f64, end: f64) -> Vec<(f64, f64)> {
    let sweep = (start - end).abs();
    let steps = ((sweep / std::f64::consts::TAU) * PIE_STEPS as f64).ceil().max(1.0) as usize;
    let mut pts = Vec::with_capacity(steps + 2);
    pts.push((0.0, 0.0));
    for s in 0..=steps {
        let a = start + (end - start) * s as f64 / steps as f64;
        pts.push((a.cos(), a.sin()));
    }
    pts
}

/// Cardinal-spline smoothing through `points` with Chart.js-style `tension`.
///
/// `tension == 0` returns the points unchanged (straight segments).
fn smooth_curve(points: &[(f64, f64)], tension: f64) -> Vec<(f64, f64)> {
    if points.len() < 3 || tension <= 0.0 {
        return points.to_vec();
    }

    let at = |i: isize| -> (f64, f64) {
        let i = i.clamp(0, points.len() as isize - 1) as usize;
        points[i]
    };

    let mut out = Vec::with_capacity((points.len() - 1) * CURVE_SAMPLES + 1);
    for i in 0..points.len() - 1 {
        let i = i as isize;
        let (p0, p1, p2, p3) = (at(i - 1), at(i), at(i + 1), at(i + 2));
        let c1 = (p1.0 + (p2.0 - p0.0) * tension / 2.0, p1.1 + (p2.1 - p0.1) * tension / 2.0);
        let c2 = (p2.0 - (p3.0 - p1.0) * tension / 2.0, p2.1 - (p3.1 - p1.1) * tension / 2.0);

        for s in 0..CURVE_SAMPLES {
            let t = s as f64 / CURVE_SAMPLES as f64;
            let u = 1.0 - t;
            let (b0, b1, b2, b3) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
            let x = b0 * p1.0 + b1 * c1.0 + b2 * c2.0 + b3 * p2.0;
            let y = b0 * p1.1 + b1 * c1.1 + b2 * c2.1 + b3 * p2.1;
            out.push((x, y.max(0.0)));
        }
    }
    if let Some(&last) = points.last() {
        out.push(last);
    }
    out
}
