//! Chart rendering: configuration building and ownership of the single live chart.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::ChartType;

pub mod config;
pub mod palette;

pub use config::{ChartConfig, Dataset, Paint, VerticalGradient, build_config, style_dataset};
pub use palette::{PALETTE, Rgb, Rgba, assign_colors, shuffle, shuffled_palette, with_alpha};

static NEXT_CHART_ID: AtomicU64 = AtomicU64::new(1);

/// A live chart. Dropping it releases it.
#[derive(Debug)]
pub struct ChartInstance {
    id: u64,
    config: ChartConfig,
}

impl ChartInstance {
    fn create(config: ChartConfig) -> Self {
        let id = NEXT_CHART_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            chart_id = id,
            kind = ?config.kind,
            points = config.labels().len(),
            "chart created"
        );
        Self { id, config }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }
}

impl Drop for ChartInstance {
    fn drop(&mut self) {
        tracing::debug!(chart_id = self.id, "chart destroyed");
    }
}

/// Owns at most one `ChartInstance`.
#[derive(Debug, Default)]
pub struct ChartRenderer {
    active: Option<ChartInstance>,
}

impl ChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current chart with a new one. The previous chart is released first.
    pub fn render(
        &mut self,
        kind: ChartType,
        labels: &[String],
        values: &[f64],
        colors: &[Rgb],
    ) -> &ChartInstance {
        self.destroy();
        let config = build_config(kind, labels, values, &colors_for(kind, colors, labels.len()));
        self.active.insert(ChartInstance::create(config))
    }

    /// Release the current chart, if any.
    pub fn destroy(&mut self) {
        self.active.take();
    }

    /// Re-style the live chart's dataset with a new palette order.
    ///
    /// Returns `false` (and does nothing) when there is no chart.
    pub fn recolor(&mut self, colors: &[Rgb]) -> bool {
        let Some(chart) = self.active.as_mut() else {
            return false;
        };
        let kind = chart.config.kind;
        let styled = colors_for(kind, colors, chart.config.data.labels.len());
        for dataset in &mut chart.config.data.datasets {
            style_dataset(dataset, kind, &styled);
        }
        tracing::debug!(chart_id = chart.id, "chart recolored");
        true
    }

    pub fn active(&self) -> Option<&ChartInstance> {
        self.active.as_ref()
    }

    pub fn config(&self) -> Option<&ChartConfig> {
        self.active.as_ref().map(|c| &c.config)
    }

    pub fn has_chart(&self) -> bool {
        self.active.is_some()
    }
}

/// Pie and bar color each label; a line takes the palette as given.
fn colors_for(kind: ChartType, palette: &[Rgb], labels: usize) -> Vec<Rgb> {
    match kind {
        ChartType::Line => palette.to_vec(),
        ChartType::Pie | ChartType::Bar => assign_colors(palette, labels),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn render_replaces_previous_instance() {
        let mut r = ChartRenderer::new();
        let first = r.render(ChartType::Pie, &labels(&["A"]), &[1.0], &PALETTE).id();
        let second = r.render(ChartType::Bar, &labels(&["A", "B"]), &[1.0, 2.0], &PALETTE).id();
        assert_ne!(first, second);
        assert_eq!(r.config().unwrap().kind, ChartType::Bar);
    }

    #[test]
    fn destroy_clears_the_chart() {
        let mut r = ChartRenderer::new();
        r.render(ChartType::Line, &labels(&["Mon", "Tue"]), &[3.0, 4.0], &PALETTE);
        assert!(r.has_chart());
        r.destroy();
        assert!(!r.has_chart());
        r.destroy();
        assert!(r.config().is_none());
    }

    #[test]
    fn recolor_without_chart_is_noop() {
        let mut r = ChartRenderer::new();
        assert!(!r.recolor(&PALETTE));
        assert!(!r.has_chart());
    }

    #[test]
    fn recolor_keeps_instance_and_data() {
        let mut r = ChartRenderer::new();
        let id = r.render(ChartType::Pie, &labels(&["A", "B"]), &[1.0, 2.0], &PALETTE).id();
        let swapped = [PALETTE[5], PALETTE[3]];
        assert!(r.recolor(&swapped));

        let chart = r.active().unwrap();
        assert_eq!(chart.id(), id);
        let ds = chart.config().dataset().unwrap();
        assert_eq!(ds.data, vec![1.0, 2.0]);
        assert_eq!(ds.background_color[0].top(), PALETTE[5].with_alpha(0.9));
        assert_eq!(ds.background_color[1].top(), PALETTE[3].with_alpha(0.9));
    }

    #[test]
    fn empty_line_chart_keeps_palette_border() {
        let mut r = ChartRenderer::new();
        r.render(ChartType::Line, &[], &[], &PALETTE);
        let ds = r.config().unwrap().dataset().unwrap();
        assert_eq!(ds.border_color, vec![PALETTE[0].with_alpha(1.0)]);
        assert_eq!(ds.border_width, 2.5);

        let swapped = [PALETTE[7], PALETTE[2]];
        assert!(r.recolor(&swapped));
        let ds = r.config().unwrap().dataset().unwrap();
        assert_eq!(ds.border_color, vec![PALETTE[7].with_alpha(1.0)]);
        assert_eq!(ds.point_background_color, Some(PALETTE[7].with_alpha(1.0)));
        assert_eq!(ds.tension, Some(0.35));
    }

    #[test]
    fn more_labels_than_colors_cycle() {
        let mut r = ChartRenderer::new();
        let names: Vec<String> = (0..14).map(|i| i.to_string()).collect();
        let values = vec![1.0; 14];
        r.render(ChartType::Bar, &names, &values, &PALETTE);
        let ds = r.config().unwrap().dataset().unwrap();
        assert_eq!(ds.border_color[12], PALETTE[0].with_alpha(1.0));
        assert_eq!(ds.border_color[13], PALETTE[1].with_alpha(1.0));
    }
}
