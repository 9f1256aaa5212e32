//! Presentation controller.
//!
//! Owns the form, the KPI cards, the status messages and the chart renderer.
//! A submission is split in two halves so the TUI can run the network part on a
//! worker thread:
//!
//! - `begin_submit` validates the form and moves to `Loading`
//! - `finish` applies the joined result (or the error)
//!
//! `submit` runs both halves synchronously.

use chrono::NaiveDate;
use rand::Rng;

use crate::api::{DashboardApi, DashboardQuery, DashboardSnapshot, FetchError, fetch_all};
use crate::domain::{ChartResult, ChartType, DateRange, KpiState, parse_iso};
use crate::render::{ChartConfig, ChartRenderer, PALETTE, Rgb, shuffled_palette};

pub mod form;

pub use form::{DashboardForm, DateField};

/// Shown when a failed fetch carries no server reason.
pub const FALLBACK_ERROR: &str = "Failed to fetch dashboard data.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug)]
pub struct Dashboard {
    pub form: DashboardForm,
    phase: Phase,
    error_msg: Option<String>,
    info_msg: Option<String>,
    kpis: KpiState,
    renderer: ChartRenderer,
    colors: Vec<Rgb>,
    in_flight: Option<DashboardQuery>,
}

impl Dashboard {
    pub fn new(today: NaiveDate) -> Self {
        Self::with_form(DashboardForm::new(today))
    }

    pub fn with_form(form: DashboardForm) -> Self {
        Self {
            form,
            phase: Phase::Idle,
            error_msg: None,
            info_msg: None,
            kpis: KpiState::default(),
            renderer: ChartRenderer::new(),
            colors: PALETTE.to_vec(),
            in_flight: None,
        }
    }

    /// Validate the form and enter `Loading`.
    ///
    /// Returns `None` without touching any state when the form is incomplete or a
    /// submission is already in flight.
    pub fn begin_submit(&mut self) -> Option<DashboardQuery> {
        if self.phase == Phase::Loading {
            tracing::info!("submission ignored: a request is already in flight");
            return None;
        }
        let query = self.form.query()?;

        self.phase = Phase::Loading;
        self.error_msg = None;
        self.info_msg = None;
        self.in_flight = Some(query);

        tracing::info!(
            chart_type = query.chart_type.as_param(),
            start = %query.range.start_iso(),
            end = %query.range.end_iso(),
            "dashboard submission"
        );
        Some(query)
    }

    /// Apply the joined result of a submission started with `begin_submit`.
    pub fn finish(&mut self, result: Result<DashboardSnapshot, FetchError>) {
        self.in_flight = None;
        match result {
            Ok(snapshot) => self.apply_snapshot(snapshot),
            Err(err) => self.apply_error(&err),
        }
    }

    /// Validate, fetch and apply in one go. Returns `false` when nothing was fetched.
    pub fn submit<A>(&mut self, api: &A) -> bool
    where
        A: DashboardApi + ?Sized,
    {
        let Some(query) = self.begin_submit() else {
            return false;
        };
        let result = fetch_all(api, &query);
        self.finish(result);
        true
    }

    fn apply_snapshot(&mut self, snapshot: DashboardSnapshot) {
        self.kpis = KpiState::from_metrics(&snapshot.summary);
        self.phase = Phase::Success;

        match snapshot.chart {
            ChartResult::Message(message) => {
                tracing::info!(%message, "no chart data for range");
                self.info_msg = Some(message);
                self.renderer.destroy();
            }
            ChartResult::Data(data) => {
                self.colors = PALETTE.to_vec();
                self.renderer
                    .render(data.kind, &data.labels, &data.data, &self.colors);
            }
        }
    }

    fn apply_error(&mut self, err: &FetchError) {
        tracing::warn!(error = %err, "dashboard fetch failed");
        let message = err.server_message().unwrap_or(FALLBACK_ERROR);
        self.error_msg = Some(message.to_string());
        self.phase = Phase::Error;
        self.renderer.destroy();
        self.kpis.reset();
    }

    /// Shuffle the palette and re-style the live chart. No-op without a chart.
    pub fn randomize_colors<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if !self.renderer.has_chart() {
            return false;
        }
        self.colors = shuffled_palette(rng);
        self.renderer.recolor(&self.colors)
    }

    /// Cycle the chart type selector.
    pub fn cycle_chart_type(&mut self, forward: bool) {
        let current = self.form.chart_type.unwrap_or(ChartType::Pie);
        self.form.chart_type = Some(if forward { current.next() } else { current.prev() });
    }

    /// Set a date from typed `YYYY-MM-DD` text. Empty input clears the field.
    pub fn set_date_input(&mut self, field: DateField, input: &str) -> Result<(), String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            self.form.set(field, None);
            return Ok(());
        }
        let date = parse_iso(trimmed)
            .ok_or_else(|| format!("Invalid date '{trimmed}' (expected YYYY-MM-DD)."))?;
        self.form.set(field, Some(date));
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_msg.as_deref()
    }

    pub fn info_message(&self) -> Option<&str> {
        self.info_msg.as_deref()
    }

    pub fn kpis(&self) -> &KpiState {
        &self.kpis
    }

    pub fn chart(&self) -> Option<&ChartConfig> {
        self.renderer.config()
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Range of the submission currently in flight.
    pub fn pending_range(&self) -> Option<DateRange> {
        self.in_flight.map(|q| q.range)
    }
}
