//! Ratatui-based terminal UI.
//!
//! The TUI shows a form (chart type, start date, end date), a row of KPI cards
//! and the chart. Submissions run on a worker thread; the event loop polls for
//! the joined result so drawing never waits on the network.

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Duration as Days;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::rngs::ThreadRng;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::api::{DashboardApi, DashboardSnapshot, FetchError, fetch_all};
use crate::dashboard::{Dashboard, DateField, Phase};
use crate::domain::{ChartType, to_iso};
use crate::error::AppError;
use crate::render::{ChartConfig, Rgb};
use crate::report::fmt_amount;

mod chart_widget;

use chart_widget::{BACKGROUND, DashboardChart};

/// How long a notification stays in the status line.
const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

const FIELD_COUNT: usize = 3;

/// Start the TUI.
pub fn run<A>(api: A, dashboard: Dashboard) -> Result<(), AppError>
where
    A: DashboardApi + Send + 'static,
{
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(Arc::new(api), dashboard);
    app.submit();
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Info,
    Error,
}

/// Transient status-line message.
struct Notification {
    text: String,
    severity: Severity,
    raised: Instant,
}

impl Notification {
    fn new(text: impl Into<String>, severity: Severity) -> Self {
        let text = text.into();
        tracing::debug!(%text, ?severity, "notification");
        Self {
            text,
            severity,
            raised: Instant::now(),
        }
    }

    fn expired(&self) -> bool {
        self.raised.elapsed() >= NOTIFICATION_TTL
    }
}

type FetchResult = Result<DashboardSnapshot, FetchError>;

struct App<A> {
    api: Arc<A>,
    dashboard: Dashboard,
    selected_field: usize,
    editing: Option<DateField>,
    date_input: String,
    notification: Option<Notification>,
    pending: Option<Receiver<FetchResult>>,
    rng: ThreadRng,
}

impl<A> App<A>
where
    A: DashboardApi + Send + 'static,
{
    fn new(api: Arc<A>, dashboard: Dashboard) -> Self {
        Self {
            api,
            dashboard,
            selected_field: 0,
            editing: None,
            date_input: String::new(),
            notification: None,
            pending: None,
            rng: rand::thread_rng(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.poll_fetch() {
                needs_redraw = true;
            }
            if self.notification.as_ref().is_some_and(Notification::expired) {
                self.notification = None;
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Start a submission on a worker thread. Ignored while one is in flight.
    fn submit(&mut self) {
        let Some(query) = self.dashboard.begin_submit() else {
            if !self.dashboard.is_loading() {
                self.notify("Form incomplete: pick a chart type and both dates.", Severity::Error);
            }
            return;
        };

        let (tx, rx) = mpsc::channel();
        let api = Arc::clone(&self.api);
        thread::spawn(move || {
            let result = fetch_all(api.as_ref(), &query);
            // The receiver is gone only when the UI has already exited.
            let _ = tx.send(result);
        });
        self.pending = Some(rx);
    }

    /// Apply a finished submission, if any. Returns `true` when state changed.
    fn poll_fetch(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };

        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                Err(FetchError::Transport("fetch worker stopped".to_string()))
            }
        };
        self.pending = None;
        self.dashboard.finish(result);

        let outcome = match (self.dashboard.error_message(), self.dashboard.info_message()) {
            (Some(err), _) => Some((err.to_string(), Severity::Error)),
            (None, Some(info)) => Some((info.to_string(), Severity::Info)),
            (None, None) => None,
        };
        self.notification = outcome.map(|(text, severity)| Notification::new(text, severity));
        true
    }

    fn notify(&mut self, text: impl Into<String>, severity: Severity) {
        self.notification = Some(Notification::new(text, severity));
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if let Some(field) = self.editing {
            self.handle_date_edit(field, code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < FIELD_COUNT {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(false),
            KeyCode::Right => self.adjust_field(true),
            KeyCode::Enter => match self.selected_date_field() {
                Some(field) => {
                    self.editing = Some(field);
                    self.date_input =
                        self.dashboard.form.get(field).map(|d| to_iso(&d)).unwrap_or_default();
                    self.notify(
                        "Editing date (YYYY-MM-DD). Enter to apply, Esc to cancel.",
                        Severity::Info,
                    );
                }
                None => self.submit(),
            },
            KeyCode::Char('s') => self.submit(),
            KeyCode::Char('c') => {
                if self.dashboard.randomize_colors(&mut self.rng) {
                    self.notify("Colors shuffled.", Severity::Info);
                }
            }
            _ => {}
        }

        false
    }

    fn handle_date_edit(&mut self, field: DateField, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.notify("Date edit canceled.", Severity::Info);
            }
            KeyCode::Enter => {
                self.editing = None;
                let input = std::mem::take(&mut self.date_input);
                match self.dashboard.set_date_input(field, &input) {
                    Ok(()) => self.notification = None,
                    Err(msg) => self.notify(msg, Severity::Error),
                }
            }
            KeyCode::Backspace => {
                self.date_input.pop();
            }
            KeyCode::Char(c) => {
                if (c.is_ascii_digit() || c == '-') && self.date_input.len() < 10 {
                    self.date_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn selected_date_field(&self) -> Option<DateField> {
        match self.selected_field {
            1 => Some(DateField::Start),
            2 => Some(DateField::End),
            _ => None,
        }
    }

    fn adjust_field(&mut self, forward: bool) {
        match self.selected_date_field() {
            None => self.dashboard.cycle_chart_type(forward),
            Some(field) => {
                let step = if forward { Days::days(1) } else { Days::days(-1) };
                if let Some(date) = self.dashboard.form.get(field) {
                    let moved = date.checked_add_signed(step).unwrap_or(date);
                    self.dashboard.form.set(field, Some(moved));
                }
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_kpis(frame, chunks[1]);
        self.draw_body(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let (state, color) = match self.dashboard.phase() {
            Phase::Idle => ("idle", Color::Gray),
            Phase::Loading => ("loading…", Color::Yellow),
            Phase::Success => ("ok", Color::Green),
            Phase::Error => ("error", Color::Red),
        };
        let line = Line::from(vec![
            Span::styled("dash", Style::default().fg(Color::Cyan)),
            Span::raw(" - sales dashboard | "),
            Span::styled(state, Style::default().fg(color)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_kpis(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let k = self.dashboard.kpis();
        let cards = [
            ("Total", fmt_amount(k.total)),
            ("Average", fmt_amount(k.average)),
            ("Max / Min", format!("{} / {}", fmt_amount(k.max), fmt_amount(k.min))),
            ("Sales", k.sales_count.to_string()),
            ("Avg ticket", fmt_amount(k.average_ticket)),
            (
                "Top product",
                format!("{} ({:.1}%)", k.top_product, k.top_product_share),
            ),
            ("Top category", k.top_category.clone()),
        ];

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, cards.len() as u32); cards.len()])
            .split(area);

        for ((title, value), rect) in cards.into_iter().zip(columns.iter()) {
            let p = Paragraph::new(Span::styled(
                value,
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .block(Block::default().title(title).borders(Borders::ALL));
            frame.render_widget(p, *rect);
        }
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(5)])
            .split(area);

        let chart = self.dashboard.chart();
        let show_legend = chart.is_some_and(|c| c.options.plugins.legend.display);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(if show_legend {
                vec![Constraint::Min(0), Constraint::Length(26)]
            } else {
                vec![Constraint::Min(0)]
            })
            .split(rows[0]);

        self.draw_chart(frame, columns[0]);
        if let (true, Some(chart)) = (show_legend, chart) {
            draw_legend(frame, columns[1], chart);
        }
        self.draw_settings(frame, rows[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = match self.dashboard.chart() {
            Some(c) => format!("Sales ({})", c.kind.display_name()),
            None => "Sales".to_string(),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(config) = self.dashboard.chart() else {
            let msg = match (self.dashboard.phase(), self.dashboard.info_message()) {
                (Phase::Loading, _) => match self.dashboard.pending_range() {
                    Some(range) => {
                        format!("Loading {} → {}…", range.start_iso(), range.end_iso())
                    }
                    None => "Loading…".to_string(),
                },
                (_, Some(info)) => info.to_string(),
                (Phase::Error, _) => "No chart (last request failed).".to_string(),
                _ => "Press Enter or s to load the dashboard.".to_string(),
            };
            let p = Paragraph::new(msg).style(Style::default().fg(Color::Yellow));
            frame.render_widget(p, inner);
            return;
        };

        frame.render_widget(DashboardChart { config }, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let form = &self.dashboard.form;
        let chart_type = form.chart_type.map(ChartType::display_name).unwrap_or("-");
        let date_label = |field: DateField| -> String {
            if self.editing == Some(field) {
                return format!("{}▏", self.date_input);
            }
            form.get(field).map(|d| to_iso(&d)).unwrap_or_else(|| "-".to_string())
        };

        let items = vec![
            ListItem::new(format!("Chart type: {chart_type}")),
            ListItem::new(format!("Start: {}", date_label(DateField::Start))),
            ListItem::new(format!("End:   {}", date_label(DateField::End))),
        ];

        let list = List::new(items)
            .block(Block::default().title("Filters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit/submit  s submit  c colors  q quit";
        let mut spans = vec![Span::styled(help, Style::default().fg(Color::Gray))];
        if let Some(n) = &self.notification {
            let color = match n.severity {
                Severity::Info => Color::Yellow,
                Severity::Error => Color::Red,
            };
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(n.text.as_str(), Style::default().fg(color)));
        }
        let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_legend(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &ChartConfig) {
    let Some(ds) = chart.dataset() else {
        return;
    };

    let lines: Vec<Line> = chart
        .labels()
        .iter()
        .zip(&ds.background_color)
        .map(|(label, paint)| {
            let swatch = to_color(paint.top().over(BACKGROUND));
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(swatch)),
                Span::raw(label.as_str()),
            ])
        })
        .collect();

    let p = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Legend").borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}
