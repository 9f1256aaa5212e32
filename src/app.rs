//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs logging
//! - resolves the backend configuration
//! - runs the TUI or a one-shot fetch

use chrono::{Local, NaiveDate};
use clap::Parser;

use crate::api::DashboardClient;
use crate::cli::{Cli, Command, FetchArgs, GlobalArgs, QueryArgs};
use crate::config::DashboardConfig;
use crate::dashboard::{Dashboard, DashboardForm};
use crate::domain::DateRange;
use crate::error::AppError;
use crate::logging::{self, LogTarget};

/// Entry point for the `dash` binary.
pub fn run() -> Result<(), AppError> {
    // `dash` and `dash -t bar` behave like `dash tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(&cli.global, args),
        Command::Fetch(args) => handle_fetch(&cli.global, args),
    }
}

fn handle_tui(global: &GlobalArgs, args: QueryArgs) -> Result<(), AppError> {
    let target = match &global.log_file {
        Some(path) => LogTarget::File(path),
        None => LogTarget::Off,
    };
    logging::init(target, "info")?;

    let client = connect(global)?;
    let dashboard = Dashboard::with_form(form_from_args(&args, today()));

    crate::tui::run(client, dashboard)
}

fn connect(global: &GlobalArgs) -> Result<DashboardClient, AppError> {
    let config = DashboardConfig::resolve(global.api_url.as_deref())?;
    let client = DashboardClient::new(&config);
    tracing::info!(api_url = client.base_url(), "backend configured");
    Ok(client)
}

fn handle_fetch(global: &GlobalArgs, args: FetchArgs) -> Result<(), AppError> {
    let target = match &global.log_file {
        Some(path) => LogTarget::File(path),
        None => LogTarget::Stderr,
    };
    logging::init(target, "warn")?;

    let client = connect(global)?;
    let mut dashboard = Dashboard::with_form(form_from_args(&args.query, today()));

    let Some(query) = dashboard.form.query() else {
        return Err(AppError::new(2, "Incomplete form: chart type and both dates are required."));
    };
    dashboard.submit(&client);

    if let Some(err) = dashboard.error_message() {
        return Err(AppError::new(4, err));
    }

    println!("{}", crate::report::format_header(&query));
    println!("{}", crate::report::format_kpis(dashboard.kpis()));

    if let Some(info) = dashboard.info_message() {
        println!("{info}");
    }

    if let Some(chart) = dashboard.chart() {
        println!("{}", crate::report::format_chart_table(chart));
        if let Some(path) = &args.export_config {
            crate::io::write_chart_json(path, chart)?;
            println!("Wrote chart configuration: {}", path.display());
        }
    } else if args.export_config.is_some() {
        println!("No chart rendered; nothing exported.");
    }

    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Initial form from CLI flags; missing dates fall back to the default range.
pub fn form_from_args(args: &QueryArgs, today: NaiveDate) -> DashboardForm {
    let defaults = DateRange::default_for(today);
    DashboardForm {
        chart_type: Some(args.chart_type),
        start: Some(args.from.unwrap_or(defaults.start)),
        end: Some(args.to.unwrap_or(defaults.end)),
    }
}

/// Rewrite argv so `dash` defaults to `dash tui`.
///
/// Rules:
/// - `dash`                        -> `dash tui`
/// - `dash -t bar ...`             -> `dash tui -t bar ...`
/// - `dash --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "fetch");
    if is_subcommand {
        return argv;
    }

    // A leading global flag may sit before an explicit subcommand.
    if argv.iter().skip(1).any(|a| a == "tui" || a == "fetch") {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
