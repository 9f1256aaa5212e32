//! Command-line parsing for the sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! controller and rendering code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{ChartType, parse_iso};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "dash",
    version,
    about = "Sales dashboard: charts and KPI cards from the sales backend"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct GlobalArgs {
    /// Backend base URL (overrides DASHBOARD_API_URL).
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Write tracing output to this file (filter with RUST_LOG).
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard.
    Tui(QueryArgs),
    /// Submit once, print the KPI cards and chart table, and optionally export the chart.
    Fetch(FetchArgs),
}

/// Initial form values.
#[derive(Debug, Args, Clone)]
pub struct QueryArgs {
    /// Chart type (pie, bar, line).
    #[arg(short = 't', long = "type", value_enum, default_value_t = ChartType::Pie)]
    pub chart_type: ChartType,

    /// Start date (YYYY-MM-DD). Defaults to 7 days before today.
    #[arg(long, value_parser = parse_date_arg)]
    pub from: Option<NaiveDate>,

    /// End date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date_arg)]
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Args, Clone)]
pub struct FetchArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Export the rendered chart configuration to JSON.
    #[arg(long = "export-config", value_name = "JSON")]
    pub export_config: Option<PathBuf>,
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_iso(raw).ok_or_else(|| format!("invalid date '{raw}' (expected YYYY-MM-DD)"))
}
