//! Domain types shared by the query client, controller and renderer.
//!
//! This module defines:
//!
//! - request selectors (`ChartType`, `DateRange`)
//! - backend response shapes (`ChartResult`, `SummaryMetrics`)
//! - derived display state (`KpiState`)

pub mod kpi;
pub mod types;

pub use kpi::*;
pub use types::*;
