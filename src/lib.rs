//! `sales-dashboard` library crate.
//!
//! The binary (`dash`) is a thin wrapper around this library so that:
//!
//! - the controller and chart styling are testable without a terminal or a backend
//! - the HTTP client sits behind a trait and can be swapped for a fake

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod render;
pub mod report;
pub mod tui;
