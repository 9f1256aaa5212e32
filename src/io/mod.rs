//! Input/output helpers.
//!
//! - chart configuration JSON export (`export`)

pub mod export;

pub use export::*;
