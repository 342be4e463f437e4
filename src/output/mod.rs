//! Output formatting
//!
//! - [`text`]: final report and terminal charts
//! - [`json`]: machine-readable run report
//! - [`csv`]: live progress series and per-outcome histogram export

pub mod csv;
pub mod json;
pub mod text;
