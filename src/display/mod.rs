//! Human-readable renderings of solve results.
pub mod trace;

pub use trace::format_report;
