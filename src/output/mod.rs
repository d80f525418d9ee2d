//! Report rendering: console, JSON and Markdown

pub mod formatter;
pub mod report;

pub use formatter::{OutputFormatter, ReportGenerator};
pub use report::{EvaluationReport, ReportMetadata};
