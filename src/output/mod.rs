//! Output module for crawl reports and summaries
//!
//! This module handles:
//! - The `CrawlReport` returned by a crawl
//! - Printing a summary to stdout
//! - Writing a markdown summary file

mod markdown;
mod report;
mod stats;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use report::{CrawlReport, PageFailure, SavedPage};
pub use stats::print_summary;
