//! Output module for crawl reports
//!
//! This module handles:
//! - Writing crawl records to a JSON report file
//! - Printing per-crawl and history summaries to the console

mod report;

pub use report::{format_summary, print_history, print_summary, write_report};
