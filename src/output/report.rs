//! JSON report and console summaries
//!
//! Every CLI command leaves its result behind as a JSON array of crawl
//! records, and prints a short human-readable summary.

use crate::storage::CrawlRecord;
use crate::SitewalkError;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes crawl records as a pretty-printed JSON array
///
/// # Arguments
///
/// * `records` - The records to write
/// * `output_path` - Path of the report file, replaced if it exists
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(SitewalkError)` - Failed to create or write the file
pub fn write_report(records: &[CrawlRecord], output_path: &Path) -> Result<(), SitewalkError> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    tracing::debug!(
        "Wrote {} record(s) to {}",
        records.len(),
        output_path.display()
    );
    Ok(())
}

/// Formats the console summary of one crawl
pub fn format_summary(record: &CrawlRecord) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Crawl {} ===", record.id);
    let _ = writeln!(out, "  Seed: {}", record.initial_url);
    let _ = writeln!(out, "  Host: {}", record.host);
    let _ = writeln!(
        out,
        "  Created: {}",
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "  Links visited: {}", record.links.len());
    let _ = writeln!(out, "  Errors: {}", record.errors.len());

    if !record.errors.is_empty() {
        let fetch = record.errors.iter().filter(|e| e.is_fetch()).count();
        let _ = writeln!(out, "    Fetch: {}", fetch);
        let _ = writeln!(out, "    Resolution: {}", record.errors.len() - fetch);
    }

    out
}

pub fn print_summary(record: &CrawlRecord) {
    print!("{}", format_summary(record));
}

/// One line per record, oldest first
pub fn print_history(records: &[CrawlRecord]) {
    let mut sorted: Vec<&CrawlRecord> = records.iter().collect();
    sorted.sort_by_key(|record| record.created_at);

    println!("=== Crawl History ({}) ===", sorted.len());
    for record in sorted {
        println!(
            "  {}  {}  {}  {} links, {} errors",
            record.id,
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.host,
            record.links.len(),
            record.errors.len()
        );
    }
}
