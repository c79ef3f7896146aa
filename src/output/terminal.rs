//! Terminal report rendering

use crate::output::{CrawlReport, MAX_LISTED_ERRORS, MAX_LISTED_WARNINGS};
use crate::state::SLOW_RESPONSE_SECS;
use std::fmt::Write;

/// Formats a crawl report for the terminal
pub fn format_terminal_report(report: &CrawlReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    let _ = writeln!(out, "\n=== Site Health Report ===\n");
    let _ = writeln!(out, "Crawl ID: {}", summary.id);
    let _ = writeln!(out, "URL: {}", summary.start_url);
    let _ = writeln!(out, "Status: {}", summary.status);
    let _ = writeln!(out, "Crawl Depth: {}", summary.max_depth);
    let _ = writeln!(out, "Pages Crawled: {}", summary.total_pages);
    let _ = writeln!(out, "Total Links Checked: {}", summary.total_links);
    if let Some(secs) = report.duration_secs() {
        let _ = writeln!(out, "Duration: {:.1}s", secs);
    }

    let _ = writeln!(out, "\nSummary:");
    let _ = writeln!(out, "  Errors: {}", summary.errors);
    let _ = writeln!(out, "  Warnings: {}", summary.warnings);
    let _ = writeln!(out, "  Success: {}", summary.successes());

    let errors: Vec<_> = report.errors().collect();
    if !errors.is_empty() {
        let _ = writeln!(out, "\n=== Errors ===");
        for result in errors.iter().take(MAX_LISTED_ERRORS) {
            let _ = writeln!(out, "\n✗ {}", result.target_url);
            let _ = writeln!(out, "  Source: {}", result.source_url);
            let _ = writeln!(out, "  Type: {}", result.link_type);
            if let Some(code) = result.status_code {
                let _ = writeln!(out, "  Status: {}", code);
            }
            if let Some(message) = &result.error_message {
                let _ = writeln!(out, "  Error: {}", message);
            }
        }
        if errors.len() > MAX_LISTED_ERRORS {
            let _ = writeln!(out, "\n... and {} more errors", errors.len() - MAX_LISTED_ERRORS);
        }
    }

    let warnings: Vec<_> = report.warnings().collect();
    if !warnings.is_empty() {
        let _ = writeln!(out, "\n=== Warnings ===");
        for result in warnings.iter().take(MAX_LISTED_WARNINGS) {
            let _ = writeln!(out, "\n⚠ {}", result.target_url);
            let _ = writeln!(out, "  Source: {}", result.source_url);
            if let Some(code) = result.status_code {
                let _ = writeln!(out, "  Status: {}", code);
            }
            if result.response_time > SLOW_RESPONSE_SECS {
                let _ = writeln!(out, "  Slow response: {:.1}s", result.response_time);
            }
        }
        if warnings.len() > MAX_LISTED_WARNINGS {
            let _ = writeln!(
                out,
                "\n... and {} more warnings",
                warnings.len() - MAX_LISTED_WARNINGS
            );
        }
    }

    let counts = report.counts_by_type();
    if !counts.is_empty() {
        let _ = writeln!(out, "\nLinks by Type:");
        for (link_type, count) in counts {
            let _ = writeln!(out, "  {}: {}", link_type, count);
        }
    }

    out
}
