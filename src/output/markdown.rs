//! Markdown report generation
//!
//! This module generates human-readable markdown reports of crawl results,
//! including statistics, broken links, and slow or redirected links.

use crate::output::{CrawlReport, OutputResult, MAX_LISTED_ERRORS, MAX_LISTED_WARNINGS};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown report to a file
///
/// # Arguments
///
/// * `report` - The crawl report data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown report
/// * `Err(OutputError)` - Failed to write report
pub fn write_markdown_report(report: &CrawlReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Wrote markdown report to {}", output_path.display());
    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let summary = &report.summary;
    let mut md = String::new();

    // Title
    md.push_str("# Site Health Report\n\n");

    // Crawl metadata
    md.push_str("## Crawl Information\n\n");
    md.push_str(&format!("- **Crawl ID**: {}\n", summary.id));
    md.push_str(&format!("- **URL**: {}\n", summary.start_url));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    if let Some(completed) = summary.completed_at {
        md.push_str(&format!("- **Completed**: {}\n", completed.to_rfc3339()));
    }
    if let Some(secs) = report.duration_secs() {
        md.push_str(&format!("- **Duration**: {:.1} seconds\n", secs));
    }
    md.push_str(&format!("- **Status**: {}\n", summary.status));
    md.push_str(&format!("- **Crawl Depth**: {}\n\n", summary.max_depth));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Pages Crawled | {} |\n", summary.total_pages));
    md.push_str(&format!("| Links Checked | {} |\n", summary.total_links));
    md.push_str(&format!("| Errors | {} |\n", summary.errors));
    md.push_str(&format!("| Warnings | {} |\n", summary.warnings));
    md.push_str(&format!("| Success | {} |\n\n", summary.successes()));

    let errors: Vec<_> = report.errors().collect();
    if !errors.is_empty() {
        md.push_str("## Errors\n\n");
        md.push_str("| Target | Source | Type | Status | Error |\n");
        md.push_str("|--------|--------|------|--------|-------|\n");
        for result in errors.iter().take(MAX_LISTED_ERRORS) {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                result.target_url,
                result.source_url,
                result.link_type,
                result
                    .status_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                result.error_message.as_deref().unwrap_or("-"),
            ));
        }
        if errors.len() > MAX_LISTED_ERRORS {
            md.push_str(&format!(
                "\n...and {} more errors\n",
                errors.len() - MAX_LISTED_ERRORS
            ));
        }
        md.push('\n');
    }

    let warnings: Vec<_> = report.warnings().collect();
    if !warnings.is_empty() {
        md.push_str("## Warnings\n\n");
        md.push_str("| Target | Source | Status | Response Time |\n");
        md.push_str("|--------|--------|--------|---------------|\n");
        for result in warnings.iter().take(MAX_LISTED_WARNINGS) {
            md.push_str(&format!(
                "| {} | {} | {} | {:.2}s |\n",
                result.target_url,
                result.source_url,
                result
                    .status_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                result.response_time,
            ));
        }
        if warnings.len() > MAX_LISTED_WARNINGS {
            md.push_str(&format!(
                "\n...and {} more warnings\n",
                warnings.len() - MAX_LISTED_WARNINGS
            ));
        }
        md.push('\n');
    }

    let counts = report.counts_by_type();
    if !counts.is_empty() {
        md.push_str("## Links by Type\n\n");
        md.push_str("| Type | Count |\n");
        md.push_str("|------|-------|\n");
        for (link_type, count) in counts {
            md.push_str(&format!("| {} | {} |\n", link_type, count));
        }
        md.push('\n');
    }

    md
}
