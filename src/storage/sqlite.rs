//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::state::{LinkResult, LinkType, Severity};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{CrawlStatus, CrawlSummary};
use crate::SiteHealthError;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// Crawl columns plus error and warning counts; callers append WHERE/GROUP BY
const SUMMARY_SELECT: &str = "
    SELECT
        c.id, c.start_url, c.started_at, c.completed_at, c.max_depth,
        c.total_pages, c.total_links_checked, c.status,
        COALESCE(SUM(CASE WHEN lr.severity = 'error' THEN 1 ELSE 0 END), 0),
        COALESCE(SUM(CASE WHEN lr.severity = 'warning' THEN 1 ELSE 0 END), 0)
    FROM crawls c
    LEFT JOIN link_results lr ON c.id = lr.crawl_id";

const LINK_RESULT_COLUMNS: &str =
    "source_url, target_url, link_type, status_code, response_time, severity, error_message";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(SiteHealthError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, SiteHealthError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        // Initialize schema
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, SiteHealthError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    // ===== Crawl Management =====

    fn create_crawl(&mut self, start_url: &str, max_depth: u32) -> StorageResult<i64> {
        self.conn.execute(
            "INSERT INTO crawls (start_url, started_at, max_depth, status) VALUES (?1, ?2, ?3, ?4)",
            params![
                start_url,
                now_timestamp(),
                max_depth,
                CrawlStatus::Running.to_db_string()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn complete_crawl(
        &mut self,
        crawl_id: i64,
        total_pages: usize,
        total_links: usize,
        status: CrawlStatus,
    ) -> StorageResult<()> {
        let updated = self.conn.execute(
            "UPDATE crawls
             SET completed_at = ?1, total_pages = ?2, total_links_checked = ?3, status = ?4
             WHERE id = ?5",
            params![
                now_timestamp(),
                total_pages as i64,
                total_links as i64,
                status.to_db_string(),
                crawl_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::CrawlNotFound(crawl_id));
        }
        Ok(())
    }

    fn get_crawl_summary(&self, crawl_id: i64) -> StorageResult<Option<CrawlSummary>> {
        let sql = format!("{} WHERE c.id = ?1 GROUP BY c.id", SUMMARY_SELECT);
        let summary = self
            .conn
            .query_row(&sql, params![crawl_id], summary_from_row)
            .optional()?;
        Ok(summary)
    }

    fn list_crawls(&self, limit: usize) -> StorageResult<Vec<CrawlSummary>> {
        let sql = format!(
            "{} GROUP BY c.id ORDER BY c.started_at DESC, c.id DESC LIMIT ?1",
            SUMMARY_SELECT
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let crawls = stmt
            .query_map(params![limit as i64], summary_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(crawls)
    }

    // ===== Link Results =====

    fn save_link_results(&mut self, crawl_id: i64, results: &[LinkResult]) -> StorageResult<()> {
        let checked_at = now_timestamp();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO link_results
                 (crawl_id, source_url, target_url, link_type, status_code,
                  response_time, severity, error_message, checked_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;

            for result in results {
                stmt.execute(params![
                    crawl_id,
                    result.source_url,
                    result.target_url,
                    result.link_type.to_db_string(),
                    result.status_code,
                    result.response_time,
                    result.severity.to_db_string(),
                    result.error_message,
                    checked_at,
                ])?;
            }
        }
        tx.commit()?;

        tracing::debug!("Saved {} link results for crawl {}", results.len(), crawl_id);
        Ok(())
    }

    fn get_link_results(
        &self,
        crawl_id: i64,
        severity: Option<Severity>,
    ) -> StorageResult<Vec<LinkResult>> {
        let results = match severity {
            Some(severity) => {
                let sql = format!(
                    "SELECT {} FROM link_results WHERE crawl_id = ?1 AND severity = ?2 ORDER BY id",
                    LINK_RESULT_COLUMNS
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(
                        params![crawl_id, severity.to_db_string()],
                        link_result_from_row,
                    )?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM link_results WHERE crawl_id = ?1
                     ORDER BY CASE severity WHEN 'error' THEN 0 WHEN 'warning' THEN 1 ELSE 2 END, id",
                    LINK_RESULT_COLUMNS
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![crawl_id], link_result_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(results)
    }
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn unknown_value(idx: usize, column: &str, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        format!("unknown {} '{}'", column, value).into(),
    )
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<CrawlSummary> {
    let started_at: String = row.get(2)?;
    let completed_at: Option<String> = row.get(3)?;
    let status: String = row.get(7)?;

    Ok(CrawlSummary {
        id: row.get(0)?,
        start_url: row.get(1)?,
        started_at: parse_timestamp(2, &started_at)?,
        completed_at: completed_at
            .as_deref()
            .map(|value| parse_timestamp(3, value))
            .transpose()?,
        max_depth: row.get::<_, Option<i64>>(4)?.unwrap_or(0) as u32,
        total_pages: row.get::<_, Option<i64>>(5)?.unwrap_or(0) as usize,
        total_links: row.get::<_, Option<i64>>(6)?.unwrap_or(0) as usize,
        errors: row.get::<_, i64>(8)? as usize,
        warnings: row.get::<_, i64>(9)? as usize,
        status: CrawlStatus::from_db_string(&status).ok_or_else(|| unknown_value(7, "status", &status))?,
    })
}

fn link_result_from_row(row: &Row<'_>) -> rusqlite::Result<LinkResult> {
    let link_type: String = row.get(2)?;
    let severity: String = row.get(5)?;

    Ok(LinkResult {
        source_url: row.get(0)?,
        target_url: row.get(1)?,
        link_type: LinkType::from_db_string(&link_type)
            .ok_or_else(|| unknown_value(2, "link type", &link_type))?,
        status_code: row.get::<_, Option<i64>>(3)?.map(|code| code as u16),
        response_time: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
        severity: Severity::from_db_string(&severity)
            .ok_or_else(|| unknown_value(5, "severity", &severity))?,
        error_message: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ProbeOutcome;
    use std::time::Duration;
    use tempfile::TempDir;

    fn result(target: &str, link_type: LinkType, status: Option<u16>) -> LinkResult {
        let outcome = match status {
            Some(status_code) => ProbeOutcome::Response {
                status_code,
                elapsed: Duration::from_millis(120),
            },
            None => ProbeOutcome::Timeout,
        };
        LinkResult::from_outcome(
            "https://example.com/",
            target,
            link_type,
            outcome,
            Duration::from_secs(10),
        )
    }

    fn sample_results() -> Vec<LinkResult> {
        vec![
            result("https://example.com/ok", LinkType::Page, Some(200)),
            result("https://example.com/missing", LinkType::Page, Some(404)),
            result("https://example.com/moved", LinkType::Page, Some(301)),
            result("https://example.com/logo.png", LinkType::Image, Some(200)),
            result("https://other.org/", LinkType::External, None),
        ]
    }

    #[test]
    fn test_create_in_memory() {
        let storage = SqliteStorage::new_in_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_create_crawl() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let crawl_id = storage.create_crawl("https://example.com/", 2).unwrap();
        assert!(crawl_id > 0);

        let summary = storage.get_crawl_summary(crawl_id).unwrap().unwrap();
        assert_eq!(summary.start_url, "https://example.com/");
        assert_eq!(summary.max_depth, 2);
        assert_eq!(summary.status, CrawlStatus::Running);
        assert_eq!(summary.completed_at, None);
        assert_eq!(summary.total_links, 0);
        assert_eq!(summary.errors, 0);
    }

    #[test]
    fn test_save_and_summarize() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let crawl_id = storage.create_crawl("https://example.com/", 2).unwrap();

        storage.save_link_results(crawl_id, &sample_results()).unwrap();
        storage
            .complete_crawl(crawl_id, 3, 5, CrawlStatus::Completed)
            .unwrap();

        let summary = storage.get_crawl_summary(crawl_id).unwrap().unwrap();
        assert_eq!(summary.status, CrawlStatus::Completed);
        assert_eq!(summary.total_pages, 3);
        assert_eq!(summary.total_links, 5);
        assert_eq!(summary.errors, 2);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.successes(), 2);
        assert!(summary.completed_at.unwrap() >= summary.started_at);
    }

    #[test]
    fn test_link_results_roundtrip_fields() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let crawl_id = storage.create_crawl("https://example.com/", 1).unwrap();
        let saved = sample_results();
        storage.save_link_results(crawl_id, &saved).unwrap();

        let loaded = storage.get_link_results(crawl_id, None).unwrap();
        assert_eq!(loaded.len(), saved.len());

        let timeout = loaded
            .iter()
            .find(|r| r.target_url == "https://other.org/")
            .unwrap();
        assert_eq!(timeout.status_code, None);
        assert_eq!(timeout.link_type, LinkType::External);
        assert_eq!(timeout.error_message.as_deref(), Some("Request timeout"));
        assert_eq!(timeout.response_time, 10.0);
    }

    #[test]
    fn test_link_results_errors_first() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let crawl_id = storage.create_crawl("https://example.com/", 1).unwrap();
        storage.save_link_results(crawl_id, &sample_results()).unwrap();

        let severities: Vec<Severity> = storage
            .get_link_results(crawl_id, None)
            .unwrap()
            .iter()
            .map(|r| r.severity)
            .collect();
        assert_eq!(
            severities,
            vec![
                Severity::Error,
                Severity::Error,
                Severity::Warning,
                Severity::Success,
                Severity::Success
            ]
        );
    }

    #[test]
    fn test_link_results_severity_filter() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let crawl_id = storage.create_crawl("https://example.com/", 1).unwrap();
        let other_id = storage.create_crawl("https://other.org/", 1).unwrap();
        storage.save_link_results(crawl_id, &sample_results()).unwrap();
        storage.save_link_results(other_id, &sample_results()).unwrap();

        let errors = storage
            .get_link_results(crawl_id, Some(Severity::Error))
            .unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].target_url, "https://example.com/missing");
        assert_eq!(errors[1].target_url, "https://other.org/");
    }

    #[test]
    fn test_complete_unknown_crawl() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let result = storage.complete_crawl(99, 0, 0, CrawlStatus::Failed);
        assert!(matches!(result, Err(StorageError::CrawlNotFound(99))));
    }

    #[test]
    fn test_unknown_summary_is_none() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        assert!(storage.get_crawl_summary(42).unwrap().is_none());
    }

    #[test]
    fn test_list_crawls_newest_first() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let first = storage.create_crawl("https://a.example/", 1).unwrap();
        let second = storage.create_crawl("https://b.example/", 1).unwrap();
        let third = storage.create_crawl("https://c.example/", 1).unwrap();

        let crawls = storage.list_crawls(10).unwrap();
        let ids: Vec<i64> = crawls.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![third, second, first]);

        let limited = storage.list_crawls(2).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].id, third);
    }

    #[test]
    fn test_failed_crawl_with_zero_totals() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let crawl_id = storage.create_crawl("https://example.com/", 2).unwrap();
        storage
            .complete_crawl(crawl_id, 0, 0, CrawlStatus::Failed)
            .unwrap();

        let summary = storage.get_crawl_summary(crawl_id).unwrap().unwrap();
        assert_eq!(summary.status, CrawlStatus::Failed);
        assert_eq!(summary.total_pages, 0);
        assert_eq!(summary.total_links, 0);
    }

    #[test]
    fn test_file_database_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site_health.db");

        let crawl_id = {
            let mut storage = SqliteStorage::new(&path).unwrap();
            let id = storage.create_crawl("https://example.com/", 2).unwrap();
            storage.save_link_results(id, &sample_results()).unwrap();
            id
        };

        let storage = SqliteStorage::new(&path).unwrap();
        let results = storage.get_link_results(crawl_id, None).unwrap();
        assert_eq!(results.len(), 5);
    }
}
