//! Result persistence: JSON result folders and SQLite

use chrono::Local;
use rusqlite::{params, Connection};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::results::{AttemptStats, QuizResult, ResultRecord};

/// Durable storage of quiz results between runs.
pub trait ResultStore {
    /// Every stored record, malformed ones included.
    fn load_historical(&self) -> Result<Vec<ResultRecord>>;

    fn save_session(&mut self, results: &[QuizResult]) -> Result<()>;
}

// ============= JSON folder =============

/// A folder of `quiz_results_<timestamp>.json` files, one per saved session.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    folder: PathBuf,
}

impl JsonDirStore {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    fn session_path(&self) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let mut path = self.folder.join(format!("quiz_results_{}.json", stamp));
        let mut n = 1;
        while path.exists() {
            path = self.folder.join(format!("quiz_results_{}_{}.json", stamp, n));
            n += 1;
        }
        path
    }
}

impl ResultStore for JsonDirStore {
    fn load_historical(&self) -> Result<Vec<ResultRecord>> {
        if !self.folder.exists() {
            return Ok(Vec::new());
        }

        let mut files: Vec<PathBuf> = fs::read_dir(&self.folder)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        files.sort();

        let mut records = Vec::new();
        for path in &files {
            let reader = BufReader::new(File::open(path)?);
            let values: Vec<serde_json::Value> = serde_json::from_reader(reader)?;
            records.extend(values.iter().map(ResultRecord::from_json_value));
        }
        log::debug!("loaded {} records from {} result files", records.len(), files.len());
        Ok(records)
    }

    fn save_session(&mut self, results: &[QuizResult]) -> Result<()> {
        fs::create_dir_all(&self.folder)?;
        let path = self.session_path();
        let records: Vec<ResultRecord> = results.iter().map(QuizResult::to_record).collect();

        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, &records)?;
        log::info!("wrote {} results to {}", records.len(), path.display());
        Ok(())
    }
}

// ============= SQLite =============

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        Self::with_connection(Connection::open(db_path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS quiz_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                query TEXT,
                correct_translation TEXT,
                user_correct INTEGER,
                timestamp TEXT,
                recorded_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;
        Ok(Self { conn })
    }

    /// Raw insert, used for importing records from other stores.
    pub fn insert_record(&self, record: &ResultRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO quiz_results (query, correct_translation, user_correct, timestamp)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.query,
                record.correct_translation,
                record.user_correct,
                record.timestamp
            ],
        )?;
        Ok(())
    }

    /// Overall statistics over well-formed rows
    pub fn stats(&self) -> Result<AttemptStats> {
        let mut stmt = self.conn.prepare(
            "SELECT COUNT(*), SUM(user_correct) FROM quiz_results WHERE user_correct IS NOT NULL",
        )?;
        let (total, correct) = stmt.query_row([], |row| {
            let total: i64 = row.get(0)?;
            let correct: i64 = row.get::<_, Option<i64>>(1)?.unwrap_or(0);
            Ok((total, correct))
        })?;
        Ok(AttemptStats::from_counts(total as usize, correct as usize))
    }

    /// Queries answered incorrectly, most failures first
    pub fn failed_queries(&self, limit: Option<usize>) -> Result<Vec<(String, i64)>> {
        let limit_clause = limit.map(|l| format!(" LIMIT {}", l)).unwrap_or_default();
        let query = format!(
            "SELECT query, COUNT(*) AS fail_count
             FROM quiz_results
             WHERE user_correct = 0 AND query IS NOT NULL
             GROUP BY query
             ORDER BY fail_count DESC, query ASC{}",
            limit_clause
        );

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let failed: Vec<(String, i64)> = rows.collect::<rusqlite::Result<_>>()?;
        Ok(failed)
    }
}

impl ResultStore for SqliteStore {
    fn load_historical(&self) -> Result<Vec<ResultRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT query, correct_translation, user_correct, timestamp FROM quiz_results ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ResultRecord {
                query: row.get(0)?,
                correct_translation: row.get(1)?,
                user_correct: row.get::<_, Option<i64>>(2)?.map(|v| v != 0),
                timestamp: row.get(3)?,
            })
        })?;
        let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn save_session(&mut self, results: &[QuizResult]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for result in results {
            tx.execute(
                "INSERT INTO quiz_results (query, correct_translation, user_correct, timestamp)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    result.query,
                    result.correct_translation,
                    result.user_correct,
                    result.timestamp.to_rfc3339()
                ],
            )?;
        }
        tx.commit()?;
        log::info!("stored {} results", results.len());
        Ok(())
    }
}
