//! Quiz result records, the result log and attempt statistics

use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{QuizError, Result};

/// A result record as persisted and exchanged with callers.
///
/// Every field is optional so that incomplete history can be loaded and
/// reported instead of rejected wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_correct: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ResultRecord {
    /// Read one stored record field by field. A field of the wrong JSON type
    /// is left empty, so it surfaces later as a malformed record instead of
    /// failing the whole file.
    pub fn from_json_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            query: text("query"),
            correct_translation: text("correct_translation"),
            user_correct: value.get("user_correct").and_then(Value::as_bool),
            timestamp: text("timestamp"),
        }
    }

    /// Validate into a QuizResult. `position` is reported on failure.
    pub fn parse(&self, position: usize) -> Result<QuizResult> {
        let malformed = |field: &'static str| QuizError::MalformedRecord { position, field };

        let query = self
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| malformed("query"))?;
        let user_correct = self.user_correct.ok_or_else(|| malformed("user_correct"))?;
        let timestamp = self
            .timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .ok_or_else(|| malformed("timestamp"))?;

        Ok(QuizResult {
            query: query.to_string(),
            correct_translation: self.correct_translation.clone().unwrap_or_default(),
            user_correct,
            timestamp,
        })
    }
}

/// Parse RFC 3339, or a naive ISO-8601 timestamp taken as local time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Some(resolve_local(Local.from_local_datetime(&naive), &naive))
}

/// Earliest instant for a local wall-clock time. A time skipped by a
/// daylight-saving jump has no local instant and is read as UTC.
fn resolve_local<Tz: TimeZone>(
    local: LocalResult<DateTime<Tz>>,
    naive: &NaiveDateTime,
) -> DateTime<Utc> {
    match local.earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => Utc.from_utc_datetime(naive),
    }
}

/// Outcome of one answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    pub query: String,
    pub correct_translation: String,
    pub user_correct: bool,
    pub timestamp: DateTime<Utc>,
}

impl QuizResult {
    pub fn new(
        query: impl Into<String>,
        correct_translation: impl Into<String>,
        user_correct: bool,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            query: query.into(),
            correct_translation: correct_translation.into(),
            user_correct,
            timestamp,
        }
    }

    pub fn to_record(&self) -> ResultRecord {
        ResultRecord {
            query: Some(self.query.clone()),
            correct_translation: Some(self.correct_translation.clone()),
            user_correct: Some(self.user_correct),
            timestamp: Some(self.timestamp.to_rfc3339()),
        }
    }
}

/// Attempt statistics over a set of results
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttemptStats {
    pub total_attempts: usize,
    pub correct_count: usize,
    pub incorrect_count: usize,
    pub accuracy_percent: f64,
}

impl AttemptStats {
    pub fn from_counts(total: usize, correct: usize) -> Self {
        let accuracy = if total > 0 {
            (correct as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        Self {
            total_attempts: total,
            correct_count: correct,
            incorrect_count: total - correct,
            accuracy_percent: accuracy,
        }
    }
}

/// Historical records (loaded at start, never modified except by
/// `discard_malformed`) followed by results recorded this session.
#[derive(Debug, Clone, Default)]
pub struct ResultLog {
    historical: Vec<ResultRecord>,
    session: Vec<QuizResult>,
}

impl ResultLog {
    pub fn new(historical: Vec<ResultRecord>) -> Self {
        Self {
            historical,
            session: Vec::new(),
        }
    }

    pub fn push(&mut self, result: QuizResult) {
        self.session.push(result);
    }

    pub fn historical(&self) -> &[ResultRecord] {
        &self.historical
    }

    pub fn session(&self) -> &[QuizResult] {
        &self.session
    }

    pub fn is_empty(&self) -> bool {
        self.historical.is_empty() && self.session.is_empty()
    }

    pub fn len(&self) -> usize {
        self.historical.len() + self.session.len()
    }

    /// Historical then session results, validating historical records on the way.
    pub fn results(&self) -> impl Iterator<Item = Result<QuizResult>> + '_ {
        self.historical
            .iter()
            .enumerate()
            .map(|(position, record)| record.parse(position))
            .chain(self.session.iter().cloned().map(Ok))
    }

    /// Drop historical records that fail validation. Returns how many were dropped.
    pub fn discard_malformed(&mut self) -> usize {
        let before = self.historical.len();
        let mut position = 0;
        self.historical.retain(|record| {
            let keep = record.parse(position).is_ok();
            position += 1;
            keep
        });
        let dropped = before - self.historical.len();
        if dropped > 0 {
            log::warn!("discarded {} malformed result records", dropped);
        }
        dropped
    }

    /// Statistics over every well-formed result in the log.
    pub fn stats(&self) -> AttemptStats {
        let (total, correct) = self
            .results()
            .filter_map(|r| r.ok())
            .fold((0, 0), |(total, correct), r| {
                (total + 1, correct + usize::from(r.user_correct))
            });
        AttemptStats::from_counts(total, correct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(query: &str, correct: bool, timestamp: &str) -> ResultRecord {
        ResultRecord {
            query: Some(query.to_string()),
            correct_translation: Some("x".to_string()),
            user_correct: Some(correct),
            timestamp: Some(timestamp.to_string()),
        }
    }

    #[test]
    fn parses_well_formed_record() {
        let result = record("Hund", true, "2024-03-01T10:00:00Z").parse(0).unwrap();
        assert_eq!(result.query, "Hund");
        assert!(result.user_correct);
        assert_eq!(result.timestamp, Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn accepts_naive_iso_timestamps() {
        assert!(parse_timestamp("2024-03-01T10:00:00.123456").is_some());
        assert!(parse_timestamp("2024-03-01T10:00:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn skipped_local_time_falls_back_to_utc() {
        let naive =
            NaiveDateTime::parse_from_str("2024-03-31T02:30:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        let gap: LocalResult<DateTime<Utc>> = LocalResult::None;
        assert_eq!(
            resolve_local(gap, &naive),
            Utc.with_ymd_and_hms(2024, 3, 31, 2, 30, 0).unwrap()
        );

        let east = chrono::FixedOffset::east_opt(3600).unwrap();
        let west = chrono::FixedOffset::east_opt(0).unwrap();
        let repeated = LocalResult::Ambiguous(
            east.from_local_datetime(&naive).unwrap(),
            west.from_local_datetime(&naive).unwrap(),
        );
        assert_eq!(
            resolve_local(repeated, &naive),
            Utc.with_ymd_and_hms(2024, 3, 31, 1, 30, 0).unwrap()
        );
        assert!(parse_timestamp("2024-03-31T02:30:00").is_some());
    }

    #[test]
    fn wrongly_typed_json_fields_become_malformed() {
        let value: Value = serde_json::from_str(
            r#"{"query": "개", "correct_translation": 3, "user_correct": "yes", "timestamp": "2024-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        let record = ResultRecord::from_json_value(&value);
        assert_eq!(record.query.as_deref(), Some("개"));
        assert_eq!(record.correct_translation, None);
        assert_eq!(record.user_correct, None);
        assert!(matches!(
            record.parse(7),
            Err(QuizError::MalformedRecord { position: 7, field: "user_correct" })
        ));

        let record = ResultRecord::from_json_value(&Value::String("not a record".into()));
        assert_eq!(record, ResultRecord::default());
    }

    #[test]
    fn reports_missing_fields() {
        let mut missing_query = record("Hund", true, "2024-03-01T10:00:00Z");
        missing_query.query = None;
        assert!(matches!(
            missing_query.parse(3),
            Err(QuizError::MalformedRecord { position: 3, field: "query" })
        ));

        let mut missing_flag = record("Hund", true, "2024-03-01T10:00:00Z");
        missing_flag.user_correct = None;
        assert!(matches!(
            missing_flag.parse(0),
            Err(QuizError::MalformedRecord { field: "user_correct", .. })
        ));

        let bad_time = record("Hund", true, "not a time");
        assert!(matches!(
            bad_time.parse(0),
            Err(QuizError::MalformedRecord { field: "timestamp", .. })
        ));
    }

    #[test]
    fn record_json_shape() {
        let json = r#"{"query": "개", "correct_translation": "Hund", "user_correct": false, "timestamp": "2024-03-01T10:00:00"}"#;
        let record: ResultRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.query.as_deref(), Some("개"));
        assert_eq!(record.user_correct, Some(false));

        let partial: ResultRecord = serde_json::from_str(r#"{"query": "개"}"#).unwrap();
        assert_eq!(partial.timestamp, None);
    }

    #[test]
    fn result_converts_back_to_record() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let result = QuizResult::new("개", "Hund", true, at);
        assert_eq!(result.to_record().parse(0).unwrap(), result);
    }

    #[test]
    fn discards_malformed_history_only() {
        let mut log = ResultLog::new(vec![
            record("Hund", true, "2024-03-01T10:00:00Z"),
            ResultRecord::default(),
            record("Katze", false, "2024-03-02T10:00:00Z"),
        ]);
        log.push(QuizResult::new("Maus", "쥐", true, Utc::now()));

        assert!(log.results().any(|r| r.is_err()));
        assert_eq!(log.discard_malformed(), 1);
        assert_eq!(log.len(), 3);
        assert!(log.results().all(|r| r.is_ok()));
    }

    #[test]
    fn stats_count_well_formed_results() {
        let mut log = ResultLog::new(vec![
            record("Hund", true, "2024-03-01T10:00:00Z"),
            record("Katze", false, "2024-03-02T10:00:00Z"),
            ResultRecord::default(),
        ]);
        log.push(QuizResult::new("Maus", "쥐", true, Utc::now()));

        let stats = log.stats();
        assert_eq!(stats.total_attempts, 3);
        assert_eq!(stats.correct_count, 2);
        assert_eq!(stats.incorrect_count, 1);
        assert!((stats.accuracy_percent - 66.666).abs() < 0.01);
        assert_eq!(ResultLog::default().stats(), AttemptStats::default());
    }
}
