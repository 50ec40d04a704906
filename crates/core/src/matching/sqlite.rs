//! SQLite-backed match store.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::posting::StoreError;

use super::store::{MatchFilter, MatchStore};
use super::types::{MatchBreakdown, MatchResult, StoredMatch};

const MATCH_COLUMNS: &str =
    "profile_id, posting_id, score, breakdown, missing_required_skills, computed_at";

/// SQLite-backed match store.
pub struct SqliteMatchStore {
    conn: Mutex<Connection>,
}

impl SqliteMatchStore {
    /// Create a new store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS matches (
                profile_id TEXT NOT NULL,
                posting_id TEXT NOT NULL,
                score REAL NOT NULL,
                breakdown TEXT NOT NULL,
                missing_required_skills TEXT NOT NULL DEFAULT '[]',
                computed_at TEXT NOT NULL,
                PRIMARY KEY (profile_id, posting_id)
            );

            CREATE INDEX IF NOT EXISTS idx_matches_profile_score
                ON matches(profile_id, score DESC);
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_match(row: &rusqlite::Row) -> rusqlite::Result<StoredMatch> {
        let profile_id: String = row.get(0)?;
        let posting_id: String = row.get(1)?;
        let score: f64 = row.get(2)?;
        let breakdown_json: String = row.get(3)?;
        let missing_json: String = row.get(4)?;
        let computed_at_str: String = row.get(5)?;

        let breakdown: MatchBreakdown =
            serde_json::from_str(&breakdown_json).unwrap_or(MatchBreakdown {
                required_skill_coverage: 0.0,
                preferred_skill_coverage: 0.0,
                experience_fit: 0.0,
                recency_factor: 0.0,
            });
        let missing_required_skills: Vec<String> =
            serde_json::from_str(&missing_json).unwrap_or_default();

        let computed_at = DateTime::parse_from_rfc3339(&computed_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(StoredMatch {
            result: MatchResult {
                profile_id,
                posting_id,
                score,
                breakdown,
                missing_required_skills,
            },
            computed_at,
        })
    }
}

impl MatchStore for SqliteMatchStore {
    fn upsert(&self, result: &MatchResult) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();

        let breakdown_json = serde_json::to_string(&result.breakdown)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let missing_json = serde_json::to_string(&result.missing_required_skills)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        // REPLACE keyed on (profile_id, posting_id): a recompute always
        // rewrites the full row, so score and breakdown move together.
        conn.execute(
            "INSERT OR REPLACE INTO matches \
             (profile_id, posting_id, score, breakdown, missing_required_skills, computed_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                result.profile_id,
                result.posting_id,
                result.score,
                breakdown_json,
                missing_json,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get(&self, profile_id: &str, posting_id: &str) -> Result<Option<StoredMatch>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            &format!(
                "SELECT {MATCH_COLUMNS} FROM matches WHERE profile_id = ? AND posting_id = ?"
            ),
            params![profile_id, posting_id],
            Self::row_to_match,
        );

        match result {
            Ok(stored) => Ok(Some(stored)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e.to_string())),
        }
    }

    fn list_for_profile(
        &self,
        profile_id: &str,
        filter: &MatchFilter,
    ) -> Result<Vec<StoredMatch>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut conditions = vec!["profile_id = ?"];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(profile_id.to_string())];

        if let Some(min_score) = filter.min_score {
            conditions.push("score >= ?");
            params.push(Box::new(min_score));
        }

        let mut sql = format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE {} \
             ORDER BY score DESC, posting_id",
            conditions.join(" AND ")
        );
        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit));
        }

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), Self::row_to_match)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut matches = Vec::new();
        for row_result in rows {
            matches.push(row_result.map_err(|e| StoreError::Database(e.to_string()))?);
        }

        Ok(matches)
    }
}
