//! SQLite-backed posting store.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};

use super::{InsertOutcome, NewPosting, Posting, PostingFilter, PostingStore, StoreError};

const POSTING_COLUMNS: &str = "id, url, employer, title, description, required_skills, \
     preferred_skills, experience_level, experience_years_range, location, source, \
     posted_date, active, created_at";

/// SQLite-backed posting store.
pub struct SqlitePostingStore {
    conn: Mutex<Connection>,
}

impl SqlitePostingStore {
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
            CREATE TABLE IF NOT EXISTS postings (
                id TEXT PRIMARY KEY,
                url TEXT NOT NULL UNIQUE,
                employer TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                required_skills TEXT NOT NULL DEFAULT '[]',
                preferred_skills TEXT NOT NULL DEFAULT '[]',
                experience_level TEXT,
                experience_years_range TEXT,
                location TEXT,
                source TEXT NOT NULL,
                posted_date TEXT,
                active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_postings_employer ON postings(employer COLLATE NOCASE);
            CREATE INDEX IF NOT EXISTS idx_postings_active ON postings(active);
            CREATE INDEX IF NOT EXISTS idx_postings_created_at ON postings(created_at);
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn build_where_clause(filter: &PostingFilter) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref employer) = filter.employer {
            conditions.push("employer = ? COLLATE NOCASE");
            params.push(Box::new(employer.clone()));
        }

        if filter.active_only {
            conditions.push("active = 1");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    fn row_to_posting(row: &rusqlite::Row) -> rusqlite::Result<Posting> {
        let id: String = row.get(0)?;
        let url: String = row.get(1)?;
        let employer: String = row.get(2)?;
        let title: String = row.get(3)?;
        let description: String = row.get(4)?;
        let required_skills_json: String = row.get(5)?;
        let preferred_skills_json: String = row.get(6)?;
        let experience_level: Option<String> = row.get(7)?;
        let experience_years_range: Option<String> = row.get(8)?;
        let location: Option<String> = row.get(9)?;
        let source: String = row.get(10)?;
        let posted_date_str: Option<String> = row.get(11)?;
        let active: bool = row.get(12)?;
        let created_at_str: String = row.get(13)?;

        let required_skills: Vec<String> =
            serde_json::from_str(&required_skills_json).unwrap_or_default();
        let preferred_skills: Vec<String> =
            serde_json::from_str(&preferred_skills_json).unwrap_or_default();

        let posted_date = posted_date_str.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok());

        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Posting {
            id,
            url,
            employer,
            title,
            description,
            required_skills,
            preferred_skills,
            experience_level,
            experience_years_range,
            location,
            source,
            posted_date,
            active,
            created_at,
        })
    }
}

impl PostingStore for SqlitePostingStore {
    fn insert_new(&self, posting: NewPosting) -> Result<InsertOutcome, StoreError> {
        let conn = self.conn.lock().unwrap();

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        let required_skills_json = serde_json::to_string(&posting.required_skills)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let preferred_skills_json = serde_json::to_string(&posting.preferred_skills)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        // INSERT OR IGNORE on the unique URL constraint is the atomic
        // insert-or-skip; rows-affected tells new from duplicate.
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO postings (id, url, employer, title, description, \
                 required_skills, preferred_skills, experience_level, experience_years_range, \
                 location, source, posted_date, active, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?)",
                params![
                    id,
                    posting.url,
                    posting.employer,
                    posting.title,
                    posting.description,
                    required_skills_json,
                    preferred_skills_json,
                    posting.experience_level,
                    posting.experience_years_range,
                    posting.location,
                    posting.source,
                    posting.posted_date.map(|d| d.format("%Y-%m-%d").to_string()),
                    now.to_rfc3339(),
                ],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if inserted == 0 {
            return Ok(InsertOutcome::Duplicate);
        }

        Ok(InsertOutcome::Inserted(Posting {
            id,
            url: posting.url,
            employer: posting.employer,
            title: posting.title,
            description: posting.description,
            required_skills: posting.required_skills,
            preferred_skills: posting.preferred_skills,
            experience_level: posting.experience_level,
            experience_years_range: posting.experience_years_range,
            location: posting.location,
            source: posting.source,
            posted_date: posting.posted_date,
            active: true,
            created_at: now,
        }))
    }

    fn get(&self, id: &str) -> Result<Option<Posting>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            &format!("SELECT {POSTING_COLUMNS} FROM postings WHERE id = ?"),
            params![id],
            Self::row_to_posting,
        );

        match result {
            Ok(posting) => Ok(Some(posting)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e.to_string())),
        }
    }

    fn get_by_url(&self, url: &str) -> Result<Option<Posting>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            &format!("SELECT {POSTING_COLUMNS} FROM postings WHERE url = ?"),
            params![url],
            Self::row_to_posting,
        );

        match result {
            Ok(posting) => Ok(Some(posting)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e.to_string())),
        }
    }

    fn list(&self, filter: &PostingFilter) -> Result<Vec<Posting>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!(
            "SELECT {POSTING_COLUMNS} FROM postings {where_clause} \
             ORDER BY created_at DESC, id LIMIT ? OFFSET ?"
        );

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut all_params: Vec<Box<dyn rusqlite::ToSql>> = params;
        all_params.push(Box::new(filter.limit));
        all_params.push(Box::new(filter.offset));

        let param_refs: Vec<&dyn rusqlite::ToSql> = all_params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), Self::row_to_posting)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut postings = Vec::new();
        for row_result in rows {
            postings.push(row_result.map_err(|e| StoreError::Database(e.to_string()))?);
        }

        Ok(postings)
    }

    fn count(&self, filter: &PostingFilter) -> Result<i64, StoreError> {
        let conn = self.conn.lock().unwrap();

        let (where_clause, params) = Self::build_where_clause(filter);
        let sql = format!("SELECT COUNT(*) FROM postings {where_clause}");

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn list_active(&self) -> Result<Vec<Posting>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {POSTING_COLUMNS} FROM postings WHERE active = 1 ORDER BY created_at DESC, id"
            ))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_posting)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut postings = Vec::new();
        for row_result in rows {
            postings.push(row_result.map_err(|e| StoreError::Database(e.to_string()))?);
        }

        Ok(postings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqlitePostingStore {
        SqlitePostingStore::in_memory().unwrap()
    }

    fn new_posting(url: &str, employer: &str) -> NewPosting {
        NewPosting {
            url: url.to_string(),
            employer: employer.to_string(),
            title: "Backend Engineer".to_string(),
            description: "Build and run backend services".to_string(),
            required_skills: vec!["rust".to_string(), "sql".to_string()],
            preferred_skills: vec!["kubernetes".to_string()],
            experience_level: Some("senior".to_string()),
            experience_years_range: Some("5-7".to_string()),
            location: Some("Berlin".to_string()),
            source: "board".to_string(),
            posted_date: NaiveDate::from_ymd_opt(2026, 8, 1),
        }
    }

    #[test]
    fn test_insert_new_posting() {
        let store = create_test_store();

        let outcome = store
            .insert_new(new_posting("https://b.example.com/j/1", "Acme"))
            .unwrap();

        match outcome {
            InsertOutcome::Inserted(posting) => {
                assert!(!posting.id.is_empty());
                assert_eq!(posting.employer, "Acme");
                assert!(posting.active);
                assert_eq!(posting.required_skills.len(), 2);
            }
            InsertOutcome::Duplicate => panic!("expected insert"),
        }
    }

    #[test]
    fn test_insert_same_url_twice_is_duplicate() {
        let store = create_test_store();

        let first = store
            .insert_new(new_posting("https://b.example.com/j/1", "Acme"))
            .unwrap();
        assert!(first.is_new());

        let second = store
            .insert_new(new_posting("https://b.example.com/j/1", "Globex"))
            .unwrap();
        assert!(!second.is_new());

        // Exactly one row exists, and it kept the first write.
        let count = store
            .count(&PostingFilter::new().include_inactive())
            .unwrap();
        assert_eq!(count, 1);
        let stored = store.get_by_url("https://b.example.com/j/1").unwrap().unwrap();
        assert_eq!(stored.employer, "Acme");
    }

    #[test]
    fn test_get_by_id_and_url() {
        let store = create_test_store();

        let InsertOutcome::Inserted(posting) = store
            .insert_new(new_posting("https://b.example.com/j/1", "Acme"))
            .unwrap()
        else {
            panic!("expected insert");
        };

        let by_id = store.get(&posting.id).unwrap().unwrap();
        assert_eq!(by_id.url, "https://b.example.com/j/1");
        assert_eq!(by_id.posted_date, NaiveDate::from_ymd_opt(2026, 8, 1));
        assert_eq!(by_id.preferred_skills, vec!["kubernetes".to_string()]);

        assert!(store.get("missing-id").unwrap().is_none());
        assert!(store.get_by_url("https://elsewhere.example.com").unwrap().is_none());
    }

    #[test]
    fn test_list_filters_by_employer_case_insensitive() {
        let store = create_test_store();
        store
            .insert_new(new_posting("https://b.example.com/j/1", "Acme"))
            .unwrap();
        store
            .insert_new(new_posting("https://b.example.com/j/2", "Globex"))
            .unwrap();

        let postings = store
            .list(&PostingFilter::new().with_employer("acme"))
            .unwrap();
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].employer, "Acme");
    }

    #[test]
    fn test_list_pagination() {
        let store = create_test_store();
        for i in 0..5 {
            store
                .insert_new(new_posting(&format!("https://b.example.com/j/{i}"), "Acme"))
                .unwrap();
        }

        let page = store
            .list(&PostingFilter::new().with_limit(2).with_offset(0))
            .unwrap();
        assert_eq!(page.len(), 2);

        let page = store
            .list(&PostingFilter::new().with_limit(2).with_offset(4))
            .unwrap();
        assert_eq!(page.len(), 1);
    }

    #[test]
    fn test_list_active_returns_everything_inserted() {
        let store = create_test_store();
        for i in 0..3 {
            store
                .insert_new(new_posting(&format!("https://b.example.com/j/{i}"), "Acme"))
                .unwrap();
        }

        let active = store.list_active().unwrap();
        assert_eq!(active.len(), 3);
        assert!(active.iter().all(|p| p.active));
    }

    #[test]
    fn test_file_based_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("postings.db");

        let store = SqlitePostingStore::new(&db_path).unwrap();
        store
            .insert_new(new_posting("https://b.example.com/j/1", "Acme"))
            .unwrap();

        assert!(db_path.exists());
        assert!(store.get_by_url("https://b.example.com/j/1").unwrap().is_some());
    }

    #[test]
    fn test_posting_without_optional_fields() {
        let store = create_test_store();
        let posting = NewPosting {
            url: "https://b.example.com/j/1".to_string(),
            employer: "Acme".to_string(),
            title: "Engineer".to_string(),
            description: String::new(),
            required_skills: vec![],
            preferred_skills: vec![],
            experience_level: None,
            experience_years_range: None,
            location: None,
            source: "board".to_string(),
            posted_date: None,
        };
        store.insert_new(posting).unwrap();

        let stored = store.get_by_url("https://b.example.com/j/1").unwrap().unwrap();
        assert!(stored.posted_date.is_none());
        assert!(stored.experience_level.is_none());
        assert!(stored.required_skills.is_empty());
    }
}
