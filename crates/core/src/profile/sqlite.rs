//! SQLite-backed profile store.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{CreateProfileRequest, Profile, ProfileError, ProfileStore, Skill};

/// SQLite-backed profile store.
pub struct SqliteProfileStore {
    conn: Mutex<Connection>,
}

impl SqliteProfileStore {
    /// Create a new store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, ProfileError> {
        let conn = Connection::open(path).map_err(|e| ProfileError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, ProfileError> {
        let conn =
            Connection::open_in_memory().map_err(|e| ProfileError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), ProfileError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                years_experience REAL NOT NULL,
                skills TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_profiles_created_at ON profiles(created_at);
            "#,
        )
        .map_err(|e| ProfileError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_profile(row: &rusqlite::Row) -> rusqlite::Result<Profile> {
        let id: String = row.get(0)?;
        let name: String = row.get(1)?;
        let years_experience: f64 = row.get(2)?;
        let skills_json: String = row.get(3)?;
        let created_at_str: String = row.get(4)?;
        let updated_at_str: String = row.get(5)?;

        let skills: Vec<Skill> = serde_json::from_str(&skills_json).unwrap_or_default();

        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());
        let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Profile {
            id,
            name,
            years_experience,
            skills,
            created_at,
            updated_at,
        })
    }
}

impl ProfileStore for SqliteProfileStore {
    fn create(&self, request: CreateProfileRequest) -> Result<Profile, ProfileError> {
        let conn = self.conn.lock().unwrap();

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        let skills_json = serde_json::to_string(&request.skills)
            .map_err(|e| ProfileError::Database(e.to_string()))?;

        conn.execute(
            "INSERT INTO profiles (id, name, years_experience, skills, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                id,
                request.name,
                request.years_experience,
                skills_json,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )
        .map_err(|e| ProfileError::Database(e.to_string()))?;

        Ok(Profile {
            id,
            name: request.name,
            years_experience: request.years_experience,
            skills: request.skills,
            created_at: now,
            updated_at: now,
        })
    }

    fn get(&self, id: &str) -> Result<Option<Profile>, ProfileError> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            "SELECT id, name, years_experience, skills, created_at, updated_at \
             FROM profiles WHERE id = ?",
            params![id],
            Self::row_to_profile,
        );

        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(ProfileError::Database(e.to_string())),
        }
    }

    fn list(&self) -> Result<Vec<Profile>, ProfileError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(
                "SELECT id, name, years_experience, skills, created_at, updated_at \
                 FROM profiles ORDER BY created_at DESC, id",
            )
            .map_err(|e| ProfileError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_profile)
            .map_err(|e| ProfileError::Database(e.to_string()))?;

        let mut profiles = Vec::new();
        for row_result in rows {
            profiles.push(row_result.map_err(|e| ProfileError::Database(e.to_string()))?);
        }

        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteProfileStore {
        SqliteProfileStore::in_memory().unwrap()
    }

    fn create_test_request() -> CreateProfileRequest {
        CreateProfileRequest {
            name: "Test User".to_string(),
            years_experience: 5.0,
            skills: vec![
                Skill {
                    name: "python".to_string(),
                    level: 4,
                },
                Skill {
                    name: "sql".to_string(),
                    level: 3,
                },
            ],
        }
    }

    #[test]
    fn test_create_profile() {
        let store = create_test_store();
        let profile = store.create(create_test_request()).unwrap();

        assert!(!profile.id.is_empty());
        assert_eq!(profile.name, "Test User");
        assert_eq!(profile.skills.len(), 2);
        assert_eq!(profile.skills[0].level, 4);
    }

    #[test]
    fn test_get_profile_roundtrips_skills() {
        let store = create_test_store();
        let created = store.create(create_test_request()).unwrap();

        let fetched = store.get(&created.id).unwrap().unwrap();
        assert_eq!(fetched.skills, created.skills);
        assert_eq!(fetched.years_experience, 5.0);
    }

    #[test]
    fn test_get_nonexistent_profile() {
        let store = create_test_store();
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_list_profiles() {
        let store = create_test_store();
        for i in 0..3 {
            let mut request = create_test_request();
            request.name = format!("User {i}");
            store.create(request).unwrap();
        }

        let profiles = store.list().unwrap();
        assert_eq!(profiles.len(), 3);
    }

    #[test]
    fn test_file_based_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("profiles.db");

        let store = SqliteProfileStore::new(&db_path).unwrap();
        let profile = store.create(create_test_request()).unwrap();

        assert!(db_path.exists());
        assert!(store.get(&profile.id).unwrap().is_some());
    }
}
