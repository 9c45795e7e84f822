//! User Storage
//! Mission: Store and look up user accounts with SQLite

use crate::auth::models::{User, UserRole};
use crate::config::SeedUser;
use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::info;
use uuid::Uuid;

/// User storage with SQLite backend
pub struct UserStore {
    db_path: String,
}

impl UserStore {
    /// Create a new user store and initialize database
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    /// Initialize database schema
    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Insert configured users that are not present yet
    ///
    /// Idempotent: running it again against the same database is a no-op.
    pub fn seed_users(&self, seeds: &[SeedUser]) -> Result<()> {
        for seed in seeds {
            if self.get_user_by_username(&seed.username)?.is_some() {
                continue;
            }

            self.create_user(&seed.username, &seed.password, seed.role)?;
            info!("🌱 Seeded user: {} ({})", seed.username, seed.role.as_str());
        }

        Ok(())
    }

    /// Get user by username
    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, username, password_hash, role, created_at
             FROM users WHERE username = ?1",
        )?;

        let user_result = stmt.query_row(params![username], |row| {
            let role_str: String = row.get(3)?;
            Ok(User {
                id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
                username: row.get(1)?,
                password_hash: row.get(2)?,
                role: UserRole::from_str(&role_str).unwrap_or(UserRole::User),
                created_at: row.get(4)?,
            })
        });

        match user_result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Check a plaintext password against a stored user's hash
    pub fn verify_password(user: &User, password: &str) -> Result<bool> {
        verify(password, &user.password_hash).context("Failed to verify password")
    }

    /// Create a new user
    pub fn create_user(&self, username: &str, password: &str, role: UserRole) -> Result<User> {
        let password_hash = hash(password, DEFAULT_COST).context("Failed to hash password")?;

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash,
            role,
            created_at: Utc::now().to_rfc3339(),
        };

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "INSERT INTO users (id, username, password_hash, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.id.to_string(),
                user.username,
                user.password_hash,
                user.role.as_str(),
                user.created_at,
            ],
        )
        .context("Failed to insert user")?;

        info!(
            "✅ Created user: {} ({})",
            user.username,
            user.role.as_str()
        );

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (UserStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap();
        let store = UserStore::new(db_path).unwrap();
        (store, temp_file)
    }

    fn default_seeds() -> Vec<SeedUser> {
        vec![
            SeedUser {
                username: "admin".to_string(),
                password: "123456".to_string(),
                role: UserRole::Admin,
            },
            SeedUser {
                username: "user".to_string(),
                password: "password".to_string(),
                role: UserRole::User,
            },
        ]
    }

    #[test]
    fn test_seeding_creates_configured_users() {
        let (store, _temp) = create_test_store();
        store.seed_users(&default_seeds()).unwrap();

        let admin = store.get_user_by_username("admin").unwrap().unwrap();
        assert_eq!(admin.username, "admin");
        assert_eq!(admin.role, UserRole::Admin);

        let user = store.get_user_by_username("user").unwrap().unwrap();
        assert_eq!(user.role, UserRole::User);
    }

    #[test]
    fn test_seeding_is_idempotent() {
        let (store, _temp) = create_test_store();
        store.seed_users(&default_seeds()).unwrap();

        let admin_before = store.get_user_by_username("admin").unwrap().unwrap();

        // Second run must not fail or replace existing rows
        store.seed_users(&default_seeds()).unwrap();

        let admin_after = store.get_user_by_username("admin").unwrap().unwrap();
        assert_eq!(admin_before.id, admin_after.id);
        assert_eq!(admin_before.password_hash, admin_after.password_hash);
    }

    #[test]
    fn test_password_verification() {
        let (store, _temp) = create_test_store();
        let user = store
            .create_user("alice", "s3cret-pass", UserRole::User)
            .unwrap();

        assert!(UserStore::verify_password(&user, "s3cret-pass").unwrap());
        assert!(!UserStore::verify_password(&user, "wrongpassword").unwrap());
    }

    #[test]
    fn test_unknown_user_lookup_returns_none() {
        let (store, _temp) = create_test_store();
        assert!(store.get_user_by_username("nonexistent").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let (store, _temp) = create_test_store();
        store.create_user("alice", "pass", UserRole::User).unwrap();

        assert!(store.create_user("alice", "other", UserRole::Admin).is_err());
    }
}
