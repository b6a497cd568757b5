use chrono::Utc;
use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::token;
use crate::models::{FromSqliteRow, Password, User};

#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password: &str,
        bio: &str,
    ) -> Result<User> {
        let password_hash = Password::set(password)?;
        let now = Utc::now();

        let mut user = User {
            id: 0,
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            bio: bio.to_string(),
            created_at: now,
            updated_at: now,
        };

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<User> {
            let conn = pool.get()?;
            let inserted = conn.execute(
                "INSERT INTO users (username, email, password_hash, bio, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    user.username,
                    user.email,
                    user.password_hash.as_str(),
                    user.bio,
                    user.created_at,
                    user.updated_at
                ],
            );

            match inserted {
                Ok(_) => {
                    user.id = conn.last_insert_rowid();
                    Ok(user)
                }
                Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(
                    "username or email already in use".to_string(),
                )),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let pool = self.pool.clone();
        let username = username.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM users WHERE username = ?")?;
            let result = stmt.query_row([&username], User::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Update username, email and bio in place. Zero affected rows means the
    /// user no longer exists and surfaces as a not-found error.
    pub async fn update(&self, user: &User) -> Result<()> {
        let pool = self.pool.clone();
        let id = user.id;
        let username = user.username.clone();
        let email = user.email.clone();
        let bio = user.bio.clone();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "UPDATE users SET username = ?, email = ?, bio = ?, updated_at = ? WHERE id = ?",
                rusqlite::params![username, email, bio, now, id],
            )?;
            if rows == 0 {
                return Err(AppError::NotFound("user not found".to_string()));
            }
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Resolve a presented token plaintext to its user.
    ///
    /// `Ok(None)` covers every unauthenticated case the same way: never
    /// issued, wrong scope, or expired. Errors are reserved for the store
    /// itself failing.
    pub async fn get_user_for_token(&self, scope: &str, plaintext: &str) -> Result<Option<User>> {
        let hash = token::digest(plaintext);
        let scope = scope.to_string();
        let now = Utc::now();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT u.id, u.username, u.email, u.password_hash, u.bio, u.created_at, u.updated_at
                 FROM users u
                 INNER JOIN tokens t ON t.user_id = u.id
                 WHERE t.hash = ? AND t.scope = ? AND t.expiry > ?",
            )?;
            let result = stmt
                .query_row(rusqlite::params![hash, scope, now], User::from_row)
                .optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
