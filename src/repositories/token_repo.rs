use chrono::Duration;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::Token;

#[derive(Clone)]
pub struct TokenRepository {
    pool: DbPool,
}

impl TokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Mint a token for a user and persist its digest.
    ///
    /// The plaintext only exists in the returned value; if the insert fails
    /// the caller never sees it.
    pub async fn create(&self, user_id: i64, ttl: Duration, scope: &str) -> Result<Token> {
        let token = Token::new(user_id, ttl, scope);

        let pool = self.pool.clone();
        let record = token.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO tokens (hash, user_id, scope, expiry) VALUES (?, ?, ?, ?)",
                rusqlite::params![record.hash, record.user_id, record.scope, record.expiry],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(token)
    }
}
