use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Scope tag for tokens minted by the login flow.
pub const SCOPE_AUTHENTICATION: &str = "authentication";

/// A freshly minted bearer token.
///
/// The plaintext exists only in this value on its way back to the client;
/// storage only ever sees the digest.
#[derive(Debug, Clone)]
pub struct Token {
    pub plaintext: String,
    pub hash: Vec<u8>,
    pub user_id: i64,
    pub scope: String,
    pub expiry: DateTime<Utc>,
}

impl Token {
    pub fn new(user_id: i64, ttl: Duration, scope: &str) -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        let plaintext = URL_SAFE_NO_PAD.encode(bytes);

        Self {
            hash: digest(&plaintext),
            plaintext,
            user_id,
            scope: scope.to_string(),
            expiry: Utc::now() + ttl,
        }
    }
}

/// Fixed-size one-way digest of a token plaintext, the only form persisted.
pub fn digest(plaintext: &str) -> Vec<u8> {
    Sha256::digest(plaintext.as_bytes()).to_vec()
}
