use crate::code::ShareCode;
use crate::error::StorageError;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored shared-text record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    /// The shared text content.
    pub content: String,
    /// When the record expires. Set once at creation, never extended.
    pub expires_at: Timestamp,
}

impl TextRecord {
    /// Whether the record is expired at `now`.
    ///
    /// Expiry is strict-after: at exactly `expires_at` the record is
    /// still live.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }
}

/// Row counts for the `shared_texts` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// All physically present rows, expired or not.
    pub total: u64,
    /// Rows whose `expires_at` is strictly in the past.
    pub expired: u64,
}

/// CRUD contract over the single `shared_texts` table.
///
/// Implementations are plain row stores: `get` returns whatever row is
/// physically present, expired or not, and `exists` checks the code
/// column only. Expiry policy (the read-time double-check and the
/// opportunistic sweep) belongs to the service layer.
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    /// Inserts a new record. Returns `Err(Conflict)` if a row with the
    /// code already exists, expired or not.
    async fn insert(&self, code: &ShareCode, record: TextRecord) -> Result<()>;

    /// Retrieves the record for a code, ignoring expiry.
    /// Returns `None` if no row is physically present.
    async fn get(&self, code: &ShareCode) -> Result<Option<TextRecord>>;

    /// Checks whether any row holds the code. Expiry is deliberately
    /// not consulted: an expired-but-unswept row still counts.
    async fn exists(&self, code: &ShareCode) -> Result<bool>;

    /// Overwrites the content of an existing row, leaving `expires_at`
    /// untouched. Returns `true` if a row was matched.
    async fn update_content(&self, code: &ShareCode, content: &str) -> Result<bool>;

    /// Deletes the row for a code. Returns `true` if a row was removed.
    async fn delete(&self, code: &ShareCode) -> Result<bool>;

    /// Deletes every row with `expires_at` strictly before `now`.
    /// Returns the number of rows removed.
    async fn delete_expired(&self, now: Timestamp) -> Result<u64>;

    /// Counts total and expired rows as of `now`.
    async fn count(&self, now: Timestamp) -> Result<StoreStats>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;

    #[test]
    fn expiry_is_strictly_after() {
        let expires_at = Timestamp::from_second(1_000).unwrap();
        let record = TextRecord {
            content: "hello".to_string(),
            expires_at,
        };

        assert!(!record.is_expired_at(expires_at - SignedDuration::from_secs(1)));
        assert!(!record.is_expired_at(expires_at));
        assert!(record.is_expired_at(expires_at + SignedDuration::from_secs(1)));
    }
}
