use async_trait::async_trait;
use dashmap::DashMap;
use jiff::Timestamp;
use textdrop_core::error::StorageError;
use textdrop_core::repository::{Repository, Result, StoreStats, TextRecord};
use textdrop_core::ShareCode;

/// In-memory implementation of the [`Repository`] contract using DashMap.
///
/// A plain row store, like the MySQL backend: rows stay physically
/// present after expiry until `delete_expired` or a read-path delete
/// removes them, and `insert` conflicts on any existing row for the
/// code, expired or not. This keeps service tests against the fake
/// faithful to the real backend.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: DashMap<String, TextRecord>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Number of physically present rows, expired or not.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Whether the repository holds no rows.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, code: &ShareCode, record: TextRecord) -> Result<()> {
        let key = code.as_str().to_owned();

        if self.storage.contains_key(&key) {
            return Err(StorageError::Conflict(code.to_string()));
        }

        self.storage.insert(key, record);
        Ok(())
    }

    async fn get(&self, code: &ShareCode) -> Result<Option<TextRecord>> {
        Ok(self
            .storage
            .get(code.as_str())
            .map(|entry| entry.value().clone()))
    }

    async fn exists(&self, code: &ShareCode) -> Result<bool> {
        Ok(self.storage.contains_key(code.as_str()))
    }

    async fn update_content(&self, code: &ShareCode, content: &str) -> Result<bool> {
        let Some(mut entry) = self.storage.get_mut(code.as_str()) else {
            return Ok(false);
        };

        entry.content = content.to_owned();
        Ok(true)
    }

    async fn delete(&self, code: &ShareCode) -> Result<bool> {
        Ok(self.storage.remove(code.as_str()).is_some())
    }

    async fn delete_expired(&self, now: Timestamp) -> Result<u64> {
        let mut removed = 0;
        self.storage.retain(|_, record| {
            if record.expires_at < now {
                removed += 1;
                false
            } else {
                true
            }
        });
        Ok(removed)
    }

    async fn count(&self, now: Timestamp) -> Result<StoreStats> {
        let total = self.storage.len() as u64;
        let expired = self
            .storage
            .iter()
            .filter(|entry| entry.expires_at < now)
            .count() as u64;
        Ok(StoreStats { total, expired })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;

    fn code(s: &str) -> ShareCode {
        ShareCode::new_unchecked(s)
    }

    fn record(content: &str, expires_at: Timestamp) -> TextRecord {
        TextRecord {
            content: content.to_string(),
            expires_at,
        }
    }

    fn at(second: i64) -> Timestamp {
        Timestamp::from_second(second).unwrap()
    }

    #[tokio::test]
    async fn insert_and_get() {
        let repo = InMemoryRepository::new();

        repo.insert(&code("AB3K9"), record("hello", at(3_600)))
            .await
            .unwrap();

        let got = repo.get(&code("AB3K9")).await.unwrap().unwrap();
        assert_eq!(got.content, "hello");
        assert_eq!(got.expires_at, at(3_600));
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let repo = InMemoryRepository::new();

        assert!(repo.get(&code("ZZZZZ")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_conflicts_on_existing_code() {
        let repo = InMemoryRepository::new();

        repo.insert(&code("AB3K9"), record("first", at(3_600)))
            .await
            .unwrap();

        let err = repo
            .insert(&code("AB3K9"), record("second", at(3_600)))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[tokio::test]
    async fn insert_conflicts_even_when_existing_row_is_expired() {
        let repo = InMemoryRepository::new();

        repo.insert(&code("AB3K9"), record("stale", at(10)))
            .await
            .unwrap();

        // An expired-but-unswept row still occupies the code.
        let err = repo
            .insert(&code("AB3K9"), record("fresh", at(3_600)))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[tokio::test]
    async fn get_returns_expired_rows_unfiltered() {
        let repo = InMemoryRepository::new();

        repo.insert(&code("AB3K9"), record("stale", at(10)))
            .await
            .unwrap();

        let got = repo.get(&code("AB3K9")).await.unwrap().unwrap();
        assert_eq!(got.content, "stale");
    }

    #[tokio::test]
    async fn exists_ignores_expiry() {
        let repo = InMemoryRepository::new();

        assert!(!repo.exists(&code("AB3K9")).await.unwrap());

        repo.insert(&code("AB3K9"), record("stale", at(10)))
            .await
            .unwrap();

        assert!(repo.exists(&code("AB3K9")).await.unwrap());
    }

    #[tokio::test]
    async fn update_content_overwrites_and_keeps_expiry() {
        let repo = InMemoryRepository::new();

        repo.insert(&code("AB3K9"), record("hello", at(3_600)))
            .await
            .unwrap();

        assert!(repo.update_content(&code("AB3K9"), "world").await.unwrap());

        let got = repo.get(&code("AB3K9")).await.unwrap().unwrap();
        assert_eq!(got.content, "world");
        assert_eq!(got.expires_at, at(3_600));
    }

    #[tokio::test]
    async fn update_content_on_missing_row() {
        let repo = InMemoryRepository::new();

        assert!(!repo.update_content(&code("ZZZZZ"), "world").await.unwrap());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn delete_existing() {
        let repo = InMemoryRepository::new();

        repo.insert(&code("AB3K9"), record("hello", at(3_600)))
            .await
            .unwrap();

        assert!(repo.delete(&code("AB3K9")).await.unwrap());
        assert!(repo.get(&code("AB3K9")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_nonexistent() {
        let repo = InMemoryRepository::new();

        assert!(!repo.delete(&code("ZZZZZ")).await.unwrap());
    }

    #[tokio::test]
    async fn delete_expired_removes_only_strictly_past_rows() {
        let repo = InMemoryRepository::new();
        let now = at(100);

        repo.insert(&code("OLD01"), record("old", at(99)))
            .await
            .unwrap();
        repo.insert(&code("EDGE1"), record("edge", now))
            .await
            .unwrap();
        repo.insert(&code("NEW01"), record("new", at(101)))
            .await
            .unwrap();

        let removed = repo.delete_expired(now).await.unwrap();
        assert_eq!(removed, 1);

        assert!(repo.get(&code("OLD01")).await.unwrap().is_none());
        // A row expiring exactly at `now` is not yet expired.
        assert!(repo.get(&code("EDGE1")).await.unwrap().is_some());
        assert!(repo.get(&code("NEW01")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn count_splits_total_and_expired() {
        let repo = InMemoryRepository::new();
        let now = at(100);

        repo.insert(&code("OLD01"), record("old", at(50)))
            .await
            .unwrap();
        repo.insert(&code("NEW01"), record("new", at(200)))
            .await
            .unwrap();

        let stats = repo.count(now).await.unwrap();
        assert_eq!(stats, StoreStats { total: 2, expired: 1 });
    }

    #[tokio::test]
    async fn concurrent_access() {
        use std::sync::Arc;

        let repo = Arc::new(InMemoryRepository::new());
        let mut handles = vec![];

        for i in 0..10u64 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                let c = ShareCode::new_unchecked(format!("CO{:03}", i));
                let r = TextRecord {
                    content: format!("text {}", i),
                    expires_at: Timestamp::from_second(3_600).unwrap(),
                };
                repo.insert(&c, r).await.unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..10u64 {
            let c = ShareCode::new_unchecked(format!("CO{:03}", i));
            let got = repo.get(&c).await.unwrap().unwrap();
            assert_eq!(got.content, format!("text {}", i));
        }
    }
}
