use crate::allocator::CodeAllocator;
use crate::storage_to_share_error;
use async_trait::async_trait;
use jiff::SignedDuration;
use std::sync::Arc;
use textdrop_core::clock::{Clock, SystemClock};
use textdrop_core::error::ShareError;
use textdrop_core::repository::{Repository, StoreStats, TextRecord};
use textdrop_core::sharing::{TextSharing, TextStats};
use textdrop_core::ShareCode;
use textdrop_generator::CodeGenerator;
use tracing::warn;
use typed_builder::TypedBuilder;

type Result<T> = std::result::Result<T, ShareError>;

/// Configures a [`SharingService`] instance.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct SharingSettings {
    /// How long a shared text stays retrievable. Set once at creation,
    /// never extended by updates.
    #[builder(default = SignedDuration::from_hours(1))]
    pub ttl: SignedDuration,
    /// Attempt ceiling for the code allocation loop.
    #[builder(default = 10)]
    pub max_attempts: usize,
}

impl Default for SharingSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the [`TextSharing`] trait.
///
/// Wraps a `Repository`, a `CodeGenerator`, and a `Clock` to handle:
/// - unique code allocation with bounded retry on collision
/// - opportunistic sweeping of expired rows before every operation
/// - the read-time expiry double-check, so correctness never depends
///   on sweep timing
#[derive(Debug)]
pub struct SharingService<R, G, C = SystemClock> {
    repository: Arc<R>,
    allocator: CodeAllocator<G>,
    clock: C,
    ttl: SignedDuration,
}

impl<R: Repository, G: CodeGenerator> SharingService<R, G, SystemClock> {
    /// Creates a service with default settings and the system clock.
    pub fn new(repository: R, generator: G) -> Self {
        Self::with_settings(repository, generator, SharingSettings::default())
    }

    /// Creates a service with custom settings and the system clock.
    pub fn with_settings(repository: R, generator: G, settings: SharingSettings) -> Self {
        Self::with_clock(repository, generator, settings, SystemClock)
    }
}

impl<R: Repository, G: CodeGenerator, C: Clock> SharingService<R, G, C> {
    fn with_clock(repository: R, generator: G, settings: SharingSettings, clock: C) -> Self {
        Self {
            repository: Arc::new(repository),
            allocator: CodeAllocator::new(Arc::new(generator), settings.max_attempts),
            clock,
            ttl: settings.ttl,
        }
    }

    /// Deletes every row whose expiry is strictly in the past.
    ///
    /// Best-effort: cleanup failures are logged and swallowed, since
    /// expiry is enforced again at read time.
    async fn sweep(&self) {
        if let Err(err) = self.repository.delete_expired(self.clock.now()).await {
            warn!(error = %err, "failed to sweep expired records");
        }
    }

    /// Removes a row the sweep missed, so a later allocation check
    /// won't see it. Failures are logged; the caller still reports
    /// absence.
    async fn delete_stale(&self, code: &ShareCode) {
        if let Err(err) = self.repository.delete(code).await {
            warn!(%code, error = %err, "failed to delete expired record");
        }
    }

    /// Total and expired row counts, as currently stored.
    ///
    /// Deliberately skips the sweep pre-step: the expired column would
    /// otherwise always read zero.
    pub async fn store_stats(&self) -> Result<StoreStats> {
        self.repository
            .count(self.clock.now())
            .await
            .map_err(storage_to_share_error)
    }
}

#[async_trait]
impl<R: Repository, G: CodeGenerator, C: Clock> TextSharing for SharingService<R, G, C> {
    async fn share(&self, content: String) -> Result<ShareCode> {
        self.sweep().await;

        let code = self.allocator.allocate(self.repository.as_ref()).await?;

        let record = TextRecord {
            content,
            expires_at: self.clock.now() + self.ttl,
        };

        self.repository
            .insert(&code, record)
            .await
            .map_err(storage_to_share_error)?;

        Ok(code)
    }

    async fn retrieve(&self, code: &ShareCode) -> Result<Option<String>> {
        self.sweep().await;

        let Some(record) = self
            .repository
            .get(code)
            .await
            .map_err(storage_to_share_error)?
        else {
            return Ok(None);
        };

        if record.is_expired_at(self.clock.now()) {
            self.delete_stale(code).await;
            return Ok(None);
        }

        Ok(Some(record.content))
    }

    async fn update(&self, code: &ShareCode, content: String) -> Result<bool> {
        self.sweep().await;

        // Re-validate through the read path so an unknown or expired
        // code reports failure without mutating anything.
        if self.retrieve(code).await?.is_none() {
            return Ok(false);
        }

        self.repository
            .update_content(code, &content)
            .await
            .map_err(storage_to_share_error)
    }

    async fn stat(&self, code: &ShareCode) -> Result<TextStats> {
        self.sweep().await;

        let Some(record) = self
            .repository
            .get(code)
            .await
            .map_err(storage_to_share_error)?
        else {
            return Ok(TextStats {
                expires_at: None,
                expired: true,
            });
        };

        let expired = record.is_expired_at(self.clock.now());
        if expired {
            self.delete_stale(code).await;
        }

        // The stale timestamp is surfaced even when the row was just
        // deleted.
        Ok(TextStats {
            expires_at: Some(record.expires_at),
            expired,
        })
    }
}
