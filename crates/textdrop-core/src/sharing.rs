use crate::code::ShareCode;
use crate::error::ShareError;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, ShareError>;

/// Expiry status of a share code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    /// When the record expires, if a row was found. A stale timestamp
    /// is still surfaced when expiry is detected at stat time.
    pub expires_at: Option<Timestamp>,
    /// Whether the code is expired (or was never shared).
    pub expired: bool,
}

/// The four operations exposed to a presentation layer.
#[async_trait]
pub trait TextSharing: Send + Sync + 'static {
    /// Shares a text and returns the freshly allocated code.
    async fn share(&self, content: String) -> Result<ShareCode>;

    /// Retrieves the text behind a code.
    /// Returns `None` if the code is unknown or expired.
    async fn retrieve(&self, code: &ShareCode) -> Result<Option<String>>;

    /// Overwrites the text behind a live code, leaving its expiry
    /// unchanged. Returns `false` if the code is unknown or expired.
    async fn update(&self, code: &ShareCode, content: String) -> Result<bool>;

    /// Reports the expiry status of a code.
    async fn stat(&self, code: &ShareCode) -> Result<TextStats>;
}
