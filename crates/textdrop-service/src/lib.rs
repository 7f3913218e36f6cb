//! Sharing service implementation.
//!
//! This crate composes the code generator and the repository into the
//! four operations exposed to a presentation layer: share, retrieve,
//! update, and stat. Core types are re-exported from `textdrop_core`.

pub mod allocator;
pub mod service;

pub use allocator::CodeAllocator;
pub use service::{SharingService, SharingSettings};

pub use textdrop_core::{ShareCode, ShareError, TextSharing, TextStats};

use textdrop_core::StorageError;

/// Converts a StorageError into the operation-boundary error.
///
/// Every datastore failure collapses into `ShareError::Storage`; callers
/// report a generic failure regardless of the backend cause.
pub(crate) fn storage_to_share_error(e: StorageError) -> ShareError {
    ShareError::Storage(e.to_string())
}
