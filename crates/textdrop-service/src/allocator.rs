use crate::storage_to_share_error;
use std::sync::Arc;
use textdrop_core::error::ShareError;
use textdrop_core::repository::Repository;
use textdrop_core::ShareCode;
use textdrop_generator::CodeGenerator;
use tracing::debug;

/// Allocates share codes no stored record currently holds.
///
/// Draws candidates from the generator and checks each against the
/// repository, regenerating on collision up to a fixed attempt bound.
/// The existence check looks at the code column only, so an
/// expired-but-unswept row still counts as a collision; that costs a
/// retry, never correctness, and the sweep removes the row later.
#[derive(Debug)]
pub struct CodeAllocator<G> {
    generator: Arc<G>,
    max_attempts: usize,
}

impl<G: CodeGenerator> CodeAllocator<G> {
    /// Creates an allocator with the given attempt ceiling.
    pub fn new(generator: Arc<G>, max_attempts: usize) -> Self {
        Self {
            generator,
            max_attempts,
        }
    }

    /// Allocates a code that is free in the repository at check time.
    ///
    /// Exhausting the attempt bound fails the current request with
    /// `CodeSpaceExhausted`; there is no backoff and no escalation.
    pub async fn allocate<R: Repository>(&self, repository: &R) -> Result<ShareCode, ShareError> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.generator.generate();

            let taken = repository
                .exists(&candidate)
                .await
                .map_err(storage_to_share_error)?;

            if !taken {
                return Ok(candidate);
            }

            debug!(code = %candidate, attempt, "share code collision, regenerating");
        }

        Err(ShareError::CodeSpaceExhausted {
            attempts: self.max_attempts,
        })
    }
}
