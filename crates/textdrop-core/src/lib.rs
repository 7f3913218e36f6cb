//! Core types and traits for the textdrop sharing service.
//!
//! This crate provides the shared vocabulary used by the generator,
//! storage, and service crates: the validated share code, the stored
//! record, the repository contract, and the error taxonomy.

pub mod clock;
pub mod code;
pub mod error;
pub mod repository;
pub mod sharing;

pub use clock::{Clock, SystemClock};
pub use code::ShareCode;
pub use error::{CoreError, ShareError, StorageError};
pub use repository::{Repository, StoreStats, TextRecord};
pub use sharing::{TextSharing, TextStats};
