//! Repository implementations for the textdrop sharing service.

pub mod memory;
pub mod mysql;

pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;

pub use textdrop_core::repository::{Repository, StoreStats, TextRecord};
pub use textdrop_core::StorageError;
