//! Storage backends of record for the shortly URL shortener.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryBackend;
pub use postgres::PostgresBackend;
pub use shortly_core::{RecentUrls, StorageBackend, StorageError};
