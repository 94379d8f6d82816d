//! Core types and traits for the shortly URL shortener.
//!
//! This crate provides the identifier type, the stored record and the
//! storage capability traits shared by the generator, the storage and
//! cache backends, and the shortener service.

pub mod backend;
pub mod error;
pub mod identifier;
pub mod record;

pub use backend::{RecentUrls, StorageBackend};
pub use error::{CoreError, StorageError};
pub use identifier::Identifier;
pub use record::UrlRecord;
