use crate::error::Result;
use crate::identifier::Identifier;
use crate::record::UrlRecord;
use async_trait::async_trait;
use std::sync::Arc;

/// Persists and retrieves `(identifier, url)` pairs.
///
/// Implementations must be safe for concurrent use. Each operation is
/// atomic from the caller's point of view.
#[async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    /// Stores `url` under `id`.
    ///
    /// What happens when `id` already exists is up to the backend.
    async fn put(&self, id: &Identifier, url: &str) -> Result<()>;

    /// Retrieves the url stored under `id`.
    /// Returns `None` if the identifier does not exist.
    async fn get(&self, id: &Identifier) -> Result<Option<String>>;

    /// Returns the recent-listing capability if the backend offers one.
    fn as_recent(&self) -> Option<&dyn RecentUrls> {
        None
    }
}

/// Optional capability: list the most recently created records.
#[async_trait]
pub trait RecentUrls: Send + Sync {
    /// Returns up to `limit` records, newest first.
    async fn list_recent(&self, limit: usize) -> Result<Vec<UrlRecord>>;
}

#[async_trait]
impl<T: StorageBackend + ?Sized> StorageBackend for Arc<T> {
    async fn put(&self, id: &Identifier, url: &str) -> Result<()> {
        (**self).put(id, url).await
    }

    async fn get(&self, id: &Identifier) -> Result<Option<String>> {
        (**self).get(id).await
    }

    fn as_recent(&self) -> Option<&dyn RecentUrls> {
        (**self).as_recent()
    }
}
