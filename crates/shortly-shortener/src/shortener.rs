use crate::error::Result;
use async_trait::async_trait;
use shortly_core::{Identifier, UrlRecord};

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Saves a url and returns its newly generated identifier.
    async fn save(&self, url: &str) -> Result<Identifier>;

    /// Resolves an identifier to its saved url.
    /// Returns `None` if the identifier was never saved.
    async fn resolve(&self, id: &Identifier) -> Result<Option<String>>;

    /// Lists the most recently saved records, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<UrlRecord>>;
}
