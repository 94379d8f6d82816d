mod url_id;

#[cfg(test)]
mod property_tests;

pub use url_id::{url_suffix, UrlIdGenerator};

use shortly_core::Identifier;

/// Trait for generating identifiers for urls.
///
/// Implementations are pure generators that don't interact with storage.
/// Nothing checks whether a generated identifier is already taken.
pub trait Generator: Send + Sync + 'static {
    /// Generates an identifier for `url`.
    fn generate(&self, url: &str) -> Identifier;
}
