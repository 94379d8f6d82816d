use crate::identifier::Identifier;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A saved url together with its identifier.
///
/// `created_at` is assigned by the storage backend that persisted the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub id: Identifier,
    pub url: String,
    pub created_at: Timestamp,
}
