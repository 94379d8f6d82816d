use async_trait::async_trait;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use jiff::Timestamp;
use shortly_core::error::{Result, StorageError};
use shortly_core::{Identifier, RecentUrls, StorageBackend, UrlRecord};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory storage entry for a url mapping.
#[derive(Debug, Clone)]
struct Entry {
    url: String,
    created_at: Timestamp,
    /// Insertion order; breaks ties between equal timestamps.
    seq: u64,
}

/// In-memory implementation of [`StorageBackend`] using DashMap.
///
/// Intended for tests and single-process deployments. Inserting an
/// identifier that already exists fails with [`StorageError::Conflict`].
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    storage: DashMap<String, Entry>,
    next_seq: AtomicU64,
}

impl InMemoryBackend {
    /// Creates a new in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl StorageBackend for InMemoryBackend {
    async fn put(&self, id: &Identifier, url: &str) -> Result<()> {
        match self.storage.entry(id.as_str().to_owned()) {
            MapEntry::Occupied(_) => Err(StorageError::Conflict(id.to_string())),
            MapEntry::Vacant(slot) => {
                slot.insert(Entry {
                    url: url.to_owned(),
                    created_at: Timestamp::now(),
                    seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
                });
                Ok(())
            }
        }
    }

    async fn get(&self, id: &Identifier) -> Result<Option<String>> {
        Ok(self
            .storage
            .get(id.as_str())
            .map(|entry| entry.url.clone()))
    }

    fn as_recent(&self) -> Option<&dyn RecentUrls> {
        Some(self)
    }
}

#[async_trait]
impl RecentUrls for InMemoryBackend {
    async fn list_recent(&self, limit: usize) -> Result<Vec<UrlRecord>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        // Min-heap of the `limit` highest sequence numbers seen so far.
        let mut newest: BinaryHeap<Reverse<(u64, String)>> = BinaryHeap::with_capacity(limit);
        for item in self.storage.iter() {
            let seq = item.value().seq;
            if newest.len() < limit {
                newest.push(Reverse((seq, item.key().clone())));
            } else if newest.peek().is_some_and(|Reverse((min, _))| seq > *min) {
                newest.pop();
                newest.push(Reverse((seq, item.key().clone())));
            }
        }

        Ok(newest
            .into_sorted_vec()
            .into_iter()
            .filter_map(|Reverse((_, id))| {
                let entry = self.storage.get(&id)?;
                Some(UrlRecord {
                    url: entry.url.clone(),
                    created_at: entry.created_at,
                    id: Identifier::new_unchecked(id),
                })
            })
            .collect())
    }
}
