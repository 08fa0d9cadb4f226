//! Provides revocable object references to in-memory blobs.
//!
//! A [`BlobStore`] hands out [`ObjectUrl`] handles (`blob:shapecast/<id>`)
//! that a loader can resolve back to the blob. Dropping the handle revokes
//! the URL and releases the blob, so every decoded model is freed once the
//! scene that uses it is replaced or unmounted.
//!
//! # Examples
//! ```
//! use shapecast::codec::Blob;
//! use shapecast::viewer::blob::BlobStore;
//!
//! let store = BlobStore::new();
//! let url = store.create_object_url(Blob::new("model/gltf-binary", vec![1, 2]));
//! assert_eq!(store.resolve(url.as_str()).unwrap().len(), 2);
//!
//! let href = url.as_str().to_string();
//! drop(url);
//! assert!(store.resolve(&href).is_none());
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::codec::Blob;

/// Prefix of every object URL issued by a store.
pub const BLOB_URL_PREFIX: &str = "blob:shapecast/";

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    blobs: HashMap<u64, Arc<Blob>>,
}

/// Registry of live object URLs. Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct BlobStore {
    registry: Arc<Mutex<Registry>>,
}

impl BlobStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a blob and returns the handle that keeps it alive.
    pub fn create_object_url(&self, blob: Blob) -> ObjectUrl {
        let mut registry = self.registry.lock();
        registry.next_id += 1;
        let id = registry.next_id;
        log::debug!("Created {}{} ({} bytes)", BLOB_URL_PREFIX, id, blob.len());
        registry.blobs.insert(id, Arc::new(blob));
        ObjectUrl {
            id,
            href: format!("{}{}", BLOB_URL_PREFIX, id),
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Looks up the blob behind a URL. Revoked or foreign URLs resolve to `None`.
    pub fn resolve(&self, url: &str) -> Option<Arc<Blob>> {
        let id: u64 = url.strip_prefix(BLOB_URL_PREFIX)?.parse().ok()?;
        self.registry.lock().blobs.get(&id).cloned()
    }

    /// Returns the number of URLs that have not been revoked.
    pub fn live_count(&self) -> usize {
        self.registry.lock().blobs.len()
    }
}

/// A live object URL. Revoked when dropped.
#[derive(Debug)]
pub struct ObjectUrl {
    id: u64,
    href: String,
    registry: Weak<Mutex<Registry>>,
}

impl ObjectUrl {
    /// Returns the URL text.
    pub fn as_str(&self) -> &str {
        &self.href
    }
}

impl std::fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.href)
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().blobs.remove(&self.id);
            log::debug!("Revoked {}", self.href);
        }
    }
}
