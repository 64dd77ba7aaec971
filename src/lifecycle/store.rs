//! Backing stores for local resource handles.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

/// In-process reference to binary data held for the lifetime of a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceUrl(String);

impl ResourceUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised while creating a resource handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The platform refused to create the handle
    #[error("failed to create resource handle: {0}")]
    Create(String),
}

/// Creates and revokes resource handles.
pub trait ResourceStore: Send + Sync {
    /// Create one handle for `data`.
    fn create(&self, data: &[u8], mime: &str) -> Result<ResourceUrl, StoreError>;

    /// Revoke a handle. Called at most once per handle by the lifecycle manager.
    fn revoke(&self, url: &ResourceUrl);
}

/// Bytes held behind a [`MemoryResourceStore`] handle.
#[derive(Debug, Clone)]
pub struct StoredResource {
    pub data: Arc<[u8]>,
    pub mime: String,
}

/// Native store keeping payloads in memory under `blob:docview/<n>` URLs.
///
/// The shell resolves URLs back to bytes with [`MemoryResourceStore::get`].
#[derive(Debug, Default)]
pub struct MemoryResourceStore {
    next_id: AtomicU64,
    entries: Mutex<HashMap<ResourceUrl, StoredResource>>,
    revocations: AtomicUsize,
}

impl MemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload behind a live handle.
    pub fn get(&self, url: &ResourceUrl) -> Option<StoredResource> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
    }

    /// Number of handles not yet revoked.
    pub fn live_count(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of successful revocations so far.
    pub fn revocation_count(&self) -> usize {
        self.revocations.load(Ordering::SeqCst)
    }
}

impl ResourceStore for MemoryResourceStore {
    fn create(&self, data: &[u8], mime: &str) -> Result<ResourceUrl, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let url = ResourceUrl::new(format!("blob:docview/{}", id));
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                url.clone(),
                StoredResource {
                    data: Arc::from(data),
                    mime: mime.to_string(),
                },
            );
        Ok(url)
    }

    fn revoke(&self, url: &ResourceUrl) {
        let removed = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(url);
        if removed.is_some() {
            self.revocations.fetch_add(1, Ordering::SeqCst);
        } else {
            log::warn!("Revoke of unknown resource {}", url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let store = MemoryResourceStore::new();
        let url = store.create(b"abc", "image/png").unwrap();

        assert!(url.as_str().starts_with("blob:docview/"));
        let stored = store.get(&url).unwrap();
        assert_eq!(&*stored.data, b"abc");
        assert_eq!(stored.mime, "image/png");
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn test_urls_are_unique() {
        let store = MemoryResourceStore::new();
        let a = store.create(b"a", "").unwrap();
        let b = store.create(b"a", "").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_revoke_counts_only_live_handles() {
        let store = MemoryResourceStore::new();
        let url = store.create(b"abc", "").unwrap();

        store.revoke(&url);
        store.revoke(&url);

        assert_eq!(store.revocation_count(), 1);
        assert_eq!(store.live_count(), 0);
        assert!(store.get(&url).is_none());
    }
}
