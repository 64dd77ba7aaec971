//! Ownership of local resource handles for binary payloads.
//!
//! A viewer holds at most one handle at a time. Every handle is released
//! exactly once: explicitly by the viewer, or by a fallback timer if the viewer
//! was abandoned without closing.

mod store;
mod timer;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub use store::{MemoryResourceStore, ResourceStore, ResourceUrl, StoreError, StoredResource};
#[cfg(not(target_arch = "wasm32"))]
pub use timer::ThreadTimer;
pub use timer::{FallbackTimer, TickTimer, TimerGuard, TimerTask};

use crate::constants::lifetime;

/// A live handle and the machinery guarding its release.
struct Lease {
    url: ResourceUrl,
    released: Arc<AtomicBool>,
    fallback: Option<TimerGuard>,
}

/// Revoke `url` unless someone already did. Returns whether this call revoked it.
fn release_once(store: &dyn ResourceStore, url: &ResourceUrl, released: &AtomicBool) -> bool {
    if released.swap(true, Ordering::AcqRel) {
        return false;
    }
    store.revoke(url);
    true
}

/// Creates handles for binary payloads and guarantees their release.
pub struct ResourceLifecycleManager {
    store: Arc<dyn ResourceStore>,
    timer: Arc<dyn FallbackTimer>,
    fallback_after: Duration,
    current: Option<Lease>,
}

impl ResourceLifecycleManager {
    /// Create a manager with the default fallback delay.
    pub fn new(store: Arc<dyn ResourceStore>, timer: Arc<dyn FallbackTimer>) -> Self {
        Self {
            store,
            timer,
            fallback_after: Duration::from_secs(lifetime::FALLBACK_RELEASE_SECS),
            current: None,
        }
    }

    /// Set how long an unreleased handle survives.
    pub fn with_fallback_after(mut self, fallback_after: Duration) -> Self {
        self.fallback_after = fallback_after;
        self
    }

    pub fn fallback_after(&self) -> Duration {
        self.fallback_after
    }

    /// Create the handle for a payload and arm its fallback release.
    ///
    /// Callers release the previous handle first. If they did not, it is
    /// released here so the superseded fallback timer cannot fire later.
    pub fn acquire(&mut self, data: &[u8], mime: &str) -> Result<ResourceUrl, StoreError> {
        if let Some(previous) = self.current.take() {
            if !previous.released.load(Ordering::Acquire) {
                log::warn!(
                    "Acquiring a new resource while {} is still live; releasing it first",
                    previous.url
                );
            }
            self.release_lease(previous);
        }

        let url = self.store.create(data, mime)?;
        let released = Arc::new(AtomicBool::new(false));

        let fallback = {
            let store = Arc::clone(&self.store);
            let url = url.clone();
            let released = Arc::clone(&released);
            self.timer.schedule(
                self.fallback_after,
                Box::new(move || {
                    if release_once(store.as_ref(), &url, &released) {
                        log::warn!("Resource {} was never released; fallback timer released it", url);
                    }
                }),
            )
        };

        log::debug!(
            "Acquired resource {} ({} bytes, '{}'), fallback in {:?}",
            url,
            data.len(),
            mime,
            self.fallback_after
        );

        self.current = Some(Lease {
            url: url.clone(),
            released,
            fallback: Some(fallback),
        });
        Ok(url)
    }

    /// Release a handle. Unknown or already released handles are ignored.
    pub fn release(&mut self, url: &ResourceUrl) {
        match self.current.take() {
            Some(lease) if &lease.url == url => self.release_lease(lease),
            other => {
                self.current = other;
                log::trace!("Release of {} ignored: not the live resource", url);
            }
        }
    }

    /// Release whatever is held.
    pub fn release_all(&mut self) {
        if let Some(lease) = self.current.take() {
            self.release_lease(lease);
        }
    }

    /// Whether `url` is held and not yet released.
    pub fn is_live(&self, url: &ResourceUrl) -> bool {
        self.current
            .as_ref()
            .is_some_and(|lease| &lease.url == url && !lease.released.load(Ordering::Acquire))
    }

    /// Number of live handles (0 or 1).
    pub fn live_count(&self) -> usize {
        self.current
            .as_ref()
            .map_or(0, |lease| usize::from(!lease.released.load(Ordering::Acquire)))
    }

    fn release_lease(&self, mut lease: Lease) {
        if let Some(fallback) = lease.fallback.take() {
            fallback.cancel();
        }
        if release_once(self.store.as_ref(), &lease.url, &lease.released) {
            log::debug!("Released resource {}", lease.url);
        }
    }
}

impl Drop for ResourceLifecycleManager {
    fn drop(&mut self) {
        self.release_all();
    }
}
