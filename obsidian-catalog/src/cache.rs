use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::{Mutex, RwLock};

use crate::{CatalogError, Release, ReleaseSource};

/// Whether an entry fetched at `fetched_at` is still usable at `now`.
///
/// A `now` that precedes `fetched_at` counts as fresh.
pub fn is_fresh(now: Instant, fetched_at: Instant, ttl: Duration) -> bool {
    now.saturating_duration_since(fetched_at) < ttl
}

/// The output of [`CatalogCache::get`].
#[derive(Debug, Clone)]
pub struct CachedReleases {
    /// The releases, shared with the cache slot.
    pub releases: Arc<[Release]>,
    /// Whether the releases were served from the cache rather than just fetched.
    pub cached: bool,
}

struct CacheEntry {
    releases: Arc<[Release]>,
    fetched_at: Instant,
}

/// A single-slot cache in front of a [`ReleaseSource`].
///
/// The slot is replaced wholesale after every successful fetch. Failed fetches
/// leave the previous entry in place, but a stale entry is never served.
/// Concurrent misses share one fetch.
pub struct CatalogCache<S> {
    source: S,
    ttl: Duration,
    slot: RwLock<Option<CacheEntry>>,
    refresh_gate: Mutex<()>,
}
impl<S: ReleaseSource> CatalogCache<S> {
    /// How long a fetched list is served before it is refetched.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

    /// Create an empty cache with the default TTL.
    pub fn new(source: S) -> Self {
        Self::with_ttl(source, Self::DEFAULT_TTL)
    }

    /// Create an empty cache with a custom TTL.
    pub fn with_ttl(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            slot: RwLock::new(None),
            refresh_gate: Mutex::new(()),
        }
    }

    /// The source behind the cache.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get the releases, fetching them if the cache is empty or stale.
    ///
    /// # Errors
    ///
    /// Returns the source's error unchanged if a fetch was needed and failed.
    pub async fn get(&self) -> Result<CachedReleases, CatalogError> {
        self.get_at(Instant::now()).await
    }

    /// [`CatalogCache::get`], as observed at `now`.
    pub async fn get_at(&self, now: Instant) -> Result<CachedReleases, CatalogError> {
        if let Some(releases) = self.fresh_at(now).await {
            return Ok(CachedReleases {
                releases,
                cached: true,
            });
        }

        let _gate = self.refresh_gate.lock().await;
        // Another caller may have refreshed the slot while this one waited.
        if let Some(releases) = self.fresh_at(now).await {
            return Ok(CachedReleases {
                releases,
                cached: true,
            });
        }

        tracing::info!("release cache miss, fetching catalog");
        self.refresh_locked(now).await
    }

    /// Fetch the releases regardless of freshness and replace the slot.
    ///
    /// # Errors
    ///
    /// Returns the source's error unchanged; the previous entry is kept.
    pub async fn refresh(&self) -> Result<CachedReleases, CatalogError> {
        let _gate = self.refresh_gate.lock().await;
        self.refresh_locked(Instant::now()).await
    }

    async fn fresh_at(&self, now: Instant) -> Option<Arc<[Release]>> {
        let slot = self.slot.read().await;
        let entry = slot.as_ref()?;
        if !is_fresh(now, entry.fetched_at, self.ttl) {
            return None;
        }
        tracing::debug!("serving {} releases from cache", entry.releases.len());
        Some(Arc::clone(&entry.releases))
    }

    /// Fetch and store the releases. The entry is stamped `now` plus the fetch
    /// latency, so its TTL runs from when the fetch completed.
    async fn refresh_locked(&self, now: Instant) -> Result<CachedReleases, CatalogError> {
        let started = Instant::now();
        let releases: Arc<[Release]> = self
            .source
            .fetch_releases()
            .await
            .inspect_err(|e| tracing::warn!("failed to fetch catalog: {e}"))?
            .into();

        *self.slot.write().await = Some(CacheEntry {
            releases: Arc::clone(&releases),
            fetched_at: now + started.elapsed(),
        });

        Ok(CachedReleases {
            releases,
            cached: false,
        })
    }
}
