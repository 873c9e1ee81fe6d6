//! Builder for configuring [`MokaStore`].

use std::sync::Arc;
use std::time::Duration;

use moka::future::{Cache, CacheBuilder};
use moka::policy::EvictionPolicy;
use smol_str::SmolStr;
use stowage_core::{CacheKey, CachedResponse};

use crate::store::MokaStore;

/// Marker type: capacity has not been configured yet.
///
/// This is the initial state of a [`MokaStoreBuilder`]. Call either
/// [`max_entries()`](MokaStoreBuilder::max_entries) or
/// [`max_bytes()`](MokaStoreBuilder::max_bytes) before `build()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapacity;

/// Marker type: the store holds at most `n` responses.
#[derive(Debug, Clone, Copy)]
pub struct EntryCapacity(pub(crate) u64);

/// Marker type: the store holds at most `n` bytes of responses (estimated).
#[derive(Debug, Clone, Copy)]
pub struct ByteCapacity(pub(crate) u64);

/// Builder for creating and configuring a [`MokaStore`].
///
/// Capacity is required and uses the typestate pattern: `build()` only
/// exists once [`max_entries`](Self::max_entries) or
/// [`max_bytes`](Self::max_bytes) has been called, and the two are mutually
/// exclusive.
///
/// ```
/// use stowage_moka::{EvictionPolicy, MokaStore};
///
/// let store = MokaStore::builder()
///     .label("pages")
///     .max_entries(10_000)
///     .eviction_policy(EvictionPolicy::lru())
///     .build();
/// ```
pub struct MokaStoreBuilder<Cap> {
    capacity: Cap,
    label: SmolStr,
    eviction_policy: Option<EvictionPolicy>,
    time_to_live: Option<Duration>,
}

impl MokaStoreBuilder<NoCapacity> {
    /// Creates a new builder with no capacity configured.
    pub fn new() -> Self {
        Self {
            capacity: NoCapacity,
            label: SmolStr::new_static("moka"),
            eviction_policy: None,
            time_to_live: None,
        }
    }

    /// Limits the store to `capacity` responses.
    pub fn max_entries(self, capacity: u64) -> MokaStoreBuilder<EntryCapacity> {
        self.with_capacity(EntryCapacity(capacity))
    }

    /// Limits the store to about `bytes` bytes of responses.
    ///
    /// An entry weighs its key plus [`CachedResponse::weight`].
    pub fn max_bytes(self, bytes: u64) -> MokaStoreBuilder<ByteCapacity> {
        self.with_capacity(ByteCapacity(bytes))
    }

    fn with_capacity<Cap>(self, capacity: Cap) -> MokaStoreBuilder<Cap> {
        MokaStoreBuilder {
            capacity,
            label: self.label,
            eviction_policy: self.eviction_policy,
            time_to_live: self.time_to_live,
        }
    }
}

impl Default for MokaStoreBuilder<NoCapacity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Cap> MokaStoreBuilder<Cap> {
    /// Sets the label used in logs and metrics.
    ///
    /// # Default
    ///
    /// `"moka"`
    pub fn label(mut self, label: impl Into<SmolStr>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the eviction policy.
    ///
    /// # Default
    ///
    /// - entry capacity: [`EvictionPolicy::tiny_lfu()`]
    /// - byte capacity: [`EvictionPolicy::lru()`], since TinyLFU admission
    ///   can reject a heavy entry even when eviction would make room
    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = Some(policy);
        self
    }

    /// Drops entries `ttl` after they were written, fresh or not.
    pub fn time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = Some(ttl);
        self
    }

    fn cache_builder(
        &self,
        capacity: u64,
        default_policy: fn() -> EvictionPolicy,
    ) -> CacheBuilder<CacheKey, Arc<CachedResponse>, Cache<CacheKey, Arc<CachedResponse>>> {
        let policy = self.eviction_policy.clone().unwrap_or_else(default_policy);
        let builder = CacheBuilder::new(capacity).eviction_policy(policy);
        match self.time_to_live {
            Some(ttl) => builder.time_to_live(ttl),
            None => builder,
        }
    }
}

impl MokaStoreBuilder<EntryCapacity> {
    /// Builds a store bounded by entry count.
    pub fn build(self) -> MokaStore {
        let cache = self
            .cache_builder(self.capacity.0, EvictionPolicy::tiny_lfu)
            .build();
        MokaStore {
            cache,
            label: self.label,
        }
    }
}

impl MokaStoreBuilder<ByteCapacity> {
    /// Builds a store bounded by estimated byte size.
    pub fn build(self) -> MokaStore {
        let cache = self
            .cache_builder(self.capacity.0, EvictionPolicy::lru)
            .weigher(Self::byte_weigher)
            .build();
        MokaStore {
            cache,
            label: self.label,
        }
    }

    fn byte_weigher(key: &CacheKey, value: &Arc<CachedResponse>) -> u32 {
        (key.memory_size() + value.weight()).min(u32::MAX as usize) as u32
    }
}
