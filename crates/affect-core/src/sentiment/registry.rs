//! Provider registry: one memoized instance per provider kind.
//!
//! Construct a single `ProviderRegistry` at application start and share it
//! (behind an `Arc`) with every analyzer. Instances are created lazily on
//! first use and kept for the life of the registry.
//!
//! The config passed on the first `get` for a kind is the one that sticks;
//! later calls with a different config for an already-cached kind return
//! the cached instance unchanged. Call [`ProviderRegistry::clear`] to
//! re-initialize.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use affect_types::error::ProviderError;
use affect_types::provider::{ProviderConfig, ProviderKind};

use super::box_provider::BoxSentimentProvider;

/// Builds a concrete provider for a kind. Construction must not do I/O.
pub trait ProviderFactory: Send + Sync {
    fn create(
        &self,
        kind: ProviderKind,
        config: &ProviderConfig,
    ) -> Result<BoxSentimentProvider, ProviderError>;
}

/// Memoizing factory front-end, safe to share across tasks and threads.
pub struct ProviderRegistry {
    factory: Box<dyn ProviderFactory>,
    providers: DashMap<ProviderKind, Arc<BoxSentimentProvider>>,
}

impl ProviderRegistry {
    pub fn new(factory: impl ProviderFactory + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            providers: DashMap::new(),
        }
    }

    /// Return the cached instance for `kind`, constructing it from `config`
    /// on first use.
    ///
    /// Concurrent first calls for the same kind still produce exactly one
    /// instance. A construction error is returned and nothing is cached.
    pub fn get(
        &self,
        kind: ProviderKind,
        config: &ProviderConfig,
    ) -> Result<Arc<BoxSentimentProvider>, ProviderError> {
        if let Some(existing) = self.providers.get(&kind) {
            return Ok(Arc::clone(existing.value()));
        }

        match self.providers.entry(kind) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let provider = Arc::new(self.factory.create(kind, config)?);
                tracing::debug!(%kind, provider = %provider.name(), "Registered provider instance");
                entry.insert(Arc::clone(&provider));
                Ok(provider)
            }
        }
    }

    /// Whether an instance for `kind` has been created.
    pub fn contains(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Drop all cached instances.
    pub fn clear(&self) {
        self.providers.clear();
    }
}
