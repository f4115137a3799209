use crate::registry::{ResourceType, TypeRegistry};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Caching front of the [`TypeRegistry`].
///
/// Positive results are memoized for the process lifetime; misses are not, so a
/// miss always costs one registry lookup. Concurrent resolvers may race to fill
/// the same entry, which is harmless because every racer writes the same type.
pub struct TypeResolver {
    registry: Arc<TypeRegistry>,
    cache: DashMap<String, Arc<ResourceType>>,
    enabled: bool,
}

impl TypeResolver {
    #[must_use]
    pub fn new(registry: Arc<TypeRegistry>, enabled: bool) -> Self {
        Self {
            registry,
            cache: DashMap::new(),
            enabled,
        }
    }

    /// Resolve a qualified name to a handler type.
    #[must_use]
    pub fn resolve(&self, qualified: &str) -> Option<Arc<ResourceType>> {
        if self.enabled {
            if let Some(hit) = self.cache.get(qualified) {
                debug!(qualified = %qualified, "Type cache hit");
                return Some(Arc::clone(hit.value()));
            }
        }

        let found = self.registry.lookup(qualified)?;
        if self.enabled {
            self.cache
                .entry(qualified.to_string())
                .or_insert_with(|| Arc::clone(&found));
        }
        Some(found)
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Number of memoized qualified names.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
