use super::resource::ResourceType;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Qualified-name table of every handler type known to the process.
///
/// The registry is filled once at startup and then only read. [`TypeRegistry::lookup`]
/// is the introspection step of type resolution; it is counted so that callers can
/// observe how often the resolver cache had to fall through to it.
#[derive(Default)]
pub struct TypeRegistry {
    types: Vec<Arc<ResourceType>>,
    index: HashMap<String, usize>,
    lookups: AtomicU64,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler type under its qualified name.
    ///
    /// A type registered under a name that is already taken replaces the earlier
    /// entry in place, keeping its position in registration order.
    pub fn register(&mut self, resource: ResourceType) -> &mut Self {
        let name = resource.name().to_string();
        let methods = resource.methods().len();
        let resource = Arc::new(resource);

        match self.index.get(&name) {
            Some(&slot) => {
                self.types[slot] = resource;
                warn!(
                    resource = %name,
                    total_types = self.types.len(),
                    "Replaced existing resource type"
                );
            }
            None => {
                self.index.insert(name.clone(), self.types.len());
                self.types.push(resource);
                info!(
                    resource = %name,
                    verb_methods = methods,
                    total_types = self.types.len(),
                    "Resource type registered"
                );
            }
        }
        self
    }

    /// Exact lookup by qualified name. Every call counts as one introspection.
    #[must_use]
    pub fn lookup(&self, qualified: &str) -> Option<Arc<ResourceType>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let found = self.index.get(qualified).map(|&i| Arc::clone(&self.types[i]));
        debug!(qualified = %qualified, found = found.is_some(), "Registry lookup");
        found
    }

    /// Number of [`TypeRegistry::lookup`] calls since construction.
    #[must_use]
    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }

    /// True if any registered type lives in `namespace` or below it.
    #[must_use]
    pub fn has_namespace(&self, namespace: &str) -> bool {
        if namespace.is_empty() {
            return !self.types.is_empty();
        }
        self.types.iter().any(|t| {
            t.name()
                .strip_prefix(namespace)
                .is_some_and(|rest| rest.starts_with('.'))
        })
    }

    /// Registered types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ResourceType>> {
        self.types.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.index.keys().collect::<Vec<_>>())
            .field("lookups", &self.lookups())
            .finish()
    }
}
