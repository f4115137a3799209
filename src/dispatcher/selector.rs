use crate::coercion::{coerce, Coerced, ParamType};
use crate::error::{DispatchError, MethodMismatch};
use crate::registry::{ResourceType, VerbMethodRef};
use dashmap::DashMap;
use http::Method;
use std::sync::Arc;
use tracing::debug;

type MethodList = Arc<[VerbMethodRef]>;

/// Coerce positional arguments against a parameter list.
///
/// # Errors
///
/// The first coercion failure, in positional order.
pub(crate) fn coerce_args(params: &[ParamType], args: &[String]) -> Result<Vec<Coerced>, DispatchError> {
    params
        .iter()
        .zip(args)
        .map(|(ty, arg)| coerce(arg, ty))
        .collect()
}

/// Overload resolution for verb-methods, with two caches in front of it.
///
/// Keys use [`ResourceType::id`], so a declaration never sees another's lists.
///
/// - `(type, verb)` to every verb-method of that verb, in declaration order
/// - `(type, verb, arity)` to the ones with that many parameters
///
/// Neither cache ever stores a winner. Argument convertibility is checked on
/// every call, so the cached path and the uncached path always pick the same
/// overload.
pub struct MethodSelector {
    by_verb: DashMap<(u64, Method), MethodList>,
    by_arity: DashMap<(u64, Method, usize), MethodList>,
    enabled: bool,
}

impl MethodSelector {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            by_verb: DashMap::new(),
            by_arity: DashMap::new(),
            enabled,
        }
    }

    fn gather(&self, resource: &ResourceType, verb: &Method) -> MethodList {
        let scan = || -> MethodList {
            resource
                .methods()
                .iter()
                .filter(|m| m.verb() == verb)
                .cloned()
                .collect()
        };
        if !self.enabled {
            return scan();
        }
        let key = (resource.id(), verb.clone());
        if let Some(hit) = self.by_verb.get(&key) {
            return Arc::clone(hit.value());
        }
        Arc::clone(self.by_verb.entry(key).or_insert_with(scan).value())
    }

    /// Verb-methods of `verb` taking exactly `arity` parameters, in declaration order.
    #[must_use]
    pub fn candidates(&self, resource: &ResourceType, verb: &Method, arity: usize) -> MethodList {
        let scan = || -> MethodList {
            self.gather(resource, verb)
                .iter()
                .filter(|m| m.arity() == arity)
                .cloned()
                .collect()
        };
        if !self.enabled {
            return scan();
        }
        let key = (resource.id(), verb.clone(), arity);
        if let Some(hit) = self.by_arity.get(&key) {
            debug!(resource = %resource.name(), verb = %verb, arity, "Method cache hit");
            return Arc::clone(hit.value());
        }
        let found = scan();
        Arc::clone(self.by_arity.entry(key).or_insert(found).value())
    }

    /// Pick the first candidate, in declaration order, whose parameters all accept
    /// the positional arguments.
    ///
    /// # Errors
    ///
    /// [`DispatchError::NoMatchingMethod`] with [`MethodMismatch::MissingArity`] when
    /// no verb-method of this arity exists, or [`MethodMismatch::ArgumentMismatch`]
    /// when every candidate rejected the arguments.
    pub fn select(
        &self,
        resource: &ResourceType,
        verb: &Method,
        args: &[String],
    ) -> Result<VerbMethodRef, DispatchError> {
        let no_match = |reason| DispatchError::NoMatchingMethod {
            resource: resource.name().to_string(),
            verb: verb.to_string(),
            arity: args.len(),
            reason,
        };

        let candidates = self.candidates(resource, verb, args.len());
        if candidates.is_empty() {
            return Err(no_match(MethodMismatch::MissingArity));
        }

        let mut last_error = String::new();
        for method in candidates.iter() {
            match coerce_args(method.params(), args) {
                Ok(_) => {
                    debug!(
                        resource = %resource.name(),
                        method = %method.signature(),
                        position = method.position(),
                        "Verb-method selected"
                    );
                    return Ok(Arc::clone(method));
                }
                Err(e) => {
                    debug!(
                        resource = %resource.name(),
                        method = %method.signature(),
                        error = %e,
                        "Candidate rejected"
                    );
                    last_error = e.to_string();
                }
            }
        }
        Err(no_match(MethodMismatch::ArgumentMismatch { last_error }))
    }

    /// Entries in the `(type, verb)` and `(type, verb, arity)` caches.
    #[must_use]
    pub fn cached(&self) -> (usize, usize) {
        (self.by_verb.len(), self.by_arity.len())
    }
}
