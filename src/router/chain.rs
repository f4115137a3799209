use super::tokenizer::{candidate_name, tokenize};
use super::types::TypeResolver;
use crate::binding::{bind_query, inject_parent, parse_body};
use crate::dispatcher::{invoke_method, MethodSelector};
use crate::error::DispatchError;
use crate::exchange::ExchangeRequest;
use crate::registry::{Instance, ResourceType};
use crate::value::ResourceValue;
use http::Method;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Positional arguments collected for one handler.
pub type ArgVec = SmallVec<[String; 4]>;

/// The terminal handler of a resolved chain, bound and ready for its final call.
pub struct ResolvedChain {
    pub(crate) resource: Arc<ResourceType>,
    pub(crate) instance: Box<Instance>,
    pub(crate) args: ArgVec,
    pub(crate) depth: usize,
    pub(crate) parent: Option<ResourceValue>,
}

impl ResolvedChain {
    /// Type of the terminal handler.
    #[must_use]
    pub fn resource(&self) -> &Arc<ResourceType> {
        &self.resource
    }

    /// Positional arguments that followed the terminal handler's token.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Number of handlers instantiated along the path.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Result the previous handler produced and that was offered to the terminal one.
    #[must_use]
    pub fn parent(&self) -> Option<&ResourceValue> {
        self.parent.as_ref()
    }

    #[must_use]
    pub fn instance<T: 'static>(&self) -> Option<&T> {
        self.instance.downcast_ref::<T>()
    }

    pub fn instance_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.instance.downcast_mut::<T>()
    }

    /// The erased terminal instance, as [`Dispatcher::invoke`](crate::Dispatcher::invoke) takes it.
    pub fn handler_mut(&mut self) -> &mut Instance {
        &mut *self.instance
    }
}

impl fmt::Debug for ResolvedChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedChain")
            .field("resource", &self.resource.name())
            .field("args", &self.args)
            .field("depth", &self.depth)
            .field("parent", &self.parent)
            .finish()
    }
}

/// Single left-to-right pass over the path tokens.
///
/// Each token is first tried as a type name under the namespace collected so
/// far. Before any handler is found, a token that is not a type extends the
/// namespace; after that, it is a positional argument. A second type token ends
/// the current handler: its `GET` verb-method runs with the collected arguments
/// and the result is injected into the new handler.
pub(crate) struct ChainResolver<'d> {
    pub(crate) types: &'d TypeResolver,
    pub(crate) selector: &'d MethodSelector,
    pub(crate) suffixes: &'d [String],
}

impl ChainResolver<'_> {
    pub(crate) fn resolve(&self, request: &ExchangeRequest) -> Result<ResolvedChain, DispatchError> {
        let tokens = tokenize(&request.path, &request.context_prefix)?;

        let mut namespace = String::new();
        let mut current: Option<(Arc<ResourceType>, Box<Instance>)> = None;
        let mut args = ArgVec::new();
        let mut parent: Option<ResourceValue> = None;
        let mut depth = 0;

        for token in tokens {
            let candidate = candidate_name(&namespace, token);
            let resolved = self.types.resolve(&candidate);

            current = match (current.take(), resolved) {
                (None, Some(root)) => {
                    debug!(token = %token, resource = %root.name(), "Root resource resolved");
                    let instance = root.instantiate()?;
                    args.clear();
                    depth = 1;
                    Some((root, instance))
                }
                (None, None) => {
                    if !namespace.is_empty() {
                        namespace.push('.');
                    }
                    namespace.push_str(token);
                    debug!(token = %token, namespace = %namespace, "Namespace extended");
                    None
                }
                (Some(held), None) => {
                    debug!(token = %token, resource = %held.0.name(), "Positional argument");
                    args.push(token.to_string());
                    Some(held)
                }
                (Some((owner, mut instance)), Some(next)) => {
                    let method = self.selector.select(&owner, &Method::GET, &args)?;
                    let value = invoke_method(&owner, &mut *instance, &method, &args)?;
                    let mut child = next.instantiate()?;
                    let via = inject_parent(next.bindings(), &mut *child, Some(&value), self.suffixes);
                    debug!(
                        from = %owner.name(),
                        to = %next.name(),
                        parent_type = %value.type_name(),
                        injection = %via,
                        "Chain transition"
                    );
                    args.clear();
                    parent = Some(value);
                    depth += 1;
                    Some((next, child))
                }
            };
        }

        let Some((resource, mut instance)) = current else {
            debug!(
                path = %request.path,
                namespace = %namespace,
                known_namespace = self.types.registry().has_namespace(&namespace),
                "No resource along path"
            );
            return Err(DispatchError::ResourceNotFound {
                path: request.path.clone(),
            });
        };

        let bound = bind_query(resource.bindings(), &mut *instance, &request.query);
        if let Some(body) = resource.body() {
            if !request.body.trim().is_empty() {
                parse_body(body, &mut *instance, &request.body)?;
            }
        }
        debug!(
            resource = %resource.name(),
            depth,
            args = args.len(),
            query_bound = bound,
            "Chain resolved"
        );

        Ok(ResolvedChain {
            resource,
            instance,
            args,
            depth,
            parent,
        })
    }
}
