use super::selector::{coerce_args, MethodSelector};
use crate::error::{DispatchError, ErrorClass, FrameworkErrorKind};
use crate::exchange::ExchangeRequest;
use crate::ids::ExchangeId;
use crate::registry::{panic_message, CallError, Instance, ResourceType, TypeRegistry, VerbMethod, VerbMethodRef};
use crate::router::{ChainResolver, ResolvedChain, TypeResolver};
use crate::runtime_config::RuntimeConfig;
use crate::value::ResourceValue;
use http::Method;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn};

/// Call a verb-method on a live instance with string arguments.
///
/// # Errors
///
/// - [`DispatchError::TypeCoercion`] / [`DispatchError::UnsupportedParameterType`] when an
///   argument does not convert
/// - [`DispatchError::Business`] exactly as the handler returned it
/// - [`DispatchError::Framework`] with [`FrameworkErrorKind::MethodInvocation`] when the
///   argument count or instance type does not line up, or the handler panics
pub(crate) fn invoke_method(
    resource: &ResourceType,
    instance: &mut Instance,
    method: &VerbMethod,
    args: &[String],
) -> Result<ResourceValue, DispatchError> {
    let plumbing = |cause: String| DispatchError::Framework {
        kind: FrameworkErrorKind::MethodInvocation,
        resource: resource.name().to_string(),
        cause,
    };

    if args.len() != method.arity() {
        return Err(plumbing(format!(
            "{} expects {} arguments, {} supplied",
            method.signature(),
            method.arity(),
            args.len()
        )));
    }
    let coerced = coerce_args(method.params(), args)?;

    let start = Instant::now();
    match catch_unwind(AssertUnwindSafe(|| method.call(instance, coerced))) {
        Ok(Ok(value)) => {
            debug!(
                resource = %resource.name(),
                method = %method.signature(),
                result_type = %value.type_name(),
                execution_time_us = start.elapsed().as_micros() as u64,
                "Verb-method returned"
            );
            Ok(value)
        }
        Ok(Err(CallError::Business(err))) => {
            debug!(
                resource = %resource.name(),
                method = %method.signature(),
                error = %err,
                "Verb-method raised business failure"
            );
            Err(DispatchError::Business(err))
        }
        Ok(Err(CallError::Mismatch(cause))) => Err(plumbing(cause)),
        Err(panic) => {
            let panic_message = panic_message(panic.as_ref());
            error!(
                resource = %resource.name(),
                method = %method.signature(),
                panic_message = %panic_message,
                "Verb-method panicked"
            );
            Err(plumbing(format!("handler panicked: {panic_message}")))
        }
    }
}

/// Entry counts of the resolution caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Memoized qualified names
    pub types: usize,
    /// Memoized `(type, verb)` method lists
    pub verbs: usize,
    /// Memoized `(type, verb, arity)` candidate lists
    pub candidates: usize,
}

/// Resolves request paths into handler chains and invokes them.
///
/// One dispatcher is built at startup and shared by every request thread; all
/// per-request state (instances, arguments, namespace) lives on the caller's
/// stack, and the caches are concurrent maps.
pub struct Dispatcher {
    types: TypeResolver,
    selector: MethodSelector,
    config: RuntimeConfig,
}

impl Dispatcher {
    /// Create a dispatcher with default configuration.
    #[must_use]
    pub fn new(registry: TypeRegistry) -> Self {
        Self::with_config(registry, RuntimeConfig::default())
    }

    #[must_use]
    pub fn with_config(registry: TypeRegistry, config: RuntimeConfig) -> Self {
        Self::from_shared(Arc::new(registry), config)
    }

    /// Create a dispatcher over a registry that is shared with other components.
    #[must_use]
    pub fn from_shared(registry: Arc<TypeRegistry>, config: RuntimeConfig) -> Self {
        info!(
            resource_types = registry.len(),
            type_cache = config.type_cache,
            method_cache = config.method_cache,
            inject_suffixes = ?config.inject_suffixes,
            "Dispatcher created"
        );
        Self {
            types: TypeResolver::new(registry, config.type_cache),
            selector: MethodSelector::new(config.method_cache),
            config,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        self.types.registry()
    }

    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Walk the request path and return the bound terminal handler.
    ///
    /// # Errors
    ///
    /// Any failure of tokenizing, construction, intermediate `GET` selection and
    /// invocation, or body parsing.
    pub fn resolve(&self, request: &ExchangeRequest) -> Result<ResolvedChain, DispatchError> {
        ChainResolver {
            types: &self.types,
            selector: &self.selector,
            suffixes: &self.config.inject_suffixes,
        }
        .resolve(request)
    }

    /// Pick the verb-method of `verb` on `resource` that accepts `args`.
    ///
    /// # Errors
    ///
    /// [`DispatchError::NoMatchingMethod`] when no candidate exists or none accepts the arguments.
    pub fn select(
        &self,
        resource: &ResourceType,
        verb: &Method,
        args: &[String],
    ) -> Result<VerbMethodRef, DispatchError> {
        self.selector.select(resource, verb, args)
    }

    /// Invoke a selected verb-method.
    ///
    /// # Errors
    ///
    /// See [`DispatchError`]: coercion failures propagate as such, business failures
    /// unchanged, plumbing failures and panics as [`FrameworkErrorKind::MethodInvocation`].
    pub fn invoke(
        &self,
        resource: &ResourceType,
        instance: &mut Instance,
        method: &VerbMethod,
        args: &[String],
    ) -> Result<ResourceValue, DispatchError> {
        invoke_method(resource, instance, method, args)
    }

    /// Resolve, select the request's verb on the terminal handler, and invoke it.
    ///
    /// # Errors
    ///
    /// Any [`DispatchError`].
    pub fn dispatch(&self, request: &ExchangeRequest) -> Result<ResourceValue, DispatchError> {
        self.dispatch_with_id(request, ExchangeId::new())
    }

    /// [`Dispatcher::dispatch`] with a correlation id chosen by the caller.
    ///
    /// # Errors
    ///
    /// Any [`DispatchError`].
    pub fn dispatch_with_id(
        &self,
        request: &ExchangeRequest,
        exchange_id: ExchangeId,
    ) -> Result<ResourceValue, DispatchError> {
        let span = info_span!(
            "dispatch",
            exchange_id = %exchange_id,
            method = %request.method,
            path = %request.path
        );
        let _entered = span.enter();
        let start = Instant::now();

        debug!(
            context_prefix = %request.context_prefix,
            query_keys = request.query.len(),
            body_len = request.body.len(),
            "Dispatch start"
        );

        let result = self.resolve(request).and_then(|mut chain| {
            let method = self.select(&chain.resource, &request.method, &chain.args)?;
            invoke_method(&chain.resource, &mut *chain.instance, &method, &chain.args)
        });

        let latency_us = start.elapsed().as_micros() as u64;
        match &result {
            Ok(value) => info!(
                result_type = %value.type_name(),
                latency_us,
                "Dispatch complete"
            ),
            Err(e) if e.class() == ErrorClass::Internal => error!(
                error = %e,
                latency_us,
                "Dispatch failed - framework error"
            ),
            Err(e) => warn!(
                error = %e,
                class = %e.class(),
                latency_us,
                "Dispatch rejected"
            ),
        }
        result
    }

    /// Registry introspections performed so far.
    #[must_use]
    pub fn type_lookups(&self) -> u64 {
        self.registry().lookups()
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        let (verbs, candidates) = self.selector.cached();
        CacheStats {
            types: self.types.cached(),
            verbs,
            candidates,
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("cache_stats", &self.cache_stats())
            .finish()
    }
}
