use super::bindings::{project_with, Bindable, Bindings, BindingsBuilder, Instance};
use super::verb::{VerbHandler, VerbMethod, VerbMethodRef};
use crate::coercion::Param;
use crate::error::{DispatchError, FrameworkErrorKind};
use crate::value::short_type_name;
use http::Method;
use std::any::{Any, TypeId};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_RESOURCE_ID: AtomicU64 = AtomicU64::new(1);

type Factory = Arc<dyn Fn() -> anyhow::Result<Box<Instance>> + Send + Sync>;
type BodyProjector = Arc<dyn for<'a> Fn(&'a mut Instance) -> Option<&'a mut Instance> + Send + Sync>;

/// The body-content acceptor of a handler type: the embedded object that a
/// request body is parsed into.
#[derive(Clone)]
pub struct BodySlot {
    type_name: &'static str,
    bindings: Bindings,
    project: BodyProjector,
}

impl BodySlot {
    /// Short name of the body object's type, used in parse diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub(crate) fn project<'a>(&self, instance: &'a mut Instance) -> Option<&'a mut Instance> {
        (self.project)(instance)
    }
}

impl fmt::Debug for BodySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodySlot")
            .field("type_name", &self.type_name)
            .field("bindings", &self.bindings)
            .finish()
    }
}

/// A handler type discoverable by qualified name.
///
/// Carries everything the chain resolver needs without touching the concrete
/// Rust type: a zero-argument factory, the verb-methods in declaration order,
/// the member table used for query binding and parent injection, and the
/// optional body acceptor.
pub struct ResourceType {
    id: u64,
    name: String,
    type_id: TypeId,
    factory: Factory,
    methods: Vec<VerbMethodRef>,
    bindings: Bindings,
    body: Option<BodySlot>,
}

impl ResourceType {
    /// Start declaring a handler type constructed with [`Default`].
    ///
    /// # Arguments
    ///
    /// * `name` - Qualified name, e.g. `com.bank.loan.Customer`
    #[must_use]
    pub fn builder<T>(name: &str) -> ResourceTypeBuilder<T>
    where
        T: Default + Send + 'static,
    {
        Self::builder_with(name, || Ok(T::default()))
    }

    /// Start declaring a handler type with a fallible factory.
    #[must_use]
    pub fn builder_with<T, F>(name: &str, factory: F) -> ResourceTypeBuilder<T>
    where
        T: Send + 'static,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move || factory().map(|t| Box::new(t) as Box<Instance>));
        ResourceTypeBuilder {
            name: name.to_string(),
            factory,
            methods: Vec::new(),
            bindings: Bindings::builder::<T>(),
            body: None,
        }
    }

    /// Qualified name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last dot-separated segment of the qualified name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Dot-joined namespace the type lives in (empty for top-level types).
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.name.rsplit_once('.').map(|(ns, _)| ns).unwrap_or("")
    }

    /// Process-unique identity of this declaration. Two declarations never share
    /// one, even under the same qualified name or for the same Rust type.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Verb-methods in declaration order.
    #[must_use]
    pub fn methods(&self) -> &[VerbMethodRef] {
        &self.methods
    }

    #[must_use]
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    #[must_use]
    pub fn body(&self) -> Option<&BodySlot> {
        self.body.as_ref()
    }

    /// Construct a fresh instance.
    ///
    /// # Errors
    ///
    /// [`DispatchError::Framework`] with [`FrameworkErrorKind::Construction`] when
    /// the factory fails or panics.
    pub fn instantiate(&self) -> Result<Box<Instance>, DispatchError> {
        let failed = |cause: String| DispatchError::Framework {
            kind: FrameworkErrorKind::Construction,
            resource: self.name.clone(),
            cause,
        };
        match catch_unwind(AssertUnwindSafe(|| (self.factory)())) {
            Ok(Ok(instance)) => Ok(instance),
            Ok(Err(e)) => Err(failed(format!("{e:#}"))),
            Err(panic) => Err(failed(panic_message(panic.as_ref()))),
        }
    }
}

impl fmt::Debug for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceType")
            .field("name", &self.name)
            .field("methods", &self.methods)
            .field("bindings", &self.bindings)
            .field("body", &self.body)
            .finish()
    }
}

/// Best-effort text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}

/// Typed declaration of a [`ResourceType`] for handler struct `T`.
pub struct ResourceTypeBuilder<T> {
    name: String,
    factory: Factory,
    methods: Vec<VerbMethodRef>,
    bindings: BindingsBuilder<T>,
    body: Option<BodySlot>,
}

impl<T: Send + 'static> ResourceTypeBuilder<T> {
    /// Declare a verb-method. Declaration order is the selection order among
    /// overloads of equal arity.
    #[must_use]
    pub fn verb<M, H>(mut self, verb: Method, handler: H) -> Self
    where
        H: VerbHandler<T, M>,
    {
        let position = self.methods.len();
        self.methods
            .push(Arc::new(VerbMethod::new::<T, M, H>(verb, position, handler)));
        self
    }

    #[must_use]
    pub fn setter<V, F>(mut self, name: &str, assign: F) -> Self
    where
        V: Param,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.bindings = self.bindings.setter(name, assign);
        self
    }

    #[must_use]
    pub fn field<V, F>(mut self, name: &str, assign: F) -> Self
    where
        V: Param,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.bindings = self.bindings.field(name, assign);
        self
    }

    #[must_use]
    pub fn object_setter<P, F>(mut self, name: &str, assign: F) -> Self
    where
        P: Send + Sync + 'static,
        F: Fn(&mut T, Arc<P>) + Send + Sync + 'static,
    {
        self.bindings = self.bindings.object_setter(name, assign);
        self
    }

    #[must_use]
    pub fn object_field<P, F>(mut self, name: &str, assign: F) -> Self
    where
        P: Send + Sync + 'static,
        F: Fn(&mut T, Arc<P>) + Send + Sync + 'static,
    {
        self.bindings = self.bindings.object_field(name, assign);
        self
    }

    /// Declare the body-content acceptor: the embedded object a request body is
    /// parsed into before the terminal verb-method runs.
    #[must_use]
    pub fn body<B: Bindable>(mut self, access: fn(&mut T) -> &mut B) -> Self {
        self.body = Some(BodySlot {
            type_name: short_type_name::<B>(),
            bindings: B::bindings(),
            project: project_with(access),
        });
        self
    }

    #[must_use]
    pub fn build(self) -> ResourceType {
        ResourceType {
            id: NEXT_RESOURCE_ID.fetch_add(1, Ordering::Relaxed),
            name: self.name,
            type_id: TypeId::of::<T>(),
            factory: self.factory,
            methods: self.methods,
            bindings: self.bindings.build(),
            body: self.body,
        }
    }
}

impl<T: Bindable> ResourceTypeBuilder<T> {
    /// Append the members `T` declares for itself.
    #[must_use]
    pub fn bindable(mut self) -> Self {
        self.bindings = self.bindings.extend(T::bindings());
        self
    }
}
