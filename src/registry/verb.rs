//! Verb-methods: typed handler functions erased behind a uniform call shape.
//!
//! A verb-method is any `Fn(&mut T, A1, .., An) -> Result<R, E>` with up to five
//! [`Param`] arguments. [`VerbHandler`] is implemented for all of them through a
//! marker type parameter (the function-pointer type `fn(A1, .., An) -> Result<R, E>`),
//! which keeps the blanket impls coherent across arities.

use super::bindings::Instance;
use crate::coercion::{Coerced, Param, ParamType};
use crate::error::BusinessError;
use crate::value::{short_type_name, ResourceValue};
use http::Method;
use serde::Serialize;
use smallvec::SmallVec;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Parameter list of a verb-method; no verb-method takes more than five.
pub type ParamList = SmallVec<[ParamType; 5]>;

/// Outcome of calling an erased verb-method that did not produce a value.
#[derive(Debug, Clone, PartialEq)]
pub enum CallError {
    /// The handler body returned a domain failure
    Business(BusinessError),
    /// Instance or argument plumbing did not line up with the declaration
    Mismatch(String),
}

/// A typed handler function usable as a verb-method on `T`.
pub trait VerbHandler<T, M>: Send + Sync + 'static {
    /// Declared parameter types, in positional order.
    fn param_types() -> ParamList;

    /// Invoke with already-coerced arguments.
    ///
    /// # Errors
    ///
    /// [`CallError::Business`] from the handler body, [`CallError::Mismatch`] when
    /// `args` does not line up with [`VerbHandler::param_types`].
    fn call(&self, target: &mut T, args: Vec<Coerced>) -> Result<ResourceValue, CallError>;
}

macro_rules! impl_verb_handler {
    ($($ty:ident $var:ident),*) => {
        impl<T, F, R, E, $($ty,)*> VerbHandler<T, fn($($ty,)*) -> Result<R, E>> for F
        where
            F: Fn(&mut T, $($ty),*) -> Result<R, E> + Send + Sync + 'static,
            R: Serialize + Send + Sync + 'static,
            E: Into<BusinessError>,
            $($ty: Param,)*
        {
            fn param_types() -> ParamList {
                SmallVec::from_iter([$($ty::param_type()),*])
            }

            #[allow(unused_mut, unused_variables)]
            fn call(&self, target: &mut T, args: Vec<Coerced>) -> Result<ResourceValue, CallError> {
                let mut args = args.into_iter();
                $(
                    let $var = args
                        .next()
                        .and_then($ty::from_coerced)
                        .ok_or_else(|| {
                            CallError::Mismatch(format!(
                                "expected an argument of type {}",
                                $ty::param_type()
                            ))
                        })?;
                )*
                (self)(target, $($var),*)
                    .map(ResourceValue::new)
                    .map_err(|e| CallError::Business(e.into()))
            }
        }
    };
}

impl_verb_handler!();
impl_verb_handler!(A1 a1);
impl_verb_handler!(A1 a1, A2 a2);
impl_verb_handler!(A1 a1, A2 a2, A3 a3);
impl_verb_handler!(A1 a1, A2 a2, A3 a3, A4 a4);
impl_verb_handler!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);

type ErasedCall = Arc<dyn Fn(&mut Instance, Vec<Coerced>) -> Result<ResourceValue, CallError> + Send + Sync>;

/// A declared verb-method with its signature and erased entry point.
#[derive(Clone)]
pub struct VerbMethod {
    verb: Method,
    params: ParamList,
    position: usize,
    call: ErasedCall,
}

impl VerbMethod {
    pub(crate) fn new<T, M, H>(verb: Method, position: usize, handler: H) -> Self
    where
        T: Any + Send,
        H: VerbHandler<T, M>,
    {
        let call: ErasedCall = Arc::new(move |obj: &mut Instance, args: Vec<Coerced>| {
            let target = obj.downcast_mut::<T>().ok_or_else(|| {
                CallError::Mismatch(format!("instance is not a {}", short_type_name::<T>()))
            })?;
            handler.call(target, args)
        });
        Self {
            verb,
            params: H::param_types(),
            position,
            call,
        }
    }

    #[must_use]
    pub fn verb(&self) -> &Method {
        &self.verb
    }

    #[must_use]
    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Declaration index on the owning type.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Human-readable signature, e.g. `get(i32, String)`.
    #[must_use]
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.params.iter().map(ParamType::name).collect();
        format!("{}({})", self.verb.as_str().to_lowercase(), params.join(", "))
    }

    pub(crate) fn call(
        &self,
        target: &mut Instance,
        args: Vec<Coerced>,
    ) -> Result<ResourceValue, CallError> {
        (self.call)(target, args)
    }
}

impl fmt::Debug for VerbMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerbMethod")
            .field("signature", &self.signature())
            .field("position", &self.position)
            .finish()
    }
}

/// Shared handle to a selected verb-method.
pub type VerbMethodRef = Arc<VerbMethod>;
