//! Opaque verb-method results.
//!
//! A [`ResourceValue`] wraps whatever a handler method returned. It is shared,
//! not copied: the value a parent handler produced is the exact allocation the
//! child handler receives through parent injection, and the exact allocation the
//! caller gets back at the end of the chain.

use serde::Serialize;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

type JsonFn = fn(&(dyn Any + Send + Sync)) -> Value;

/// Type-erased, reference-counted result of a verb-method invocation.
#[derive(Clone)]
pub struct ResourceValue {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
    to_json: JsonFn,
}

fn render<T: Serialize + 'static>(value: &(dyn Any + Send + Sync)) -> Value {
    value
        .downcast_ref::<T>()
        .and_then(|v| serde_json::to_value(v).ok())
        .unwrap_or(Value::Null)
}

/// Unqualified name of `T`, without module path or generic arguments.
#[must_use]
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl ResourceValue {
    pub fn new<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self::from_arc(Arc::new(value))
    }

    pub fn from_arc<T>(value: Arc<T>) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self {
            inner: value,
            type_name: short_type_name::<T>(),
            to_json: render::<T>,
        }
    }

    /// Concrete type name of the wrapped value (e.g. `CustomerResult`).
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn value_type_id(&self) -> TypeId {
        (*self.inner).type_id()
    }

    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.inner.is::<T>()
    }

    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Shared handle to the wrapped value if it is a `T`.
    #[must_use]
    pub fn downcast_arc<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// JSON rendering for the transport layer.
    #[must_use]
    pub fn to_json(&self) -> Value {
        (self.to_json)(self.inner.as_ref())
    }

    /// True when both handles point at the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &ResourceValue) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }
}

impl fmt::Debug for ResourceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceValue")
            .field("type_name", &self.type_name)
            .field("value", &self.to_json())
            .finish()
    }
}

impl PartialEq for ResourceValue {
    /// Value equality: same concrete type and same JSON rendering.
    fn eq(&self, other: &Self) -> bool {
        self.value_type_id() == other.value_type_id() && self.to_json() == other.to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Serialize, PartialEq)]
    struct CustomerResult {
        id: i32,
    }

    #[test]
    fn test_short_type_name_strips_path_and_generics() {
        assert_eq!(short_type_name::<CustomerResult>(), "CustomerResult");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
    }

    #[test]
    fn test_downcast_shares_allocation() {
        let value = ResourceValue::new(CustomerResult { id: 7 });
        let a = value.downcast_arc::<CustomerResult>().unwrap();
        let b = value.downcast_arc::<CustomerResult>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(value.downcast_arc::<String>().is_none());
        assert_eq!(value.type_name(), "CustomerResult");
    }

    #[test]
    fn test_json_rendering_and_equality() {
        let a = ResourceValue::new(CustomerResult { id: 1 });
        let b = ResourceValue::new(CustomerResult { id: 1 });
        assert_eq!(a.to_json(), json!({"id": 1}));
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
        assert!(a.ptr_eq(&a.clone()));
    }
}
