//! Member tables for attribute binding and parent injection.
//!
//! A [`Bindings`] table lists, in declaration order, every named slot on a type
//! that the binder, the body parser or the parent injector may write to. Tables
//! are built once, at registration time, either by hand through
//! [`BindingsBuilder`] or by `#[derive(Bindable)]`.

use crate::coercion::{Coerced, Param, ParamType};
use crate::value::{short_type_name, ResourceValue};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A live, type-erased handler instance or body object.
pub type Instance = dyn Any + Send;

type ScalarAssign = Arc<dyn Fn(&mut Instance, Coerced) -> bool + Send + Sync>;
type ObjectAssign = Arc<dyn Fn(&mut Instance, &ResourceValue) -> bool + Send + Sync>;
type Projector = Arc<dyn for<'a> Fn(&'a mut Instance) -> Option<&'a mut Instance> + Send + Sync>;

/// Pins the higher-ranked signature on a projection closure.
fn projector<F>(f: F) -> F
where
    F: for<'a> Fn(&'a mut Instance) -> Option<&'a mut Instance>,
{
    f
}

/// Build a projector from a typed accessor.
pub(crate) fn project_with<T, N>(access: fn(&mut T) -> &mut N) -> Projector
where
    T: Any + Send,
    N: Any + Send,
{
    Arc::new(projector(move |obj| {
        obj.downcast_mut::<T>()
            .map(|target| access(target) as &mut Instance)
    }))
}

/// A type that declares its own member table.
///
/// Usually derived:
///
/// ```rust
/// use cakerouter::registry::{Bindable, MemberKind};
///
/// #[derive(Default, cakerouter::Bindable)]
/// struct CustomerDto {
///     name: Option<String>,
///     email: Option<String>,
/// }
///
/// let table = CustomerDto::bindings();
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.members()[0].kind(), MemberKind::Field);
/// ```
pub trait Bindable: Any + Send {
    fn bindings() -> Bindings;
}

/// How a member is reached: through a setter method or by direct field assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Setter,
    Field,
}

/// What a member accepts.
#[derive(Clone)]
pub enum Slot {
    /// A single value produced by [`coerce`](crate::coercion::coerce)
    Scalar { ty: ParamType, assign: ScalarAssign },
    /// A verb-method result of exactly one concrete type
    Object {
        ty: TypeId,
        type_name: &'static str,
        assign: ObjectAssign,
    },
    /// An embedded object bound recursively from a nested body payload
    Nested {
        bindings: Bindings,
        project: Projector,
    },
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Scalar { ty, .. } => f.debug_tuple("Scalar").field(ty).finish(),
            Slot::Object { type_name, .. } => f.debug_tuple("Object").field(type_name).finish(),
            Slot::Nested { bindings, .. } => f.debug_tuple("Nested").field(bindings).finish(),
        }
    }
}

/// One named, writable slot.
#[derive(Debug, Clone)]
pub struct Member {
    name: String,
    kind: MemberKind,
    slot: Slot,
}

impl Member {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    #[must_use]
    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    /// Setters match case-insensitively, fields match exactly.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self.kind {
            MemberKind::Setter => self.name.eq_ignore_ascii_case(name),
            MemberKind::Field => self.name == name,
        }
    }

    /// True if this member can hold a value of the given concrete type.
    #[must_use]
    pub fn accepts_object(&self, ty: TypeId) -> bool {
        matches!(self.slot, Slot::Object { ty: slot_ty, .. } if slot_ty == ty)
    }

    /// Write a coerced scalar. Returns `false` if this is not a scalar slot or
    /// the instance is not of the declaring type.
    pub fn assign_scalar(&self, target: &mut Instance, value: Coerced) -> bool {
        match &self.slot {
            Slot::Scalar { assign, .. } => assign(target, value),
            _ => false,
        }
    }

    /// Reach the embedded object of a nested slot, creating it if absent.
    pub fn project_nested<'a>(&self, target: &'a mut Instance) -> Option<&'a mut Instance> {
        match &self.slot {
            Slot::Nested { project, .. } => project(target),
            _ => None,
        }
    }

    /// Write a shared verb-method result.
    pub fn assign_object(&self, target: &mut Instance, value: &ResourceValue) -> bool {
        match &self.slot {
            Slot::Object { ty, assign, .. } if *ty == value.value_type_id() => assign(target, value),
            _ => false,
        }
    }
}

/// Ordered member table of one type.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    members: Vec<Member>,
}

impl Bindings {
    /// Start a table for members of `T`.
    #[must_use]
    pub fn builder<T: Any + Send>() -> BindingsBuilder<T> {
        BindingsBuilder {
            bindings: Bindings::default(),
            _target: std::marker::PhantomData,
        }
    }

    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members of the given kind, in declaration order.
    pub fn of_kind(&self, kind: MemberKind) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(move |m| m.kind == kind)
    }

    pub(crate) fn extend(&mut self, other: Bindings) {
        self.members.extend(other.members);
    }
}

/// Typed construction of a [`Bindings`] table for `T`.
pub struct BindingsBuilder<T> {
    bindings: Bindings,
    _target: std::marker::PhantomData<fn(T)>,
}

impl<T: Any + Send> BindingsBuilder<T> {
    fn push(mut self, name: &str, kind: MemberKind, slot: Slot) -> Self {
        self.bindings.members.push(Member {
            name: name.to_string(),
            kind,
            slot,
        });
        self
    }

    fn scalar<V, F>(self, name: &str, kind: MemberKind, assign: F) -> Self
    where
        V: Param,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let erased: ScalarAssign = Arc::new(move |obj: &mut Instance, value: Coerced| {
            match (obj.downcast_mut::<T>(), V::from_coerced(value)) {
                (Some(target), Some(v)) => {
                    assign(target, v);
                    true
                }
                _ => false,
            }
        });
        self.push(
            name,
            kind,
            Slot::Scalar {
                ty: V::param_type(),
                assign: erased,
            },
        )
    }

    fn object<P, F>(self, name: &str, kind: MemberKind, assign: F) -> Self
    where
        P: Send + Sync + 'static,
        F: Fn(&mut T, Arc<P>) + Send + Sync + 'static,
    {
        let erased: ObjectAssign = Arc::new(move |obj: &mut Instance, value: &ResourceValue| {
            match (obj.downcast_mut::<T>(), value.downcast_arc::<P>()) {
                (Some(target), Some(v)) => {
                    assign(target, v);
                    true
                }
                _ => false,
            }
        });
        self.push(
            name,
            kind,
            Slot::Object {
                ty: TypeId::of::<P>(),
                type_name: short_type_name::<P>(),
                assign: erased,
            },
        )
    }

    /// A setter taking one coercible value. `name` is the property name
    /// (`"name"` for `setName`).
    #[must_use]
    pub fn setter<V, F>(self, name: &str, assign: F) -> Self
    where
        V: Param,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.scalar(name, MemberKind::Setter, assign)
    }

    /// A directly assignable field holding one coercible value.
    #[must_use]
    pub fn field<V, F>(self, name: &str, assign: F) -> Self
    where
        V: Param,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.scalar(name, MemberKind::Field, assign)
    }

    /// A setter accepting a shared verb-method result of type `P`.
    #[must_use]
    pub fn object_setter<P, F>(self, name: &str, assign: F) -> Self
    where
        P: Send + Sync + 'static,
        F: Fn(&mut T, Arc<P>) + Send + Sync + 'static,
    {
        self.object(name, MemberKind::Setter, assign)
    }

    /// A field holding a shared verb-method result of type `P`.
    #[must_use]
    pub fn object_field<P, F>(self, name: &str, assign: F) -> Self
    where
        P: Send + Sync + 'static,
        F: Fn(&mut T, Arc<P>) + Send + Sync + 'static,
    {
        self.object(name, MemberKind::Field, assign)
    }

    /// An embedded [`Bindable`] object, reached through `access`.
    #[must_use]
    pub fn nested<N: Bindable>(self, name: &str, access: fn(&mut T) -> &mut N) -> Self {
        self.push(
            name,
            MemberKind::Field,
            Slot::Nested {
                bindings: N::bindings(),
                project: project_with(access),
            },
        )
    }

    /// Append every member of another table.
    #[must_use]
    pub fn extend(mut self, other: Bindings) -> Self {
        self.bindings.extend(other);
        self
    }

    #[must_use]
    pub fn build(self) -> Bindings {
        self.bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Person {
        name: Option<String>,
        age: i32,
        parent: Option<Arc<String>>,
    }

    fn table() -> Bindings {
        Bindings::builder::<Person>()
            .setter("name", |p: &mut Person, v: String| p.name = Some(v))
            .field("age", |p: &mut Person, v: i32| p.age = v)
            .object_field("parent", |p: &mut Person, v: Arc<String>| p.parent = Some(v))
            .build()
    }

    #[test]
    fn test_setter_matching_ignores_case() {
        let bindings = table();
        let setter = &bindings.members()[0];
        assert!(setter.matches("NAME"));
        let field = &bindings.members()[1];
        assert!(field.matches("age"));
        assert!(!field.matches("Age"));
    }

    #[test]
    fn test_scalar_assignment_checks_types() {
        let bindings = table();
        let mut person: Box<Instance> = Box::new(Person::default());
        assert!(bindings.members()[1].assign_scalar(&mut *person, Coerced::Int(30)));
        assert!(!bindings.members()[1].assign_scalar(&mut *person, Coerced::Text("x".into())));
        let mut other: Box<Instance> = Box::new(42_u8);
        assert!(!bindings.members()[1].assign_scalar(&mut *other, Coerced::Int(1)));
        let person = person.downcast_ref::<Person>().unwrap();
        assert_eq!(person.age, 30);
    }

    #[test]
    fn test_object_assignment_requires_exact_type() {
        let bindings = table();
        let member = &bindings.members()[2];
        let mut person: Box<Instance> = Box::new(Person::default());
        assert!(!member.assign_object(&mut *person, &ResourceValue::new(1_i32)));
        let parent = ResourceValue::new(String::from("root"));
        assert!(member.accepts_object(parent.value_type_id()));
        assert!(member.assign_object(&mut *person, &parent));
        let stored = person.downcast_ref::<Person>().unwrap().parent.clone().unwrap();
        assert!(parent.ptr_eq(&ResourceValue::from_arc(stored)));
    }
}
