//! # Registry Module
//!
//! The type registry is the process-wide table of handler types that the chain
//! resolver discovers by naming convention.
//!
//! ## Overview
//!
//! Nothing here is found by probing live types. Each handler type is declared
//! once, at startup, as a [`ResourceType`]:
//!
//! - a qualified name such as `com.bank.loan.Customer`
//! - a zero-argument factory (usually [`Default`])
//! - verb-methods in declaration order, each a plain function whose parameters
//!   implement [`Param`](crate::coercion::Param)
//! - a [`Bindings`] member table of setters, fields and object slots, used by the
//!   query binder and the parent injector
//! - optionally, a body acceptor: an embedded [`Bindable`] object that receives the
//!   request body
//!
//! ## Example
//!
//! ```rust
//! use cakerouter::error::BusinessError;
//! use cakerouter::registry::{ResourceType, TypeRegistry};
//! use http::Method;
//!
//! #[derive(Default)]
//! struct Customer {
//!     name: Option<String>,
//! }
//!
//! impl Customer {
//!     fn get(&mut self, id: i32) -> Result<String, BusinessError> {
//!         Ok(format!("{} #{}", self.name.as_deref().unwrap_or("anonymous"), id))
//!     }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(
//!     ResourceType::builder::<Customer>("com.bank.loan.Customer")
//!         .verb(Method::GET, Customer::get)
//!         .setter("name", |c: &mut Customer, v: String| c.name = Some(v))
//!         .build(),
//! );
//!
//! assert!(registry.lookup("com.bank.loan.Customer").is_some());
//! assert!(registry.has_namespace("com.bank"));
//! assert_eq!(registry.lookups(), 1);
//! ```

mod bindings;
mod core;
mod resource;
#[cfg(test)]
mod tests;
mod verb;

pub use bindings::{Bindable, Bindings, BindingsBuilder, Instance, Member, MemberKind, Slot};
pub use self::core::TypeRegistry;
pub use resource::{BodySlot, ResourceType, ResourceTypeBuilder};
pub use verb::{CallError, ParamList, VerbHandler, VerbMethod, VerbMethodRef};

pub(crate) use resource::panic_message;
