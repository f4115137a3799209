//! # Dispatcher Module
//!
//! Turns an [`ExchangeRequest`](crate::exchange::ExchangeRequest) into the value
//! returned by the right verb-method of the right resource type.
//!
//! ## Overview
//!
//! The dispatcher ties the pieces together:
//! - the [`router`](crate::router) walks the path and builds the handler chain
//! - the [`MethodSelector`] picks an overload by verb, arity and argument convertibility
//! - [`Dispatcher::invoke`] coerces the arguments and calls the handler, catching panics
//!
//! ## Request Flow
//!
//! 1. Tokenize the path below the context prefix
//! 2. Resolve types left to right, running intermediate `GET`s and injecting results
//! 3. Bind query parameters and the JSON body onto the terminal handler
//! 4. Select the request verb's overload and invoke it
//!
//! ## Example
//!
//! ```rust
//! use cakerouter::{BusinessError, Dispatcher, ExchangeRequest, ResourceType, TypeRegistry};
//! use http::Method;
//!
//! #[derive(Default)]
//! struct Greeting;
//!
//! impl Greeting {
//!     fn get(&mut self, name: String) -> Result<String, BusinessError> {
//!         Ok(format!("hello {name}"))
//!     }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(
//!     ResourceType::builder::<Greeting>("Greeting")
//!         .verb(Method::GET, Greeting::get)
//!         .build(),
//! );
//!
//! let dispatcher = Dispatcher::new(registry);
//! let value = dispatcher
//!     .dispatch(&ExchangeRequest::get("/greeting/world"))
//!     .unwrap();
//! assert_eq!(value.downcast_ref::<String>().unwrap(), "hello world");
//! ```
//!
//! ## Error Handling
//!
//! Handler panics are caught and reported as
//! [`FrameworkErrorKind::MethodInvocation`](crate::error::FrameworkErrorKind) failures;
//! business failures pass through untouched.

mod core;
mod selector;

pub use self::core::{CacheStats, Dispatcher};
pub(crate) use self::core::invoke_method;
pub use selector::MethodSelector;
