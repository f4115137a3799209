//! # cakerouter
//!
//! **cakerouter** dispatches requests to handler types by naming convention. There is
//! no routing table: the URL path itself names the handlers.
//!
//! ## Overview
//!
//! A request path such as `/com/bank/loan/customer/1/proposal/100` is read left to
//! right. Segments that do not name a registered type build up a namespace
//! (`com.bank.loan`) until one does (`com.bank.loan.Customer`). Segments after a
//! handler are its positional arguments. When another type name appears, the
//! previous handler's `GET` verb-method runs with its arguments and the result is
//! injected into the next handler, so nested resources receive their parent.
//!
//! ## Architecture
//!
//! - **[`registry`]** - Handler types, their verb-methods and member tables
//! - **[`router`]** - Path tokenizer, cached type resolution, chain resolution
//! - **[`dispatcher`]** - Overload selection, invocation, the [`Dispatcher`] facade
//! - **[`binding`]** - Query binding, parent injection, JSON body parsing
//! - **[`coercion`]** - String to typed-value conversion shared by all of the above
//! - **[`error`]** - The [`DispatchError`] taxonomy
//! - **[`cli`]** - In-process command-line front end
//! - **[`logging`]** / **[`runtime_config`]** - Ambient setup read from `CAKE_*` variables
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Dispatcher
//!     participant Chain as ChainResolver
//!     participant Types as TypeResolver
//!     participant Selector as MethodSelector
//!     participant Handler
//!
//!     Caller->>Dispatcher: dispatch(GET /customer/1/proposal/100)
//!     Dispatcher->>Chain: resolve(request)
//!     Chain->>Types: resolve("Customer")
//!     Chain->>Handler: instantiate Customer
//!     Chain->>Types: resolve("Proposal")
//!     Chain->>Selector: select(Customer, GET, ["1"])
//!     Chain->>Handler: Customer.get(1)
//!     Chain->>Handler: instantiate Proposal, inject CustomerResult
//!     Chain->>Handler: bind query, parse body
//!     Chain-->>Dispatcher: ResolvedChain(Proposal, ["100"])
//!     Dispatcher->>Selector: select(Proposal, GET, ["100"])
//!     Dispatcher->>Handler: Proposal.get(100)
//!     Dispatcher-->>Caller: ResourceValue
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use cakerouter::{Bindable, BusinessError, Dispatcher, ExchangeRequest, ResourceType, TypeRegistry};
//! use http::Method;
//!
//! #[derive(Default, Bindable)]
//! struct Customer {
//!     name: Option<String>,
//! }
//!
//! impl Customer {
//!     fn get(&mut self, id: i32) -> Result<String, BusinessError> {
//!         Ok(format!("{id}:{}", self.name.as_deref().unwrap_or("anonymous")))
//!     }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(
//!     ResourceType::builder::<Customer>("shop.Customer")
//!         .verb(Method::GET, Customer::get)
//!         .bindable()
//!         .build(),
//! );
//!
//! let dispatcher = Dispatcher::new(registry);
//! let request = ExchangeRequest::from_target(Method::GET, "/api/shop/customer/7?name=Ann", "/api");
//! let value = dispatcher.dispatch(&request).unwrap();
//! assert_eq!(value.downcast_ref::<String>().unwrap(), "7:Ann");
//! ```
//!
//! ## Concurrency
//!
//! A [`Dispatcher`] is `Send + Sync` and meant to be shared behind an `Arc`. Handler
//! instances are created per request and never shared; the caches are concurrent
//! maps that only ever memoize deterministic lookups.

extern crate self as cakerouter;

pub mod binding;
pub mod cli;
pub mod coercion;
pub mod dispatcher;
pub mod error;
pub mod exchange;
pub mod ids;
pub mod logging;
pub mod registry;
pub mod router;
pub mod runtime_config;
pub mod value;

pub use cakerouter_macros::Bindable;
pub use coercion::{coerce, Coerced, EnumType, Param, ParamType};
pub use dispatcher::{CacheStats, Dispatcher, MethodSelector};
pub use error::{
    BusinessError, BusinessErrorKind, DispatchError, ErrorClass, FrameworkErrorKind, MethodMismatch,
};
pub use exchange::{ExchangeRequest, QueryParams};
pub use ids::ExchangeId;
pub use registry::{ResourceType, TypeRegistry};
pub use router::ResolvedChain;
pub use runtime_config::RuntimeConfig;
pub use value::ResourceValue;
