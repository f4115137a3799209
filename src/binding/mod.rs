//! # Binding Module
//!
//! Best-effort writes of request data onto live handler instances.
//!
//! - [`bind_query`] applies query parameters to the terminal handler
//! - [`inject_parent`] hands the previous handler's result to the next one
//! - [`parse_body`] parses the request body into the terminal handler's body object
//!
//! All three go through a type's [`Bindings`](crate::registry::Bindings) table and
//! share [`coerce`](crate::coercion::coerce) with positional dispatch. Only a
//! malformed body is an error; a name that matches nothing, a value that does not
//! convert, or a parent nobody accepts is skipped silently, and a handler that
//! needed the missing data reports that itself.

mod body;
mod inject;
mod params;
#[cfg(test)]
mod tests;

pub use body::{apply_object, parse_body};
pub use inject::{inject_parent, strip_suffix, Injection};
pub use params::{bind_attribute, bind_query};
