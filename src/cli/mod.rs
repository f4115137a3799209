//! # CLI Module
//!
//! Command-line front end that dispatches requests against a registry in-process.
//! Applications build their [`TypeRegistry`](crate::registry::TypeRegistry) and
//! hand it to [`run`] from their `main`.
//!
//! ## Commands
//!
//! ### `dispatch`
//!
//! Resolve and invoke one request, printing the handler result as JSON:
//!
//! ```bash
//! loan_bank dispatch /com/bank/loan/customer/1
//! loan_bank dispatch --prefix /api '/api/com/bank/loan/customer/1?name=Ann&email=a@b.c'
//! loan_bank dispatch -m POST --body '{"name":"Ann","email":"a@b.c"}' /com/bank/loan/customer
//! ```
//!
//! Options:
//! - `--method <VERB>` - HTTP verb (default: GET)
//! - `--prefix <PREFIX>` - Context prefix stripped before resolution
//! - `--body <JSON>` / `--body-file <FILE>` - Request body
//!
//! On failure the error class and message are printed as JSON and the process
//! exits with status 1.
//!
//! ### `types`
//!
//! List registered resource types with their verb-methods and members.
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! fn main() -> anyhow::Result<std::process::ExitCode> {
//!     cakerouter::cli::run(my_app::registry())
//! }
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run, run_cli, Cli, Commands};
