//! # Router Module
//!
//! Convention-based resolution of a request path into a chain of live handler
//! instances. There is no routing table: the path itself names the handlers.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Splitting the path into tokens after the context prefix ([`tokenize`])
//! - Turning tokens into qualified type-name candidates ([`candidate_name`])
//! - Resolving candidates against the registry, with a process-wide cache ([`TypeResolver`])
//! - Walking the tokens once, left to right, building the handler chain ([`ResolvedChain`])
//!
//! ## Resolution
//!
//! For `/api/com/bank/loan/customer/1/proposal/100` under context prefix `/api`:
//!
//! | Token | Candidate | Outcome |
//! |---|---|---|
//! | `com` | `Com` | not a type, namespace becomes `com` |
//! | `bank` | `com.Bank` | not a type, namespace becomes `com.bank` |
//! | `loan` | `com.bank.Loan` | not a type, namespace becomes `com.bank.loan` |
//! | `customer` | `com.bank.loan.Customer` | root handler |
//! | `1` | `com.bank.loan.1` | positional argument |
//! | `proposal` | `com.bank.loan.Proposal` | `Customer.get(1)` runs, its result is injected into `Proposal` |
//! | `100` | `com.bank.loan.100` | positional argument |
//!
//! The resolver then binds query parameters and the body onto the terminal
//! handler and hands it back. The final verb-method is chosen by the caller from
//! the request's verb.
//!
//! ## Performance
//!
//! One pass, one registry lookup per token on a cold cache and none for
//! previously resolved type names afterwards. Misses are never cached, so
//! argument tokens cost one lookup on every request.

mod chain;
mod tokenizer;
mod types;

pub use chain::{ArgVec, ResolvedChain};
pub use tokenizer::{candidate_name, tokenize, TokenVec, MAX_INLINE_TOKENS};
pub use types::TypeResolver;

pub(crate) use chain::ChainResolver;
