#![allow(dead_code)]

use cakerouter::{DispatchError, Dispatcher, ExchangeRequest, ResourceValue, RuntimeConfig};
use http::Method;

/// Dispatcher over the loan bank registry with default configuration.
pub fn dispatcher() -> Dispatcher {
    Dispatcher::with_config(loan_bank::registry(), RuntimeConfig::default())
}

/// Same registry with both caches switched off.
pub fn uncached_dispatcher() -> Dispatcher {
    let config = RuntimeConfig {
        type_cache: false,
        method_cache: false,
        ..RuntimeConfig::default()
    };
    Dispatcher::with_config(loan_bank::registry(), config)
}

pub fn get(dispatcher: &Dispatcher, target: &str) -> Result<ResourceValue, DispatchError> {
    dispatcher.dispatch(&ExchangeRequest::from_target(Method::GET, target, ""))
}

pub fn post(dispatcher: &Dispatcher, target: &str, body: &str) -> Result<ResourceValue, DispatchError> {
    dispatcher.dispatch(&ExchangeRequest::from_target(Method::POST, target, "").with_body(body))
}

pub const CUSTOMER: &str = "/com/bank/loan/customer";
pub const DESIGN: &str = "/business/service/mint/design";
