//! Loan bank fixture application.
//!
//! Customers own proposals, so `/com/bank/loan/customer/1/proposal/100` loads
//! customer 1 and hands it to the proposal handler before proposal 100 is read.
//! The `mint` types exercise overload selection.

pub mod dto;
pub mod resources;
pub mod service;

use cakerouter::TypeRegistry;
use resources::{Customer, Design, GetWithParameters, Proposal};

/// Every resource type of the application.
#[must_use]
pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register(Customer::resource_type())
        .register(Proposal::resource_type())
        .register(Design::resource_type())
        .register(GetWithParameters::resource_type());
    registry
}
