mod customer;
mod design;
mod get_with_parameters;
mod proposal;

pub use customer::Customer;
pub use design::{Design, RegisterDate, METHOD_GET_P0, METHOD_GET_P1, METHOD_GET_P3, METHOD_GET_P5};
pub use get_with_parameters::{GetParam, GetWithParameters};
pub use proposal::Proposal;
