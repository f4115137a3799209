use cakerouter::Bindable;
use serde::Serialize;

/// Customer payload accepted by `POST` and embedded in proposal payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Bindable)]
pub struct CustomerDto {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Bindable)]
pub struct ProposalDto {
    pub amount: Option<f64>,
    #[bind(nested)]
    pub customer: Option<CustomerDto>,
}
