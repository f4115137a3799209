use crate::dto::ProposalDto;
use crate::service::{CustomerResult, ProposalResult, ProposalService};
use cakerouter::{BusinessError, ResourceType};
use http::Method;
use std::sync::Arc;

/// `com.bank.loan.Proposal`, reached below a customer.
#[derive(Debug, Default)]
pub struct Proposal {
    customer: Option<Arc<CustomerResult>>,
    body: ProposalDto,
}

impl Proposal {
    pub fn set_customer(&mut self, customer: Arc<CustomerResult>) {
        self.customer = Some(customer);
    }

    #[must_use]
    pub fn customer(&self) -> Option<&Arc<CustomerResult>> {
        self.customer.as_ref()
    }

    fn require_customer(&self) -> Result<Arc<CustomerResult>, BusinessError> {
        self.customer
            .clone()
            .ok_or_else(|| BusinessError::precondition("Customer is required"))
    }

    pub fn get(&mut self, id: i32) -> Result<ProposalResult, BusinessError> {
        Ok(ProposalService::get(id, self.require_customer()?))
    }

    pub fn get_with_status(&mut self, id: i32, status: String) -> Result<ProposalResult, BusinessError> {
        let mut proposal = ProposalService::get(id, self.require_customer()?);
        proposal.status = status;
        Ok(proposal)
    }

    pub fn post(&mut self) -> Result<ProposalResult, BusinessError> {
        ProposalService::create(&self.body)
    }

    fn body_mut(&mut self) -> &mut ProposalDto {
        &mut self.body
    }

    #[must_use]
    pub fn resource_type() -> ResourceType {
        ResourceType::builder::<Proposal>("com.bank.loan.Proposal")
            .verb(Method::GET, Proposal::get)
            .verb(Method::GET, Proposal::get_with_status)
            .verb(Method::POST, Proposal::post)
            .object_setter("customer", Proposal::set_customer)
            .body(Proposal::body_mut)
            .build()
    }
}
