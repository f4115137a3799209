//! In-memory business services behind the loan resources.

use crate::dto::{CustomerDto, ProposalDto};
use cakerouter::BusinessError;
use serde::Serialize;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerResult {
    pub id: i32,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProposalResult {
    pub id: i32,
    pub amount: f64,
    pub status: String,
    pub customer: Arc<CustomerResult>,
}

pub struct CustomerService;

impl CustomerService {
    #[must_use]
    pub fn get_by_id(id: i32) -> CustomerResult {
        Self::get_by_id_name_email(id, "John Doe", "john.doe@universe.com")
    }

    #[must_use]
    pub fn get_by_id_name_email(id: i32, name: &str, email: &str) -> CustomerResult {
        CustomerResult {
            id,
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    /// # Errors
    ///
    /// Bad request when the name or email is missing.
    pub fn create(dto: &CustomerDto) -> Result<CustomerResult, BusinessError> {
        let name = dto
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| BusinessError::bad_request("Customer name is required"))?;
        let email = dto
            .email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| BusinessError::bad_request("Customer email is required"))?;
        info!(name, "Customer created");
        Ok(Self::get_by_id_name_email(1, name, email))
    }
}

static NEXT_PROPOSAL_ID: AtomicI32 = AtomicI32::new(5000);

pub struct ProposalService;

impl ProposalService {
    #[must_use]
    pub fn get(id: i32, customer: Arc<CustomerResult>) -> ProposalResult {
        ProposalResult {
            id,
            amount: 10000.0,
            status: "Analizing".to_string(),
            customer,
        }
    }

    /// # Errors
    ///
    /// Bad request when the amount or the embedded customer is missing or invalid.
    pub fn create(dto: &ProposalDto) -> Result<ProposalResult, BusinessError> {
        let amount = dto
            .amount
            .ok_or_else(|| BusinessError::bad_request("Proposal amount is required"))?;
        let customer = dto
            .customer
            .as_ref()
            .ok_or_else(|| BusinessError::bad_request("Customer information is required"))?;
        let customer = CustomerService::create(customer)?;
        let id = NEXT_PROPOSAL_ID.fetch_add(1, Ordering::Relaxed) + 1;
        info!(id, amount, "Proposal created");
        Ok(ProposalResult {
            id,
            amount,
            status: "PENDING".to_string(),
            customer: Arc::new(customer),
        })
    }
}
