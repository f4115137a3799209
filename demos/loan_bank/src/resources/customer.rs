use crate::dto::CustomerDto;
use crate::service::{CustomerResult, CustomerService};
use cakerouter::{Bindable, BusinessError, ResourceType};
use http::Method;

/// `com.bank.loan.Customer`
#[derive(Debug, Default, Bindable)]
pub struct Customer {
    pub name: Option<String>,
    pub email: Option<String>,
    #[bind(skip)]
    pub body: CustomerDto,
}

impl Customer {
    pub fn get(&mut self, id: i32) -> Result<CustomerResult, BusinessError> {
        Ok(match (&self.name, &self.email) {
            (Some(name), Some(email)) => CustomerService::get_by_id_name_email(id, name, email),
            _ => CustomerService::get_by_id(id),
        })
    }

    pub fn post(&mut self) -> Result<CustomerResult, BusinessError> {
        CustomerService::create(&self.body)
    }

    fn body_mut(&mut self) -> &mut CustomerDto {
        &mut self.body
    }

    #[must_use]
    pub fn resource_type() -> ResourceType {
        ResourceType::builder::<Customer>("com.bank.loan.Customer")
            .verb(Method::GET, Customer::get)
            .verb(Method::POST, Customer::post)
            .bindable()
            .body(Customer::body_mut)
            .build()
    }
}
