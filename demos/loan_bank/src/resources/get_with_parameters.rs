use cakerouter::coercion::{Coerced, Param, ParamType};
use cakerouter::{BusinessError, ResourceType};
use http::Method;

/// Structured argument object; not something a path segment converts into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetParam {
    pub id: i32,
}

impl Param for GetParam {
    fn param_type() -> ParamType {
        ParamType::Other("GetParam")
    }

    fn from_coerced(_value: Coerced) -> Option<Self> {
        None
    }
}

/// `business.service.mint.GetWithParameters`
#[derive(Debug, Default)]
pub struct GetWithParameters;

impl GetWithParameters {
    pub fn get(&mut self, param: GetParam) -> Result<i32, BusinessError> {
        Ok(param.id)
    }

    #[must_use]
    pub fn resource_type() -> ResourceType {
        ResourceType::builder::<GetWithParameters>("business.service.mint.GetWithParameters")
            .verb(Method::GET, GetWithParameters::get)
            .build()
    }
}
