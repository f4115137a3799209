use cakerouter::coercion::{Coerced, Param, ParamType};
use cakerouter::{BusinessError, ResourceType};
use http::Method;

pub const METHOD_GET_P0: &str = "METHOD_GET_P0";
pub const METHOD_GET_P1: &str = "METHOD_GET_P1";
pub const METHOD_GET_P3: &str = "METHOD_GET_P3";
pub const METHOD_GET_P5: &str = "METHOD_GET_P5";

/// A calendar date parameter. Dates have no coercion rule, so verb-methods
/// taking one can never be selected from a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterDate;

impl Param for RegisterDate {
    fn param_type() -> ParamType {
        ParamType::Other("Date")
    }

    fn from_coerced(_value: Coerced) -> Option<Self> {
        None
    }
}

/// `business.service.mint.Design`: one `GET` overload per arity, two of arity three.
#[derive(Debug, Default)]
pub struct Design;

impl Design {
    pub fn get(&mut self) -> Result<&'static str, BusinessError> {
        Ok(METHOD_GET_P0)
    }

    pub fn get_by_id(&mut self, _id: i32) -> Result<&'static str, BusinessError> {
        Ok(METHOD_GET_P1)
    }

    pub fn get_by_name_email(
        &mut self,
        _id: i32,
        _name: String,
        _email: String,
    ) -> Result<&'static str, BusinessError> {
        Ok(METHOD_GET_P3)
    }

    pub fn get_by_name_age(
        &mut self,
        _id: i32,
        _name: String,
        _age: i32,
    ) -> Result<&'static str, BusinessError> {
        Ok(METHOD_GET_P3)
    }

    pub fn get_registered(
        &mut self,
        _id: i32,
        _name: String,
        _email: String,
        _score: f32,
        _registered: RegisterDate,
    ) -> Result<&'static str, BusinessError> {
        Ok(METHOD_GET_P5)
    }

    #[must_use]
    pub fn resource_type() -> ResourceType {
        ResourceType::builder::<Design>("business.service.mint.Design")
            .verb(Method::GET, Design::get)
            .verb(Method::GET, Design::get_by_id)
            .verb(Method::GET, Design::get_by_name_email)
            .verb(Method::GET, Design::get_by_name_age)
            .verb(Method::GET, Design::get_registered)
            .build()
    }
}
