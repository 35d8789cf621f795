//! Parameter DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Parameter;

#[derive(Debug, Serialize, ToSchema)]
pub struct ParameterDto {
    pub key: String,
    pub value: String,
}

impl From<Parameter> for ParameterDto {
    fn from(p: Parameter) -> Self {
        Self {
            key: p.key,
            value: p.value,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetParameterRequest {
    #[validate(length(min = 1, max = 500, message = "value must be 1-500 characters"))]
    pub value: String,
}
