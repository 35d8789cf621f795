//! Parameter repository interface

use async_trait::async_trait;

use super::model::Parameter;
use crate::domain::DomainResult;

#[async_trait]
pub trait ParameterRepository: Send + Sync {
    /// Raw value for `key`, unparsed
    async fn get(&self, key: &str) -> DomainResult<Option<String>>;

    /// Insert or overwrite
    async fn set(&self, key: &str, value: &str) -> DomainResult<Parameter>;
}
