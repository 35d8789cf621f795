//! Booking parameters (key/value)

use std::sync::Arc;

use tracing::info;

use crate::application::booking::CancellationDeadline;
use crate::domain::{DomainError, DomainResult, Parameter, RepositoryProvider, CANCEL_DEADLINE_HOURS};

pub struct ParameterService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ParameterService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn get(&self, key: &str) -> DomainResult<Parameter> {
        let value = self
            .repos
            .parameters()
            .get(key)
            .await?
            .ok_or_else(|| DomainError::not_found("Parameter", "key", key))?;
        Ok(Parameter {
            key: key.to_string(),
            value,
        })
    }

    pub async fn set(&self, key: &str, value: &str) -> DomainResult<Parameter> {
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            return Err(DomainError::Validation("key and value are required".into()));
        }
        if key == CANCEL_DEADLINE_HOURS && !is_valid_deadline(value) {
            return Err(DomainError::Validation(format!(
                "{CANCEL_DEADLINE_HOURS} must be a number of hours between 0 and {}",
                CancellationDeadline::MAX_HOURS
            )));
        }
        let parameter = self.repos.parameters().set(key, value).await?;
        info!(key, value, "Parameter updated");
        Ok(parameter)
    }
}

fn is_valid_deadline(value: &str) -> bool {
    value
        .parse::<f64>()
        .ok()
        .and_then(CancellationDeadline::new)
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryStore;

    #[tokio::test]
    async fn upsert_overwrites() {
        let service = ParameterService::new(Arc::new(InMemoryStore::new()));
        service.set(CANCEL_DEADLINE_HOURS, "24").await.unwrap();
        service.set(CANCEL_DEADLINE_HOURS, "12").await.unwrap();

        assert_eq!(service.get(CANCEL_DEADLINE_HOURS).await.unwrap().value, "12");
    }

    #[tokio::test]
    async fn missing_and_empty() {
        let service = ParameterService::new(Arc::new(InMemoryStore::new()));
        assert!(matches!(
            service.get("NOPE").await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
        assert!(matches!(
            service.set("KEY", "  ").await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn unusable_deadline_is_refused() {
        let service = ParameterService::new(Arc::new(InMemoryStore::new()));
        service.set(CANCEL_DEADLINE_HOURS, "12").await.unwrap();

        for bad in ["1e10", "-1", "NaN", "inf", "soon"] {
            assert!(
                matches!(
                    service.set(CANCEL_DEADLINE_HOURS, bad).await.unwrap_err(),
                    DomainError::Validation(_)
                ),
                "{bad} accepted"
            );
        }
        assert_eq!(service.get(CANCEL_DEADLINE_HOURS).await.unwrap().value, "12");

        service.set(CANCEL_DEADLINE_HOURS, "0.5").await.unwrap();
        service.set("OTHER_KEY", "anything").await.unwrap();
    }
}
