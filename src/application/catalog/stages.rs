//! Stage catalog

use std::sync::Arc;

use tracing::info;

use super::artists::required_name;
use crate::domain::{ConcertFilter, DomainError, DomainResult, RepositoryProvider, Stage};

/// Stage fields for create/update; on update `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct StageDraft {
    pub name: Option<String>,
    pub capacity: Option<i32>,
}

pub struct StageService {
    repos: Arc<dyn RepositoryProvider>,
}

impl StageService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn list(&self) -> DomainResult<Vec<Stage>> {
        self.repos.stages().find_all().await
    }

    pub async fn get(&self, id: i32) -> DomainResult<Stage> {
        self.repos
            .stages()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Stage", "id", id))
    }

    pub async fn create(&self, draft: StageDraft) -> DomainResult<Stage> {
        let name = required_name(draft.name.as_deref())?;
        let capacity = draft
            .capacity
            .ok_or_else(|| DomainError::Validation("capacity is required".into()))?;
        validate_capacity(capacity)?;
        self.ensure_name_free(&name, None).await?;

        let stage = self
            .repos
            .stages()
            .create(Stage { id: 0, name, capacity })
            .await?;
        info!(stage_id = stage.id, capacity = stage.capacity, "Stage created");
        Ok(stage)
    }

    /// Shrinking a stage below the capacity of a concert it hosts is refused.
    pub async fn update(&self, id: i32, draft: StageDraft) -> DomainResult<Stage> {
        let mut stage = self.get(id).await?;

        if let Some(name) = draft.name {
            let name = required_name(Some(&name))?;
            self.ensure_name_free(&name, Some(id)).await?;
            stage.name = name;
        }
        if let Some(capacity) = draft.capacity {
            validate_capacity(capacity)?;
            let largest = self
                .hosted(id)
                .await?
                .into_iter()
                .map(|d| d.concert.max_capacity)
                .max()
                .unwrap_or(0);
            if capacity < largest {
                return Err(DomainError::Conflict(format!(
                    "stage {id} hosts a concert with capacity {largest}"
                )));
            }
            stage.capacity = capacity;
        }

        self.repos.stages().update(stage).await
    }

    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        self.get(id).await?;
        if !self.hosted(id).await?.is_empty() {
            return Err(DomainError::Conflict(format!(
                "stage {id} still hosts concerts"
            )));
        }
        self.repos.stages().delete(id).await?;
        info!(stage_id = id, "Stage deleted");
        Ok(())
    }

    async fn hosted(&self, id: i32) -> DomainResult<Vec<crate::domain::ConcertDetails>> {
        self.repos
            .concerts()
            .find_details(&ConcertFilter {
                stage_id: Some(id),
                ..Default::default()
            })
            .await
    }

    async fn ensure_name_free(&self, name: &str, except: Option<i32>) -> DomainResult<()> {
        match self.repos.stages().find_by_name(name).await? {
            Some(existing) if Some(existing.id) != except => Err(DomainError::Conflict(format!(
                "stage '{name}' already exists"
            ))),
            _ => Ok(()),
        }
    }
}

fn validate_capacity(capacity: i32) -> DomainResult<()> {
    if capacity < 1 {
        return Err(DomainError::Validation("capacity must be at least 1".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryStore;

    fn draft(name: &str, capacity: i32) -> StageDraft {
        StageDraft {
            name: Some(name.into()),
            capacity: Some(capacity),
        }
    }

    #[tokio::test]
    async fn listed_by_capacity_desc() {
        let service = StageService::new(Arc::new(InMemoryStore::new()));
        service.create(draft("Small", 100)).await.unwrap();
        service.create(draft("Main", 5000)).await.unwrap();

        let names: Vec<_> = service.list().await.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Main", "Small"]);
    }

    #[tokio::test]
    async fn capacity_must_be_positive() {
        let service = StageService::new(Arc::new(InMemoryStore::new()));
        let err = service.create(draft("Empty", 0)).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let service = StageService::new(Arc::new(InMemoryStore::new()));
        service.create(draft("Main", 10)).await.unwrap();
        let err = service.create(draft("Main", 20)).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
