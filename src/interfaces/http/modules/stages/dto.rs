//! Stage DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::StageDraft;
use crate::domain::Stage;

#[derive(Debug, Serialize, ToSchema)]
pub struct StageDto {
    pub id: i32,
    pub name: String,
    pub capacity: i32,
}

impl From<Stage> for StageDto {
    fn from(s: Stage) -> Self {
        Self {
            id: s.id,
            name: s.name,
            capacity: s.capacity,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStageRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    #[validate(range(min = 1, message = "capacity must be at least 1"))]
    pub capacity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStageRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 1, message = "capacity must be at least 1"))]
    pub capacity: Option<i32>,
}

impl From<CreateStageRequest> for StageDraft {
    fn from(r: CreateStageRequest) -> Self {
        Self {
            name: Some(r.name),
            capacity: Some(r.capacity),
        }
    }
}

impl From<UpdateStageRequest> for StageDraft {
    fn from(r: UpdateStageRequest) -> Self {
        Self {
            name: r.name,
            capacity: r.capacity,
        }
    }
}
