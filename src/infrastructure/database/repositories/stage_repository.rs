//! SeaORM implementation of StageRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{DomainError, DomainResult, Stage, StageRepository};
use crate::infrastructure::database::entities::stage;

pub struct SeaOrmStageRepository {
    db: DatabaseConnection,
}

impl SeaOrmStageRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: stage::Model) -> Stage {
    Stage {
        id: m.id,
        name: m.name,
        capacity: m.capacity,
    }
}

#[async_trait]
impl StageRepository for SeaOrmStageRepository {
    async fn find_all(&self) -> DomainResult<Vec<Stage>> {
        let models = stage::Entity::find()
            .order_by_desc(stage::Column::Capacity)
            .order_by_asc(stage::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Stage>> {
        let model = stage::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Stage>> {
        let model = stage::Entity::find()
            .filter(stage::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn create(&self, s: Stage) -> DomainResult<Stage> {
        let model = stage::ActiveModel {
            id: NotSet,
            name: Set(s.name),
            capacity: Set(s.capacity),
        }
        .insert(&self.db)
        .await?;
        Ok(model_to_domain(model))
    }

    async fn update(&self, s: Stage) -> DomainResult<Stage> {
        if stage::Entity::find_by_id(s.id).one(&self.db).await?.is_none() {
            return Err(DomainError::not_found("Stage", "id", s.id));
        }
        let model = stage::ActiveModel {
            id: Set(s.id),
            name: Set(s.name),
            capacity: Set(s.capacity),
        }
        .update(&self.db)
        .await?;
        Ok(model_to_domain(model))
    }

    async fn delete(&self, id: i32) -> DomainResult<bool> {
        let res = stage::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}
