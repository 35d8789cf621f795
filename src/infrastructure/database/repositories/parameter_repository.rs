//! SeaORM implementation of ParameterRepository

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

use crate::domain::{DomainResult, Parameter, ParameterRepository};
use crate::infrastructure::database::entities::parameter;

pub struct SeaOrmParameterRepository {
    db: DatabaseConnection,
}

impl SeaOrmParameterRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ParameterRepository for SeaOrmParameterRepository {
    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        let model = parameter::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.value))
    }

    async fn set(&self, key: &str, value: &str) -> DomainResult<Parameter> {
        let model = parameter::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
        };
        parameter::Entity::insert(model)
            .on_conflict(
                OnConflict::column(parameter::Column::Key)
                    .update_column(parameter::Column::Value)
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(Parameter {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}
