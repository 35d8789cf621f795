//! SeaORM implementation of ArtistRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{Artist, ArtistRepository, DomainError, DomainResult};
use crate::infrastructure::database::entities::artist;

pub struct SeaOrmArtistRepository {
    db: DatabaseConnection,
}

impl SeaOrmArtistRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: artist::Model) -> Artist {
    Artist {
        id: m.id,
        name: m.name,
        genre: m.genre,
        bio_short: m.bio_short,
        links: m.links,
    }
}

#[async_trait]
impl ArtistRepository for SeaOrmArtistRepository {
    async fn find_all(&self) -> DomainResult<Vec<Artist>> {
        let models = artist::Entity::find()
            .order_by_asc(artist::Column::Name)
            .order_by_asc(artist::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Artist>> {
        let model = artist::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Artist>> {
        let model = artist::Entity::find()
            .filter(artist::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn create(&self, a: Artist) -> DomainResult<Artist> {
        let model = artist::ActiveModel {
            id: NotSet,
            name: Set(a.name),
            genre: Set(a.genre),
            bio_short: Set(a.bio_short),
            links: Set(a.links),
        }
        .insert(&self.db)
        .await?;
        Ok(model_to_domain(model))
    }

    async fn update(&self, a: Artist) -> DomainResult<Artist> {
        if artist::Entity::find_by_id(a.id).one(&self.db).await?.is_none() {
            return Err(DomainError::not_found("Artist", "id", a.id));
        }
        let model = artist::ActiveModel {
            id: Set(a.id),
            name: Set(a.name),
            genre: Set(a.genre),
            bio_short: Set(a.bio_short),
            links: Set(a.links),
        }
        .update(&self.db)
        .await?;
        Ok(model_to_domain(model))
    }

    async fn delete(&self, id: i32) -> DomainResult<bool> {
        let res = artist::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}
