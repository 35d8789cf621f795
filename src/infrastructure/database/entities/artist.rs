//! Artist entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(nullable)]
    pub genre: Option<String>,

    #[sea_orm(nullable)]
    pub bio_short: Option<String>,

    #[sea_orm(nullable)]
    pub links: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::concert::Entity")]
    Concerts,
}

impl Related<super::concert::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Concerts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
