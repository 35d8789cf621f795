//! Reservation entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub concert_id: i32,

    /// Normalized (trimmed, lowercased) requester email
    pub email: String,

    pub quantity: i32,

    /// CONFIRMED or CANCELLED
    pub status: String,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::concert::Entity",
        from = "Column::ConcertId",
        to = "super::concert::Column::Id"
    )]
    Concert,
}

impl Related<super::concert::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Concert.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
