//! Create concerts table
//!
//! A concert books one stage for a time slot; the slot index backs the
//! same-stage overlap check.

use sea_orm_migration::prelude::*;

use super::m20250601_000001_create_artists::Artists;
use super::m20250601_000002_create_stages::Stages;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Concerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Concerts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Concerts::StageId).integer().not_null())
                    .col(ColumnDef::new(Concerts::ArtistId).integer().not_null())
                    .col(
                        ColumnDef::new(Concerts::StartAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Concerts::EndAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Concerts::MaxCapacity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Concerts::Status)
                            .string()
                            .not_null()
                            .default("SCHEDULED"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_concerts_stage")
                            .from(Concerts::Table, Concerts::StageId)
                            .to(Stages::Table, Stages::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_concerts_artist")
                            .from(Concerts::Table, Concerts::ArtistId)
                            .to(Artists::Table, Artists::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_concerts_stage_start")
                    .table(Concerts::Table)
                    .col(Concerts::StageId)
                    .col(Concerts::StartAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Concerts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Concerts {
    Table,
    Id,
    StageId,
    ArtistId,
    StartAt,
    EndAt,
    MaxCapacity,
    Status,
}
