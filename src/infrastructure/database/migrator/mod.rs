//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_artists;
mod m20250601_000002_create_stages;
mod m20250601_000003_create_concerts;
mod m20250601_000004_create_reservations;
mod m20250601_000005_create_parameters;
mod m20250601_000006_create_users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_artists::Migration),
            Box::new(m20250601_000002_create_stages::Migration),
            Box::new(m20250601_000003_create_concerts::Migration),
            Box::new(m20250601_000004_create_reservations::Migration),
            Box::new(m20250601_000005_create_parameters::Migration),
            Box::new(m20250601_000006_create_users::Migration),
        ]
    }
}
