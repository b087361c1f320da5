pub use sea_orm_migration::prelude::*;

mod m20231116_000001_create_events;
mod m20231116_000002_create_members;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20231116_000001_create_events::Migration),
            Box::new(m20231116_000002_create_members::Migration),
        ]
    }
}
