pub use sea_orm_migration::prelude::*;

mod iden;
mod m20250801_000001_create_guest_tables;
mod m20250801_000002_create_registry_tables;
mod m20250801_000003_create_campaign_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_guest_tables::Migration),
            Box::new(m20250801_000002_create_registry_tables::Migration),
            Box::new(m20250801_000003_create_campaign_tables::Migration),
        ]
    }
}
