pub use sea_orm_migration::prelude::*;

mod m20250301_000000_create_workspaces;
mod m20250301_000001_create_brands;
mod m20250301_000002_create_social_accounts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000000_create_workspaces::Migration),
            Box::new(m20250301_000001_create_brands::Migration),
            Box::new(m20250301_000002_create_social_accounts::Migration),
        ]
    }
}
