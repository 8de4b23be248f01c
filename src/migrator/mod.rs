use sea_orm_migration::prelude::*;

mod m20260301_000001_create_core_tables;
mod m20260308_000001_create_health_samples;
mod m20260315_000001_create_insights;
mod m20260322_000001_create_budgets;
mod m20260402_000001_create_reference_images;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_core_tables::Migration),
            Box::new(m20260308_000001_create_health_samples::Migration),
            Box::new(m20260315_000001_create_insights::Migration),
            Box::new(m20260322_000001_create_budgets::Migration),
            Box::new(m20260402_000001_create_reference_images::Migration),
        ]
    }
}
