pub use sea_orm_migration::prelude::*;

mod m20250110_000001_initial;
mod m20250110_000002_add_spp_invoices;
mod m20250215_000003_add_lucky_spin;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250110_000001_initial::Migration),
            Box::new(m20250110_000002_add_spp_invoices::Migration),
            Box::new(m20250215_000003_add_lucky_spin::Migration),
        ]
    }
}
