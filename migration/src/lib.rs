// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// 投稿者・画像テーブル
mod m20250801_000001_create_users_table;
mod m20250801_000002_create_images_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_users_table::Migration),
            Box::new(m20250801_000002_create_images_table::Migration),
        ]
    }
}
