use sea_orm_migration::prelude::*;

use crate::m20250601_000002_create_scans::ScanItems;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Lookups by scan and label during confirmation
        manager
            .create_index(
                Index::create()
                    .name("idx_scan_items_scan_label")
                    .table(ScanItems::Table)
                    .col(ScanItems::ScanId)
                    .col(ScanItems::Label)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_scan_items_scan_label")
                    .table(ScanItems::Table)
                    .to_owned(),
            )
            .await
    }
}
