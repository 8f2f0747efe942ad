use sea_orm_migration::prelude::*;

use crate::m20250601_000001_create_users_and_tokens::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Scans::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Scans::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Scans::UserId).uuid().not_null())
                    .col(ColumnDef::new(Scans::S3Key).string().not_null())
                    .col(
                        ColumnDef::new(Scans::Status)
                            .string()
                            .not_null()
                            .default("processing"),
                    )
                    .col(ColumnDef::new(Scans::Servings).integer().null())
                    .col(
                        ColumnDef::new(Scans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Scans::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(Scans::Status).is_in([
                        "processing",
                        "ready",
                        "confirmed",
                        "failed",
                    ]))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scans_user")
                            .from(Scans::Table, Scans::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A confirmed item must carry a gram amount
        manager
            .create_table(
                Table::create()
                    .table(ScanItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScanItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScanItems::ScanId).uuid().not_null())
                    .col(ColumnDef::new(ScanItems::Label).string().not_null())
                    .col(ColumnDef::new(ScanItems::FdcId).string().null())
                    .col(
                        ColumnDef::new(ScanItems::Confidence)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ScanItems::GramsEst)
                            .double()
                            .not_null()
                            .default(100.0),
                    )
                    .col(ColumnDef::new(ScanItems::Grams).double().null())
                    .col(
                        ColumnDef::new(ScanItems::Confirmed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ScanItems::ManuallyAdded)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ScanItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(
                        Expr::col(ScanItems::Confirmed)
                            .eq(false)
                            .or(Expr::col(ScanItems::Grams).is_not_null()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scan_items_scan")
                            .from(ScanItems::Table, ScanItems::ScanId)
                            .to(Scans::Table, Scans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scans_user_created_at")
                    .table(Scans::Table)
                    .col(Scans::UserId)
                    .col(Scans::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScanItems::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Scans::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Scans {
    Table,
    Id,
    UserId,
    S3Key,
    Status,
    Servings,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum ScanItems {
    Table,
    Id,
    ScanId,
    Label,
    FdcId,
    Confidence,
    GramsEst,
    Grams,
    Confirmed,
    ManuallyAdded,
    CreatedAt,
}
