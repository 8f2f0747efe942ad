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
                    .table(AgentRuns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AgentRuns::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AgentRuns::UserId).uuid().not_null())
                    .col(ColumnDef::new(AgentRuns::ScanId).uuid().null())
                    .col(ColumnDef::new(AgentRuns::RunType).string().not_null())
                    .col(ColumnDef::new(AgentRuns::Model).string().not_null())
                    .col(ColumnDef::new(AgentRuns::Status).string().not_null())
                    .col(ColumnDef::new(AgentRuns::Input).json().not_null())
                    .col(ColumnDef::new(AgentRuns::Output).json().null())
                    .col(ColumnDef::new(AgentRuns::Error).text().null())
                    .col(
                        ColumnDef::new(AgentRuns::DurationMs)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AgentRuns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(AgentRuns::Status).is_in([
                        "succeeded",
                        "fallback",
                        "failed",
                    ]))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_agent_runs_user")
                            .from(AgentRuns::Table, AgentRuns::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_agent_runs_user_created_at")
                    .table(AgentRuns::Table)
                    .col(AgentRuns::UserId)
                    .col(AgentRuns::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AgentRuns::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AgentRuns {
    Table,
    Id,
    UserId,
    ScanId,
    RunType,
    Model,
    Status,
    Input,
    Output,
    Error,
    DurationMs,
    CreatedAt,
}
