use sea_orm_migration::prelude::*;

use crate::m20250601_000001_create_users_and_tokens::Users;
use crate::m20250601_000002_create_scans::Scans;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create recipes table
        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Recipes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Recipes::UserId).uuid().not_null())
                    .col(ColumnDef::new(Recipes::ScanId).uuid().null())
                    .col(ColumnDef::new(Recipes::Title).string().not_null())
                    .col(
                        ColumnDef::new(Recipes::RecipeCategory)
                            .string()
                            .not_null()
                            .default("cuisine"),
                    )
                    .col(
                        ColumnDef::new(Recipes::AiGenerated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Recipes::JsonPayload).json().not_null())
                    .col(ColumnDef::new(Recipes::Nutrition).json().null())
                    .col(ColumnDef::new(Recipes::FactsSnapshot).json().null())
                    .col(
                        ColumnDef::new(Recipes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipes_user")
                            .from(Recipes::Table, Recipes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipes_scan")
                            .from(Recipes::Table, Recipes::ScanId)
                            .to(Scans::Table, Scans::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create meals table
        manager
            .create_table(
                Table::create()
                    .table(Meals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Meals::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Meals::UserId).uuid().not_null())
                    .col(ColumnDef::new(Meals::RecipeId).uuid().null())
                    .col(
                        ColumnDef::new(Meals::Servings)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .col(ColumnDef::new(Meals::MealType).string().null())
                    .col(ColumnDef::new(Meals::Notes).text().null())
                    .col(ColumnDef::new(Meals::Nutrition).json().null())
                    .col(
                        ColumnDef::new(Meals::EatenAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Meals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(Meals::Servings).gt(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meals_user")
                            .from(Meals::Table, Meals::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meals_recipe")
                            .from(Meals::Table, Meals::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipes_user_created_at")
                    .table(Recipes::Table)
                    .col(Recipes::UserId)
                    .col(Recipes::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_meals_user_eaten_at")
                    .table(Meals::Table)
                    .col(Meals::UserId)
                    .col(Meals::EatenAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Meals::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Recipes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Recipes {
    Table,
    Id,
    UserId,
    ScanId,
    Title,
    RecipeCategory,
    AiGenerated,
    JsonPayload,
    Nutrition,
    FactsSnapshot,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Meals {
    Table,
    Id,
    UserId,
    RecipeId,
    Servings,
    MealType,
    Notes,
    Nutrition,
    EatenAt,
    CreatedAt,
}
