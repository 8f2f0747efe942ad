// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::recipe::{Recipe, RecipeCategory};
use crate::domain::repositories::recipe_repository::RecipeRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::recipe;

/// 菜谱仓库实现
#[derive(Clone)]
pub struct RecipeRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl RecipeRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl TryFrom<recipe::Model> for Recipe {
    type Error = RepositoryError;

    fn try_from(model: recipe::Model) -> Result<Self, Self::Error> {
        let recipe_category = model
            .recipe_category
            .parse::<RecipeCategory>()
            .map_err(|_| {
                RepositoryError::Corrupted(format!(
                    "recipes.recipe_category: {}",
                    model.recipe_category
                ))
            })?;
        let nutrition = model
            .nutrition
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| RepositoryError::Corrupted(format!("recipes.nutrition: {}", e)))?;

        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            scan_id: model.scan_id,
            title: model.title,
            recipe_category,
            ai_generated: model.ai_generated,
            payload: model.json_payload,
            nutrition,
            facts_snapshot: model.facts_snapshot,
            created_at: model.created_at,
        })
    }
}

impl TryFrom<&Recipe> for recipe::ActiveModel {
    type Error = RepositoryError;

    fn try_from(recipe: &Recipe) -> Result<Self, Self::Error> {
        let nutrition = recipe
            .nutrition
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| RepositoryError::Corrupted(e.to_string()))?;

        Ok(Self {
            id: Set(recipe.id),
            user_id: Set(recipe.user_id),
            scan_id: Set(recipe.scan_id),
            title: Set(recipe.title.clone()),
            recipe_category: Set(recipe.recipe_category.to_string()),
            ai_generated: Set(recipe.ai_generated),
            json_payload: Set(recipe.payload.clone()),
            nutrition: Set(nutrition),
            facts_snapshot: Set(recipe.facts_snapshot.clone()),
            created_at: Set(recipe.created_at),
        })
    }
}

#[async_trait]
impl RecipeRepository for RecipeRepositoryImpl {
    async fn create_many(&self, recipes: &[Recipe]) -> Result<(), RepositoryError> {
        if recipes.is_empty() {
            return Ok(());
        }

        let models = recipes
            .iter()
            .map(recipe::ActiveModel::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let txn = self.db.begin().await?;
        for model in models {
            model.insert(&txn).await?;
        }
        txn.commit().await?;
        Ok(())
    }

    async fn find_for_user(
        &self,
        recipe_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Recipe>, RepositoryError> {
        recipe::Entity::find_by_id(recipe_id)
            .filter(recipe::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await?
            .map(Recipe::try_from)
            .transpose()
    }
}
