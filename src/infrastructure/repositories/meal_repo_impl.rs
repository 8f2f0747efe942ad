// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::meal::Meal;
use crate::domain::repositories::meal_repository::MealRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::meal;

/// 用餐记录仓库实现
#[derive(Clone)]
pub struct MealRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl MealRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl TryFrom<meal::Model> for Meal {
    type Error = RepositoryError;

    fn try_from(model: meal::Model) -> Result<Self, Self::Error> {
        let nutrition = model
            .nutrition
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| RepositoryError::Corrupted(format!("meals.nutrition: {}", e)))?;

        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            recipe_id: model.recipe_id,
            servings: model.servings,
            meal_type: model.meal_type,
            notes: model.notes,
            nutrition,
            eaten_at: model.eaten_at,
            created_at: model.created_at,
        })
    }
}

#[async_trait]
impl MealRepository for MealRepositoryImpl {
    async fn create(&self, meal: &Meal) -> Result<Meal, RepositoryError> {
        let nutrition = meal
            .nutrition
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| RepositoryError::Corrupted(e.to_string()))?;

        let model = meal::ActiveModel {
            id: Set(meal.id),
            user_id: Set(meal.user_id),
            recipe_id: Set(meal.recipe_id),
            servings: Set(meal.servings),
            meal_type: Set(meal.meal_type.clone()),
            notes: Set(meal.notes.clone()),
            nutrition: Set(nutrition),
            eaten_at: Set(meal.eaten_at),
            created_at: Set(meal.created_at),
        };

        model.insert(self.db.as_ref()).await?.try_into()
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Meal>, RepositoryError> {
        meal::Entity::find()
            .filter(meal::Column::UserId.eq(user_id))
            .order_by_desc(meal::Column::EatenAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(Meal::try_from)
            .collect()
    }
}
