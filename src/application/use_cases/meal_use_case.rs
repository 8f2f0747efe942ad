// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::application::dto::meal_request::{LogMealRequestDto, MealDto, MealListDto, MealQueryDto};
use crate::domain::models::meal::Meal;
use crate::domain::models::nutrition::round1;
use crate::domain::models::user::AuthenticatedUser;
use crate::domain::repositories::meal_repository::MealRepository;
use crate::domain::repositories::recipe_repository::RecipeRepository;
use crate::utils::errors::DomainError;

const DEFAULT_PAGE_SIZE: u64 = 20;

/// 用餐记录用例
pub struct MealUseCase {
    meals: Arc<dyn MealRepository>,
    recipes: Arc<dyn RecipeRepository>,
}

impl MealUseCase {
    pub fn new(meals: Arc<dyn MealRepository>, recipes: Arc<dyn RecipeRepository>) -> Self {
        Self { meals, recipes }
    }

    /// 记录一餐
    ///
    /// 关联菜谱时营养 = 菜谱每份营养 × 份数
    pub async fn log_meal(
        &self,
        user: &AuthenticatedUser,
        dto: LogMealRequestDto,
    ) -> Result<MealDto, DomainError> {
        dto.validate()?;
        let servings = dto.servings.unwrap_or(1.0);

        let nutrition = match dto.recipe_id {
            Some(recipe_id) => {
                let recipe = self
                    .recipes
                    .find_for_user(recipe_id, user.user_id)
                    .await?
                    .ok_or_else(|| DomainError::NotFound("Recipe not found".into()))?;
                recipe
                    .nutrition
                    .map(|n| n.per_serving.map(|v| round1(v * servings)))
            }
            None => None,
        };

        let mut meal = Meal::new(user.user_id, dto.recipe_id, servings);
        meal.meal_type = dto.meal_type.filter(|m| !m.trim().is_empty());
        meal.notes = dto.notes.filter(|n| !n.trim().is_empty());
        meal.nutrition = nutrition;
        if let Some(eaten_at) = dto.eaten_at {
            meal.eaten_at = eaten_at;
        }

        let meal = self.meals.create(&meal).await?;
        info!("Logged meal {} for user {}", meal.id, user.user_id);
        Ok(meal.into())
    }

    /// 按用餐时间倒序列出
    pub async fn list_meals(
        &self,
        user: &AuthenticatedUser,
        query: MealQueryDto,
    ) -> Result<MealListDto, DomainError> {
        query.validate()?;
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        let offset = query.offset.unwrap_or(0);

        let meals = self
            .meals
            .list_for_user(user.user_id, limit, offset)
            .await?;

        Ok(MealListDto {
            meals: meals.into_iter().map(Into::into).collect(),
            limit,
            offset,
        })
    }
}
