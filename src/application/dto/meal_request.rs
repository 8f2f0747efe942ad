// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::meal::Meal;
use crate::domain::models::nutrition::NutrientProfile;

/// 记录用餐请求
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct LogMealRequestDto {
    #[serde(default, alias = "recipeId")]
    pub recipe_id: Option<Uuid>,
    /// 默认 1 份
    #[validate(range(exclusive_min = 0.0, max = 100.0))]
    #[serde(default)]
    pub servings: Option<f64>,
    #[validate(length(max = 50))]
    #[serde(default, alias = "mealType")]
    pub meal_type: Option<String>,
    #[validate(length(max = 1000))]
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, alias = "eatenAt")]
    pub eaten_at: Option<DateTime<FixedOffset>>,
}

/// 用餐列表查询参数
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct MealQueryDto {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MealDto {
    pub meal_id: Uuid,
    pub recipe_id: Option<Uuid>,
    pub servings: f64,
    pub meal_type: Option<String>,
    pub notes: Option<String>,
    pub nutrition: Option<NutrientProfile>,
    pub eaten_at: DateTime<FixedOffset>,
}

impl From<Meal> for MealDto {
    fn from(meal: Meal) -> Self {
        Self {
            meal_id: meal.id,
            recipe_id: meal.recipe_id,
            servings: meal.servings,
            meal_type: meal.meal_type,
            notes: meal.notes,
            nutrition: meal.nutrition,
            eaten_at: meal.eaten_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MealListDto {
    pub meals: Vec<MealDto>,
    pub limit: u64,
    pub offset: u64,
}
