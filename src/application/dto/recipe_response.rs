// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::models::nutrition::NutritionSummary;
use crate::domain::models::recipe::{GeneratedRecipe, Recipe};

/// 生成菜谱响应
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateRecipeResponseDto {
    pub recipe_ids: Vec<Uuid>,
    pub recipes: Vec<GeneratedRecipe>,
    pub request_id: Uuid,
    /// 处理耗时（秒）
    pub processing_time: f64,
    pub ai_enabled: bool,
    pub ai_model: String,
    #[serde(default)]
    pub test_mode: bool,
}

/// 已保存的菜谱
#[derive(Debug, Deserialize, Serialize)]
pub struct RecipeDetailDto {
    pub recipe_id: Uuid,
    pub title: String,
    pub scan_id: Option<Uuid>,
    pub recipe_category: String,
    pub ai_generated: bool,
    pub created_at: DateTime<FixedOffset>,
    pub recipe: Value,
    pub nutrition: Option<NutritionSummary>,
    pub facts_snapshot: Option<Value>,
}

impl From<Recipe> for RecipeDetailDto {
    fn from(recipe: Recipe) -> Self {
        Self {
            recipe_id: recipe.id,
            title: recipe.title,
            scan_id: recipe.scan_id,
            recipe_category: recipe.recipe_category.to_string(),
            ai_generated: recipe.ai_generated,
            created_at: recipe.created_at,
            recipe: recipe.payload,
            nutrition: recipe.nutrition,
            facts_snapshot: recipe.facts_snapshot,
        }
    }
}
