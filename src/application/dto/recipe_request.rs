// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 显式给出的食材
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct RecipeIngredientDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub grams: Option<f64>,
    #[serde(default)]
    pub fdc_id: Option<String>,
}

/// 生成菜谱请求
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct CreateRecipeRequestDto {
    #[serde(default, alias = "scanId")]
    pub scan_id: Option<Uuid>,
    #[validate(nested)]
    #[serde(default)]
    pub ingredients: Option<Vec<RecipeIngredientDto>>,
    #[validate(range(min = 1, max = 20))]
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub skill_level: Option<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub meal_type: Option<String>,
    #[serde(default)]
    pub recipe_category: Option<String>,
    #[serde(default)]
    pub test_mode: bool,
}
