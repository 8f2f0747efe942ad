// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::models::nutrition::NutrientProfile;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisIngredientDto {
    pub name: String,
}

/// 营养信息，只使用每份数值
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalysisNutritionDto {
    #[serde(default)]
    pub per_serving: Option<NutrientProfile>,
}

/// 食材分析请求
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct AnalyzeIngredientsRequestDto {
    #[validate(length(min = 1, max = 50))]
    #[serde(default)]
    pub ingredients: Vec<AnalysisIngredientDto>,
    #[serde(default)]
    pub nutrition: Option<AnalysisNutritionDto>,
}
