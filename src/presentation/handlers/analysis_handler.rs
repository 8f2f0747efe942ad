// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::Json;
use validator::Validate;

use crate::application::dto::analysis_request::AnalyzeIngredientsRequestDto;
use crate::domain::services::ingredient_analysis_service::{analyze_ingredients, IngredientAnalysis};
use crate::presentation::errors::AppError;
use crate::presentation::extractors::CurrentUser;
use crate::utils::errors::DomainError;

/// 分析食材组合
pub async fn analyze(
    CurrentUser(_user): CurrentUser,
    Json(payload): Json<AnalyzeIngredientsRequestDto>,
) -> Result<Json<IngredientAnalysis>, AppError> {
    payload.validate().map_err(DomainError::from)?;

    let names: Vec<String> = payload
        .ingredients
        .iter()
        .map(|i| i.name.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    let per_serving = payload.nutrition.as_ref().and_then(|n| n.per_serving.as_ref());

    Ok(Json(analyze_ingredients(&names, per_serving)))
}
