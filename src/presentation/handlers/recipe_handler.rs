// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Path},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::dto::recipe_request::CreateRecipeRequestDto;
use crate::application::dto::recipe_response::{CreateRecipeResponseDto, RecipeDetailDto};
use crate::application::use_cases::recipe_use_case::RecipeUseCase;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::CurrentUser;

/// 生成菜谱
pub async fn create_recipe(
    Extension(use_case): Extension<Arc<RecipeUseCase>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateRecipeRequestDto>,
) -> Result<Json<CreateRecipeResponseDto>, AppError> {
    Ok(Json(use_case.create_recipes(&user, payload).await?))
}

/// 获取已保存的菜谱
pub async fn get_recipe(
    Extension(use_case): Extension<Arc<RecipeUseCase>>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<Uuid>,
) -> Result<Json<RecipeDetailDto>, AppError> {
    Ok(Json(use_case.get_recipe(&user, recipe_id).await?))
}
