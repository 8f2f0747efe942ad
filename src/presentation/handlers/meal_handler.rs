// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::application::dto::meal_request::{LogMealRequestDto, MealDto, MealListDto, MealQueryDto};
use crate::application::use_cases::meal_use_case::MealUseCase;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::CurrentUser;

pub async fn log_meal(
    Extension(use_case): Extension<Arc<MealUseCase>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<LogMealRequestDto>,
) -> Result<(StatusCode, Json<MealDto>), AppError> {
    let meal = use_case.log_meal(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

pub async fn list_meals(
    Extension(use_case): Extension<Arc<MealUseCase>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<MealQueryDto>,
) -> Result<Json<MealListDto>, AppError> {
    Ok(Json(use_case.list_meals(&user, query).await?))
}
