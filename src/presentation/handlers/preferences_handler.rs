// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, Json};
use std::sync::Arc;
use validator::Validate;

use crate::application::dto::preferences_request::UpdatePreferencesRequestDto;
use crate::domain::services::preference_service::{PreferenceProfile, PreferenceService};
use crate::presentation::errors::AppError;
use crate::presentation::extractors::CurrentUser;
use crate::utils::errors::DomainError;

/// 获取偏好视图，未知用户返回默认值
pub async fn get_preferences(
    Extension(service): Extension<Arc<PreferenceService>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<PreferenceProfile>, AppError> {
    let profile = service
        .profile_for(user.user_id)
        .await
        .map_err(DomainError::from)?;
    Ok(Json(profile))
}

/// 替换偏好
pub async fn update_preferences(
    Extension(service): Extension<Arc<PreferenceService>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UpdatePreferencesRequestDto>,
) -> Result<Json<PreferenceProfile>, AppError> {
    payload.validate().map_err(DomainError::from)?;
    service
        .replace(user.user_id, user.email.as_deref(), payload.into())
        .await
        .map_err(DomainError::from)?;
    let profile = service
        .profile_for(user.user_id)
        .await
        .map_err(DomainError::from)?;
    Ok(Json(profile))
}
