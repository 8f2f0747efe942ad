// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::models::user::UserPreferences;

/// 替换偏好请求
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct UpdatePreferencesRequestDto {
    #[validate(length(max = 20))]
    #[serde(default)]
    pub diets: Vec<String>,
    #[validate(length(max = 20))]
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[validate(length(max = 50))]
    #[serde(default)]
    pub allergens: Vec<String>,
}

impl From<UpdatePreferencesRequestDto> for UserPreferences {
    fn from(dto: UpdatePreferencesRequestDto) -> Self {
        Self {
            diets: dto.diets,
            cuisines: dto.cuisines,
            allergens: dto.allergens,
        }
    }
}
