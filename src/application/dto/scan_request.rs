// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 开始扫描请求
///
/// `s3_key` 与 `image_base64` 必须且只能提供一个
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StartScanRequestDto {
    #[serde(default, alias = "s3Key")]
    pub s3_key: Option<String>,
    #[serde(default, alias = "imageBase64")]
    pub image_base64: Option<String>,
}

/// 单个条目的确认信息
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConfirmItemDto {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub fdc_id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub grams: Option<f64>,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub manually_added: bool,
}

/// 确认扫描请求
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct ConfirmScanRequestDto {
    #[serde(default)]
    pub items: Vec<ConfirmItemDto>,
    #[serde(default)]
    pub diets: Vec<String>,
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[validate(range(min = 1, max = 20))]
    #[serde(default)]
    pub servings: Option<i32>,
}
