// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{body::Bytes, extract::Extension, Json};
use std::sync::Arc;

use crate::application::dto::upload_request::{PresignRequestDto, PresignResponseDto};
use crate::application::use_cases::upload_use_case::UploadUseCase;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::CurrentUser;
use crate::utils::errors::DomainError;

/// 生成图片直传的预签名链接
///
/// 请求体可以为空，此时使用默认的 image/jpeg
pub async fn presign_upload(
    Extension(use_case): Extension<Arc<UploadUseCase>>,
    CurrentUser(user): CurrentUser,
    body: Bytes,
) -> Result<Json<PresignResponseDto>, AppError> {
    let dto: PresignRequestDto = if body.iter().all(u8::is_ascii_whitespace) {
        PresignRequestDto::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| DomainError::Validation(format!("Invalid request body: {}", e)))?
    };
    Ok(Json(use_case.presign(&user, dto).await?))
}
