// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::application::dto::upload_request::{PresignRequestDto, PresignResponseDto};
use crate::domain::models::user::AuthenticatedUser;
use crate::domain::repositories::storage_repository::ImageStorage;
use crate::utils::errors::DomainError;
use crate::utils::image::{extension_for, upload_key, DEFAULT_CONTENT_TYPE};

/// 上传用例
///
/// 为客户端直传图片生成预签名链接
pub struct UploadUseCase {
    storage: Arc<dyn ImageStorage>,
    expires_in: Duration,
}

impl UploadUseCase {
    pub fn new(storage: Arc<dyn ImageStorage>, expires_in: Duration) -> Self {
        Self {
            storage,
            expires_in,
        }
    }

    pub async fn presign(
        &self,
        user: &AuthenticatedUser,
        dto: PresignRequestDto,
    ) -> Result<PresignResponseDto, DomainError> {
        let content_type = dto
            .content_type
            .map(|ct| ct.trim().to_lowercase())
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let ext = extension_for(&content_type).ok_or_else(|| {
            DomainError::Validation(format!("Unsupported content type: {}", content_type))
        })?;

        let s3_key = upload_key(user.user_id, ext);
        let upload_url = self
            .storage
            .presign_put(&s3_key, &content_type, self.expires_in)
            .await?;

        info!("Generated upload URL for user {}: {}", user.user_id, s3_key);

        Ok(PresignResponseDto {
            upload_url,
            s3_key,
            expires_in: self.expires_in.as_secs(),
        })
    }
}
