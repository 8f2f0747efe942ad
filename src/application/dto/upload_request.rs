// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 预签名上传请求
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PresignRequestDto {
    /// 图片 MIME 类型，默认为 image/jpeg
    #[serde(default, alias = "contentType")]
    pub content_type: Option<String>,
}

/// 预签名上传响应
#[derive(Debug, Deserialize, Serialize)]
pub struct PresignResponseDto {
    pub upload_url: String,
    pub s3_key: String,
    pub expires_in: u64,
}
