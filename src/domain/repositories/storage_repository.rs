// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 存储错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    /// 无法生成预签名链接
    #[error("Presign error: {0}")]
    Presign(String),
    /// 存储错误
    #[error("Storage error: {0}")]
    Other(String),
}

/// 图片存储特质
///
/// 上传的食材照片保存在对象存储中，客户端通过预签名链接直传
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// 生成一个 PUT 预签名链接
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError>;

    /// 上传图片
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), StorageError>;

    /// 读取图片，不存在时返回 None
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// 图片字节数，不存在时返回 None
    async fn size(&self, key: &str) -> Result<Option<u64>, StorageError>;
}
