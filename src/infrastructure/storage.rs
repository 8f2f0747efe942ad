// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::settings::StorageSettings;
use crate::domain::repositories::storage_repository::{ImageStorage, StorageError};

/// S3 对象存储实现
///
/// 兼容 MinIO 等提供 S3 接口的服务
pub struct S3ImageStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ImageStorage {
    /// 使用静态凭证创建客户端
    pub fn new(
        region: String,
        bucket: String,
        access_key: String,
        secret_key: String,
        endpoint: Option<String>,
    ) -> Self {
        let credentials =
            aws_sdk_s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let mut config_builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(region))
            .credentials_provider(credentials);

        if let Some(ep) = endpoint {
            config_builder = config_builder.endpoint_url(ep).force_path_style(true);
        }

        let client = aws_sdk_s3::Client::from_conf(config_builder.build());
        Self { client, bucket }
    }

    /// 使用默认凭证链（环境变量、实例角色等）创建客户端
    pub async fn from_environment(
        region: String,
        bucket: String,
        endpoint: Option<String>,
    ) -> Self {
        let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(region))
            .load()
            .await;

        let mut config_builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(ep) = endpoint {
            config_builder = config_builder.endpoint_url(ep).force_path_style(true);
        }

        let client = aws_sdk_s3::Client::from_conf(config_builder.build());
        Self { client, bucket }
    }
}

#[async_trait]
impl ImageStorage for S3ImageStorage {
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::Presign(e.to_string()))?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(config)
            .await
            .map_err(|e| StorageError::Presign(e.to_string()))?;

        Ok(request.uri().to_string())
    }

    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| StorageError::Other(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => {
                let data = output
                    .body
                    .collect()
                    .await
                    .map_err(|e| StorageError::Other(e.to_string()))?
                    .into_bytes();
                Ok(Some(data.to_vec()))
            }
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    Ok(None)
                } else {
                    Err(StorageError::Other(service_error.to_string()))
                }
            }
        }
    }

    async fn size(&self, key: &str) -> Result<Option<u64>, StorageError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => Ok(Some(output.content_length().unwrap_or(0).max(0) as u64)),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    Ok(None)
                } else {
                    Err(StorageError::Other(service_error.to_string()))
                }
            }
        }
    }
}

/// 内存图片存储
///
/// 用于本地开发和测试，预签名链接使用 memory:// 协议
#[derive(Default)]
pub struct InMemoryImageStorage {
    data: DashMap<String, Vec<u8>>,
}

impl InMemoryImageStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageStorage for InMemoryImageStorage {
    async fn presign_put(
        &self,
        key: &str,
        _content_type: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        Ok(format!(
            "memory://{}?expires_in={}",
            key,
            expires_in.as_secs()
        ))
    }

    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<(), StorageError> {
        self.data.insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    async fn size(&self, key: &str) -> Result<Option<u64>, StorageError> {
        Ok(self.data.get(key).map(|entry| entry.value().len() as u64))
    }
}

/// 存储工厂函数
///
/// # 参数
///
/// * `settings` - 存储配置，storage_type 为 s3 或 memory
pub async fn create_image_storage(
    settings: &StorageSettings,
) -> Result<Arc<dyn ImageStorage>, StorageError> {
    match settings.storage_type.as_str() {
        "s3" => {
            let storage = match (&settings.access_key, &settings.secret_key) {
                (Some(access_key), Some(secret_key)) => S3ImageStorage::new(
                    settings.region.clone(),
                    settings.bucket.clone(),
                    access_key.clone(),
                    secret_key.clone(),
                    settings.endpoint.clone(),
                ),
                _ => {
                    S3ImageStorage::from_environment(
                        settings.region.clone(),
                        settings.bucket.clone(),
                        settings.endpoint.clone(),
                    )
                    .await
                }
            };
            info!("Using S3 image storage, bucket {}", settings.bucket);
            Ok(Arc::new(storage))
        }
        "memory" => {
            info!("Using in-memory image storage");
            Ok(Arc::new(InMemoryImageStorage::new()))
        }
        other => Err(StorageError::Other(format!(
            "Unsupported storage type: {}",
            other
        ))),
    }
}
