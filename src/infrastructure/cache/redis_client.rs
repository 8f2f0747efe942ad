// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;
use redis::AsyncCommands;
use std::time::Duration;

use crate::domain::models::ingredient::FdcMatch;
use crate::domain::repositories::label_cache_repository::LabelCache;

const KEY_PREFIX: &str = "fdc:label:";

/// Redis 标签映射缓存
///
/// 值以 JSON 保存，过期由 Redis 负责
#[derive(Clone)]
pub struct RedisLabelCache {
    /// Redis客户端
    client: redis::Client,
}

impl RedisLabelCache {
    /// 创建新的Redis缓存实例
    ///
    /// # 参数
    ///
    /// * `redis_url` - Redis连接URL
    ///
    /// # 返回值
    ///
    /// * `Ok(RedisLabelCache)` - 缓存实例
    /// * `Err(anyhow::Error)` - URL 无法解析
    pub fn new(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client })
    }

    fn key(label: &str) -> String {
        format!("{}{}", KEY_PREFIX, label)
    }
}

#[async_trait]
impl LabelCache for RedisLabelCache {
    async fn get(&self, label: &str) -> Result<Option<FdcMatch>> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = con.get(Self::key(label)).await?;
        match value {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, label: &str, value: &FdcMatch, ttl: Duration) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        let mut con = self.client.get_multiplexed_async_connection().await?;
        con.set_ex::<_, _, ()>(Self::key(label), raw, ttl.as_secs().max(1))
            .await?;
        Ok(())
    }
}
