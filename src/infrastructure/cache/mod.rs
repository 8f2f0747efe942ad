// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::settings::RedisSettings;
use crate::domain::repositories::label_cache_repository::LabelCache;

/// 缓存模块
///
/// FDC 标签映射缓存的 Redis 与进程内实现
pub mod memory_cache;
pub mod redis_client;

pub use memory_cache::InMemoryLabelCache;
pub use redis_client::RedisLabelCache;

/// 根据配置选择标签缓存，Redis URL 无效时退回进程内缓存
pub fn create_label_cache(settings: &RedisSettings) -> Arc<dyn LabelCache> {
    match settings.url.as_deref() {
        Some(url) => match RedisLabelCache::new(url) {
            Ok(cache) => {
                info!("Using Redis label cache");
                Arc::new(cache)
            }
            Err(e) => {
                warn!("Invalid Redis URL, falling back to in-memory cache: {}", e);
                Arc::new(InMemoryLabelCache::new())
            }
        },
        None => Arc::new(InMemoryLabelCache::new()),
    }
}
