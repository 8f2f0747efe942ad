// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};

use crate::domain::models::ingredient::FdcMatch;
use crate::domain::repositories::label_cache_repository::LabelCache;

#[derive(Clone)]
struct CacheEntry {
    value: FdcMatch,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }
}

/// 进程内标签映射缓存
///
/// 未配置 Redis 时使用，过期条目在读取时删除
#[derive(Default)]
pub struct InMemoryLabelCache {
    entries: DashMap<String, CacheEntry>,
}

impl InMemoryLabelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl LabelCache for InMemoryLabelCache {
    async fn get(&self, label: &str) -> Result<Option<FdcMatch>> {
        if let Some(entry) = self.entries.get(label) {
            if entry.is_expired() {
                drop(entry);
                self.entries.remove(label);
                return Ok(None);
            }
            return Ok(Some(entry.value.clone()));
        }
        Ok(None)
    }

    async fn put(&self, label: &str, value: &FdcMatch, ttl: Duration) -> Result<()> {
        self.entries.insert(
            label.to_string(),
            CacheEntry {
                value: value.clone(),
                created_at: Instant::now(),
                ttl,
            },
        );
        Ok(())
    }
}
