// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

use crate::domain::models::ingredient::FdcMatch;

/// 标签映射缓存特质
///
/// 以规范化后的标签为键缓存 FDC 映射结果
#[async_trait]
pub trait LabelCache: Send + Sync {
    async fn get(&self, label: &str) -> Result<Option<FdcMatch>>;
    async fn put(&self, label: &str, value: &FdcMatch, ttl: Duration) -> Result<()>;
}
