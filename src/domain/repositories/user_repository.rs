// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryError;
use crate::domain::models::user::{User, UserPreferences};

/// 用户仓库特质
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 不存在时创建用户，已存在时只刷新邮箱
    async fn upsert(&self, user_id: Uuid, email: Option<&str>) -> Result<User, RepositoryError>;
    /// 根据ID查找用户
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, RepositoryError>;
    /// 替换用户的饮食偏好
    async fn update_preferences(
        &self,
        user_id: Uuid,
        preferences: &UserPreferences,
    ) -> Result<User, RepositoryError>;
    /// 为用户登记一个访问令牌，只保存其 SHA-256 摘要
    async fn register_token(&self, user_id: Uuid, raw_token: &str) -> Result<(), RepositoryError>;
}
