// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryError;
use crate::domain::models::meal::Meal;

/// 用餐记录仓库特质
#[async_trait]
pub trait MealRepository: Send + Sync {
    async fn create(&self, meal: &Meal) -> Result<Meal, RepositoryError>;
    /// 按用餐时间倒序分页列出
    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Meal>, RepositoryError>;
}
