// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryError;
use crate::domain::models::recipe::Recipe;

/// 菜谱仓库特质
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// 在一个事务中保存一批菜谱
    async fn create_many(&self, recipes: &[Recipe]) -> Result<(), RepositoryError>;
    /// 查找属于指定用户的菜谱
    async fn find_for_user(
        &self,
        recipe_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Recipe>, RepositoryError>;
}
