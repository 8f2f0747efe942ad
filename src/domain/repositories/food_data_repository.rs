// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::ingredient::FoodSearchHit;
use crate::domain::models::nutrition::NutritionFacts;

/// 食物数据源特质
///
/// 对应 USDA FoodData Central 的搜索与批量详情接口
#[async_trait]
pub trait FoodDataProvider: Send + Sync {
    /// 按名称搜索食物
    async fn search(&self, query: &str) -> Result<Vec<FoodSearchHit>>;

    /// 批量获取每 100 克的营养成分，忽略非数字 ID
    async fn fetch_nutrients(&self, fdc_ids: &[String]) -> Result<NutritionFacts>;
}
