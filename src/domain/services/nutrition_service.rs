// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::models::ingredient::RecipeIngredientInput;
use crate::domain::models::nutrition::{
    round1, NutrientProfile, NutritionFacts, NutritionSummary,
};
use crate::domain::repositories::food_data_repository::FoodDataProvider;

/// 没有营养数据时按标签估算的每 100 克含量
fn estimated_per_100g(label: &str) -> NutrientProfile {
    let label = label.to_lowercase();
    let (kcal, protein_g, fat_g, carb_g) = if label.contains("paneer") {
        (265.0, 18.0, 20.0, 1.2)
    } else if label.contains("spinach") {
        (23.0, 2.9, 0.4, 3.6)
    } else {
        (25.0, 2.0, 0.3, 5.0)
    };
    NutrientProfile {
        kcal,
        protein_g,
        fat_g,
        carb_g,
        ..Default::default()
    }
}

/// 计算菜谱营养
///
/// # 参数
///
/// * `items` - 食材及克数
/// * `facts` - FDC ID 到每 100 克营养成分；为空时使用估算值
/// * `servings` - 份数，0 按 1 处理
///
/// # 返回值
///
/// 总量保留一位小数，每份 = round(总量 / 份数, 1)
pub fn compute_nutrition(
    items: &[RecipeIngredientInput],
    facts: &NutritionFacts,
    servings: u32,
) -> NutritionSummary {
    let mut totals = NutrientProfile::default();

    if facts.is_empty() {
        for item in items {
            totals.add_portion(&estimated_per_100g(&item.name), item.grams);
        }
    } else {
        for item in items {
            let per_100g = item.fdc_id.as_ref().and_then(|id| facts.get(id));
            if let Some(per_100g) = per_100g {
                totals.add_portion(per_100g, item.grams);
            }
        }
    }

    let totals = totals.rounded();
    let servings = f64::from(servings.max(1));
    NutritionSummary {
        totals_per_recipe: totals,
        per_serving: totals.map(|v| round1(v / servings)),
    }
}

/// 营养服务
///
/// 从 FoodData Central 批量获取营养数据，失败时退化为空集合
pub struct NutritionService {
    provider: Arc<dyn FoodDataProvider>,
}

impl NutritionService {
    pub fn new(provider: Arc<dyn FoodDataProvider>) -> Self {
        Self { provider }
    }

    /// 获取食材对应的营养事实数据
    pub async fn fetch_facts(&self, items: &[RecipeIngredientInput]) -> NutritionFacts {
        let fdc_ids: Vec<String> = items
            .iter()
            .filter_map(|item| item.fdc_id.clone())
            .filter(|id| !id.is_empty())
            .collect();
        if fdc_ids.is_empty() {
            return NutritionFacts::new();
        }

        match self.provider.fetch_nutrients(&fdc_ids).await {
            Ok(facts) => {
                info!("Fetched nutrition data for {} foods", facts.len());
                facts
            }
            Err(e) => {
                warn!("Nutrition fetch failed: {}", e);
                NutritionFacts::new()
            }
        }
    }
}
