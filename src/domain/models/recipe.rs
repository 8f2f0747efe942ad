// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::nutrition::NutritionSummary;

/// 菜谱类别
///
/// 决定使用哪一套提示词和兜底模板
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecipeCategory {
    /// 正餐菜肴
    #[default]
    Cuisine,
    /// 奶昔
    Smoothie,
    /// 甜点
    Dessert,
}

impl fmt::Display for RecipeCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecipeCategory::Cuisine => write!(f, "cuisine"),
            RecipeCategory::Smoothie => write!(f, "smoothie"),
            RecipeCategory::Dessert => write!(f, "dessert"),
        }
    }
}

impl FromStr for RecipeCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cuisine" => Ok(RecipeCategory::Cuisine),
            "smoothie" => Ok(RecipeCategory::Smoothie),
            "dessert" => Ok(RecipeCategory::Dessert),
            _ => Err(()),
        }
    }
}

/// 菜谱中的一行用料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub notes: String,
}

impl RecipeIngredient {
    pub fn new(name: impl Into<String>, quantity: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            notes: notes.into(),
        }
    }
}

/// 生成的菜谱
///
/// 由 LLM 输出或兜底模板得到，持久化时整体存入 `json_payload`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRecipe {
    pub id: String,
    pub title: String,
    pub servings: u32,
    pub estimated_time: String,
    pub difficulty: String,
    pub cuisine: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    pub cooking_method: String,
    pub recipe_category: RecipeCategory,
    pub ingredients: Vec<RecipeIngredient>,
    pub steps: Vec<String>,
    pub tags: Vec<String>,
    pub description: String,
    pub ai_generated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<NutritionSummary>,
}

/// 已持久化的菜谱
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub scan_id: Option<Uuid>,
    pub title: String,
    pub recipe_category: RecipeCategory,
    pub ai_generated: bool,
    /// 完整的菜谱内容
    pub payload: Value,
    pub nutrition: Option<NutritionSummary>,
    /// 计算营养时使用的 FDC 事实数据快照
    pub facts_snapshot: Option<Value>,
    pub created_at: DateTime<FixedOffset>,
}

impl Recipe {
    /// 由生成结果构造待保存的菜谱，生成结果的 ID 会被替换为新 UUID
    pub fn from_generated(
        user_id: Uuid,
        scan_id: Option<Uuid>,
        mut generated: GeneratedRecipe,
        facts_snapshot: Option<Value>,
    ) -> Result<Self, serde_json::Error> {
        let id = Uuid::new_v4();
        generated.id = id.to_string();
        let nutrition = generated.nutrition;
        Ok(Self {
            id,
            user_id,
            scan_id,
            title: generated.title.clone(),
            recipe_category: generated.recipe_category,
            ai_generated: generated.ai_generated,
            payload: serde_json::to_value(&generated)?,
            nutrition,
            facts_snapshot,
            created_at: Utc::now().into(),
        })
    }
}
