// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Datelike, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::config::settings::RecipeSettings;
use crate::domain::models::recipe::RecipeCategory;
use crate::domain::models::user::{User, UserPreferences};
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::repositories::RepositoryError;
use crate::domain::services::ingredient_analysis_service::suggest_categories;

const DEFAULT_COOKING_SKILL: &str = "intermediate";
const DEFAULT_TIME_PREFERENCE: &str = "moderate";
const POPULAR_COOKING_METHODS: [&str; 4] = ["sautéed", "fresh", "baked", "blended"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonalPreference {
    pub season: &'static str,
    pub preference: &'static str,
}

/// 对外展示的完整偏好
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceProfile {
    pub diets: Vec<String>,
    pub cuisines: Vec<String>,
    pub allergens: Vec<String>,
    pub cooking_skill: String,
    pub time_preference: String,
    pub default_servings: u32,
    pub seasonal_preference: SeasonalPreference,
    pub popular_cooking_methods: Vec<&'static str>,
    pub dietary_considerations: Vec<&'static str>,
    pub allergen_warnings: Vec<String>,
}

/// 按月份得到季节偏好
pub fn seasonal_preference(month: u32) -> SeasonalPreference {
    let (season, preference) = match month {
        12 | 1 | 2 => ("winter", "warm_cooked_foods"),
        3..=5 => ("spring", "fresh_light_foods"),
        6..=8 => ("summer", "cold_fresh_foods"),
        _ => ("fall", "hearty_comfort_foods"),
    };
    SeasonalPreference { season, preference }
}

/// 饮食类型对应的烹饪注意事项
pub fn dietary_considerations(diets: &[String]) -> Vec<&'static str> {
    let mut considerations = Vec::new();
    for diet in diets {
        let diet = diet.to_lowercase();
        if diet.contains("vegan") {
            considerations.extend(["no_animal_products", "plant_based_proteins"]);
        } else if diet.contains("vegetarian") {
            considerations.extend(["no_meat", "dairy_ok", "eggs_ok"]);
        } else if diet.contains("gluten") {
            considerations.push("gluten_free_ingredients");
        } else if diet.contains("keto") {
            considerations.extend(["low_carb", "high_fat"]);
        } else if diet.contains("paleo") {
            considerations.extend(["no_grains", "no_dairy", "whole_foods"]);
        }
    }
    considerations
}

/// 组装偏好视图
pub fn build_profile(preferences: UserPreferences, default_servings: u32, month: u32) -> PreferenceProfile {
    PreferenceProfile {
        dietary_considerations: dietary_considerations(&preferences.diets),
        allergen_warnings: preferences.allergens.clone(),
        diets: preferences.diets,
        cuisines: preferences.cuisines,
        allergens: preferences.allergens,
        cooking_skill: DEFAULT_COOKING_SKILL.to_string(),
        time_preference: DEFAULT_TIME_PREFERENCE.to_string(),
        default_servings,
        seasonal_preference: seasonal_preference(month),
        popular_cooking_methods: POPULAR_COOKING_METHODS.to_vec(),
    }
}

/// 调用方在生成菜谱时显式给出的参数
#[derive(Debug, Clone, Default)]
pub struct RecipeOverrides {
    pub servings: Option<u32>,
    pub cuisine: Option<String>,
    pub skill_level: Option<String>,
    pub meal_type: Option<String>,
    pub dietary_restrictions: Vec<String>,
    pub recipe_category: Option<RecipeCategory>,
}

/// 调和后的生成参数
#[derive(Debug, Clone, PartialEq)]
pub struct RecipePlan {
    pub servings: u32,
    pub cuisine: String,
    pub skill_level: String,
    pub meal_type: String,
    pub dietary_restrictions: Vec<String>,
    pub recipe_category: RecipeCategory,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 调和请求参数、扫描份数与用户偏好
///
/// # 参数
///
/// * `overrides` - 请求中的显式参数，优先级最高
/// * `scan_servings` - 确认扫描时记录的份数
/// * `preferences` - 用户保存的偏好
/// * `ingredient_names` - 参与生成的食材，用于推荐类别
/// * `defaults` - 配置中的默认值
pub fn reconcile(
    overrides: RecipeOverrides,
    scan_servings: Option<i32>,
    preferences: &UserPreferences,
    ingredient_names: &[String],
    defaults: &RecipeSettings,
) -> RecipePlan {
    let servings = overrides
        .servings
        .filter(|s| *s > 0)
        .or_else(|| scan_servings.filter(|s| *s > 0).map(|s| s as u32))
        .unwrap_or(defaults.default_servings);

    let cuisine = non_blank(overrides.cuisine)
        .or_else(|| preferences.cuisines.first().cloned())
        .unwrap_or_else(|| defaults.default_cuisine.clone());

    let mut dietary_restrictions: Vec<String> = Vec::new();
    let allergen_rules = preferences.allergens.iter().map(|a| format!("no {}", a));
    for restriction in overrides
        .dietary_restrictions
        .into_iter()
        .chain(preferences.diets.iter().cloned())
        .chain(allergen_rules)
    {
        let restriction = restriction.trim().to_string();
        if !restriction.is_empty() && !dietary_restrictions.contains(&restriction) {
            dietary_restrictions.push(restriction);
        }
    }

    let recipe_category = overrides.recipe_category.unwrap_or_else(|| {
        suggest_categories(ingredient_names)
            .first()
            .copied()
            .unwrap_or_default()
    });

    RecipePlan {
        servings,
        cuisine,
        skill_level: non_blank(overrides.skill_level)
            .unwrap_or_else(|| defaults.default_skill_level.clone()),
        meal_type: non_blank(overrides.meal_type)
            .unwrap_or_else(|| defaults.default_meal_type.clone()),
        dietary_restrictions,
        recipe_category,
    }
}

/// 偏好服务
///
/// 读取与替换用户的饮食偏好
pub struct PreferenceService {
    users: Arc<dyn UserRepository>,
    default_servings: u32,
}

impl PreferenceService {
    pub fn new(users: Arc<dyn UserRepository>, default_servings: u32) -> Self {
        Self {
            users,
            default_servings,
        }
    }

    /// 获取用户偏好，未知用户返回默认值
    pub async fn preferences_for(&self, user_id: Uuid) -> Result<UserPreferences, RepositoryError> {
        Ok(self
            .users
            .find_by_id(user_id)
            .await?
            .map(|user| user.preferences())
            .unwrap_or_default())
    }

    pub async fn profile_for(&self, user_id: Uuid) -> Result<PreferenceProfile, RepositoryError> {
        let preferences = self.preferences_for(user_id).await?;
        Ok(build_profile(
            preferences,
            self.default_servings,
            Utc::now().month(),
        ))
    }

    /// 替换用户偏好，用户不存在时先创建
    pub async fn replace(
        &self,
        user_id: Uuid,
        email: Option<&str>,
        preferences: UserPreferences,
    ) -> Result<User, RepositoryError> {
        let preferences = preferences.normalized();
        self.users.upsert(user_id, email).await?;
        let user = self.users.update_preferences(user_id, &preferences).await?;
        info!(
            "Updated preferences for user {}: diets={:?}, cuisines={:?}",
            user_id, user.diets, user.cuisines
        );
        Ok(user)
    }
}
