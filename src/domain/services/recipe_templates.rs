// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 兜底菜谱模板
//!
//! LLM 不可用或输出无法解析时按类别返回的固定菜谱

use uuid::Uuid;

use crate::domain::models::recipe::{GeneratedRecipe, RecipeCategory, RecipeIngredient};

pub const TEST_RECIPE_ID: &str = "ai_test_recipe_1";

/// 生成带前缀的 8 位十六进制短 ID
pub fn short_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &hex[..8])
}

/// 每个单词首字母大写
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn primary_ingredient<'a>(names: &'a [String], default: &'a str) -> &'a str {
    names.first().map(String::as_str).unwrap_or(default)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// 按类别返回兜底菜谱
pub fn fallback_recipes(
    category: RecipeCategory,
    names: &[String],
    servings: u32,
) -> Vec<GeneratedRecipe> {
    match category {
        RecipeCategory::Cuisine => vec![sauteed(names, servings)],
        RecipeCategory::Smoothie => vec![smoothie(names, servings)],
        RecipeCategory::Dessert => vec![parfait(names, servings)],
    }
}

fn sauteed(names: &[String], servings: u32) -> GeneratedRecipe {
    let primary = primary_ingredient(names, "ingredient");
    let first_three: Vec<String> = names.iter().take(3).cloned().collect();

    GeneratedRecipe {
        id: short_id("fallback"),
        title: format!("Simple Sautéed {}", title_case(primary)),
        servings,
        estimated_time: "20 minutes".into(),
        difficulty: "easy".into(),
        cuisine: "Home Cooking".into(),
        meal_type: None,
        cooking_method: "sauté".into(),
        recipe_category: RecipeCategory::Cuisine,
        ingredients: first_three
            .iter()
            .map(|name| RecipeIngredient::new(name.as_str(), "100g", "prepared as needed"))
            .collect(),
        steps: vec![
            format!(
                "Prepare {} by washing and cutting as needed",
                first_three.join(", ")
            ),
            "Heat 2 tablespoons oil in a large pan over medium heat".into(),
            format!("Add {} and cook for 5-7 minutes", primary),
            "Season with salt and pepper to taste".into(),
            "Serve hot and enjoy".into(),
        ],
        tags: strings(&["simple", "quick", "fallback"]),
        description: "Simple and delicious preparation".into(),
        ai_generated: false,
        nutrition: None,
    }
}

fn smoothie(names: &[String], servings: u32) -> GeneratedRecipe {
    let primary = primary_ingredient(names, "fruit");

    GeneratedRecipe {
        id: short_id("smoothie_fallback"),
        title: format!("Fresh {} Smoothie", title_case(primary)),
        servings,
        estimated_time: "5 minutes".into(),
        difficulty: "easy".into(),
        cuisine: "Healthy".into(),
        meal_type: Some("breakfast".into()),
        cooking_method: "blended".into(),
        recipe_category: RecipeCategory::Smoothie,
        ingredients: vec![
            RecipeIngredient::new(primary, "1 cup", "fresh or frozen"),
            RecipeIngredient::new("milk", "1 cup", "cold"),
            RecipeIngredient::new("honey", "1 tsp", "optional"),
            RecipeIngredient::new("ice cubes", "4-6", "for thickness"),
        ],
        steps: vec![
            "Add cold milk to blender".into(),
            format!("Add {} and honey", primary),
            "Add ice cubes".into(),
            "Blend until smooth".into(),
            "Serve immediately".into(),
        ],
        tags: strings(&["smoothie", "simple", "healthy"]),
        description: format!("A refreshing {} smoothie", primary),
        ai_generated: false,
        nutrition: None,
    }
}

fn parfait(names: &[String], servings: u32) -> GeneratedRecipe {
    let primary = primary_ingredient(names, "fruit");

    GeneratedRecipe {
        id: short_id("dessert_fallback"),
        title: format!("Simple {} Parfait", title_case(primary)),
        servings,
        estimated_time: "15 minutes".into(),
        difficulty: "easy".into(),
        cuisine: "Dessert".into(),
        meal_type: Some("dessert".into()),
        cooking_method: "no-bake".into(),
        recipe_category: RecipeCategory::Dessert,
        ingredients: vec![
            RecipeIngredient::new(primary, "2 cups", "prepared"),
            RecipeIngredient::new("Greek yogurt", "1 cup", "vanilla"),
            RecipeIngredient::new("honey", "2 tbsp", "for sweetening"),
            RecipeIngredient::new("granola", "1/2 cup", "for crunch"),
        ],
        steps: vec![
            format!("Prepare {} as needed", primary),
            "Mix Greek yogurt with honey".into(),
            format!(
                "Layer {}, yogurt mixture, and granola in glasses",
                primary
            ),
            "Repeat layers ending with granola on top".into(),
            "Chill 15 minutes before serving".into(),
        ],
        tags: strings(&["dessert", "no-bake", "healthy"]),
        description: format!("A simple and delicious {} parfait", primary),
        ai_generated: false,
        nutrition: None,
    }
}

/// 测试模式下返回的固定菜谱
pub fn test_recipe(servings: u32) -> GeneratedRecipe {
    GeneratedRecipe {
        id: TEST_RECIPE_ID.into(),
        title: "AI Test Recipe".into(),
        servings,
        estimated_time: "20 minutes".into(),
        difficulty: "easy".into(),
        cuisine: "Test".into(),
        meal_type: None,
        cooking_method: "sauté".into(),
        recipe_category: RecipeCategory::Cuisine,
        ingredients: vec![
            RecipeIngredient::new("olive oil", "2 tbsp", ""),
            RecipeIngredient::new("garlic", "2 cloves", "minced"),
            RecipeIngredient::new("vegetables", "2 cups", "chopped"),
        ],
        steps: strings(&[
            "Heat oil in pan",
            "Add garlic, cook 1 minute",
            "Add vegetables, cook until tender",
            "Season and serve",
        ]),
        tags: strings(&["test", "simple", "ai"]),
        description: "Quick test recipe".into(),
        ai_generated: true,
        nutrition: None,
    }
}
