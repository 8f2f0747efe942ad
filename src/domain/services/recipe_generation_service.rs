// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{anyhow, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::models::agent_run::AgentRunStatus;
use crate::domain::models::nutrition::NutritionSummary;
use crate::domain::models::recipe::{GeneratedRecipe, RecipeCategory, RecipeIngredient};
use crate::domain::services::llm_service::{extract_json_object, ChatRequest, LlmClient};
use crate::domain::services::preference_service::RecipePlan;
use crate::domain::services::recipe_templates::{fallback_recipes, short_id};

/// 模板兜底时记录的模型名
pub const TEMPLATE_MODEL: &str = "template";

/// 一次菜谱生成的输入
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub ingredient_names: Vec<String>,
    pub plan: RecipePlan,
    pub nutrition: Option<NutritionSummary>,
}

/// 菜谱生成结果
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub recipes: Vec<GeneratedRecipe>,
    pub status: AgentRunStatus,
    pub model: String,
    /// 触发兜底的原因
    pub error: Option<String>,
}

impl GenerationOutcome {
    pub fn ai_generated(&self) -> bool {
        self.status == AgentRunStatus::Succeeded
    }
}

/// 菜谱生成服务
///
/// # 流程
///
/// 按类别构造提示词，调用 LLM，截取 JSON 并格式化；
/// 任何一步失败都退回对应类别的模板菜谱
pub struct RecipeGenerationService {
    llm: Option<Arc<dyn LlmClient>>,
    max_recipes: usize,
}

impl RecipeGenerationService {
    /// 创建服务
    ///
    /// # 参数
    ///
    /// * `llm` - LLM 客户端，为 None 时始终使用模板
    /// * `max_recipes` - 每次最多保留的菜谱数
    pub fn new(llm: Option<Arc<dyn LlmClient>>, max_recipes: usize) -> Self {
        Self {
            llm,
            max_recipes: max_recipes.max(1),
        }
    }

    pub fn ai_enabled(&self) -> bool {
        self.llm.is_some()
    }

    pub fn model(&self) -> &str {
        self.llm
            .as_ref()
            .map(|llm| llm.model())
            .unwrap_or(TEMPLATE_MODEL)
    }

    pub async fn generate(&self, request: &GenerationRequest) -> GenerationOutcome {
        let category = request.plan.recipe_category;
        info!(
            category = %category,
            cuisine = %request.plan.cuisine,
            servings = request.plan.servings,
            "Generating recipes for: {}",
            request.ingredient_names.join(", ")
        );

        let attempt = match &self.llm {
            Some(llm) => self.generate_with_llm(llm.as_ref(), request).await,
            None => Err(anyhow!("LLM is not configured")),
        };

        match attempt {
            Ok(recipes) => {
                info!("Generated {} AI recipes", recipes.len());
                GenerationOutcome {
                    recipes,
                    status: AgentRunStatus::Succeeded,
                    model: self.model().to_string(),
                    error: None,
                }
            }
            Err(e) => {
                warn!("AI recipe generation failed, using {} template: {}", category, e);
                let recipes = fallback_recipes(
                    category,
                    &request.ingredient_names,
                    request.plan.servings,
                )
                .into_iter()
                .map(|mut recipe| {
                    recipe.nutrition = request.nutrition;
                    recipe
                })
                .collect();
                GenerationOutcome {
                    recipes,
                    status: AgentRunStatus::Fallback,
                    model: self.model().to_string(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn generate_with_llm(
        &self,
        llm: &dyn LlmClient,
        request: &GenerationRequest,
    ) -> Result<Vec<GeneratedRecipe>> {
        let (system, user, max_tokens) = build_prompts(request);
        let response = llm
            .complete(ChatRequest::new(system, user).with_max_tokens(max_tokens))
            .await?;
        info!(
            "LLM response received: {} characters, {} tokens",
            response.content.len(),
            response.usage.total_tokens
        );

        let raw_recipes = parse_recipes(&response.content).inspect_err(|e| {
            let preview: String = response.content.chars().take(500).collect();
            error!("Failed to parse LLM recipes: {}. Raw response: {}", e, preview);
        })?;

        Ok(raw_recipes
            .iter()
            .take(self.max_recipes)
            .enumerate()
            .map(|(i, raw)| format_recipe(raw, i, request))
            .collect())
    }
}

/// 构造系统提示词、用户提示词以及输出上限
pub fn build_prompts(request: &GenerationRequest) -> (String, String, u32) {
    let names = request.ingredient_names.join(", ");
    let plan = &request.plan;

    let (system, mut user, max_tokens) = match plan.recipe_category {
        RecipeCategory::Cuisine => (
            format!(
                r#"You are an expert chef specializing in {cuisine} cuisine. Create authentic, delicious recipes using the provided ingredients as the main focus.

Requirements:
- Generate exactly 3 distinct recipes using the same main ingredients
- Each recipe should be authentically {cuisine} with proper dish names (not generic "Style" names)
- Use traditional {cuisine} cooking techniques, spices, and flavor profiles
- Skill level: {skill}
- Meal type: {meal}
- Servings: {servings}
- Include only realistic ingredients that complement the main ones
- Each recipe should have a different cooking method or dish type

Return ONLY valid JSON in this exact format:
{{
  "recipes": [
    {{
      "recipe_name": "Authentic Dish Name (not generic)",
      "cuisine_type": "{cuisine}",
      "dish_type": "specific dish category",
      "preparation_time": "X minutes",
      "cooking_time": "X minutes",
      "serving_size": "{servings} servings",
      "ingredients": [
        {{"name": "ingredient", "quantity": "amount", "notes": "preparation"}}
      ],
      "instructions": [
        "Step 1: Detailed instruction",
        "Step 2: Next step"
      ],
      "cooking_method": "sauté/grill/simmer/etc",
      "chefs_tip": "Professional tip",
      "difficulty": "{skill}"
    }}
  ]
}}"#,
                cuisine = plan.cuisine,
                skill = plan.skill_level,
                meal = plan.meal_type,
                servings = plan.servings,
            ),
            format!(
                "Create 3 authentic {cuisine} recipes using these main ingredients: {names}\n\n\
                 Requirements:\n\
                 - Each recipe must have a proper {cuisine} dish name\n\
                 - Use authentic {cuisine} spices, techniques, and cooking methods\n\
                 - Make each recipe distinctly different (different dish types/cooking methods)\n\
                 - Suitable for {meal}\n\
                 - {skill} difficulty level",
                cuisine = plan.cuisine,
                names = names,
                meal = plan.meal_type,
                skill = plan.skill_level,
            ),
            4000,
        ),
        RecipeCategory::Smoothie => (
            r#"You are a nutrition expert and smoothie specialist. Create healthy, delicious smoothie recipes using the provided ingredients as the main focus.

Requirements:
- Generate exactly 3 distinct smoothie recipes
- Each smoothie should have different flavor profiles and nutritional benefits
- Use only blending - NO COOKING OR HEATING
- Include appropriate liquid bases, natural sweeteners, and nutritional boosters

Return ONLY valid JSON in this exact format:
{
  "recipes": [
    {
      "recipe_name": "Creative Smoothie Name",
      "dish_type": "smoothie",
      "ingredients": [
        {"name": "ingredient", "quantity": "amount", "notes": "preparation"}
      ],
      "instructions": [
        "Step 1: Add liquid to blender first",
        "Step 2: Add fruits/ingredients"
      ],
      "chefs_tip": "Smoothie tip"
    }
  ]
}"#
            .to_string(),
            format!(
                "Create 3 unique smoothie recipes using these main ingredients: {names}\n\n\
                 Requirements:\n\
                 - Each smoothie should have a different style (green, protein, dessert)\n\
                 - Use appropriate liquid bases (milk, coconut water, juice)\n\
                 - NO COOKING - only blending\n\
                 - {servings} servings each",
                names = names,
                servings = plan.servings,
            ),
            3000,
        ),
        RecipeCategory::Dessert => (
            r#"You are a pastry chef who specializes in simple, wholesome desserts. Create dessert recipes using the provided ingredients as the main focus.

Requirements:
- Generate exactly 3 distinct dessert recipes
- Prefer no-bake or minimal-bake preparations
- Keep added sugar moderate

Return ONLY valid JSON in this exact format:
{
  "recipes": [
    {
      "recipe_name": "Dessert Name",
      "dish_type": "dessert",
      "preparation_time": "X minutes",
      "ingredients": [
        {"name": "ingredient", "quantity": "amount", "notes": "preparation"}
      ],
      "instructions": [
        "Step 1: Detailed instruction"
      ],
      "cooking_method": "no-bake/baked/chilled",
      "chefs_tip": "Dessert tip"
    }
  ]
}"#
            .to_string(),
            format!(
                "Create 3 dessert recipes using these main ingredients: {names}\n\n\
                 Requirements:\n\
                 - {servings} servings each\n\
                 - Make each dessert distinctly different",
                names = names,
                servings = plan.servings,
            ),
            3000,
        ),
    };

    if !plan.dietary_restrictions.is_empty() {
        user.push_str(&format!(
            "\n- Accommodate these dietary restrictions: {}",
            plan.dietary_restrictions.join(", ")
        ));
    }

    (system, user, max_tokens)
}

/// 从模型输出中解析 `recipes` 数组
pub fn parse_recipes(content: &str) -> Result<Vec<Value>> {
    let body = extract_json_object(content)
        .ok_or_else(|| anyhow!("No JSON object found in LLM response"))?;
    let recipes = body
        .get("recipes")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("LLM response has no recipes array"))?;
    if recipes.is_empty() {
        return Err(anyhow!("LLM returned zero recipes"));
    }
    Ok(recipes.clone())
}

fn text_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_ingredients(raw: &Value) -> Vec<RecipeIngredient> {
    raw.get("ingredients")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(name) => Some(RecipeIngredient::new(name.as_str(), "", "")),
                    Value::Object(_) => text_field(item, "name").map(|name| {
                        RecipeIngredient::new(
                            name,
                            text_field(item, "quantity").unwrap_or_default(),
                            text_field(item, "notes").unwrap_or_default(),
                        )
                    }),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_steps(raw: &Value) -> Vec<String> {
    raw.get("instructions")
        .and_then(Value::as_array)
        .map(|steps| {
            steps
                .iter()
                .filter_map(|step| match step {
                    Value::String(s) => Some(s.clone()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// 将模型输出的单个菜谱转换为统一格式
pub fn format_recipe(raw: &Value, index: usize, request: &GenerationRequest) -> GeneratedRecipe {
    let plan = &request.plan;
    let title = |default: String| text_field(raw, "recipe_name").unwrap_or(default);

    let mut recipe = match plan.recipe_category {
        RecipeCategory::Cuisine => {
            let dish_type = text_field(raw, "dish_type");
            GeneratedRecipe {
                id: short_id("ai_recipe"),
                title: title(format!("AI Recipe {}", index + 1)),
                servings: plan.servings,
                estimated_time: format!(
                    "{} + {}",
                    text_field(raw, "preparation_time").unwrap_or_else(|| "10 min".into()),
                    text_field(raw, "cooking_time").unwrap_or_else(|| "20 min".into())
                ),
                difficulty: text_field(raw, "difficulty")
                    .unwrap_or_else(|| plan.skill_level.clone()),
                cuisine: text_field(raw, "cuisine_type").unwrap_or_else(|| plan.cuisine.clone()),
                meal_type: Some(plan.meal_type.clone()),
                cooking_method: text_field(raw, "cooking_method")
                    .or_else(|| dish_type.clone())
                    .unwrap_or_else(|| "mixed".into()),
                recipe_category: RecipeCategory::Cuisine,
                ingredients: parse_ingredients(raw),
                steps: parse_steps(raw),
                tags: vec![
                    plan.cuisine.to_lowercase(),
                    dish_type.unwrap_or_default().to_lowercase(),
                    plan.skill_level.clone(),
                ],
                description: text_field(raw, "chefs_tip")
                    .unwrap_or_else(|| format!("Authentic {} dish", plan.cuisine)),
                ai_generated: true,
                nutrition: None,
            }
        }
        RecipeCategory::Smoothie => GeneratedRecipe {
            id: short_id("smoothie"),
            title: title(format!("Smoothie {}", index + 1)),
            servings: plan.servings,
            estimated_time: "5 minutes".into(),
            difficulty: "easy".into(),
            cuisine: "Healthy".into(),
            meal_type: Some("breakfast".into()),
            cooking_method: "blended".into(),
            recipe_category: RecipeCategory::Smoothie,
            ingredients: parse_ingredients(raw),
            steps: parse_steps(raw),
            tags: ["smoothie", "healthy", "quick", "no-cook"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            description: text_field(raw, "chefs_tip")
                .unwrap_or_else(|| "Nutritious and delicious smoothie".into()),
            ai_generated: true,
            nutrition: None,
        },
        RecipeCategory::Dessert => GeneratedRecipe {
            id: short_id("dessert"),
            title: title(format!("Dessert {}", index + 1)),
            servings: plan.servings,
            estimated_time: text_field(raw, "preparation_time")
                .unwrap_or_else(|| "15 minutes".into()),
            difficulty: "easy".into(),
            cuisine: "Dessert".into(),
            meal_type: Some("dessert".into()),
            cooking_method: text_field(raw, "cooking_method").unwrap_or_else(|| "no-bake".into()),
            recipe_category: RecipeCategory::Dessert,
            ingredients: parse_ingredients(raw),
            steps: parse_steps(raw),
            tags: ["dessert", "sweet", "homemade"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            description: text_field(raw, "chefs_tip")
                .unwrap_or_else(|| "A homemade dessert".into()),
            ai_generated: true,
            nutrition: None,
        },
    };

    recipe.nutrition = request.nutrition;
    recipe
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::llm_service::{ChatResponse, TokenUsage};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct MockLlm {
        reply: Result<String, String>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl MockLlm {
        fn replying(content: &str) -> Self {
            Self {
                reply: Ok(content.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmClient for MockLlm {
        fn model(&self) -> &str {
            "mock-model"
        }

        async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
            self.requests.lock().unwrap().push(request);
            match &self.reply {
                Ok(content) => Ok(ChatResponse {
                    content: content.clone(),
                    usage: TokenUsage::default(),
                }),
                Err(message) => Err(anyhow!(message.clone())),
            }
        }
    }

    fn request(category: RecipeCategory, names: &[&str]) -> GenerationRequest {
        GenerationRequest {
            ingredient_names: names.iter().map(|s| s.to_string()).collect(),
            plan: RecipePlan {
                servings: 2,
                cuisine: "Indian".into(),
                skill_level: "intermediate".into(),
                meal_type: "dinner".into(),
                dietary_restrictions: vec!["vegetarian".into()],
                recipe_category: category,
            },
            nutrition: Some(NutritionSummary::default()),
        }
    }

    fn recipes_json(count: usize) -> String {
        let recipes: Vec<Value> = (0..count)
            .map(|i| {
                json!({
                    "recipe_name": format!("Dish {}", i),
                    "dish_type": "Curry",
                    "preparation_time": "15 minutes",
                    "cooking_time": "25 minutes",
                    "ingredients": [
                        {"name": "paneer", "quantity": "200g", "notes": "cubed"},
                        "salt"
                    ],
                    "instructions": ["Step 1: Cook", "Step 2: Serve"],
                    "chefs_tip": "Use fresh paneer"
                })
            })
            .collect();
        format!("Sure! Here you go:\n{}\nEnjoy.", json!({ "recipes": recipes }))
    }

    #[tokio::test]
    async fn test_llm_recipes_are_formatted_and_capped() {
        let llm = Arc::new(MockLlm::replying(&recipes_json(4)));
        let service = RecipeGenerationService::new(Some(llm.clone()), 3);

        let outcome = service
            .generate(&request(RecipeCategory::Cuisine, &["paneer", "spinach"]))
            .await;

        assert!(outcome.ai_generated());
        assert_eq!(outcome.model, "mock-model");
        assert_eq!(outcome.recipes.len(), 3);
        let first = &outcome.recipes[0];
        assert!(first.id.starts_with("ai_recipe_"));
        assert_eq!(first.title, "Dish 0");
        assert_eq!(first.estimated_time, "15 minutes + 25 minutes");
        assert_eq!(first.cuisine, "Indian");
        assert_eq!(first.cooking_method, "Curry");
        assert_eq!(first.tags, vec!["indian", "curry", "intermediate"]);
        assert_eq!(first.ingredients[1].name, "salt");
        assert_eq!(first.description, "Use fresh paneer");
        assert!(first.nutrition.is_some());

        let requests = llm.requests.lock().unwrap();
        assert_eq!(requests[0].max_tokens, 4000);
        assert!(requests[0].system.contains("specializing in Indian cuisine"));
        assert!(requests[0].user.contains("paneer, spinach"));
        assert!(requests[0].user.contains("dietary restrictions: vegetarian"));
    }

    #[tokio::test]
    async fn test_transport_failure_falls_back_to_template() {
        let service = RecipeGenerationService::new(Some(Arc::new(MockLlm::failing("503"))), 3);
        let outcome = service
            .generate(&request(RecipeCategory::Cuisine, &["spinach"]))
            .await;

        assert_eq!(outcome.status, AgentRunStatus::Fallback);
        assert!(!outcome.ai_generated());
        assert_eq!(outcome.recipes.len(), 1);
        assert_eq!(outcome.recipes[0].title, "Simple Sautéed Spinach");
        assert!(!outcome.recipes[0].ai_generated);
        assert!(outcome.error.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_unparsable_output_falls_back_per_category() {
        let service = RecipeGenerationService::new(
            Some(Arc::new(MockLlm::replying("I cannot help with that."))),
            3,
        );
        let outcome = service
            .generate(&request(RecipeCategory::Smoothie, &["mango"]))
            .await;
        assert_eq!(outcome.recipes[0].title, "Fresh Mango Smoothie");

        let service = RecipeGenerationService::new(
            Some(Arc::new(MockLlm::replying(r#"{"recipes": []}"#))),
            3,
        );
        let outcome = service
            .generate(&request(RecipeCategory::Dessert, &["strawberry"]))
            .await;
        assert_eq!(outcome.recipes[0].title, "Simple Strawberry Parfait");
    }

    #[tokio::test]
    async fn test_without_llm_uses_template_model() {
        let service = RecipeGenerationService::new(None, 3);
        assert!(!service.ai_enabled());
        let outcome = service
            .generate(&request(RecipeCategory::Cuisine, &["tofu"]))
            .await;
        assert_eq!(outcome.model, TEMPLATE_MODEL);
        assert_eq!(outcome.status, AgentRunStatus::Fallback);
    }

    #[test]
    fn test_smoothie_formatting_defaults() {
        let raw = json!({ "instructions": ["Blend"] });
        let recipe = format_recipe(&raw, 1, &request(RecipeCategory::Smoothie, &["banana"]));
        assert_eq!(recipe.title, "Smoothie 2");
        assert_eq!(recipe.estimated_time, "5 minutes");
        assert_eq!(recipe.cooking_method, "blended");
        assert_eq!(recipe.description, "Nutritious and delicious smoothie");
        assert!(recipe.ingredients.is_empty());
    }

    #[test]
    fn test_parse_recipes_errors() {
        assert!(parse_recipes("no json").is_err());
        assert!(parse_recipes(r#"{"dishes": []}"#).is_err());
        assert_eq!(parse_recipes(r#"{"recipes": [{}]}"#).unwrap().len(), 1);
    }
}
