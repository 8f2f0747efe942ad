// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::recipe_request::CreateRecipeRequestDto;
use crate::application::dto::recipe_response::{CreateRecipeResponseDto, RecipeDetailDto};
use crate::config::settings::RecipeSettings;
use crate::domain::models::agent_run::{AgentRun, AgentRunType};
use crate::domain::models::ingredient::RecipeIngredientInput;
use crate::domain::models::recipe::{Recipe, RecipeCategory};
use crate::domain::models::scan::DEFAULT_GRAMS_ESTIMATE;
use crate::domain::models::user::AuthenticatedUser;
use crate::domain::repositories::agent_run_repository::AgentRunRepository;
use crate::domain::repositories::recipe_repository::RecipeRepository;
use crate::domain::repositories::scan_repository::ScanRepository;
use crate::domain::services::nutrition_service::{compute_nutrition, NutritionService};
use crate::domain::services::preference_service::{reconcile, PreferenceService, RecipeOverrides};
use crate::domain::services::recipe_generation_service::{
    GenerationRequest, RecipeGenerationService,
};
use crate::domain::services::recipe_templates::test_recipe;
use crate::infrastructure::metrics;
use crate::utils::errors::DomainError;

/// 菜谱用例的依赖
pub struct RecipeDependencies {
    pub scans: Arc<dyn ScanRepository>,
    pub recipes: Arc<dyn RecipeRepository>,
    pub agent_runs: Arc<dyn AgentRunRepository>,
    pub preferences: Arc<PreferenceService>,
    pub nutrition: Arc<NutritionService>,
    pub generation: Arc<RecipeGenerationService>,
    pub settings: RecipeSettings,
}

/// 菜谱用例
///
/// # 流程
///
/// 收集食材 → 调和偏好 → 计算营养 → 生成（失败退回模板）→ 保存 → 审计
pub struct RecipeUseCase {
    deps: RecipeDependencies,
}

impl RecipeUseCase {
    pub fn new(deps: RecipeDependencies) -> Self {
        Self { deps }
    }

    pub async fn create_recipes(
        &self,
        user: &AuthenticatedUser,
        dto: CreateRecipeRequestDto,
    ) -> Result<CreateRecipeResponseDto, DomainError> {
        let started = Instant::now();
        let result = self.generate_and_store(user, dto, started).await;
        if result.is_err() {
            metrics::record_recipe_failure();
        }
        result
    }

    async fn generate_and_store(
        &self,
        user: &AuthenticatedUser,
        dto: CreateRecipeRequestDto,
        started: Instant,
    ) -> Result<CreateRecipeResponseDto, DomainError> {
        dto.validate()?;
        let request_id = Uuid::new_v4();

        if dto.test_mode {
            info!("Returning test recipe for request {}", request_id);
            let servings = dto.servings.unwrap_or(self.deps.settings.default_servings);
            return Ok(CreateRecipeResponseDto {
                recipe_ids: Vec::new(),
                recipes: vec![test_recipe(servings)],
                request_id,
                processing_time: started.elapsed().as_secs_f64(),
                ai_enabled: self.deps.generation.ai_enabled(),
                ai_model: self.deps.generation.model().to_string(),
                test_mode: true,
            });
        }

        let recipe_category = dto
            .recipe_category
            .as_deref()
            .map(|raw| {
                raw.parse::<RecipeCategory>().map_err(|_| {
                    DomainError::Validation(format!("Unknown recipe category: {}", raw))
                })
            })
            .transpose()?;

        let (inputs, scan_servings) = self.collect_ingredients(user, &dto).await?;
        if inputs.is_empty() {
            return Err(DomainError::Validation(
                "No ingredients available for recipe generation".into(),
            ));
        }
        let names: Vec<String> = inputs.iter().map(|i| i.name.clone()).collect();

        let preferences = match self.deps.preferences.preferences_for(user.user_id).await {
            Ok(preferences) => preferences,
            Err(e) => {
                warn!("Failed to load preferences for {}: {}", user.user_id, e);
                Default::default()
            }
        };

        let plan = reconcile(
            RecipeOverrides {
                servings: dto.servings,
                cuisine: dto.cuisine,
                skill_level: dto.skill_level,
                meal_type: dto.meal_type,
                dietary_restrictions: dto.dietary_restrictions,
                recipe_category,
            },
            scan_servings,
            &preferences,
            &names,
            &self.deps.settings,
        );

        let facts = self.deps.nutrition.fetch_facts(&inputs).await;
        let nutrition = compute_nutrition(&inputs, &facts, plan.servings);
        let facts_snapshot = if facts.is_empty() {
            None
        } else {
            serde_json::to_value(&facts).ok()
        };

        let request = GenerationRequest {
            ingredient_names: names,
            plan,
            nutrition: Some(nutrition),
        };
        let generation_started = Instant::now();
        let outcome = self.deps.generation.generate(&request).await;
        let generation_elapsed = generation_started.elapsed();

        let mut records = Vec::with_capacity(outcome.recipes.len());
        for generated in outcome.recipes.iter().cloned() {
            let record = Recipe::from_generated(
                user.user_id,
                dto.scan_id,
                generated,
                facts_snapshot.clone(),
            )
            .map_err(|e| DomainError::Internal(e.to_string()))?;
            records.push(record);
        }
        self.deps.recipes.create_many(&records).await?;

        let recipes = outcome
            .recipes
            .iter()
            .cloned()
            .zip(&records)
            .map(|(mut generated, record)| {
                generated.id = record.id.to_string();
                generated
            })
            .collect::<Vec<_>>();
        let recipe_ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();

        let run = AgentRun::new(
            user.user_id,
            dto.scan_id,
            AgentRunType::GenerateRecipe,
            outcome.model.clone(),
            json!({
                "ingredients": request.ingredient_names,
                "servings": request.plan.servings,
                "cuisine": request.plan.cuisine,
                "recipe_category": request.plan.recipe_category,
                "dietary_restrictions": request.plan.dietary_restrictions,
            }),
        )
        .finish(
            outcome.status,
            Some(json!({ "recipe_ids": recipe_ids })),
            outcome.error.clone(),
            generation_elapsed,
        );
        if let Err(e) = self.deps.agent_runs.record(&run).await {
            warn!("Failed to record generate_recipe agent run: {}", e);
        }

        let generator = if outcome.ai_generated() { "ai" } else { "fallback" };
        metrics::record_recipe_request(generator, recipes.len(), started.elapsed());
        info!(
            "Stored {} {} recipes for user {}",
            recipes.len(),
            generator,
            user.user_id
        );

        Ok(CreateRecipeResponseDto {
            recipe_ids,
            recipes,
            request_id,
            processing_time: started.elapsed().as_secs_f64(),
            ai_enabled: self.deps.generation.ai_enabled(),
            ai_model: self.deps.generation.model().to_string(),
            test_mode: false,
        })
    }

    /// 显式食材优先，否则使用扫描中已确认的条目
    async fn collect_ingredients(
        &self,
        user: &AuthenticatedUser,
        dto: &CreateRecipeRequestDto,
    ) -> Result<(Vec<RecipeIngredientInput>, Option<i32>), DomainError> {
        let scan = match dto.scan_id {
            Some(scan_id) => Some(
                self.deps
                    .scans
                    .find_for_user(scan_id, user.user_id)
                    .await?
                    .ok_or_else(|| DomainError::NotFound("Scan not found".into()))?,
            ),
            None => None,
        };
        let scan_servings = scan.as_ref().and_then(|s| s.servings);

        if let Some(explicit) = dto.ingredients.as_ref().filter(|list| !list.is_empty()) {
            let inputs = explicit
                .iter()
                .filter(|i| !i.name.trim().is_empty())
                .map(|i| RecipeIngredientInput {
                    name: i.name.trim().to_string(),
                    grams: i
                        .grams
                        .filter(|g| g.is_finite() && *g > 0.0)
                        .unwrap_or(DEFAULT_GRAMS_ESTIMATE),
                    fdc_id: i.fdc_id.clone(),
                })
                .collect();
            return Ok((inputs, scan_servings));
        }

        let Some(scan) = scan else {
            return Err(DomainError::Validation(
                "Provide scan_id or ingredients".into(),
            ));
        };

        let inputs = self
            .deps
            .scans
            .find_confirmed_items(scan.id)
            .await?
            .into_iter()
            .map(|item| RecipeIngredientInput {
                grams: item.grams.unwrap_or(item.grams_est),
                name: item.label,
                fdc_id: item.fdc_id,
            })
            .collect();
        Ok((inputs, scan_servings))
    }

    pub async fn get_recipe(
        &self,
        user: &AuthenticatedUser,
        recipe_id: Uuid,
    ) -> Result<RecipeDetailDto, DomainError> {
        self.deps
            .recipes
            .find_for_user(recipe_id, user.user_id)
            .await?
            .map(Into::into)
            .ok_or_else(|| DomainError::NotFound("Recipe not found".into()))
    }
}
