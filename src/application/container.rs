// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

use crate::application::use_cases::meal_use_case::MealUseCase;
use crate::application::use_cases::recipe_use_case::{RecipeDependencies, RecipeUseCase};
use crate::application::use_cases::scan_use_case::{ScanDependencies, ScanUseCase};
use crate::application::use_cases::upload_use_case::UploadUseCase;
use crate::config::settings::Settings;
use crate::domain::repositories::food_data_repository::FoodDataProvider;
use crate::domain::repositories::label_cache_repository::LabelCache;
use crate::domain::repositories::storage_repository::ImageStorage;
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::services::fdc_mapping_service::FdcMappingService;
use crate::domain::services::ingredient_detection_service::{
    ImageLabeler, IngredientDetectionService,
};
use crate::domain::services::llm_service::LlmClient;
use crate::domain::services::nutrition_service::NutritionService;
use crate::domain::services::preference_service::PreferenceService;
use crate::domain::services::recipe_generation_service::RecipeGenerationService;
use crate::infrastructure::repositories::agent_run_repo_impl::AgentRunRepositoryImpl;
use crate::infrastructure::repositories::meal_repo_impl::MealRepositoryImpl;
use crate::infrastructure::repositories::recipe_repo_impl::RecipeRepositoryImpl;
use crate::infrastructure::repositories::scan_repo_impl::ScanRepositoryImpl;
use crate::infrastructure::repositories::user_repo_impl::UserRepositoryImpl;

/// 外部服务
///
/// 对象存储、缓存、食物数据源与 AI 模型，测试中可以替换为假实现
#[derive(Clone)]
pub struct ExternalProviders {
    pub storage: Arc<dyn ImageStorage>,
    pub label_cache: Arc<dyn LabelCache>,
    pub food_data: Arc<dyn FoodDataProvider>,
    pub labeler: Arc<dyn ImageLabeler>,
    /// 为 None 时菜谱始终使用模板
    pub recipe_llm: Option<Arc<dyn LlmClient>>,
}

/// 处理器使用的全部用例
#[derive(Clone)]
pub struct AppServices {
    pub uploads: Arc<UploadUseCase>,
    pub scans: Arc<ScanUseCase>,
    pub recipes: Arc<RecipeUseCase>,
    pub meals: Arc<MealUseCase>,
    pub preferences: Arc<PreferenceService>,
    pub users: Arc<dyn UserRepository>,
}

impl AppServices {
    /// 组装仓库、领域服务与用例
    pub fn build(
        db: Arc<DatabaseConnection>,
        settings: &Settings,
        providers: ExternalProviders,
    ) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(UserRepositoryImpl::new(db.clone()));
        let scans = Arc::new(ScanRepositoryImpl::new(db.clone()));
        let recipes = Arc::new(RecipeRepositoryImpl::new(db.clone()));
        let meals = Arc::new(MealRepositoryImpl::new(db.clone()));
        let agent_runs = Arc::new(AgentRunRepositoryImpl::new(db));

        let preferences = Arc::new(PreferenceService::new(
            users.clone(),
            settings.recipes.default_servings,
        ));
        let detection = Arc::new(IngredientDetectionService::new(providers.labeler));
        let fdc_mapping = Arc::new(FdcMappingService::new(
            providers.food_data.clone(),
            providers.label_cache,
            Duration::from_secs(settings.usda.cache_ttl_secs),
        ));
        let nutrition = Arc::new(NutritionService::new(providers.food_data));
        let generation = Arc::new(RecipeGenerationService::new(
            providers.recipe_llm,
            settings.recipes.max_recipes,
        ));

        let uploads = Arc::new(UploadUseCase::new(
            providers.storage.clone(),
            Duration::from_secs(settings.storage.presign_expiry_secs),
        ));
        let scan_use_case = Arc::new(ScanUseCase::new(ScanDependencies {
            scans: scans.clone(),
            users: users.clone(),
            agent_runs: agent_runs.clone(),
            storage: providers.storage,
            detection,
            fdc_mapping,
            preferences: preferences.clone(),
            max_image_bytes: settings.storage.max_image_bytes,
        }));
        let recipe_use_case = Arc::new(RecipeUseCase::new(RecipeDependencies {
            scans,
            recipes: recipes.clone(),
            agent_runs,
            preferences: preferences.clone(),
            nutrition,
            generation,
            settings: settings.recipes.clone(),
        }));
        let meal_use_case = Arc::new(MealUseCase::new(meals, recipes));

        Self {
            uploads,
            scans: scan_use_case,
            recipes: recipe_use_case,
            meals: meal_use_case,
            preferences,
            users,
        }
    }
}
