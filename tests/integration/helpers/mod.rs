// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;
use axum_test::TestServer;
use ayeaye_chef::application::container::{AppServices, ExternalProviders};
use ayeaye_chef::config::settings::{
    DatabaseSettings, LlmSettings, MetricsSettings, RecipeSettings, RedisSettings,
    ServerSettings, Settings, StorageSettings, UsdaSettings,
};
use ayeaye_chef::domain::models::ingredient::{FoodSearchHit, ImageSignals, LabelSignal};
use ayeaye_chef::domain::models::nutrition::{NutrientProfile, NutritionFacts};
use ayeaye_chef::domain::repositories::food_data_repository::FoodDataProvider;
use ayeaye_chef::domain::repositories::storage_repository::{ImageStorage, StorageError};
use ayeaye_chef::domain::services::ingredient_detection_service::ImageLabeler;
use ayeaye_chef::domain::services::llm_service::{ChatRequest, ChatResponse, LlmClient, TokenUsage};
use ayeaye_chef::infrastructure::cache::memory_cache::InMemoryLabelCache;
use ayeaye_chef::infrastructure::database::connection;
use ayeaye_chef::infrastructure::storage::InMemoryImageStorage;
use ayeaye_chef::presentation::middleware::auth_middleware::AuthState;
use ayeaye_chef::presentation::routes;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub db_pool: Arc<DatabaseConnection>,
    pub api_key: String,
    pub user_id: Uuid,
    pub storage: Arc<InMemoryImageStorage>,
}

impl TestApp {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}

/// 固定返回番茄和洋葱的图像标注
pub struct FixedLabeler {
    pub fail: bool,
}

#[async_trait]
impl ImageLabeler for FixedLabeler {
    fn model(&self) -> &str {
        "test-vision"
    }

    async fn label(&self, _image: &[u8], _content_type: &str) -> Result<ImageSignals> {
        if self.fail {
            anyhow::bail!("vision provider unavailable");
        }
        Ok(ImageSignals {
            labels: vec![
                LabelSignal {
                    text: "Tomato".into(),
                    confidence: 0.92,
                },
                LabelSignal {
                    text: "Onion".into(),
                    confidence: 0.81,
                },
            ],
            text: vec![],
        })
    }
}

/// 只认识番茄和洋葱的食物数据源
pub struct StaticFoodData;

#[async_trait]
impl FoodDataProvider for StaticFoodData {
    async fn search(&self, query: &str) -> Result<Vec<FoodSearchHit>> {
        let hit = match query {
            "tomato" => FoodSearchHit {
                fdc_id: "170457".into(),
                description: "Tomatoes, red, ripe, raw".into(),
                data_type: "SR Legacy".into(),
            },
            "onion" => FoodSearchHit {
                fdc_id: "170000".into(),
                description: "Onions, raw".into(),
                data_type: "SR Legacy".into(),
            },
            _ => return Ok(vec![]),
        };
        Ok(vec![hit])
    }

    async fn fetch_nutrients(&self, fdc_ids: &[String]) -> Result<NutritionFacts> {
        let mut facts = NutritionFacts::new();
        for id in fdc_ids {
            let profile = match id.as_str() {
                "170457" => NutrientProfile {
                    kcal: 18.0,
                    protein_g: 0.9,
                    carb_g: 3.9,
                    ..Default::default()
                },
                "170000" => NutrientProfile {
                    kcal: 40.0,
                    protein_g: 1.1,
                    carb_g: 9.3,
                    ..Default::default()
                },
                _ => continue,
            };
            facts.insert(id.clone(), profile);
        }
        Ok(facts)
    }
}

/// 返回固定内容的 LLM
pub struct ScriptedLlm {
    pub content: String,
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    fn model(&self) -> &str {
        "test-text"
    }

    async fn complete(&self, _request: ChatRequest) -> Result<ChatResponse> {
        Ok(ChatResponse {
            content: self.content.clone(),
            usage: TokenUsage::default(),
        })
    }
}

/// 写入正常、读取总是失败的图片存储
pub struct ReadFailingStorage {
    pub inner: Arc<InMemoryImageStorage>,
}

#[async_trait]
impl ImageStorage for ReadFailingStorage {
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        self.inner.presign_put(key, content_type, expires_in).await
    }

    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        self.inner.put(key, data, content_type).await
    }

    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Err(StorageError::Other("bucket unavailable".into()))
    }

    async fn size(&self, _key: &str) -> Result<Option<u64>, StorageError> {
        Err(StorageError::Other("bucket unavailable".into()))
    }
}

pub fn test_settings() -> Settings {
    Settings {
        database: DatabaseSettings {
            url: "sqlite::memory:".into(),
            max_connections: None,
            min_connections: None,
            connect_timeout: None,
            idle_timeout: None,
        },
        redis: RedisSettings::default(),
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        storage: StorageSettings {
            storage_type: "memory".into(),
            bucket: "test-bucket".into(),
            region: "us-east-1".into(),
            endpoint: None,
            access_key: None,
            secret_key: None,
            presign_expiry_secs: 300,
            max_image_bytes: 1024,
        },
        llm: LlmSettings {
            api_base_url: "http://127.0.0.1:1".into(),
            api_key: None,
            text_model: "test-text".into(),
            vision_model: "test-vision".into(),
            timeout_secs: 5,
        },
        usda: UsdaSettings {
            api_base_url: "http://127.0.0.1:1".into(),
            api_key: None,
            timeout_secs: 5,
            cache_ttl_secs: 60,
        },
        recipes: RecipeSettings {
            default_servings: 2,
            default_cuisine: "international".into(),
            default_skill_level: "intermediate".into(),
            default_meal_type: "lunch".into(),
            max_recipes: 3,
        },
        metrics: MetricsSettings {
            enabled: false,
            listen_addr: "127.0.0.1:0".into(),
        },
    }
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with(false, None).await
}

/// 创建测试应用
///
/// # 参数
///
/// * `vision_fails` - 图像标注是否返回错误
/// * `recipe_llm` - 菜谱 LLM，为 None 时使用兜底模板
pub async fn create_test_app_with(
    vision_fails: bool,
    recipe_llm: Option<Arc<dyn LlmClient>>,
) -> TestApp {
    build_test_app(vision_fails, recipe_llm, false).await
}

/// 创建图片读取总是失败的测试应用
pub async fn create_test_app_with_failing_storage() -> TestApp {
    build_test_app(false, None, true).await
}

async fn build_test_app(
    vision_fails: bool,
    recipe_llm: Option<Arc<dyn LlmClient>>,
    failing_reads: bool,
) -> TestApp {
    let settings = test_settings();
    let db_pool = Arc::new(
        connection::create_pool(&settings.database)
            .await
            .expect("Failed to create sqlite pool"),
    );
    Migrator::up(db_pool.as_ref(), None)
        .await
        .expect("Failed to run migrations");

    let storage = Arc::new(InMemoryImageStorage::new());
    let image_storage: Arc<dyn ImageStorage> = if failing_reads {
        Arc::new(ReadFailingStorage {
            inner: storage.clone(),
        })
    } else {
        storage.clone()
    };
    let providers = ExternalProviders {
        storage: image_storage,
        label_cache: Arc::new(InMemoryLabelCache::new()),
        food_data: Arc::new(StaticFoodData),
        labeler: Arc::new(FixedLabeler { fail: vision_fails }),
        recipe_llm,
    };
    let services = AppServices::build(db_pool.clone(), &settings, providers);

    let user_id = Uuid::new_v4();
    let api_key = format!("test-token-{}", Uuid::new_v4().simple());
    services
        .users
        .upsert(user_id, Some("cook@example.com"))
        .await
        .expect("Failed to create user");
    services
        .users
        .register_token(user_id, &api_key)
        .await
        .expect("Failed to register token");

    let app = routes::routes(
        services,
        AuthState {
            db: db_pool.clone(),
        },
    );
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        db_pool,
        api_key,
        user_id,
        storage,
    }
}
