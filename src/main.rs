// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use ayeaye_chef::application::container::{AppServices, ExternalProviders};
use ayeaye_chef::config::settings::Settings;
use ayeaye_chef::domain::services::llm_service::{LlmClient, LlmService};
use ayeaye_chef::infrastructure::cache::create_label_cache;
use ayeaye_chef::infrastructure::database::connection;
use ayeaye_chef::infrastructure::fdc::usda_client::UsdaClient;
use ayeaye_chef::infrastructure::metrics::init_metrics;
use ayeaye_chef::infrastructure::storage::create_image_storage;
use ayeaye_chef::infrastructure::vision::llm_image_labeler::LlmImageLabeler;
use ayeaye_chef::presentation::middleware::auth_middleware::AuthState;
use ayeaye_chef::presentation::routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use ayeaye_chef::utils::telemetry;
use migration::{Migrator, MigratorTrait};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting ayeaye-chef...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    // Initialize Prometheus Metrics
    init_metrics(&settings.metrics);

    // 3. Connect to database
    let db = Arc::new(connection::create_pool(&settings.database).await?);
    info!("Database connection established");

    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. External providers
    let storage = create_image_storage(&settings.storage).await?;
    info!("Image storage initialized ({})", settings.storage.storage_type);

    let label_cache = create_label_cache(&settings.redis);

    let usda = UsdaClient::new(&settings.usda)?;
    if !usda.is_configured() {
        warn!("USDA API key not set, FDC lookups will return no results");
    }

    let vision_llm = LlmService::new(&settings.llm, &settings.llm.vision_model)?;
    if !vision_llm.is_configured() {
        warn!("LLM API key not set, ingredient detection will fail upstream");
    }
    let text_llm = LlmService::new(&settings.llm, &settings.llm.text_model)?;
    let recipe_llm: Option<Arc<dyn LlmClient>> = if text_llm.is_configured() {
        Some(Arc::new(text_llm))
    } else {
        warn!("LLM API key not set, recipes will use fallback templates");
        None
    };

    let providers = ExternalProviders {
        storage,
        label_cache,
        food_data: Arc::new(usda),
        labeler: Arc::new(LlmImageLabeler::new(Arc::new(vision_llm))),
        recipe_llm,
    };

    // 5. Assemble services
    let services = AppServices::build(db.clone(), &settings, providers);
    let auth_state = AuthState { db };

    // 6. Start HTTP server
    let app = routes::routes(services, auth_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
