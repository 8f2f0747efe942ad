// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    middleware,
    routing::{get, post},
    Extension, Router,
};

use crate::application::container::AppServices;
use crate::presentation::handlers::{
    analysis_handler, meal_handler, preferences_handler, recipe_handler, scan_handler,
    upload_handler,
};
use crate::presentation::middleware::auth_middleware::{auth_middleware, AuthState};

/// 创建应用路由
///
/// # 参数
///
/// * `services` - 处理器使用的用例集合
/// * `auth_state` - 认证中间件状态
///
/// # 返回值
///
/// 返回配置好的路由，受保护路由都经过令牌认证
pub fn routes(services: AppServices, auth_state: AuthState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let protected_routes = Router::new()
        .route("/v1/uploads/presign", post(upload_handler::presign_upload))
        .route("/v1/scans", post(scan_handler::start_scan))
        .route("/v1/scans/{id}", get(scan_handler::get_scan))
        .route("/v1/scans/{id}/confirm", post(scan_handler::confirm_scan))
        .route("/v1/recipes", post(recipe_handler::create_recipe))
        .route("/v1/recipes/{id}", get(recipe_handler::get_recipe))
        .route(
            "/v1/meals",
            post(meal_handler::log_meal).get(meal_handler::list_meals),
        )
        .route(
            "/v1/preferences",
            get(preferences_handler::get_preferences).put(preferences_handler::update_preferences),
        )
        .route("/v1/ingredients/analyze", post(analysis_handler::analyze))
        .layer(Extension(services.uploads))
        .layer(Extension(services.scans))
        .layer(Extension(services.recipes))
        .layer(Extension(services.meals))
        .layer(Extension(services.preferences))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
