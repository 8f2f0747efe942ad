// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_app;
use axum::http::StatusCode;
use serde_json::json;

/// 健康检查与版本端点无需认证
#[tokio::test]
async fn test_public_endpoints_skip_auth() {
    let app = create_test_app().await;

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "OK");

    let response = app.server.get("/v1/version").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), env!("CARGO_PKG_VERSION"));
}

/// 缺少或未知令牌返回 401
#[tokio::test]
async fn test_protected_routes_require_known_token() {
    let app = create_test_app().await;

    let response = app.server.get("/v1/preferences").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .get("/v1/preferences")
        .add_header("Authorization", "Bearer not-a-real-token")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .get("/v1/preferences")
        .add_header("Authorization", app.api_key.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .get("/v1/preferences")
        .add_header("Authorization", app.bearer())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

/// 预签名上传默认使用 JPEG，并把对象键放在用户目录下
#[tokio::test]
async fn test_presign_upload_defaults_to_jpeg() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/uploads/presign")
        .add_header("Authorization", app.bearer())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: serde_json::Value = response.json();
    let key = body["s3_key"].as_str().unwrap();
    assert!(key.starts_with(&format!("uploads/{}/scan_", app.user_id)));
    assert!(key.ends_with(".jpg"));
    assert_eq!(body["expires_in"], 300);
    assert!(body["upload_url"].as_str().unwrap().contains(key));
}

#[tokio::test]
async fn test_presign_upload_with_png_and_unsupported_type() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/uploads/presign")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "contentType": "image/png" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(body["s3_key"].as_str().unwrap().ends_with(".png"));

    let response = app
        .server
        .post("/v1/uploads/presign")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "content_type": "application/pdf" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().is_some());
}

/// 食材分析不访问外部服务
#[tokio::test]
async fn test_analyze_ingredients() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/ingredients/analyze")
        .add_header("Authorization", app.bearer())
        .json(&json!({
            "ingredients": [{ "name": "banana" }, { "name": "mango" }]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["total_ingredients"], 2);
    let categories = body["suggested_categories"].as_array().unwrap();
    assert!(categories.contains(&json!("smoothie")));

    let response = app
        .server
        .post("/v1/ingredients/analyze")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "ingredients": [] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
