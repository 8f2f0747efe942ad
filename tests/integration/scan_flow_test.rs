// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    create_test_app, create_test_app_with, create_test_app_with_failing_storage, TestApp,
};
use axum::http::StatusCode;
use ayeaye_chef::domain::repositories::storage_repository::ImageStorage;
use ayeaye_chef::infrastructure::database::entities::scan::SeaScanStatus;
use ayeaye_chef::infrastructure::database::entities::{agent_run, scan, scan_item};
use base64::Engine;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde_json::{json, Value};
use uuid::Uuid;

fn tiny_jpeg_data_url() -> String {
    let bytes = [0xFFu8, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
    format!(
        "data:image/jpeg;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

async fn start_inline_scan(app: &TestApp) -> Value {
    let response = app
        .server
        .post("/v1/scans")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "imageBase64": tiny_jpeg_data_url() }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json()
}

async fn only_scan(app: &TestApp) -> scan::Model {
    scan::Entity::find()
        .filter(scan::Column::UserId.eq(app.user_id))
        .one(app.db_pool.as_ref())
        .await
        .unwrap()
        .unwrap()
}

async fn scan_status(app: &TestApp, scan_id: &str) -> Value {
    let response = app
        .server
        .get(&format!("/v1/scans/{}", scan_id))
        .add_header("Authorization", app.bearer())
        .await;
    let detail: Value = response.json();
    detail["status"].clone()
}

fn item_id(scan: &Value, label: &str) -> String {
    scan["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|item| item["label"] == label)
        .and_then(|item| item["id"].as_str())
        .unwrap()
        .to_string()
}

/// 内联图片扫描：识别、映射并保存条目
#[tokio::test]
async fn test_start_scan_with_inline_image() {
    let app = create_test_app().await;
    let body = start_inline_scan(&app).await;

    assert_eq!(body["status"], "ready");
    assert_eq!(body["ingredients_detected"], 2);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items[0]["label"], "tomato");
    assert_eq!(items[0]["fdc_id"], "170457");
    assert_eq!(items[1]["label"], "onion");
    assert_eq!(items[1]["confirmed"], false);

    let scan_id = Uuid::parse_str(body["scan_id"].as_str().unwrap()).unwrap();
    let stored = scan::Entity::find_by_id(scan_id)
        .one(app.db_pool.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert!(stored
        .s3_key
        .starts_with(&format!("uploads/{}/", app.user_id)));
    assert!(app.storage.size(&stored.s3_key).await.unwrap().is_some());

    let runs = agent_run::Entity::find()
        .filter(agent_run::Column::ScanId.eq(scan_id))
        .all(app.db_pool.as_ref())
        .await
        .unwrap();
    assert_eq!(runs.len(), 2);
}

/// 通过对象键扫描已上传的图片
#[tokio::test]
async fn test_start_scan_with_uploaded_key() {
    let app = create_test_app().await;
    let key = format!("uploads/{}/scan_manual.png", app.user_id);
    app.storage
        .put(&key, vec![0x89, b'P', b'N', b'G'], "image/png")
        .await
        .unwrap();

    let response = app
        .server
        .post("/v1/scans")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "s3Key": key }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let missing = format!("uploads/{}/scan_missing.jpg", app.user_id);
    let response = app
        .server
        .post("/v1/scans")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "s3_key": missing }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_start_scan_rejects_bad_image_sources() {
    let app = create_test_app().await;

    // Neither source
    let response = app
        .server
        .post("/v1/scans")
        .add_header("Authorization", app.bearer())
        .json(&json!({}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // Someone else's upload
    let response = app
        .server
        .post("/v1/scans")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "s3_key": format!("uploads/{}/scan_x.jpg", Uuid::new_v4()) }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app
        .server
        .post("/v1/scans")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "image_base64": "%%% not base64 %%%" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // Over the 1 KiB test limit
    let oversized = base64::engine::general_purpose::STANDARD.encode(vec![0u8; 4096]);
    let response = app
        .server
        .post("/v1/scans")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "image_base64": format!("data:image/jpeg;base64,{}", oversized) }))
        .await;
    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
}

/// 视觉服务失败时扫描标记为失败，且不能确认
#[tokio::test]
async fn test_detection_failure_marks_scan_failed() {
    let app = create_test_app_with(true, None).await;

    let response = app
        .server
        .post("/v1/scans")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "image_base64": tiny_jpeg_data_url() }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);

    let failed = scan::Entity::find()
        .filter(scan::Column::UserId.eq(app.user_id))
        .one(app.db_pool.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(failed.status, SeaScanStatus::Failed);

    let response = app
        .server
        .post(&format!("/v1/scans/{}/confirm", failed.id))
        .add_header("Authorization", app.bearer())
        .json(&json!({ "items": [{ "label": "rice", "grams": 150, "confirmed": true }] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_get_scan_and_confirm() {
    let app = create_test_app().await;
    let started = start_inline_scan(&app).await;
    let scan_id = started["scan_id"].as_str().unwrap().to_string();

    let response = app
        .server
        .get(&format!("/v1/scans/{}", scan_id))
        .add_header("Authorization", app.bearer())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let detail: Value = response.json();
    assert_eq!(detail["requires_confirmation"], true);
    assert_eq!(detail["items"].as_array().unwrap().len(), 2);

    let response = app
        .server
        .post(&format!("/v1/scans/{}/confirm", scan_id))
        .add_header("Authorization", app.bearer())
        .json(&json!({
            "items": [
                { "id": item_id(&detail, "tomato"), "grams": 200, "confirmed": true },
                { "id": item_id(&detail, "onion"), "confirmed": false },
                { "label": "paneer", "grams": 150, "confirmed": true, "manually_added": true }
            ],
            "servings": 3
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let confirmed: Value = response.json();
    assert_eq!(confirmed["status"], "confirmed");
    assert_eq!(confirmed["confirmed_items"], 2);

    let response = app
        .server
        .get(&format!("/v1/scans/{}", scan_id))
        .add_header("Authorization", app.bearer())
        .await;
    let detail: Value = response.json();
    assert_eq!(detail["status"], "confirmed");
    assert_eq!(detail["requires_confirmation"], false);
    assert_eq!(detail["servings"], 3);
    let items = detail["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert!(items
        .iter()
        .any(|item| item["label"] == "paneer" && item["manually_added"] == true));
}

#[tokio::test]
async fn test_confirm_validation_errors() {
    let app = create_test_app().await;
    let started = start_inline_scan(&app).await;
    let scan_id = started["scan_id"].as_str().unwrap().to_string();
    let url = format!("/v1/scans/{}/confirm", scan_id);

    let response = app
        .server
        .post(&url)
        .add_header("Authorization", app.bearer())
        .json(&json!({ "items": [] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No items provided for confirmation");

    let response = app
        .server
        .post(&url)
        .add_header("Authorization", app.bearer())
        .json(&json!({ "items": [{ "id": item_id(&started, "tomato"), "grams": -5, "confirmed": true }] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post(&url)
        .add_header("Authorization", app.bearer())
        .json(&json!({ "items": [{ "id": item_id(&started, "tomato"), "confirmed": false }] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post(&format!("/v1/scans/{}/confirm", Uuid::new_v4()))
        .add_header("Authorization", app.bearer())
        .json(&json!({ "items": [{ "label": "rice", "grams": 100, "confirmed": true }] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

/// 对象超过大小上限时返回 413，扫描标记为失败
#[tokio::test]
async fn test_oversized_uploaded_object_is_rejected() {
    let app = create_test_app().await;
    let key = format!("uploads/{}/scan_big.jpg", app.user_id);
    app.storage
        .put(&key, vec![0xFF; 2048], "image/jpeg")
        .await
        .unwrap();

    let response = app
        .server
        .post("/v1/scans")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "s3_key": key }))
        .await;
    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(only_scan(&app).await.status, SeaScanStatus::Failed);
}

#[tokio::test]
async fn test_missing_object_marks_scan_failed() {
    let app = create_test_app().await;
    let response = app
        .server
        .post("/v1/scans")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "s3_key": format!("uploads/{}/scan_gone.jpg", app.user_id) }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(only_scan(&app).await.status, SeaScanStatus::Failed);
}

/// 存储读取出错时扫描不会停留在 processing
#[tokio::test]
async fn test_storage_error_marks_scan_failed() {
    let app = create_test_app_with_failing_storage().await;
    let key = format!("uploads/{}/scan_manual.jpg", app.user_id);
    app.storage
        .put(&key, vec![0xFF, 0xD8, 0xFF], "image/jpeg")
        .await
        .unwrap();

    let response = app
        .server
        .post("/v1/scans")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "s3_key": key }))
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "Internal server error");

    let failed = only_scan(&app).await;
    assert_eq!(failed.status, SeaScanStatus::Failed);
    let items = scan_item::Entity::find()
        .filter(scan_item::Column::ScanId.eq(failed.id))
        .all(app.db_pool.as_ref())
        .await
        .unwrap();
    assert!(items.is_empty());
}

/// 被拒绝的确认不会改变扫描状态
#[tokio::test]
async fn test_rejected_confirmation_leaves_scan_ready() {
    let app = create_test_app().await;
    let started = start_inline_scan(&app).await;
    let scan_id = started["scan_id"].as_str().unwrap().to_string();
    let url = format!("/v1/scans/{}/confirm", scan_id);

    let response = app
        .server
        .post(&url)
        .add_header("Authorization", app.bearer())
        .json(&json!({ "items": [], "servings": 4 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(scan_status(&app, &scan_id).await, "ready");

    let response = app
        .server
        .post(&url)
        .add_header("Authorization", app.bearer())
        .json(&json!({ "items": [{ "id": item_id(&started, "onion"), "confirmed": false }] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(scan_status(&app, &scan_id).await, "ready");
}

/// 确认条目都匹配不上时事务回滚
#[tokio::test]
async fn test_unmatched_confirmations_roll_back() {
    let app = create_test_app().await;
    let started = start_inline_scan(&app).await;
    let scan_id = started["scan_id"].as_str().unwrap().to_string();

    let response = app
        .server
        .post(&format!("/v1/scans/{}/confirm", scan_id))
        .add_header("Authorization", app.bearer())
        .json(&json!({
            "items": [
                { "id": Uuid::new_v4(), "grams": 10, "confirmed": true },
                { "fdc_id": "000000", "grams": 20, "confirmed": true }
            ],
            "servings": 4
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No confirmed items");

    let stored = only_scan(&app).await;
    assert_eq!(stored.status, SeaScanStatus::Ready);
    assert_eq!(stored.servings, None);
    let confirmed = scan_item::Entity::find()
        .filter(scan_item::Column::ScanId.eq(stored.id))
        .filter(scan_item::Column::Confirmed.eq(true))
        .all(app.db_pool.as_ref())
        .await
        .unwrap();
    assert!(confirmed.is_empty());
}

/// 数据库拒绝没有克数的已确认条目
#[tokio::test]
async fn test_confirmed_item_requires_grams() {
    let app = create_test_app().await;
    start_inline_scan(&app).await;
    let stored = only_scan(&app).await;

    let item = |grams: Option<f64>| scan_item::ActiveModel {
        id: Set(Uuid::new_v4()),
        scan_id: Set(stored.id),
        label: Set("rice".into()),
        fdc_id: Set(None),
        confidence: Set(1.0),
        grams_est: Set(100.0),
        grams: Set(grams),
        confirmed: Set(true),
        manually_added: Set(true),
        created_at: Set(Utc::now().fixed_offset()),
    };

    assert!(item(None).insert(app.db_pool.as_ref()).await.is_err());
    assert!(item(Some(120.0)).insert(app.db_pool.as_ref()).await.is_ok());
}
