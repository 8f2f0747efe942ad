// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, create_test_app_with, ScriptedLlm, TestApp};
use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

async fn confirmed_scan(app: &TestApp) -> String {
    let response = app
        .server
        .post("/v1/scans")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "image_base64": "data:image/jpeg;base64,/9j/4AAQSkZJRg==" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let started: Value = response.json();
    let scan_id = started["scan_id"].as_str().unwrap().to_string();

    let items: Vec<Value> = started["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| {
            let grams = if item["label"] == "tomato" { 200 } else { 100 };
            json!({ "id": item["id"], "grams": grams, "confirmed": true })
        })
        .collect();

    let response = app
        .server
        .post(&format!("/v1/scans/{}/confirm", scan_id))
        .add_header("Authorization", app.bearer())
        .json(&json!({ "items": items, "servings": 2 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    scan_id
}

/// 未配置 LLM 时使用兜底模板，营养按确认克数计算
#[tokio::test]
async fn test_recipe_from_scan_uses_fallback_without_llm() {
    let app = create_test_app().await;
    let scan_id = confirmed_scan(&app).await;

    let response = app
        .server
        .post("/v1/recipes")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "scanId": scan_id }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["ai_enabled"], false);
    assert_eq!(body["test_mode"], false);
    assert_eq!(body["recipe_ids"].as_array().unwrap().len(), 1);

    let recipe = &body["recipes"][0];
    assert_eq!(recipe["ai_generated"], false);
    assert_eq!(recipe["title"], "Simple Sautéed Tomato");
    assert_eq!(recipe["servings"], 2);
    assert_eq!(recipe["id"], body["recipe_ids"][0]);
    // 200 g tomato at 18 kcal plus 100 g onion at 40 kcal
    assert_eq!(recipe["nutrition"]["totals_per_recipe"]["kcal"], 76.0);
    assert_eq!(recipe["nutrition"]["per_serving"]["kcal"], 38.0);

    let recipe_id = body["recipe_ids"][0].as_str().unwrap();
    let response = app
        .server
        .get(&format!("/v1/recipes/{}", recipe_id))
        .add_header("Authorization", app.bearer())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let detail: Value = response.json();
    assert_eq!(detail["scan_id"], scan_id);
    assert_eq!(detail["ai_generated"], false);
    assert_eq!(detail["recipe_category"], "cuisine");
    assert!(detail["facts_snapshot"]["170457"].is_object());
}

/// LLM 输出的菜谱被格式化并保存
#[tokio::test]
async fn test_recipe_from_explicit_ingredients_with_llm() {
    let llm = ScriptedLlm {
        content: json!({
            "recipes": [
                {
                    "recipe_name": "Shakshuka",
                    "cuisine_type": "Middle Eastern",
                    "dish_type": "skillet",
                    "preparation_time": "10 minutes",
                    "cooking_time": "20 minutes",
                    "ingredients": [{ "name": "tomato", "quantity": "4", "notes": "diced" }],
                    "instructions": ["Simmer the tomatoes", "Crack in the eggs"],
                    "cooking_method": "simmer",
                    "difficulty": "easy"
                },
                { "recipe_name": "Tomato Soup", "instructions": ["Blend"] }
            ]
        })
        .to_string(),
    };
    let app = create_test_app_with(false, Some(Arc::new(llm))).await;

    let response = app
        .server
        .post("/v1/recipes")
        .add_header("Authorization", app.bearer())
        .json(&json!({
            "ingredients": [{ "name": "tomato", "grams": 300 }, { "name": "egg" }],
            "servings": 3,
            "cuisine": "Middle Eastern"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["ai_enabled"], true);
    assert_eq!(body["ai_model"], "test-text");
    let recipes = body["recipes"].as_array().unwrap();
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0]["title"], "Shakshuka");
    assert_eq!(recipes[0]["ai_generated"], true);
    assert_eq!(recipes[0]["estimated_time"], "10 minutes + 20 minutes");
    assert_eq!(recipes[0]["servings"], 3);
    assert_eq!(recipes[1]["title"], "Tomato Soup");
}

#[tokio::test]
async fn test_recipe_test_mode_is_not_stored() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/recipes")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "test_mode": true, "servings": 4 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["test_mode"], true);
    assert!(body["recipe_ids"].as_array().unwrap().is_empty());
    assert_eq!(body["recipes"][0]["id"], "ai_test_recipe_1");
    assert_eq!(body["recipes"][0]["servings"], 4);
}

#[tokio::test]
async fn test_recipe_request_errors() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/recipes")
        .add_header("Authorization", app.bearer())
        .json(&json!({}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/v1/recipes")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "ingredients": [{ "name": "rice" }], "recipe_category": "brunch" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/v1/recipes")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "scan_id": uuid::Uuid::new_v4() }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app
        .server
        .get(&format!("/v1/recipes/{}", uuid::Uuid::new_v4()))
        .add_header("Authorization", app.bearer())
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Recipe not found");
}
