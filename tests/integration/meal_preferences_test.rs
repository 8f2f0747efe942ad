// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_app;
use axum::http::StatusCode;
use serde_json::{json, Value};

/// 记录一餐时按份数换算菜谱营养
#[tokio::test]
async fn test_log_meal_scales_recipe_nutrition() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/recipes")
        .add_header("Authorization", app.bearer())
        .json(&json!({
            "ingredients": [{ "name": "tomato", "grams": 100, "fdc_id": "170457" }],
            "servings": 1
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let created: Value = response.json();
    let recipe_id = created["recipe_ids"][0].as_str().unwrap().to_string();

    let response = app
        .server
        .post("/v1/meals")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "recipeId": recipe_id, "servings": 2, "meal_type": "dinner" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let meal: Value = response.json();
    assert_eq!(meal["servings"], 2.0);
    assert_eq!(meal["meal_type"], "dinner");
    assert_eq!(meal["nutrition"]["kcal"], 36.0);

    let response = app
        .server
        .post("/v1/meals")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "notes": "leftovers" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let meal: Value = response.json();
    assert_eq!(meal["servings"], 1.0);
    assert!(meal["nutrition"].is_null());

    let response = app
        .server
        .get("/v1/meals")
        .add_header("Authorization", app.bearer())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let list: Value = response.json();
    assert_eq!(list["limit"], 20);
    assert_eq!(list["meals"].as_array().unwrap().len(), 2);

    let response = app
        .server
        .get("/v1/meals")
        .add_query_param("limit", 1)
        .add_query_param("offset", 1)
        .add_header("Authorization", app.bearer())
        .await;
    let list: Value = response.json();
    assert_eq!(list["meals"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_log_meal_errors() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/meals")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "recipe_id": uuid::Uuid::new_v4() }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app
        .server
        .post("/v1/meals")
        .add_header("Authorization", app.bearer())
        .json(&json!({ "servings": 0 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .get("/v1/meals")
        .add_query_param("limit", 500)
        .add_header("Authorization", app.bearer())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

/// 偏好默认值与替换
#[tokio::test]
async fn test_preferences_roundtrip() {
    let app = create_test_app().await;

    let response = app
        .server
        .get("/v1/preferences")
        .add_header("Authorization", app.bearer())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let profile: Value = response.json();
    assert_eq!(profile["cooking_skill"], "intermediate");
    assert_eq!(profile["default_servings"], 2);
    assert!(profile["diets"].as_array().unwrap().is_empty());

    let response = app
        .server
        .put("/v1/preferences")
        .add_header("Authorization", app.bearer())
        .json(&json!({
            "diets": [" Vegan ", "vegan"],
            "cuisines": ["Thai"],
            "allergens": ["peanuts"]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let profile: Value = response.json();
    assert_eq!(profile["diets"], json!(["vegan"]));
    assert_eq!(profile["cuisines"], json!(["thai"]));
    assert_eq!(profile["allergen_warnings"], json!(["peanuts"]));
    assert!(profile["dietary_considerations"]
        .as_array()
        .unwrap()
        .contains(&json!("no_animal_products")));

    let response = app
        .server
        .get("/v1/preferences")
        .add_header("Authorization", app.bearer())
        .await;
    let profile: Value = response.json();
    assert_eq!(profile["diets"], json!(["vegan"]));
}
