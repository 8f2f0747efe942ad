// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use ayeaye_chef::config::settings::UsdaSettings;
use ayeaye_chef::domain::repositories::food_data_repository::FoodDataProvider;
use ayeaye_chef::infrastructure::fdc::usda_client::UsdaClient;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(base: &str) -> UsdaSettings {
    UsdaSettings {
        api_base_url: base.to_string(),
        api_key: Some("test-key".into()),
        timeout_secs: 5,
        cache_ttl_secs: 60,
    }
}

#[tokio::test]
async fn test_search_sends_filters_and_parses_hits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/foods/search"))
        .and(query_param("query", "tomato"))
        .and(query_param("pageSize", "5"))
        .and(query_param("requireAllWords", "true"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "foods": [
                { "fdcId": 170457, "description": "Tomatoes, red, ripe, raw", "dataType": "SR Legacy" },
                { "fdcId": 321360, "description": "Tomato, roma", "dataType": "Foundation" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = UsdaClient::new(&settings(&server.uri())).unwrap();
    let hits = client.search("tomato").await.unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].fdc_id, "170457");
    assert_eq!(hits[1].data_type, "Foundation");
}

#[tokio::test]
async fn test_fetch_nutrients_maps_known_ids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/foods"))
        .and(query_param("api_key", "test-key"))
        .and(body_json(json!({ "fdcIds": [170457] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "fdcId": 170457,
                "foodNutrients": [
                    { "nutrient": { "id": 1008 }, "amount": 18.0 },
                    { "nutrient": { "id": 1003 }, "amount": 0.88 },
                    { "nutrient": { "id": 1162 }, "amount": 13.7 },
                    { "nutrient": { "id": 2000 }, "amount": 2.63 },
                    { "amount": 1.0 }
                ]
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = UsdaClient::new(&settings(&server.uri())).unwrap();
    let ids = vec!["170457".to_string(), "temp_abc_0".to_string()];
    let facts = client.fetch_nutrients(&ids).await.unwrap();

    let tomato = facts.get("170457").unwrap();
    assert_eq!(tomato.kcal, 18.0);
    assert_eq!(tomato.protein_g, 0.88);
    assert_eq!(tomato.vit_c_mg, 13.7);
    assert_eq!(tomato.sugar_g, 0.0);
}

#[tokio::test]
async fn test_upstream_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/foods/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = UsdaClient::new(&settings(&server.uri())).unwrap();
    assert!(client.search("onion").await.is_err());
}
