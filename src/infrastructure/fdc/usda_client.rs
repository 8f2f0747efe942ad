// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::settings::UsdaSettings;
use crate::domain::models::ingredient::FoodSearchHit;
use crate::domain::models::nutrition::{NutrientProfile, NutritionFacts};
use crate::domain::repositories::food_data_repository::FoodDataProvider;

/// 只搜索这三类数据集，品牌食品的描述噪声太大
const SEARCH_DATA_TYPES: [&str; 3] = ["Foundation", "SR Legacy", "Survey (FNDDS)"];
const SEARCH_PAGE_SIZE: &str = "5";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchFood>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchFood {
    fdc_id: u64,
    #[serde(default)]
    description: String,
    #[serde(default)]
    data_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodDetail {
    fdc_id: u64,
    #[serde(default)]
    food_nutrients: Vec<FoodNutrient>,
}

#[derive(Debug, Deserialize)]
struct FoodNutrient {
    #[serde(default)]
    nutrient: Option<NutrientRef>,
    #[serde(default)]
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct NutrientRef {
    id: u32,
}

/// USDA FoodData Central 客户端
///
/// 未配置 API 密钥时所有查询返回空结果
pub struct UsdaClient {
    client: reqwest::Client,
    api_base_url: String,
    api_key: Option<String>,
}

impl UsdaClient {
    /// 创建客户端
    ///
    /// # 参数
    ///
    /// * `settings` - USDA 配置
    pub fn new(settings: &UsdaSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build USDA HTTP client")?;

        Ok(Self {
            client,
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl FoodDataProvider for UsdaClient {
    async fn search(&self, query: &str) -> Result<Vec<FoodSearchHit>> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("No USDA API key available");
            return Ok(Vec::new());
        };

        let mut params: Vec<(&str, &str)> = vec![("query", query)];
        params.extend(SEARCH_DATA_TYPES.iter().map(|t| ("dataType", *t)));
        params.push(("pageSize", SEARCH_PAGE_SIZE));
        params.push(("requireAllWords", "true"));
        params.push(("api_key", api_key));

        let url = format!("{}/foods/search", self.api_base_url);
        let response = self
            .client
            .get(url)
            .query(&params)
            .send()
            .await
            .context("Failed to send USDA search request")?
            .error_for_status()
            .context("USDA search returned an error status")?;

        let body: SearchResponse = response
            .json()
            .await
            .context("Failed to parse USDA search response")?;

        debug!("USDA search for '{}' returned {} foods", query, body.foods.len());

        Ok(body
            .foods
            .into_iter()
            .map(|food| FoodSearchHit {
                fdc_id: food.fdc_id.to_string(),
                description: food.description,
                data_type: food.data_type,
            })
            .collect())
    }

    async fn fetch_nutrients(&self, fdc_ids: &[String]) -> Result<NutritionFacts> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("No USDA API key available");
            return Ok(NutritionFacts::new());
        };

        let numeric_ids: Vec<u64> = fdc_ids
            .iter()
            .filter_map(|id| match id.parse::<u64>() {
                Ok(value) => Some(value),
                Err(_) => {
                    debug!("Skipping non-numeric FDC ID: {}", id);
                    None
                }
            })
            .collect();

        if numeric_ids.is_empty() {
            return Ok(NutritionFacts::new());
        }

        let url = format!("{}/foods", self.api_base_url);
        let response = self
            .client
            .post(url)
            .query(&[("api_key", api_key)])
            .json(&json!({ "fdcIds": numeric_ids }))
            .send()
            .await
            .context("Failed to send USDA foods request")?
            .error_for_status()
            .context("USDA foods request returned an error status")?;

        let foods: Vec<FoodDetail> = response
            .json()
            .await
            .context("Failed to parse USDA foods response")?;

        let mut facts = NutritionFacts::new();
        for food in foods {
            let mut per_100g = NutrientProfile::default();
            for nutrient in &food.food_nutrients {
                if let (Some(reference), Some(amount)) = (&nutrient.nutrient, nutrient.amount) {
                    per_100g.set_nutrient(reference.id, amount);
                }
            }
            facts.insert(food.fdc_id.to_string(), per_100g);
        }

        info!("Fetched nutrition data for {} foods", facts.len());
        Ok(facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(api_key: Option<&str>) -> UsdaSettings {
        UsdaSettings {
            api_base_url: "http://127.0.0.1:1/fdc/v1/".into(),
            api_key: api_key.map(str::to_string),
            timeout_secs: 1,
            cache_ttl_secs: 60,
        }
    }

    #[tokio::test]
    async fn test_missing_key_returns_empty_results() {
        let client = UsdaClient::new(&settings(None)).unwrap();
        assert!(!client.is_configured());
        assert!(client.search("apple").await.unwrap().is_empty());
        assert!(client
            .fetch_nutrients(&["1750340".to_string()])
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_non_numeric_ids_short_circuit() {
        let client = UsdaClient::new(&settings(Some("key"))).unwrap();
        let facts = client
            .fetch_nutrients(&["temp_abc_0".to_string(), "".to_string()])
            .await
            .unwrap();
        assert!(facts.is_empty());
    }

    #[test]
    fn test_detail_parsing_ignores_missing_amounts() {
        let raw = r#"[{"fdcId": 1750340, "foodNutrients": [
            {"nutrient": {"id": 1008}, "amount": 52.0},
            {"nutrient": {"id": 1003}},
            {"amount": 3.0}
        ]}]"#;
        let foods: Vec<FoodDetail> = serde_json::from_str(raw).unwrap();
        assert_eq!(foods[0].fdc_id, 1750340);
        assert_eq!(foods[0].food_nutrients.len(), 3);
    }
}
