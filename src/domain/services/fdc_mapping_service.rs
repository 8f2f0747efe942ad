// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{anyhow, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::domain::models::ingredient::{FdcMatch, FoodSearchHit};
use crate::domain::repositories::food_data_repository::FoodDataProvider;
use crate::domain::repositories::label_cache_repository::LabelCache;

const SYNONYMS: &[(&str, &str)] = &[
    ("coriander leaves", "cilantro"),
    ("coriander", "cilantro"),
    ("scallion", "green onion"),
    ("spring onion", "green onion"),
    ("bell pepper", "sweet pepper"),
    ("capsicum", "sweet pepper"),
    ("chicken breast", "chicken"),
    ("chicken thigh", "chicken"),
    ("ground beef", "beef"),
    ("beef steak", "beef"),
    ("roma tomato", "tomato"),
    ("cherry tomato", "tomato"),
    ("yellow onion", "onion"),
    ("red onion", "onion"),
    ("white onion", "onion"),
];

/// 搜索无结果时使用的常见食材映射
const FALLBACK_FDC_IDS: &[(&str, &str)] = &[
    ("apple", "09003"),
    ("banana", "09040"),
    ("egg", "01123"),
    ("chicken", "05064"),
    ("onion", "11282"),
    ("tomato", "11529"),
    ("potato", "11352"),
    ("carrot", "11124"),
];

pub const PLACEHOLDER_FDC_ID: &str = "99999";

/// 将标签规范化为 FoodData Central 中使用的名称
pub fn normalize_label(label: &str) -> String {
    let normalized = label.trim().to_lowercase();
    SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == normalized)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or(normalized)
}

/// 为单条搜索结果打分
///
/// 数据类型、查询词命中、完整短语命中和描述长度共同决定得分，上限 1.0
pub fn score_hit(hit: &FoodSearchHit, query: &str) -> f64 {
    let description = hit.description.to_lowercase();
    let query = query.to_lowercase();

    let mut score: f64 = match hit.data_type.as_str() {
        "Foundation" => 0.4,
        "SR Legacy" => 0.3,
        "Survey (FNDDS)" => 0.2,
        _ => 0.0,
    };

    for word in query.split_whitespace() {
        if description.contains(word) {
            score += 0.3;
        }
    }

    if description.contains(&query) {
        score += 0.3;
    }

    if description.split_whitespace().count() <= 3 {
        score += 0.1;
    }

    score.min(1.0)
}

/// 对搜索结果排序，返回最佳匹配以及前三个候选
pub fn rank_hits(hits: &[FoodSearchHit], query: &str) -> Option<FdcMatch> {
    let mut scored: Vec<(f64, &FoodSearchHit)> =
        hits.iter().map(|hit| (score_hit(hit, query), hit)).collect();
    // Stable sort keeps provider order for ties
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let (score, best) = scored.first()?;
    Some(FdcMatch {
        fdc_id: best.fdc_id.clone(),
        description: best.description.to_lowercase(),
        data_type: best.data_type.clone(),
        score: *score,
        options: scored.iter().take(3).map(|(_, h)| h.fdc_id.clone()).collect(),
    })
}

/// 标签没有任何匹配时的结果
pub fn fallback_match(normalized_label: &str) -> FdcMatch {
    match FALLBACK_FDC_IDS
        .iter()
        .find(|(label, _)| *label == normalized_label)
    {
        Some((_, fdc_id)) => FdcMatch {
            fdc_id: (*fdc_id).to_string(),
            description: normalized_label.to_string(),
            data_type: "fallback".to_string(),
            score: 0.8,
            options: vec![(*fdc_id).to_string()],
        },
        None => FdcMatch {
            fdc_id: PLACEHOLDER_FDC_ID.to_string(),
            description: normalized_label.to_string(),
            data_type: "placeholder".to_string(),
            score: 0.1,
            options: vec![PLACEHOLDER_FDC_ID.to_string()],
        },
    }
}

/// FDC 映射服务
///
/// 缓存优先，其次搜索 USDA，最后使用兜底表
pub struct FdcMappingService {
    provider: Arc<dyn FoodDataProvider>,
    cache: Arc<dyn LabelCache>,
    cache_ttl: Duration,
}

impl FdcMappingService {
    pub fn new(
        provider: Arc<dyn FoodDataProvider>,
        cache: Arc<dyn LabelCache>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            provider,
            cache,
            cache_ttl,
        }
    }

    /// 映射单个标签
    ///
    /// # 参数
    ///
    /// * `label` - 识别得到的食材标签
    ///
    /// # 返回值
    ///
    /// 标签为空时返回错误；缓存或数据源故障只记录日志，不会导致失败
    pub async fn map_label(&self, label: &str) -> Result<FdcMatch> {
        let normalized = normalize_label(label);
        if normalized.is_empty() {
            return Err(anyhow!("Cannot map an empty label"));
        }

        match self.cache.get(&normalized).await {
            Ok(Some(cached)) => {
                info!("Cache hit for label: {}", normalized);
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => warn!("Cache check failed for {}: {}", normalized, e),
        }

        let hits = match self.provider.search(&normalized).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("FoodData Central search failed for {}: {}", normalized, e);
                Vec::new()
            }
        };

        if let Some(best) = rank_hits(&hits, &normalized) {
            if let Err(e) = self.cache.put(&normalized, &best, self.cache_ttl).await {
                warn!("Cache write failed for {}: {}", normalized, e);
            }
            info!(
                "Mapped {} -> {} (score: {:.2})",
                label, best.fdc_id, best.score
            );
            return Ok(best);
        }

        let fallback = fallback_match(&normalized);
        if fallback.fdc_id == PLACEHOLDER_FDC_ID {
            warn!("No mapping found for label: {}", label);
        } else {
            info!("Using fallback mapping for {}: {}", label, fallback.fdc_id);
        }
        Ok(fallback)
    }
}
