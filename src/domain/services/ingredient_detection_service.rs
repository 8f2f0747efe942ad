// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::models::ingredient::{DetectedIngredient, ImageSignals, LabelSignal};

/// 视觉标签中可以识别为食材的关键词
const FOOD_LABELS: &[&str] = &[
    // Fruits
    "apple", "banana", "orange", "grape", "strawberry", "blueberry", "raspberry", "lemon", "lime",
    "pineapple", "mango", "avocado", "peach", "pear", "cherry", "watermelon", "cantaloupe", "kiwi",
    "papaya", "coconut",
    // Vegetables
    "tomato", "onion", "garlic", "carrot", "potato", "broccoli", "spinach", "lettuce", "cucumber",
    "bell pepper", "mushroom", "corn", "peas", "celery", "cabbage", "cauliflower", "zucchini",
    "eggplant",
    // Proteins
    "chicken", "beef", "pork", "fish", "salmon", "tuna", "shrimp", "egg", "turkey", "lamb",
    "bacon", "sausage", "tofu", "tempeh", "seitan",
    // Dairy
    "milk", "cheese", "butter", "yogurt", "cream", "paneer", "cottage cheese",
    // Grains & legumes
    "rice", "bread", "pasta", "beans", "lentils", "quinoa", "oats", "dal", "chickpeas",
    // Herbs
    "basil", "cilantro", "parsley", "mint", "rosemary", "thyme",
    // Nuts
    "almond", "walnut", "peanut", "cashew", "pistachio",
];

/// 过于宽泛、不能作为食材的类别
const GENERIC_CATEGORIES: &[&str] = &[
    "food", "produce", "vegetable", "fruit", "meat", "seafood", "plant", "organic", "fresh",
    "natural", "ingredient", "nutrition", "diet", "healthy", "eating", "cooking", "kitchen", "meal",
];

/// 规范化后仍需丢弃的词
const GENERIC_TERMS: &[&str] = &["food", "produce", "vegetable", "fruit", "plant", "organic", "fresh"];

/// 按顺序匹配的规范化表，命中第一个即返回
const ESSENTIAL_MAPPINGS: &[(&str, &str)] = &[
    ("bell pepper", "bell pepper"),
    ("green pepper", "bell pepper"),
    ("chicken breast", "chicken"),
    ("ground beef", "beef"),
    ("cherry tomato", "tomato"),
    ("cottage cheese", "paneer"),
    ("white cheese", "paneer"),
    ("fresh cheese", "paneer"),
    ("leafy greens", "spinach"),
    ("leafy vegetables", "spinach"),
    ("green leafy", "spinach"),
    ("palak", "spinach"),
];

/// 容易互相误认的水果
const CONFUSABLE_FRUITS: &[&str] = &["apple", "banana", "orange", "pear", "peach"];

/// 包装文字中可直接确认的食材
const EXACT_TEXT_INGREDIENTS: &[&str] = &["paneer", "spinach", "tofu", "dal", "palak"];
/// 需要更高置信度的包装文字
const PARTIAL_TEXT_INGREDIENTS: &[&str] = &["cheese", "green", "leafy"];

const MIN_COMBINED_CONFIDENCE: f64 = 0.6;
const MAX_COMBINED_RESULTS: usize = 5;
const MAX_FALLBACK_RESULTS: usize = 10;

pub const UNKNOWN_INGREDIENT: &str = "unknown food item";

/// 图像标注特质
///
/// 返回图片上的视觉标签和包装文字
#[async_trait]
pub trait ImageLabeler: Send + Sync {
    /// 标注服务使用的模型名称
    fn model(&self) -> &str;

    async fn label(&self, image: &[u8], content_type: &str) -> Result<ImageSignals>;
}

/// 食材识别服务
///
/// 调用图像标注，再用规则把标签和文字归并成食材列表
pub struct IngredientDetectionService {
    labeler: Arc<dyn ImageLabeler>,
}

impl IngredientDetectionService {
    pub fn new(labeler: Arc<dyn ImageLabeler>) -> Self {
        Self { labeler }
    }

    pub fn model(&self) -> &str {
        self.labeler.model()
    }

    /// 识别图片中的食材
    ///
    /// # 返回值
    ///
    /// 至少包含一个食材；标注服务失败时返回错误
    pub async fn detect(&self, image: &[u8], content_type: &str) -> Result<Vec<DetectedIngredient>> {
        let signals = self.labeler.label(image, content_type).await?;
        debug!(
            labels = signals.labels.len(),
            words = signals.text.len(),
            "Image signals received"
        );
        let ingredients = detect_from_signals(&signals);
        info!(
            "Detected {} ingredients: {:?}",
            ingredients.len(),
            ingredients.iter().map(|i| i.label.as_str()).collect::<Vec<_>>()
        );
        Ok(ingredients)
    }
}

/// 规则引擎入口
pub fn detect_from_signals(signals: &ImageSignals) -> Vec<DetectedIngredient> {
    let visual = visual_candidates(&signals.labels);
    let direct_text = direct_text_matches(&signals.text);

    let combined = combine_detections(&[visual.clone(), direct_text]);
    if !combined.is_empty() {
        return combined;
    }

    // Nothing survived the threshold: keep everything food related
    let mut fallback = visual;
    for ingredient in food_text_candidates(&signals.text) {
        if !fallback.iter().any(|i| i.label == ingredient.label) {
            fallback.push(ingredient);
        }
    }
    sort_by_confidence(&mut fallback);
    fallback.truncate(MAX_FALLBACK_RESULTS);

    if fallback.is_empty() {
        fallback.push(DetectedIngredient::new(UNKNOWN_INGREDIENT, 0.5));
    }
    fallback
}

/// 把 0..100 的置信度归一到 0..1
fn normalize_confidence(confidence: f64) -> f64 {
    let value = if confidence > 1.0 {
        confidence / 100.0
    } else {
        confidence
    };
    value.clamp(0.0, 1.0)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn sort_by_confidence(items: &mut [DetectedIngredient]) {
    items.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// 标签是否与食材相关（排除宽泛类别）
pub fn is_food_related(label: &str) -> bool {
    let lower = label.trim().to_lowercase();
    if GENERIC_CATEGORIES.contains(&lower.as_str()) {
        return false;
    }
    FOOD_LABELS.iter().any(|food| lower.contains(food))
}

/// 将视觉标签规范化为常用食材名
pub fn normalize_label(label: &str) -> String {
    let lower = label.trim().to_lowercase();
    for (key, value) in ESSENTIAL_MAPPINGS {
        if lower.contains(key) {
            return (*value).to_string();
        }
    }
    if lower == "cheese" {
        return "paneer".to_string();
    }
    lower
}

/// 多个水果同时出现时，对低置信度的香蕉降权
pub fn validate_fruit_detection(labels: Vec<DetectedIngredient>) -> Vec<DetectedIngredient> {
    let (mut fruits, others): (Vec<_>, Vec<_>) = labels
        .into_iter()
        .partition(|l| CONFUSABLE_FRUITS.iter().any(|f| l.label.contains(f)));

    if fruits.len() > 1 {
        for fruit in fruits.iter_mut() {
            if fruit.label == "banana" && fruit.confidence < 0.95 {
                fruit.confidence = round3(fruit.confidence * 0.8);
            }
        }
    }

    let mut all = fruits;
    all.extend(others);
    sort_by_confidence(&mut all);
    all
}

/// 从视觉标签得到候选食材
pub fn visual_candidates(labels: &[LabelSignal]) -> Vec<DetectedIngredient> {
    let mut ingredients: Vec<DetectedIngredient> = Vec::new();

    for label in labels {
        if !is_food_related(&label.text) {
            continue;
        }
        let normalized = normalize_label(&label.text);
        if GENERIC_TERMS.contains(&normalized.as_str()) {
            debug!("Skipping generic term: {} (from {})", normalized, label.text);
            continue;
        }
        if ingredients.iter().any(|i| i.label == normalized) {
            continue;
        }
        ingredients.push(DetectedIngredient::new(
            normalized,
            round3(normalize_confidence(label.confidence)),
        ));
    }

    validate_fruit_detection(ingredients)
}

/// 包装文字的直接匹配
///
/// 精确词的置信度门槛为 0.5，部分词为 0.7；部分词只有在超过 0.75 时才映射
pub fn direct_text_matches(words: &[LabelSignal]) -> Vec<DetectedIngredient> {
    let mut results = Vec::new();

    for word in words {
        let text = word.text.trim().to_lowercase();
        let confidence = normalize_confidence(word.confidence);

        let is_exact = EXACT_TEXT_INGREDIENTS.iter().any(|i| text.contains(i));
        let is_partial = PARTIAL_TEXT_INGREDIENTS.iter().any(|i| text.contains(i));
        let threshold = if is_exact { 0.5 } else { 0.7 };
        if !(is_exact || is_partial) || confidence <= threshold {
            continue;
        }

        let mut matched: Vec<&str> = Vec::new();
        if text.contains("paneer") {
            matched.push("paneer");
        }
        if text.contains("spinach") || text.contains("palak") {
            matched.push("spinach");
        }
        if text.contains("tofu") {
            matched.push("tofu");
        }
        // Whole word only, "pedal" and "dale" do not count
        if text.split(|c: char| !c.is_alphanumeric()).any(|w| w == "dal") {
            matched.push("dal");
        }

        if matched.is_empty() && confidence > 0.75 {
            if text.contains("cheese") {
                matched.push("paneer");
            } else if text.contains("green") || text.contains("leafy") {
                matched.push("spinach");
            }
        }

        for label in matched {
            results.push(DetectedIngredient::new(label, round3((confidence * 1.1).min(1.0))));
        }
    }

    results
}

/// 其他与食材相关的包装文字，置信度打九折
pub fn food_text_candidates(words: &[LabelSignal]) -> Vec<DetectedIngredient> {
    let mut results: Vec<DetectedIngredient> = Vec::new();

    for word in words {
        let text = word.text.trim().to_lowercase();
        let confidence = normalize_confidence(word.confidence);
        let is_food_text = is_food_related(&text)
            || ["paneer", "spinach", "tofu", "cheese", "dal"].contains(&text.as_str());
        if !is_food_text || confidence <= 0.5 {
            continue;
        }
        let normalized = normalize_label(&text);
        if results.iter().any(|r| r.label == normalized) {
            continue;
        }
        results.push(DetectedIngredient::new(normalized, round3(confidence * 0.9)));
    }

    results
}

/// 合并多个来源的结果
///
/// 同名食材取平均置信度，命中多次时乘以 1.2（上限 1.0），
/// 保留置信度不低于 0.6 的前 5 个
pub fn combine_detections(sources: &[Vec<DetectedIngredient>]) -> Vec<DetectedIngredient> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();

    for ingredient in sources.iter().flatten() {
        match groups.iter_mut().find(|(label, _)| *label == ingredient.label) {
            Some((_, confidences)) => confidences.push(ingredient.confidence),
            None => groups.push((ingredient.label.clone(), vec![ingredient.confidence])),
        }
    }

    let mut combined: Vec<DetectedIngredient> = groups
        .into_iter()
        .map(|(label, confidences)| {
            let mut average = confidences.iter().sum::<f64>() / confidences.len() as f64;
            if confidences.len() > 1 {
                average = (average * 1.2).min(1.0);
            }
            DetectedIngredient::new(label, round3(average))
        })
        .filter(|i| i.confidence >= MIN_COMBINED_CONFIDENCE)
        .collect();

    sort_by_confidence(&mut combined);
    combined.truncate(MAX_COMBINED_RESULTS);
    combined
}
