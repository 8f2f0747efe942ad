// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 图像标注服务返回的原始信号
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSignal {
    pub text: String,
    /// 0..1，部分提供方返回 0..100，使用前需归一化
    pub confidence: f64,
}

/// 一张图片上的全部原始信号
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSignals {
    #[serde(default)]
    pub labels: Vec<LabelSignal>,
    #[serde(default)]
    pub text: Vec<LabelSignal>,
}

/// 规则引擎的输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedIngredient {
    pub label: String,
    pub confidence: f64,
}

impl DetectedIngredient {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// 标签到 FoodData Central 的映射结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FdcMatch {
    pub fdc_id: String,
    pub description: String,
    pub data_type: String,
    pub score: f64,
    /// 排名前三的候选 ID
    #[serde(default)]
    pub options: Vec<String>,
}

/// FoodData Central 搜索结果中的一条
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSearchHit {
    pub fdc_id: String,
    pub description: String,
    pub data_type: String,
}

/// 参与菜谱生成与营养计算的食材
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredientInput {
    pub name: String,
    pub grams: f64,
    pub fdc_id: Option<String>,
}
