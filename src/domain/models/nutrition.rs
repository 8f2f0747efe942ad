// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 营养成分
///
/// 作为事实数据时表示每 100 克的含量，作为汇总时表示绝对量
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientProfile {
    #[serde(default)]
    pub kcal: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub fat_g: f64,
    #[serde(default)]
    pub carb_g: f64,
    #[serde(default)]
    pub fiber_g: f64,
    #[serde(default)]
    pub sugar_g: f64,
    #[serde(default)]
    pub sodium_mg: f64,
    #[serde(default)]
    pub calcium_mg: f64,
    #[serde(default)]
    pub iron_mg: f64,
    #[serde(default)]
    pub vit_c_mg: f64,
}

impl NutrientProfile {
    /// 按 USDA 营养素 ID 写入数值
    ///
    /// # 返回值
    ///
    /// 未知的营养素 ID 返回 false
    pub fn set_nutrient(&mut self, nutrient_id: u32, amount: f64) -> bool {
        let slot = match nutrient_id {
            1008 => &mut self.kcal,
            1003 => &mut self.protein_g,
            1004 => &mut self.fat_g,
            1005 => &mut self.carb_g,
            1079 => &mut self.fiber_g,
            1063 => &mut self.sugar_g,
            1093 => &mut self.sodium_mg,
            1087 => &mut self.calcium_mg,
            1089 => &mut self.iron_mg,
            1162 => &mut self.vit_c_mg,
            _ => return false,
        };
        *slot = amount;
        true
    }

    /// 将 `per_100g` 按克数折算后累加
    pub fn add_portion(&mut self, per_100g: &NutrientProfile, grams: f64) {
        let factor = grams / 100.0;
        self.kcal += per_100g.kcal * factor;
        self.protein_g += per_100g.protein_g * factor;
        self.fat_g += per_100g.fat_g * factor;
        self.carb_g += per_100g.carb_g * factor;
        self.fiber_g += per_100g.fiber_g * factor;
        self.sugar_g += per_100g.sugar_g * factor;
        self.sodium_mg += per_100g.sodium_mg * factor;
        self.calcium_mg += per_100g.calcium_mg * factor;
        self.iron_mg += per_100g.iron_mg * factor;
        self.vit_c_mg += per_100g.vit_c_mg * factor;
    }

    /// 对每个字段应用同一个函数
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            kcal: f(self.kcal),
            protein_g: f(self.protein_g),
            fat_g: f(self.fat_g),
            carb_g: f(self.carb_g),
            fiber_g: f(self.fiber_g),
            sugar_g: f(self.sugar_g),
            sodium_mg: f(self.sodium_mg),
            calcium_mg: f(self.calcium_mg),
            iron_mg: f(self.iron_mg),
            vit_c_mg: f(self.vit_c_mg),
        }
    }

    /// 保留一位小数
    pub fn rounded(&self) -> Self {
        self.map(round1)
    }
}

/// 保留一位小数
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 菜谱营养汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    pub totals_per_recipe: NutrientProfile,
    pub per_serving: NutrientProfile,
}

/// FDC ID 到每 100 克营养成分的映射
pub type NutritionFacts = HashMap<String, NutrientProfile>;
