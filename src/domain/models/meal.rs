// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::nutrition::NutrientProfile;

/// 用餐记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Option<Uuid>,
    pub servings: f64,
    pub meal_type: Option<String>,
    pub notes: Option<String>,
    /// 本次用餐摄入的营养
    pub nutrition: Option<NutrientProfile>,
    pub eaten_at: DateTime<FixedOffset>,
    pub created_at: DateTime<FixedOffset>,
}

impl Meal {
    pub fn new(user_id: Uuid, recipe_id: Option<Uuid>, servings: f64) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            user_id,
            recipe_id,
            servings,
            meal_type: None,
            notes: None,
            nutrition: None,
            eaten_at: now,
            created_at: now,
        }
    }
}
