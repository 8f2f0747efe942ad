// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户实体
///
/// 身份由外部认证服务签发，本服务只保存饮食偏好
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: Option<String>,
    /// 饮食类型，例如 vegan、keto
    pub diets: Vec<String>,
    /// 偏好的菜系
    pub cuisines: Vec<String>,
    /// 过敏原
    pub allergens: Vec<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl User {
    /// 创建没有偏好的新用户
    pub fn new(id: Uuid, email: Option<String>) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id,
            email,
            diets: Vec::new(),
            cuisines: Vec::new(),
            allergens: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn preferences(&self) -> UserPreferences {
        UserPreferences {
            diets: self.diets.clone(),
            cuisines: self.cuisines.clone(),
            allergens: self.allergens.clone(),
        }
    }
}

/// 用户饮食偏好
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub diets: Vec<String>,
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
}

impl UserPreferences {
    /// 三类偏好都为空时返回 true
    pub fn is_empty(&self) -> bool {
        self.diets.is_empty() && self.cuisines.is_empty() && self.allergens.is_empty()
    }

    /// 去除空白项并统一为小写
    pub fn normalized(self) -> Self {
        fn clean(values: Vec<String>) -> Vec<String> {
            let mut out: Vec<String> = Vec::with_capacity(values.len());
            for value in values {
                let value = value.trim().to_lowercase();
                if !value.is_empty() && !out.contains(&value) {
                    out.push(value);
                }
            }
            out
        }

        Self {
            diets: clean(self.diets),
            cuisines: clean(self.cuisines),
            allergens: clean(self.allergens),
        }
    }
}

/// 已认证的调用者
///
/// 由认证中间件注入到请求扩展中
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_preferences_drop_blanks_and_duplicates() {
        let prefs = UserPreferences {
            diets: vec!["Vegan".into(), " vegan ".into(), "".into()],
            cuisines: vec!["Indian".into()],
            allergens: vec!["  ".into()],
        }
        .normalized();

        assert_eq!(prefs.diets, vec!["vegan".to_string()]);
        assert_eq!(prefs.cuisines, vec!["indian".to_string()]);
        assert!(prefs.allergens.is_empty());
        assert!(!prefs.is_empty());
    }
}
