// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::user::{User, UserPreferences};
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::{api_token, user};
use crate::utils::token::hash_token;

/// 用户仓库实现
#[derive(Clone)]
pub struct UserRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl UserRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn string_list(value: JsonValue, column: &str) -> Result<Vec<String>, RepositoryError> {
    match value {
        JsonValue::Null => Ok(Vec::new()),
        other => serde_json::from_value(other)
            .map_err(|e| RepositoryError::Corrupted(format!("users.{}: {}", column, e))),
    }
}

impl TryFrom<user::Model> for User {
    type Error = RepositoryError;

    fn try_from(model: user::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            email: model.email,
            diets: string_list(model.diets, "diets")?,
            cuisines: string_list(model.cuisines, "cuisines")?,
            allergens: string_list(model.allergens, "allergens")?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn upsert(&self, user_id: Uuid, email: Option<&str>) -> Result<User, RepositoryError> {
        let now = Utc::now().fixed_offset();
        let model = user::ActiveModel {
            id: Set(user_id),
            email: Set(email.map(str::to_string)),
            diets: Set(json!([])),
            cuisines: Set(json!([])),
            allergens: Set(json!([])),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // Concurrent first requests for the same user must not fail
        user::Entity::insert(model)
            .on_conflict(OnConflict::column(user::Column::Id).do_nothing().to_owned())
            .exec_without_returning(self.db.as_ref())
            .await?;

        let existing = user::Entity::find_by_id(user_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        match email {
            Some(email) if existing.email.as_deref() != Some(email) => {
                let mut active: user::ActiveModel = existing.into();
                active.email = Set(Some(email.to_string()));
                active.updated_at = Set(now);
                active.update(self.db.as_ref()).await?.try_into()
            }
            _ => existing.try_into(),
        }
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, RepositoryError> {
        user::Entity::find_by_id(user_id)
            .one(self.db.as_ref())
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn update_preferences(
        &self,
        user_id: Uuid,
        preferences: &UserPreferences,
    ) -> Result<User, RepositoryError> {
        let existing = user::Entity::find_by_id(user_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: user::ActiveModel = existing.into();
        active.diets = Set(json!(preferences.diets));
        active.cuisines = Set(json!(preferences.cuisines));
        active.allergens = Set(json!(preferences.allergens));
        active.updated_at = Set(Utc::now().fixed_offset());

        active.update(self.db.as_ref()).await?.try_into()
    }

    async fn register_token(&self, user_id: Uuid, raw_token: &str) -> Result<(), RepositoryError> {
        let model = api_token::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            token_hash: Set(hash_token(raw_token)),
            created_at: Set(Utc::now().fixed_offset()),
        };
        api_token::Entity::insert(model)
            .exec_without_returning(self.db.as_ref())
            .await?;
        Ok(())
    }
}
