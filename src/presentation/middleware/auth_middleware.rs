// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::domain::models::user::AuthenticatedUser;
use crate::infrastructure::database::entities::{api_token, user};
use crate::utils::token::{bearer_token, hash_token};

/// 认证状态
#[derive(Clone)]
pub struct AuthState {
    /// 数据库连接
    pub db: Arc<DatabaseConnection>,
}

/// 认证中间件
///
/// 以令牌的 SHA-256 摘要查找 api_tokens，成功后注入 `AuthenticatedUser`
///
/// # 返回值
///
/// * `Ok(Response)` - 认证成功的响应
/// * `Err(StatusCode)` - 缺少或未知令牌返回 401，数据库故障返回 500
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = req.uri().path();
    debug!("AuthMiddleware processing path: {}", path);
    if path == "/health" || path == "/v1/version" {
        return Ok(next.run(req).await);
    }

    let token_hash = {
        let raw = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or(StatusCode::UNAUTHORIZED)?;
        hash_token(raw)
    };

    let token = match api_token::Entity::find()
        .filter(api_token::Column::TokenHash.eq(token_hash))
        .one(state.db.as_ref())
        .await
    {
        Ok(Some(token)) => token,
        Ok(None) => {
            warn!("Unknown API token on {}", path);
            return Err(StatusCode::UNAUTHORIZED);
        }
        Err(e) => {
            error!("Database error checking API token: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let email = match user::Entity::find_by_id(token.user_id)
        .one(state.db.as_ref())
        .await
    {
        Ok(found) => found.and_then(|u| u.email),
        Err(e) => {
            error!("Database error loading user {}: {}", token.user_id, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: token.user_id,
        email,
    });
    Ok(next.run(req).await)
}
