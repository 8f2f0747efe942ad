// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use sea_orm::*;
use std::sync::Arc;

use crate::domain::models::agent_run::AgentRun;
use crate::domain::repositories::agent_run_repository::AgentRunRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::agent_run;

/// AI 调用审计仓库实现
#[derive(Clone)]
pub struct AgentRunRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl AgentRunRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<&AgentRun> for agent_run::ActiveModel {
    fn from(run: &AgentRun) -> Self {
        Self {
            id: Set(run.id),
            user_id: Set(run.user_id),
            scan_id: Set(run.scan_id),
            run_type: Set(run.run_type.to_string()),
            model: Set(run.model.clone()),
            status: Set(run.status.to_string()),
            input: Set(run.input.clone()),
            output: Set(run.output.clone()),
            error: Set(run.error.clone()),
            duration_ms: Set(run.duration_ms),
            created_at: Set(run.created_at),
        }
    }
}

#[async_trait]
impl AgentRunRepository for AgentRunRepositoryImpl {
    async fn record(&self, run: &AgentRun) -> Result<(), RepositoryError> {
        agent_run::Entity::insert(agent_run::ActiveModel::from(run))
            .exec_without_returning(self.db.as_ref())
            .await?;
        Ok(())
    }
}
