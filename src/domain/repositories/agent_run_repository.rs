// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::models::agent_run::AgentRun;

#[async_trait]
pub trait AgentRunRepository: Send + Sync {
    /// 写入一条审计记录
    async fn record(&self, run: &AgentRun) -> Result<(), RepositoryError>;
}
