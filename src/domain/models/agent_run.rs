// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// AI 调用审计记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRun {
    pub id: Uuid,
    pub user_id: Uuid,
    pub scan_id: Option<Uuid>,
    pub run_type: AgentRunType,
    pub model: String,
    pub status: AgentRunStatus,
    pub input: Value,
    pub output: Option<Value>,
    pub error: Option<String>,
    pub duration_ms: i64,
    pub created_at: DateTime<FixedOffset>,
}

impl AgentRun {
    pub fn new(
        user_id: Uuid,
        scan_id: Option<Uuid>,
        run_type: AgentRunType,
        model: impl Into<String>,
        input: Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            scan_id,
            run_type,
            model: model.into(),
            status: AgentRunStatus::Succeeded,
            input,
            output: None,
            error: None,
            duration_ms: 0,
            created_at: Utc::now().into(),
        }
    }

    /// 记录结果与耗时
    pub fn finish(
        mut self,
        status: AgentRunStatus,
        output: Option<Value>,
        error: Option<String>,
        elapsed: Duration,
    ) -> Self {
        self.status = status;
        self.output = output;
        self.error = error;
        self.duration_ms = i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX);
        self
    }
}

/// AI 调用类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRunType {
    DetectIngredients,
    MapFdc,
    GenerateRecipe,
}

impl fmt::Display for AgentRunType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AgentRunType::DetectIngredients => write!(f, "detect_ingredients"),
            AgentRunType::MapFdc => write!(f, "map_fdc"),
            AgentRunType::GenerateRecipe => write!(f, "generate_recipe"),
        }
    }
}

impl FromStr for AgentRunType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "detect_ingredients" => Ok(AgentRunType::DetectIngredients),
            "map_fdc" => Ok(AgentRunType::MapFdc),
            "generate_recipe" => Ok(AgentRunType::GenerateRecipe),
            _ => Err(()),
        }
    }
}

/// AI 调用结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRunStatus {
    /// 模型给出了可用的结果
    Succeeded,
    /// 模型失败，使用了兜底结果
    Fallback,
    /// 调用失败且没有兜底
    Failed,
}

impl fmt::Display for AgentRunStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AgentRunStatus::Succeeded => write!(f, "succeeded"),
            AgentRunStatus::Fallback => write!(f, "fallback"),
            AgentRunStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for AgentRunStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "succeeded" => Ok(AgentRunStatus::Succeeded),
            "fallback" => Ok(AgentRunStatus::Fallback),
            "failed" => Ok(AgentRunStatus::Failed),
            _ => Err(()),
        }
    }
}
