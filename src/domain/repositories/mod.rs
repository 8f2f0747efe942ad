// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DbErr;
use thiserror::Error;

/// 仓库接口模块
///
/// 定义数据持久化与外部数据源的抽象接口，具体实现位于基础设施层
pub mod agent_run_repository;
pub mod food_data_repository;
pub mod label_cache_repository;
pub mod meal_repository;
pub mod recipe_repository;
pub mod scan_repository;
pub mod storage_repository;
pub mod user_repository;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 存储的数据无法解析
    #[error("Corrupted record: {0}")]
    Corrupted(String),
}
