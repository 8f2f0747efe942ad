// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

use crate::domain::repositories::storage_repository::StorageError;
use crate::domain::repositories::RepositoryError;

/// 领域错误类型
///
/// 用例层返回的错误，表示层据此映射 HTTP 状态码
#[derive(Error, Debug)]
pub enum DomainError {
    /// 请求内容不符合业务规则
    #[error("{0}")]
    Validation(String),

    /// 资源不存在或不属于当前用户
    #[error("{0}")]
    NotFound(String),

    /// 访问了不属于当前用户的资源
    #[error("{0}")]
    Forbidden(String),

    /// 状态冲突，例如确认一个仍在处理中的扫描
    #[error("{0}")]
    Conflict(String),

    /// 上传内容过大
    #[error("{0}")]
    PayloadTooLarge(String),

    /// 外部 AI 或数据服务失败且没有兜底
    #[error("{0}")]
    Upstream(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::Validation(errors.to_string())
    }
}
