// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryError;
use crate::domain::models::scan::{ItemConfirmation, Scan, ScanItem, ScanStatus};

/// 扫描仓库特质
///
/// 定义扫描及其条目的数据访问接口
#[async_trait]
pub trait ScanRepository: Send + Sync {
    /// 创建新扫描
    async fn create(&self, scan: &Scan) -> Result<Scan, RepositoryError>;
    /// 查找属于指定用户的扫描
    async fn find_for_user(
        &self,
        scan_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Scan>, RepositoryError>;
    /// 更新扫描状态
    async fn update_status(&self, scan_id: Uuid, status: ScanStatus)
        -> Result<(), RepositoryError>;
    /// 批量插入识别条目
    async fn insert_items(&self, items: &[ScanItem]) -> Result<(), RepositoryError>;
    /// 获取扫描的全部条目，按置信度降序
    async fn find_items(&self, scan_id: Uuid) -> Result<Vec<ScanItem>, RepositoryError>;
    /// 获取已确认的条目，按克数降序
    async fn find_confirmed_items(&self, scan_id: Uuid) -> Result<Vec<ScanItem>, RepositoryError>;
    /// 在一个事务中应用确认操作
    ///
    /// # 返回值
    ///
    /// 返回实际确认的条目数；为 0 时事务回滚，扫描保持原状态
    async fn confirm_items(
        &self,
        scan_id: Uuid,
        confirmations: Vec<ItemConfirmation>,
        servings: Option<i32>,
    ) -> Result<usize, RepositoryError>;
}
