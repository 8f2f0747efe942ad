// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::models::scan::{ItemConfirmation, Scan, ScanItem, ScanStatus};
use crate::domain::repositories::scan_repository::ScanRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::scan::{self, SeaScanStatus};
use crate::infrastructure::database::entities::scan_item;

/// 扫描仓库实现
///
/// 确认操作在单个事务中完成，没有任何条目被确认时整体回滚
#[derive(Clone)]
pub struct ScanRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl ScanRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<ScanStatus> for SeaScanStatus {
    fn from(status: ScanStatus) -> Self {
        match status {
            ScanStatus::Processing => SeaScanStatus::Processing,
            ScanStatus::Ready => SeaScanStatus::Ready,
            ScanStatus::Confirmed => SeaScanStatus::Confirmed,
            ScanStatus::Failed => SeaScanStatus::Failed,
        }
    }
}

impl From<SeaScanStatus> for ScanStatus {
    fn from(status: SeaScanStatus) -> Self {
        match status {
            SeaScanStatus::Processing => ScanStatus::Processing,
            SeaScanStatus::Ready => ScanStatus::Ready,
            SeaScanStatus::Confirmed => ScanStatus::Confirmed,
            SeaScanStatus::Failed => ScanStatus::Failed,
        }
    }
}

impl From<scan::Model> for Scan {
    fn from(model: scan::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            s3_key: model.s3_key,
            status: model.status.into(),
            servings: model.servings,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<scan_item::Model> for ScanItem {
    fn from(model: scan_item::Model) -> Self {
        Self {
            id: model.id,
            scan_id: model.scan_id,
            label: model.label,
            fdc_id: model.fdc_id,
            confidence: model.confidence,
            grams_est: model.grams_est,
            grams: model.grams,
            confirmed: model.confirmed,
            manually_added: model.manually_added,
            created_at: model.created_at,
        }
    }
}

impl From<&ScanItem> for scan_item::ActiveModel {
    fn from(item: &ScanItem) -> Self {
        Self {
            id: Set(item.id),
            scan_id: Set(item.scan_id),
            label: Set(item.label.clone()),
            fdc_id: Set(item.fdc_id.clone()),
            confidence: Set(item.confidence),
            grams_est: Set(item.grams_est),
            grams: Set(item.grams),
            confirmed: Set(item.confirmed),
            manually_added: Set(item.manually_added),
            created_at: Set(item.created_at),
        }
    }
}

/// 确认一个已有条目，条目不存在时返回 false
async fn confirm_existing<C: ConnectionTrait>(
    conn: &C,
    scan_id: Uuid,
    condition: Condition,
    label: Option<String>,
    grams: f64,
) -> Result<bool, DbErr> {
    let existing = scan_item::Entity::find()
        .filter(scan_item::Column::ScanId.eq(scan_id))
        .filter(condition)
        .one(conn)
        .await?;

    let Some(existing) = existing else {
        return Ok(false);
    };

    let mut active: scan_item::ActiveModel = existing.into();
    active.grams = Set(Some(grams));
    active.confirmed = Set(true);
    if let Some(label) = label.filter(|l| !l.trim().is_empty()) {
        active.label = Set(label);
    }
    active.update(conn).await?;
    Ok(true)
}

#[async_trait]
impl ScanRepository for ScanRepositoryImpl {
    async fn create(&self, scan: &Scan) -> Result<Scan, RepositoryError> {
        let model = scan::ActiveModel {
            id: Set(scan.id),
            user_id: Set(scan.user_id),
            s3_key: Set(scan.s3_key.clone()),
            status: Set(scan.status.into()),
            servings: Set(scan.servings),
            created_at: Set(scan.created_at),
            updated_at: Set(scan.updated_at),
        };
        Ok(model.insert(self.db.as_ref()).await?.into())
    }

    async fn find_for_user(
        &self,
        scan_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Scan>, RepositoryError> {
        let model = scan::Entity::find_by_id(scan_id)
            .filter(scan::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn update_status(
        &self,
        scan_id: Uuid,
        status: ScanStatus,
    ) -> Result<(), RepositoryError> {
        let result = scan::Entity::update_many()
            .col_expr(scan::Column::Status, Expr::value(SeaScanStatus::from(status)))
            .col_expr(scan::Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
            .filter(scan::Column::Id.eq(scan_id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn insert_items(&self, items: &[ScanItem]) -> Result<(), RepositoryError> {
        if items.is_empty() {
            return Ok(());
        }
        let models: Vec<scan_item::ActiveModel> = items.iter().map(Into::into).collect();
        scan_item::Entity::insert_many(models)
            .exec_without_returning(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn find_items(&self, scan_id: Uuid) -> Result<Vec<ScanItem>, RepositoryError> {
        let items = scan_item::Entity::find()
            .filter(scan_item::Column::ScanId.eq(scan_id))
            .order_by_desc(scan_item::Column::Confidence)
            .order_by_asc(scan_item::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    async fn find_confirmed_items(&self, scan_id: Uuid) -> Result<Vec<ScanItem>, RepositoryError> {
        let items = scan_item::Entity::find()
            .filter(scan_item::Column::ScanId.eq(scan_id))
            .filter(scan_item::Column::Confirmed.eq(true))
            .order_by_desc(scan_item::Column::Grams)
            .all(self.db.as_ref())
            .await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    async fn confirm_items(
        &self,
        scan_id: Uuid,
        confirmations: Vec<ItemConfirmation>,
        servings: Option<i32>,
    ) -> Result<usize, RepositoryError> {
        let txn = self.db.begin().await?;
        let mut confirmed = 0usize;

        for confirmation in confirmations {
            let applied = match confirmation {
                ItemConfirmation::ById { id, label, grams } => {
                    confirm_existing(
                        &txn,
                        scan_id,
                        Condition::all().add(scan_item::Column::Id.eq(id)),
                        label,
                        grams,
                    )
                    .await?
                }
                ItemConfirmation::ByFdcId {
                    fdc_id,
                    label,
                    grams,
                } => {
                    confirm_existing(
                        &txn,
                        scan_id,
                        Condition::all().add(scan_item::Column::FdcId.eq(fdc_id)),
                        label,
                        grams,
                    )
                    .await?
                }
                ItemConfirmation::Manual {
                    label,
                    fdc_id,
                    grams,
                } => {
                    let item = ScanItem::manual(scan_id, label, fdc_id, grams);
                    scan_item::ActiveModel::from(&item).insert(&txn).await?;
                    true
                }
            };

            if applied {
                confirmed += 1;
            } else {
                debug!("Confirmation matched no item on scan {}", scan_id);
            }
        }

        if confirmed == 0 {
            txn.rollback().await?;
            return Ok(0);
        }

        let mut update = scan::Entity::update_many()
            .col_expr(scan::Column::Status, Expr::value(SeaScanStatus::Confirmed))
            .col_expr(scan::Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()));
        if let Some(servings) = servings {
            update = update.col_expr(scan::Column::Servings, Expr::value(servings));
        }
        update
            .filter(scan::Column::Id.eq(scan_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(confirmed)
    }
}
