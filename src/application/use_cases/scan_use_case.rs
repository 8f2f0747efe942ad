// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::scan_request::{
    ConfirmItemDto, ConfirmScanRequestDto, StartScanRequestDto,
};
use crate::application::dto::scan_response::{
    ConfirmScanResponseDto, ScanDetailDto, StartScanResponseDto,
};
use crate::domain::models::agent_run::{AgentRun, AgentRunStatus, AgentRunType};
use crate::domain::models::ingredient::DetectedIngredient;
use crate::domain::models::scan::{
    ItemConfirmation, Scan, ScanItem, ScanStatus, DEFAULT_GRAMS_ESTIMATE,
};
use crate::domain::models::user::{AuthenticatedUser, UserPreferences};
use crate::domain::repositories::agent_run_repository::AgentRunRepository;
use crate::domain::repositories::scan_repository::ScanRepository;
use crate::domain::repositories::storage_repository::ImageStorage;
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::services::fdc_mapping_service::{FdcMappingService, PLACEHOLDER_FDC_ID};
use crate::domain::services::ingredient_detection_service::IngredientDetectionService;
use crate::domain::services::preference_service::PreferenceService;
use crate::infrastructure::metrics;
use crate::utils::errors::DomainError;
use crate::utils::image::{
    content_type_for_key, decode_base64_image, extension_for, upload_key, user_prefix,
};

/// 扫描用例的依赖
pub struct ScanDependencies {
    pub scans: Arc<dyn ScanRepository>,
    pub users: Arc<dyn UserRepository>,
    pub agent_runs: Arc<dyn AgentRunRepository>,
    pub storage: Arc<dyn ImageStorage>,
    pub detection: Arc<IngredientDetectionService>,
    pub fdc_mapping: Arc<FdcMappingService>,
    pub preferences: Arc<PreferenceService>,
    pub max_image_bytes: usize,
}

/// 扫描用例
///
/// 负责开始扫描（识别 + FDC 映射）、查询扫描和确认食材
pub struct ScanUseCase {
    deps: ScanDependencies,
}

/// 扫描图片的来源
enum ImageSource {
    Stored(String),
    Inline(String),
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// 把请求条目转换为确认操作
///
/// 未勾选确认、缺少匹配依据或缺少标签的手动条目会被跳过
pub fn build_confirmations(items: &[ConfirmItemDto]) -> Result<Vec<ItemConfirmation>, DomainError> {
    let mut confirmations = Vec::new();

    for item in items.iter().filter(|i| i.confirmed) {
        let grams = item.grams.unwrap_or(DEFAULT_GRAMS_ESTIMATE);
        if !grams.is_finite() || grams <= 0.0 {
            return Err(DomainError::Validation(format!(
                "grams must be positive, got {}",
                grams
            )));
        }

        let label = non_blank(item.label.clone()).map(|l| l.trim().to_string());
        let fdc_id = non_blank(item.fdc_id.clone());

        if item.manually_added {
            match label {
                Some(label) => confirmations.push(ItemConfirmation::Manual {
                    label,
                    fdc_id,
                    grams,
                }),
                None => warn!("Skipping manually added item without a label"),
            }
        } else if let Some(id) = item.id {
            confirmations.push(ItemConfirmation::ById { id, label, grams });
        } else if let Some(fdc_id) = fdc_id {
            confirmations.push(ItemConfirmation::ByFdcId {
                fdc_id,
                label,
                grams,
            });
        } else {
            warn!("Skipping confirmation item without id or fdc_id");
        }
    }

    Ok(confirmations)
}

impl ScanUseCase {
    pub fn new(deps: ScanDependencies) -> Self {
        Self { deps }
    }

    /// 开始一次扫描
    ///
    /// # 参数
    ///
    /// * `user` - 当前调用者
    /// * `dto` - 图片来源，已上传的 s3_key 或内联的 base64
    ///
    /// # 返回值
    ///
    /// 识别完成并处于 ready 状态的扫描及其条目
    pub async fn start_scan(
        &self,
        user: &AuthenticatedUser,
        dto: StartScanRequestDto,
    ) -> Result<StartScanResponseDto, DomainError> {
        let source = match (non_blank(dto.s3_key), non_blank(dto.image_base64)) {
            (Some(key), None) => ImageSource::Stored(key.trim().to_string()),
            (None, Some(data)) => ImageSource::Inline(data),
            _ => {
                return Err(DomainError::Validation(
                    "Provide exactly one of s3_key or image_base64".into(),
                ))
            }
        };

        let s3_key = self.resolve_image(user, source).await?;

        if let Err(e) = self
            .deps
            .users
            .upsert(user.user_id, user.email.as_deref())
            .await
        {
            warn!("Failed to upsert user {}: {}", user.user_id, e);
        }

        let scan = self
            .deps
            .scans
            .create(&Scan::new(user.user_id, s3_key))
            .await?;
        metrics::record_scan_started();
        info!("Created scan {} for user {}", scan.id, user.user_id);

        let started = Instant::now();
        let items = match self.process_scan(user, &scan).await {
            Ok(items) => items,
            Err(e) => {
                self.mark_failed(scan.id).await;
                metrics::record_scan_completed("failed", started.elapsed());
                return Err(e);
            }
        };
        metrics::record_scan_completed("ready", started.elapsed());

        info!("Scan {} ready with {} ingredients", scan.id, items.len());

        Ok(StartScanResponseDto {
            scan_id: scan.id,
            status: ScanStatus::Ready,
            ingredients_detected: items.len(),
            message: format!(
                "Detected {} ingredients, please confirm quantities",
                items.len()
            ),
            items: items.into_iter().map(Into::into).collect(),
        })
    }

    /// 识别、映射并保存条目，成功后扫描进入 ready
    ///
    /// 任何错误都由调用方把扫描标记为 failed
    async fn process_scan(
        &self,
        user: &AuthenticatedUser,
        scan: &Scan,
    ) -> Result<Vec<ScanItem>, DomainError> {
        let s3_key = scan.s3_key.as_str();
        let image = self.load_image(s3_key).await?;

        let detect_started = Instant::now();
        let run = AgentRun::new(
            user.user_id,
            Some(scan.id),
            AgentRunType::DetectIngredients,
            self.deps.detection.model(),
            json!({ "s3_key": s3_key, "image_bytes": image.len() }),
        );

        let detected = match self
            .deps
            .detection
            .detect(&image, content_type_for_key(s3_key))
            .await
        {
            Ok(detected) => {
                self.record_run(run.finish(
                    AgentRunStatus::Succeeded,
                    Some(json!({ "ingredients": detected })),
                    None,
                    detect_started.elapsed(),
                ))
                .await;
                detected
            }
            Err(e) => {
                error!("Ingredient detection failed for scan {}: {}", scan.id, e);
                self.record_run(run.finish(
                    AgentRunStatus::Failed,
                    None,
                    Some(e.to_string()),
                    detect_started.elapsed(),
                ))
                .await;
                return Err(DomainError::Upstream(format!(
                    "Ingredient detection failed: {}",
                    e
                )));
            }
        };

        let items = self.map_ingredients(user, scan, detected).await;
        self.deps.scans.insert_items(&items).await?;
        self.deps
            .scans
            .update_status(scan.id, ScanStatus::Ready)
            .await?;
        Ok(items)
    }

    /// 读取扫描图片，先按对象大小拒绝过大的上传
    async fn load_image(&self, s3_key: &str) -> Result<Vec<u8>, DomainError> {
        let size = self
            .deps
            .storage
            .size(s3_key)
            .await?
            .ok_or_else(|| DomainError::NotFound("Image not found".into()))?;
        if size > self.deps.max_image_bytes as u64 {
            return Err(DomainError::PayloadTooLarge(format!(
                "Image exceeds {} bytes",
                self.deps.max_image_bytes
            )));
        }

        self.deps
            .storage
            .get(s3_key)
            .await?
            .ok_or_else(|| DomainError::NotFound("Image not found".into()))
    }

    /// 获取属于调用者的扫描
    pub async fn get_scan(
        &self,
        user: &AuthenticatedUser,
        scan_id: Uuid,
    ) -> Result<ScanDetailDto, DomainError> {
        let scan = self.find_scan(user, scan_id).await?;
        let items = self.deps.scans.find_items(scan.id).await?;

        Ok(ScanDetailDto {
            scan_id: scan.id,
            status: scan.status,
            requires_confirmation: scan.requires_confirmation(),
            s3_key: scan.s3_key,
            servings: scan.servings,
            created_at: scan.created_at,
            items: items.into_iter().map(Into::into).collect(),
        })
    }

    /// 确认扫描中的食材与克数
    ///
    /// 所有条目写入在同一事务内完成，没有条目被确认时扫描保持原状态
    pub async fn confirm_scan(
        &self,
        user: &AuthenticatedUser,
        scan_id: Uuid,
        dto: ConfirmScanRequestDto,
    ) -> Result<ConfirmScanResponseDto, DomainError> {
        if dto.items.is_empty() {
            return Err(DomainError::Validation(
                "No items provided for confirmation".into(),
            ));
        }
        dto.validate()?;

        let scan = self.find_scan(user, scan_id).await?;
        if !scan.status.can_confirm() {
            return Err(DomainError::Conflict(format!(
                "Scan is {} and cannot be confirmed",
                scan.status
            )));
        }

        let confirmations = build_confirmations(&dto.items)?;
        if confirmations.is_empty() {
            return Err(DomainError::Validation("No confirmed items".into()));
        }

        let confirmed = self
            .deps
            .scans
            .confirm_items(scan.id, confirmations, dto.servings)
            .await?;
        if confirmed == 0 {
            return Err(DomainError::Validation("No confirmed items".into()));
        }

        let preferences = UserPreferences {
            diets: dto.diets,
            cuisines: dto.cuisines,
            allergens: dto.allergens,
        };
        if !preferences.is_empty() {
            if let Err(e) = self
                .deps
                .preferences
                .replace(user.user_id, user.email.as_deref(), preferences)
                .await
            {
                warn!("Failed to save preferences for user {}: {}", user.user_id, e);
            }
        }

        info!("Confirmed {} items on scan {}", confirmed, scan.id);

        Ok(ConfirmScanResponseDto {
            scan_id: scan.id,
            status: ScanStatus::Confirmed,
            confirmed_items: confirmed,
            message: "Scan confirmed successfully".into(),
        })
    }

    async fn find_scan(&self, user: &AuthenticatedUser, scan_id: Uuid) -> Result<Scan, DomainError> {
        self.deps
            .scans
            .find_for_user(scan_id, user.user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Scan not found".into()))
    }

    /// 校验或上传图片，返回对象键
    async fn resolve_image(
        &self,
        user: &AuthenticatedUser,
        source: ImageSource,
    ) -> Result<String, DomainError> {
        match source {
            ImageSource::Stored(key) => {
                if !key.starts_with(&user_prefix(user.user_id)) || key.contains("..") {
                    return Err(DomainError::Forbidden(
                        "Image does not belong to the caller".into(),
                    ));
                }
                Ok(key)
            }
            ImageSource::Inline(data) => {
                let (bytes, content_type) = decode_base64_image(&data)
                    .map_err(|e| DomainError::Validation(format!("Invalid image data: {}", e)))?;
                if bytes.is_empty() {
                    return Err(DomainError::Validation("Image data is empty".into()));
                }
                if bytes.len() > self.deps.max_image_bytes {
                    return Err(DomainError::PayloadTooLarge(format!(
                        "Image exceeds {} bytes",
                        self.deps.max_image_bytes
                    )));
                }
                let ext = extension_for(&content_type).ok_or_else(|| {
                    DomainError::Validation(format!("Unsupported content type: {}", content_type))
                })?;

                let key = upload_key(user.user_id, ext);
                self.deps.storage.put(&key, bytes, &content_type).await?;
                Ok(key)
            }
        }
    }

    /// 把识别结果映射到 FDC，单个标签失败时使用临时 ID
    async fn map_ingredients(
        &self,
        user: &AuthenticatedUser,
        scan: &Scan,
        detected: Vec<DetectedIngredient>,
    ) -> Vec<ScanItem> {
        let started = Instant::now();
        let labels: Vec<&str> = detected.iter().map(|d| d.label.as_str()).collect();
        let run = AgentRun::new(
            user.user_id,
            Some(scan.id),
            AgentRunType::MapFdc,
            "fdc-search",
            json!({ "labels": labels }),
        );

        // Lookups are independent; join_all keeps detection order
        let lookups = join_all(
            detected
                .iter()
                .map(|ingredient| self.deps.fdc_mapping.map_label(&ingredient.label)),
        )
        .await;

        let mut items = Vec::with_capacity(detected.len());
        let mut unmapped = 0usize;
        for (index, (ingredient, lookup)) in detected.into_iter().zip(lookups).enumerate() {
            let fdc_id = match lookup {
                Ok(found) => {
                    if found.fdc_id == PLACEHOLDER_FDC_ID {
                        unmapped += 1;
                    }
                    found.fdc_id
                }
                Err(e) => {
                    warn!("FDC mapping failed for {}: {}", ingredient.label, e);
                    unmapped += 1;
                    format!("temp_{}_{}", scan.id, index)
                }
            };
            items.push(ScanItem::detected(
                scan.id,
                ingredient.label,
                Some(fdc_id),
                ingredient.confidence,
            ));
        }

        let status = if unmapped == 0 {
            AgentRunStatus::Succeeded
        } else {
            AgentRunStatus::Fallback
        };
        let mapped: Vec<_> = items
            .iter()
            .map(|i| json!({ "label": i.label, "fdc_id": i.fdc_id }))
            .collect();
        self.record_run(run.finish(
            status,
            Some(json!({ "items": mapped })),
            None,
            started.elapsed(),
        ))
        .await;

        items
    }

    async fn mark_failed(&self, scan_id: Uuid) {
        if let Err(e) = self
            .deps
            .scans
            .update_status(scan_id, ScanStatus::Failed)
            .await
        {
            error!("Failed to mark scan {} as failed: {}", scan_id, e);
        }
    }

    async fn record_run(&self, run: AgentRun) {
        if let Err(e) = self.deps.agent_runs.record(&run).await {
            warn!("Failed to record {} agent run: {}", run.run_type, e);
        }
    }
}
