// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Path},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::dto::scan_request::{ConfirmScanRequestDto, StartScanRequestDto};
use crate::application::dto::scan_response::{
    ConfirmScanResponseDto, ScanDetailDto, StartScanResponseDto,
};
use crate::application::use_cases::scan_use_case::ScanUseCase;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::CurrentUser;

/// 开始扫描：识别食材并映射 FDC
pub async fn start_scan(
    Extension(use_case): Extension<Arc<ScanUseCase>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<StartScanRequestDto>,
) -> Result<Json<StartScanResponseDto>, AppError> {
    Ok(Json(use_case.start_scan(&user, payload).await?))
}

/// 获取扫描详情
pub async fn get_scan(
    Extension(use_case): Extension<Arc<ScanUseCase>>,
    CurrentUser(user): CurrentUser,
    Path(scan_id): Path<Uuid>,
) -> Result<Json<ScanDetailDto>, AppError> {
    Ok(Json(use_case.get_scan(&user, scan_id).await?))
}

/// 确认扫描
pub async fn confirm_scan(
    Extension(use_case): Extension<Arc<ScanUseCase>>,
    CurrentUser(user): CurrentUser,
    Path(scan_id): Path<Uuid>,
    Json(payload): Json<ConfirmScanRequestDto>,
) -> Result<Json<ConfirmScanResponseDto>, AppError> {
    Ok(Json(use_case.confirm_scan(&user, scan_id, payload).await?))
}
