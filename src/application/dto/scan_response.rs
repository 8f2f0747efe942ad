// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::scan::{ScanItem, ScanStatus};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanItemDto {
    pub id: Uuid,
    pub label: String,
    pub confidence: f64,
    pub grams_est: f64,
    pub grams: Option<f64>,
    pub confirmed: bool,
    pub manually_added: bool,
    pub fdc_id: Option<String>,
}

impl From<ScanItem> for ScanItemDto {
    fn from(item: ScanItem) -> Self {
        Self {
            id: item.id,
            label: item.label,
            confidence: item.confidence,
            grams_est: item.grams_est,
            grams: item.grams,
            confirmed: item.confirmed,
            manually_added: item.manually_added,
            fdc_id: item.fdc_id,
        }
    }
}

/// 开始扫描响应
#[derive(Debug, Deserialize, Serialize)]
pub struct StartScanResponseDto {
    pub scan_id: Uuid,
    pub status: ScanStatus,
    pub ingredients_detected: usize,
    pub message: String,
    pub items: Vec<ScanItemDto>,
}

/// 扫描详情
#[derive(Debug, Deserialize, Serialize)]
pub struct ScanDetailDto {
    pub scan_id: Uuid,
    pub status: ScanStatus,
    pub requires_confirmation: bool,
    pub s3_key: String,
    pub servings: Option<i32>,
    pub created_at: DateTime<FixedOffset>,
    pub items: Vec<ScanItemDto>,
}

/// 确认扫描响应
#[derive(Debug, Deserialize, Serialize)]
pub struct ConfirmScanResponseDto {
    pub scan_id: Uuid,
    pub status: ScanStatus,
    pub confirmed_items: usize,
    pub message: String,
}
