// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 未经用户确认时每个食材的默认估计克数
pub const DEFAULT_GRAMS_ESTIMATE: f64 = 100.0;

/// 扫描实体
///
/// 一张用户上传的食材照片及其识别记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scan {
    pub id: Uuid,
    pub user_id: Uuid,
    /// 对象存储中的图片键
    pub s3_key: String,
    pub status: ScanStatus,
    /// 确认时用户选择的份数
    pub servings: Option<i32>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl Scan {
    /// 创建处于 processing 状态的新扫描
    pub fn new(user_id: Uuid, s3_key: String) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            user_id,
            s3_key,
            status: ScanStatus::Processing,
            servings: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 扫描是否等待用户确认
    pub fn requires_confirmation(&self) -> bool {
        self.status == ScanStatus::Ready
    }
}

/// 扫描状态
///
/// 状态转换：
/// Processing → Ready → Confirmed (可重复确认)
/// Processing → Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    /// 正在识别
    #[default]
    Processing,
    /// 识别完成，等待确认
    Ready,
    /// 用户已确认
    Confirmed,
    /// 识别失败
    Failed,
}

impl ScanStatus {
    /// 当前状态是否允许确认
    pub fn can_confirm(&self) -> bool {
        matches!(self, ScanStatus::Ready | ScanStatus::Confirmed)
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScanStatus::Processing => write!(f, "processing"),
            ScanStatus::Ready => write!(f, "ready"),
            ScanStatus::Confirmed => write!(f, "confirmed"),
            ScanStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for ScanStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(ScanStatus::Processing),
            "ready" => Ok(ScanStatus::Ready),
            "confirmed" => Ok(ScanStatus::Confirmed),
            "failed" => Ok(ScanStatus::Failed),
            _ => Err(()),
        }
    }
}

/// 扫描条目
///
/// 识别出的或用户手动添加的单个食材
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanItem {
    pub id: Uuid,
    pub scan_id: Uuid,
    pub label: String,
    /// USDA FoodData Central ID，映射失败时为占位 ID
    pub fdc_id: Option<String>,
    pub confidence: f64,
    pub grams_est: f64,
    /// 用户确认的克数，confirmed 为 true 时必须存在
    pub grams: Option<f64>,
    pub confirmed: bool,
    pub manually_added: bool,
    pub created_at: DateTime<FixedOffset>,
}

impl ScanItem {
    /// 创建识别得到的未确认条目
    pub fn detected(scan_id: Uuid, label: String, fdc_id: Option<String>, confidence: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            scan_id,
            label,
            fdc_id,
            confidence,
            grams_est: DEFAULT_GRAMS_ESTIMATE,
            grams: None,
            confirmed: false,
            manually_added: false,
            created_at: Utc::now().into(),
        }
    }

    /// 创建用户手动添加并已确认的条目
    pub fn manual(scan_id: Uuid, label: String, fdc_id: Option<String>, grams: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            scan_id,
            label,
            fdc_id,
            confidence: 1.0,
            grams_est: grams,
            grams: Some(grams),
            confirmed: true,
            manually_added: true,
            created_at: Utc::now().into(),
        }
    }
}

/// 对单个扫描条目的确认操作
#[derive(Debug, Clone, PartialEq)]
pub enum ItemConfirmation {
    /// 按条目 ID 确认已有条目
    ById { id: Uuid, label: Option<String>, grams: f64 },
    /// 按 FDC ID 确认已有条目
    ByFdcId { fdc_id: String, label: Option<String>, grams: f64 },
    /// 插入新的手动条目
    Manual { label: String, fdc_id: Option<String>, grams: f64 },
}
