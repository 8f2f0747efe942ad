// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，负责与外部系统交互。
///
/// 包含的子模块：
/// - 缓存（cache）：FDC 标签映射缓存，Redis 或进程内实现
/// - 数据库（database）：数据库连接和实体映射
/// - FDC（fdc）：USDA FoodData Central 客户端
/// - 指标（metrics）：Prometheus 指标导出
/// - 仓库实现（repositories）：领域仓库接口的数据库实现
/// - 存储（storage）：图片对象存储
/// - 视觉（vision）：图像标注实现
pub mod cache;
pub mod database;
pub mod fdc;
pub mod metrics;
pub mod repositories;
pub mod storage;
pub mod vision;
