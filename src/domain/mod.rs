// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// - 领域模型（models）：用户、扫描、食材、营养、菜谱、用餐与 AI 调用记录
/// - 仓库接口（repositories）：持久化、对象存储、食物数据源与标签缓存的抽象
/// - 服务（services）：识别规则、FDC 映射、营养计算与菜谱生成
pub mod models;
pub mod repositories;
pub mod services;
