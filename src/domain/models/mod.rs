// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 用户（user）：饮食偏好与已认证调用者
/// - 扫描（scan）：食材照片、识别条目及其状态
/// - 菜谱（recipe）：生成的菜谱与持久化记录
/// - 用餐（meal）：用户的用餐日志
/// - AI 调用（agent_run）：每次模型调用的审计记录
/// - 营养（nutrition）与食材（ingredient）：计算用的值对象
pub mod agent_run;
pub mod ingredient;
pub mod meal;
pub mod nutrition;
pub mod recipe;
pub mod scan;
pub mod user;
