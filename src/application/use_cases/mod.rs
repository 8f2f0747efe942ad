// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 用例模块
///
/// 编排领域服务与仓库，完成单个 HTTP 请求的业务流程
pub mod meal_use_case;
pub mod recipe_use_case;
pub mod scan_use_case;
pub mod upload_use_case;
