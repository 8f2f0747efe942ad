// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTTP请求处理器模块
///
/// 每个处理器解析请求、调用用例并返回 JSON 响应
pub mod analysis_handler;
pub mod meal_handler;
pub mod preferences_handler;
pub mod recipe_handler;
pub mod scan_handler;
pub mod upload_handler;
