// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义 HTTP 请求与响应的结构
pub mod analysis_request;
pub mod meal_request;
pub mod preferences_request;
pub mod recipe_request;
pub mod recipe_response;
pub mod scan_request;
pub mod scan_response;
pub mod upload_request;
