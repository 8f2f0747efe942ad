// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
/// 包括错误类型、图片处理、令牌摘要与遥测初始化
pub mod errors;
pub mod image;
pub mod telemetry;
pub mod token;
