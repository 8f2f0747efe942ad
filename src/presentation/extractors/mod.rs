// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 请求提取器模块
///
/// 从HTTP请求中提取已认证的调用者
pub mod current_user;

pub use current_user::CurrentUser;
