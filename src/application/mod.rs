// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含 DTO、用例以及把它们组装在一起的服务容器
pub mod container;
pub mod dto;
pub mod use_cases;
