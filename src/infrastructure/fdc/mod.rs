// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// USDA FoodData Central 客户端
pub mod usda_client;

pub use usda_client::UsdaClient;
