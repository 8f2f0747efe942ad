// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod api_tests;
pub mod helpers;
pub mod llm_service_test;
pub mod meal_preferences_test;
pub mod recipe_test;
pub mod scan_flow_test;
pub mod usda_client_test;
