// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务规则：
/// - 食材识别（ingredient_detection_service）：把图像标签和包装文字归并为食材
/// - FDC 映射（fdc_mapping_service）：标签到 FoodData Central ID
/// - 营养（nutrition_service）：按克数汇总营养成分
/// - 食材分析（ingredient_analysis_service）：类别、做法与菜谱类别推荐
/// - 偏好（preference_service）：偏好视图与生成参数调和
/// - 菜谱生成（recipe_generation_service）与兜底模板（recipe_templates）
/// - LLM服务（llm_service）：OpenAI 兼容的对话补全客户端
pub mod fdc_mapping_service;
pub mod ingredient_analysis_service;
pub mod ingredient_detection_service;
pub mod llm_service;
pub mod nutrition_service;
pub mod preference_service;
pub mod recipe_generation_service;
pub mod recipe_templates;
