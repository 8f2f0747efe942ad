// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 图像标注实现
pub mod llm_image_labeler;

pub use llm_image_labeler::LlmImageLabeler;
