// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::domain::models::ingredient::ImageSignals;
use crate::domain::services::ingredient_detection_service::ImageLabeler;
use crate::domain::services::llm_service::{
    extract_json_object, ChatRequest, ImageAttachment, LlmClient,
};

const LABELER_SYSTEM_PROMPT: &str = "You are an image labeling service for a cooking app. \
Describe what is visible in the photo. Respond with JSON only.";

const LABELER_USER_PROMPT: &str = r#"List the objects visible in this photo and any readable text printed on packaging.
Return JSON with this exact shape:
{"labels": [{"text": "Banana", "confidence": 0.97}], "text": [{"text": "ORGANIC", "confidence": 0.9}]}
Use confidence between 0 and 1. Use singular, generic object names. Return at most 20 labels."#;

const LABELER_MAX_TOKENS: u32 = 800;

/// 基于视觉模型的图像标注
///
/// 输出与传统标注服务相同的信号结构，食材判断交给规则引擎
pub struct LlmImageLabeler {
    llm: Arc<dyn LlmClient>,
}

impl LlmImageLabeler {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

/// 解析模型输出中的标注 JSON
pub fn parse_signals(content: &str) -> Result<ImageSignals> {
    let value = extract_json_object(content)
        .ok_or_else(|| anyhow!("Image labeler returned no JSON object"))?;
    let signals: ImageSignals = serde_json::from_value(value)?;
    Ok(ImageSignals {
        labels: signals
            .labels
            .into_iter()
            .filter(|l| !l.text.trim().is_empty())
            .collect(),
        text: signals
            .text
            .into_iter()
            .filter(|t| !t.text.trim().is_empty())
            .collect(),
    })
}

#[async_trait]
impl ImageLabeler for LlmImageLabeler {
    fn model(&self) -> &str {
        self.llm.model()
    }

    async fn label(&self, image: &[u8], content_type: &str) -> Result<ImageSignals> {
        let request = ChatRequest::new(LABELER_SYSTEM_PROMPT, LABELER_USER_PROMPT)
            .with_image(ImageAttachment {
                content_type: content_type.to_string(),
                data: image.to_vec(),
            })
            .with_max_tokens(LABELER_MAX_TOKENS);

        let response = self.llm.complete(request).await?;
        debug!(
            tokens = response.usage.total_tokens,
            "Image labeler completion received"
        );
        parse_signals(&response.content)
    }
}
