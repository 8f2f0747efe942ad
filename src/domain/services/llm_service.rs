// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::settings::LlmSettings;

static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("Failed to compile JSON object regex"));

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// 随提示词一起发送的图片
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub content_type: String,
    pub data: Vec<u8>,
}

/// 一次对话补全请求
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub image: Option<ImageAttachment>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            image: None,
            max_tokens: 2000,
            temperature: 0.3,
        }
    }

    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub usage: TokenUsage,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 使用的模型名称，写入审计记录
    fn model(&self) -> &str;

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;
}

/// 从模型输出中截取最外层的 JSON 对象
///
/// 模型经常在 JSON 前后附带说明文字或 markdown 代码块
pub fn extract_json_object(text: &str) -> Option<Value> {
    let matched = JSON_OBJECT.find(text)?;
    serde_json::from_str::<Value>(matched.as_str()).ok()
}

/// LLM服务 - 处理与 OpenAI 兼容提供商的交互
///
/// # 功能
///
/// 发送对话补全请求，支持附带一张图片（视觉模型）
///
/// # 配置
///
/// 通过 `llm` 配置节设置 API 基础 URL、密钥、模型与超时
pub struct LlmService {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    api_base_url: String,
}

#[async_trait]
impl LlmClient for LlmService {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        LlmService::complete(self, request).await
    }
}

impl LlmService {
    /// 创建 LLM 服务
    ///
    /// # 参数
    ///
    /// * `settings` - LLM 配置
    /// * `model` - 使用的模型（文本或视觉）
    pub fn new(settings: &LlmSettings, model: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build LLM HTTP client")?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: model.to_string(),
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 是否配置了 API 密钥
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// 发送对话补全请求
    ///
    /// # 参数
    /// * `request` - 系统提示词、用户提示词以及可选的图片
    ///
    /// # 返回值
    /// * `Result<ChatResponse>` - 模型输出文本和令牌使用情况
    ///
    /// # 错误
    /// * 当LLM API密钥未配置时返回错误
    /// * 当LLM服务调用失败或返回格式异常时返回错误
    pub async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("LLM API key not configured"))?;

        let user_content = match &request.image {
            Some(image) => {
                let encoded = base64::engine::general_purpose::STANDARD.encode(&image.data);
                json!([
                    { "type": "text", "text": request.user },
                    {
                        "type": "image_url",
                        "image_url": {
                            "url": format!("data:{};base64,{}", image.content_type, encoded)
                        }
                    }
                ])
            }
            None => Value::String(request.user.clone()),
        };

        let request_body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": user_content }
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature
        });

        let url = format!("{}/chat/completions", self.api_base_url);
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .context("Failed to send request to LLM API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "LLM API returned error: {} - {}",
                status,
                error_text
            ));
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse LLM API response")?;

        let usage = if let Some(usage_val) = body.get("usage") {
            TokenUsage {
                prompt_tokens: usage_val["prompt_tokens"].as_u64().unwrap_or(0) as u32,
                completion_tokens: usage_val["completion_tokens"].as_u64().unwrap_or(0) as u32,
                total_tokens: usage_val["total_tokens"].as_u64().unwrap_or(0) as u32,
            }
        } else {
            TokenUsage::default()
        };

        match body["choices"][0]["message"]["content"].as_str() {
            Some(content) if !content.trim().is_empty() => Ok(ChatResponse {
                content: content.to_string(),
                usage,
            }),
            Some(_) => Err(anyhow::anyhow!("LLM API returned an empty completion")),
            None => Err(anyhow::anyhow!("Invalid response format from LLM API")),
        }
    }
}
