// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含数据库、Redis、服务器、对象存储、LLM、USDA 和菜谱默认值等配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// Redis配置
    #[serde(default)]
    pub redis: RedisSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 存储配置
    pub storage: StorageSettings,
    /// LLM 配置
    pub llm: LlmSettings,
    /// USDA FoodData Central 配置
    pub usda: UsdaSettings,
    /// 菜谱生成默认值
    pub recipes: RecipeSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// Redis配置设置
///
/// 未配置 URL 时使用进程内缓存
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedisSettings {
    /// Redis连接URL
    pub url: Option<String>,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 存储配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// 存储类型 (s3, memory)
    pub storage_type: String,
    /// S3 存储桶名称
    pub bucket: String,
    /// S3 区域
    pub region: String,
    /// S3 端点 (可选，用于 MinIO 等兼容服务)
    pub endpoint: Option<String>,
    /// S3 访问密钥
    pub access_key: Option<String>,
    /// S3 密钥
    pub secret_key: Option<String>,
    /// 预签名上传链接有效期（秒）
    pub presign_expiry_secs: u64,
    /// 允许的最大图片大小（字节）
    pub max_image_bytes: usize,
}

/// LLM 配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    /// OpenAI 兼容 API 基础 URL
    pub api_base_url: String,
    /// API 密钥，未配置时菜谱生成直接使用模板
    pub api_key: Option<String>,
    /// 文本模型
    pub text_model: String,
    /// 视觉模型
    pub vision_model: String,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

/// USDA FoodData Central 配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct UsdaSettings {
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// 标签映射缓存时间（秒）
    pub cache_ttl_secs: u64,
}

/// 菜谱默认值
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeSettings {
    pub default_servings: u32,
    pub default_cuisine: String,
    pub default_skill_level: String,
    pub default_meal_type: String,
    pub max_recipes: usize,
}

/// 指标导出配置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    pub enabled: bool,
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和 `AYEAYE__*` 环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder_with_defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("AYEAYE").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn builder_with_defaults(
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default DB pool settings
            .set_default("database.url", "sqlite::memory:")?
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 2)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default Storage settings
            .set_default("storage.storage_type", "s3")?
            .set_default("storage.bucket", "ayeaye-chef-uploads")?
            .set_default("storage.region", "us-east-1")?
            .set_default("storage.presign_expiry_secs", 300)?
            .set_default("storage.max_image_bytes", 5 * 1024 * 1024)?
            // Default LLM settings
            .set_default("llm.api_base_url", "https://api.openai.com/v1")?
            .set_default("llm.text_model", "gpt-4o-mini")?
            .set_default("llm.vision_model", "gpt-4o-mini")?
            .set_default("llm.timeout_secs", 30)?
            // Default USDA settings
            .set_default("usda.api_base_url", "https://api.nal.usda.gov/fdc/v1")?
            .set_default("usda.timeout_secs", 10)?
            .set_default("usda.cache_ttl_secs", 30 * 24 * 60 * 60)?
            // Default recipe settings
            .set_default("recipes.default_servings", 2)?
            .set_default("recipes.default_cuisine", "international")?
            .set_default("recipes.default_skill_level", "intermediate")?
            .set_default("recipes.default_meal_type", "lunch")?
            .set_default("recipes.max_recipes", 3)?
            // Default metrics settings
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_deserialize() {
        let settings: Settings = Settings::builder_with_defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.storage.presign_expiry_secs, 300);
        assert_eq!(settings.storage.max_image_bytes, 5 * 1024 * 1024);
        assert_eq!(settings.usda.cache_ttl_secs, 2_592_000);
        assert_eq!(settings.recipes.default_servings, 2);
        assert_eq!(settings.recipes.default_cuisine, "international");
        assert!(settings.redis.url.is_none());
        assert!(settings.llm.api_key.is_none());
        assert!(!settings.metrics.enabled);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let settings: Settings = Settings::builder_with_defaults()
            .unwrap()
            .set_override("recipes.default_servings", 4)
            .unwrap()
            .set_override("redis.url", "redis://127.0.0.1:6379")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.recipes.default_servings, 4);
        assert_eq!(settings.redis.url.as_deref(), Some("redis://127.0.0.1:6379"));
    }
}
