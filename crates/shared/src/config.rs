//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// 服务配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// 测验策略配置
///
/// 通过阈值与题目数量边界可按环境调整，无需改代码
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// 及格分数线（百分比，0-100）
    pub pass_threshold: u32,
    /// 单次测验最少题目数
    pub min_questions: usize,
    /// 单次测验最多题目数
    pub max_questions: usize,
    /// 未提交的测验会话保留时长（秒），超时丢弃
    pub session_ttl_seconds: u64,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            pass_threshold: 30,
            min_questions: 3,
            max_questions: 10,
            session_ttl_seconds: 900,
        }
    }
}

/// 外部出题服务配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentProviderConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_seconds: u64,
}

impl Default for ContentProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.perplexity.ai/chat/completions".to_string(),
            api_key: None,
            model: "sonar-pro".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// 单条链的配置
///
/// 每条链一个独立的适配器实例，由 name 选择
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// 链名称（如 ethereum、blockdag）
    pub name: String,
    /// 合约 owner 身份
    pub owner: String,
    /// 后端铸造身份（启动时由 owner 授权）
    pub minter: String,
}

/// 凭证发放配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IssuerConfig {
    /// 目标链列表
    pub chains: Vec<ChainConfig>,
    /// 徽章元数据 URI 前缀
    pub metadata_base_url: String,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            chains: vec![
                ChainConfig {
                    name: "ethereum".to_string(),
                    owner: "operator".to_string(),
                    minter: "backend-minter".to_string(),
                },
                ChainConfig {
                    name: "blockdag".to_string(),
                    owner: "operator".to_string(),
                    minter: "backend-minter".to_string(),
                },
            ],
            metadata_base_url: "https://defiquest.example.com/metadata".to_string(),
        }
    }
}

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// 日志输出格式：json（结构化）或 pretty（人类可读）
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub server: ServerConfig,
    pub quiz: QuizConfig,
    pub content_provider: ContentProviderConfig,
    pub issuer: IssuerConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. 环境变量（QUEST_ 前缀，双下划线分隔层级，
    ///    如 QUEST_SERVER__PORT -> server.port，
    ///    QUEST_QUIZ__PASS_THRESHOLD -> quiz.pass_threshold；
    ///    配置键本身含下划线，单下划线不能用作层级分隔符）
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("QUEST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env.clone())?
            .add_source(File::from(Path::new(&config_dir).join("default.toml")).required(false))
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", env))).required(false),
            )
            .add_source(
                Environment::with_prefix("QUEST")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 获取服务地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
