//! 配置加载
//!
//! 加载顺序：默认值 → TOML 配置文件 → 环境变量覆盖。

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "PRODUCT_API_CONFIG";

const DEFAULT_CONFIG_PATHS: [&str; 2] = ["config.toml", "./config/config.toml"];
const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 服务配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// HTTP 服务端口
    pub port: u16,
    /// API 基础路径
    pub base_path: String,
    /// 单个请求的总超时时间（秒）
    pub request_timeout_seconds: u64,
}

/// 数据库连接池配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 连接字符串
    pub url: String,
    /// 最大打开连接数
    pub max_open_connections: u32,
    /// 保留的空闲连接数
    pub max_idle_connections: u32,
    /// 连接最长存活时间（秒）
    pub max_lifetime_seconds: u64,
    /// 从连接池获取连接的超时时间（秒）
    pub acquire_timeout_seconds: u64,
    /// 单条语句超时时间（毫秒）
    pub query_timeout_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
            base_path: "/api".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "mysql://root@127.0.0.1:3306/products".to_string(),
            max_open_connections: 10,
            max_idle_connections: 10,
            max_lifetime_seconds: 180,
            acquire_timeout_seconds: 3,
            query_timeout_ms: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl HttpConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.bind_address, self.port);
        addr.parse()
            .map_err(|_| ConfigError::Validation(format!("无效的监听地址: {}", addr)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl DatabaseConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_seconds)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds)
    }
}

impl Config {
    /// 从配置文件（如存在）和环境变量加载配置，并完成校验
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load_from_file(path)?,
            Err(_) => DEFAULT_CONFIG_PATHS
                .iter()
                .find(|path| Path::new(path).exists())
                .map(Self::load_from_file)
                .transpose()?
                .unwrap_or_default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 用环境变量覆盖配置项
    ///
    /// `lookup` 通常是 `std::env::var`，测试中可以传入任意映射。
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = lookup("HTTP_BIND_ADDRESS") {
            self.http.bind_address = v;
        }
        if let Some(v) = lookup("API_BASE_PATH") {
            self.http.base_path = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            self.logging.level = v.to_lowercase();
        }

        override_parsed(&lookup, "PORT", &mut self.http.port)?;
        override_parsed(
            &lookup,
            "HTTP_REQUEST_TIMEOUT_SECS",
            &mut self.http.request_timeout_seconds,
        )?;
        override_parsed(
            &lookup,
            "DB_MAX_OPEN_CONNS",
            &mut self.database.max_open_connections,
        )?;
        override_parsed(
            &lookup,
            "DB_MAX_IDLE_CONNS",
            &mut self.database.max_idle_connections,
        )?;
        override_parsed(
            &lookup,
            "DB_CONN_MAX_LIFETIME_SECS",
            &mut self.database.max_lifetime_seconds,
        )?;
        override_parsed(
            &lookup,
            "DB_ACQUIRE_TIMEOUT_SECS",
            &mut self.database.acquire_timeout_seconds,
        )?;
        override_parsed(
            &lookup,
            "DB_QUERY_TIMEOUT_MS",
            &mut self.database.query_timeout_ms,
        )?;

        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation("HTTP端口必须大于0".to_string()));
        }
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Validation("绑定地址不能为空".to_string()));
        }
        if self.http.request_timeout_seconds == 0 {
            return Err(ConfigError::Validation("请求超时必须大于0".to_string()));
        }

        if self.database.url.is_empty() {
            return Err(ConfigError::Validation("数据库连接字符串不能为空".to_string()));
        }
        if self.database.max_open_connections == 0 {
            return Err(ConfigError::Validation("最大连接数必须大于0".to_string()));
        }
        if self.database.max_idle_connections > self.database.max_open_connections {
            return Err(ConfigError::Validation(format!(
                "空闲连接数 {} 不能超过最大连接数 {}",
                self.database.max_idle_connections, self.database.max_open_connections
            )));
        }
        if self.database.query_timeout_ms == 0 {
            return Err(ConfigError::Validation("查询超时必须大于0".to_string()));
        }

        if !VALID_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, VALID_LEVELS
            )));
        }

        Ok(())
    }
}

fn override_parsed<F, T>(lookup: &F, key: &str, target: &mut T) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(value) = lookup(key) {
        *target = value.trim().parse().map_err(|_| ConfigError::Env {
            key: key.to_string(),
            value,
        })?;
    }
    Ok(())
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("环境变量 {key} 的值无效: {value}")]
    Env { key: String, value: String },
    #[error("配置验证错误: {0}")]
    Validation(String),
}
