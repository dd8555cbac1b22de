//! 数据库基础设施

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::info;

use super::config::DatabaseConfig;

pub struct DatabaseManager {
    pool: MySqlPool,
}

impl DatabaseManager {
    /// 按配置创建连接池
    ///
    /// 连接在第一次使用时才建立，数据库不可达时服务仍可启动，
    /// 具体的查询会以存储错误失败。
    pub fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = Self::pool_options(config).connect_lazy(&config.url)?;

        info!(
            "Database pool configured: max_open={} max_idle={} max_lifetime={:?}",
            config.max_open_connections,
            config.max_idle_connections,
            config.max_lifetime()
        );

        Ok(Self { pool })
    }

    fn pool_options(config: &DatabaseConfig) -> MySqlPoolOptions {
        MySqlPoolOptions::new()
            .max_connections(config.max_open_connections)
            .min_connections(config.max_idle_connections.min(config.max_open_connections))
            .max_lifetime(config.max_lifetime())
            .acquire_timeout(config.acquire_timeout())
    }

    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// 关闭连接池，等待已借出的连接归还
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lazy_pool_does_not_connect() {
        let config = DatabaseConfig {
            url: "mysql://root@127.0.0.1:1/products".to_string(),
            max_open_connections: 4,
            max_idle_connections: 0,
            ..DatabaseConfig::default()
        };

        let manager = DatabaseManager::new(&config).unwrap();
        assert!(!manager.get_pool().is_closed());

        manager.close().await;
        assert!(manager.get_pool().is_closed());
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected() {
        let config = DatabaseConfig {
            url: "not-a-url".to_string(),
            ..DatabaseConfig::default()
        };
        assert!(DatabaseManager::new(&config).is_err());
    }
}
