//! # 产品 CRUD 服务
//!
//! 基于 Axum 和 SQLx 的最小产品服务，包括：
//! - 单表 `product` 的列表、按 id 查询和创建
//! - 统一的 CORS 中间件和 JSON 错误响应
//! - 可配置的连接池、基础路径和查询超时

pub mod app;
pub mod core;
pub mod infrastructure;

pub use crate::app::product::handler::AppState;
pub use crate::app::product::model::{NewProduct, Product};
pub use crate::app::product::store::{MySqlProductStore, ProductStore, StoreError};
pub use crate::app::router::create_router;
pub use crate::core::error::ApiError;
pub use crate::infrastructure::config::{Config, ConfigError};
