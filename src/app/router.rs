//! 路由装配

use axum::{middleware, routing::any, Router};
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;

use super::product::handler::{handle_product, handle_products, AppState};
use crate::core::{
    error::ApiError,
    middleware::{cors_middleware, error_body_middleware, request_logging_middleware},
};

pub const PRODUCT_PATH: &str = "products";

/// 规范化 API 基础路径：保证以 `/` 开头，去掉结尾的 `/`，根路径返回空串
pub fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// 创建应用路由
///
/// 集合路径精确匹配，单项路径按前缀匹配后由处理器自行解析 id。
/// 中间件顺序（由外到内）：请求日志 → CORS → 错误响应体 → 请求超时。
pub fn create_router(state: AppState, base_path: &str, request_timeout: Duration) -> Router {
    let base = normalize_base_path(base_path);
    let collection_path = format!("{}/{}", base, PRODUCT_PATH);
    let item_path = format!("{}/*rest", collection_path);

    Router::new()
        .route(&collection_path, any(handle_products))
        .route(&item_path, any(handle_product))
        .fallback(not_found)
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(error_body_middleware))
        .layer(middleware::from_fn(cors_middleware))
        .layer(middleware::from_fn(request_logging_middleware))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("resource not found".to_string())
}
