//! 产品处理器
//!
//! 集合端点 `{base}/products` 支持列表和创建，单项端点 `{base}/products/{id}`
//! 支持按 id 查询。方法分派通过 `RequestMethod` 穷举匹配，未列出的方法统一返回 405。

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::{model::NewProduct, store::ProductStore};
use crate::core::{error::ApiError, response::CreatedResponse};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }
}

/// 处理器关心的请求方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Options,
    Other,
}

impl From<&Method> for RequestMethod {
    fn from(method: &Method) -> Self {
        match *method {
            Method::GET => RequestMethod::Get,
            Method::POST => RequestMethod::Post,
            Method::OPTIONS => RequestMethod::Options,
            _ => RequestMethod::Other,
        }
    }
}

/// 集合端点：GET 列表，POST 创建，OPTIONS 预检
pub async fn handle_products(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    match RequestMethod::from(&method) {
        RequestMethod::Get => {
            let products = state.store.list_all().await?;
            debug!("Listed {} products", products.len());
            Ok(Json(products).into_response())
        }
        RequestMethod::Post => {
            let body = body.map_err(|e| {
                warn!("Failed to read product payload: {}", e);
                ApiError::BadRequest("invalid product payload".to_string())
            })?;
            let new_product: NewProduct = serde_json::from_slice(&body).map_err(|e| {
                warn!("Rejected product payload: {}", e);
                ApiError::BadRequest("invalid product payload".to_string())
            })?;

            // 插入失败一律按客户端错误返回
            let id = state.store.insert(&new_product).await.map_err(|e| {
                error!("Failed to insert product: {}", e);
                ApiError::BadRequest("failed to create product".to_string())
            })?;

            info!("Created product: {} ({})", new_product.name, id);
            Ok((StatusCode::CREATED, Json(CreatedResponse { id })).into_response())
        }
        RequestMethod::Options => Ok(StatusCode::OK.into_response()),
        RequestMethod::Other => Err(ApiError::MethodNotAllowed),
    }
}

/// 单项端点：GET 按 id 查询
pub async fn handle_product(
    State(state): State<AppState>,
    method: Method,
    rest: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    // 无法解码的路径片段同样按不存在处理
    let Path(rest) = rest.map_err(|e| {
        warn!("Undecodable product path: {}", e);
        ApiError::NotFound("product not found".to_string())
    })?;
    let id = parse_product_id(&rest)?;

    match RequestMethod::from(&method) {
        RequestMethod::Get => match state.store.get_by_id(id).await? {
            Some(product) => Ok(Json(product).into_response()),
            None => Err(ApiError::NotFound(format!("product {} not found", id))),
        },
        RequestMethod::Options => Ok(StatusCode::OK.into_response()),
        RequestMethod::Post | RequestMethod::Other => Err(ApiError::MethodNotAllowed),
    }
}

/// 解析 `products/` 之后的路径片段
///
/// 第一段无法解析为非负整数时视为不存在，返回 404；
/// 合法 id 之后还有路径段时返回 400。
pub fn parse_product_id(tail: &str) -> Result<i64, ApiError> {
    let (segment, extra) = match tail.split_once('/') {
        Some((segment, extra)) => (segment, Some(extra)),
        None => (tail, None),
    };

    let id = segment
        .parse::<i64>()
        .ok()
        .filter(|id| *id >= 0)
        .ok_or_else(|| {
            warn!("Invalid product id: {:?}", tail);
            ApiError::NotFound(format!("product {} not found", segment))
        })?;

    if extra.is_some() {
        return Err(ApiError::BadRequest(
            "unexpected path segments after product id".to_string(),
        ));
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_method_taxonomy() {
        assert_eq!(RequestMethod::from(&Method::GET), RequestMethod::Get);
        assert_eq!(RequestMethod::from(&Method::POST), RequestMethod::Post);
        assert_eq!(RequestMethod::from(&Method::OPTIONS), RequestMethod::Options);
        assert_eq!(RequestMethod::from(&Method::PUT), RequestMethod::Other);
        assert_eq!(RequestMethod::from(&Method::HEAD), RequestMethod::Other);
    }

    #[test]
    fn test_parse_product_id() {
        assert_eq!(parse_product_id("1").unwrap(), 1);
        assert_eq!(parse_product_id("0").unwrap(), 0);

        assert!(matches!(parse_product_id("abc"), Err(ApiError::NotFound(_))));
        assert!(matches!(parse_product_id("-3"), Err(ApiError::NotFound(_))));
        assert!(matches!(parse_product_id(""), Err(ApiError::NotFound(_))));
        assert!(matches!(parse_product_id("/42"), Err(ApiError::NotFound(_))));
        assert!(matches!(parse_product_id("abc/def"), Err(ApiError::NotFound(_))));
        assert!(matches!(
            parse_product_id("99999999999999999999"),
            Err(ApiError::NotFound(_))
        ));

        assert!(matches!(parse_product_id("1/extra"), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_product_id("1/"), Err(ApiError::BadRequest(_))));
    }
}
