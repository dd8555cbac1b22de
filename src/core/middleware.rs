//! 核心中间件模块

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use std::time::Instant;
use tracing::{info, warn};

use super::error::ErrorResponse;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "POST, GET, OPTIONS, PUT, DELETE";
pub const ALLOW_HEADERS: &str =
    "Accept, Content-Type, Content-Length, Accept-Encoding, Authorization, X-CSRF-Token";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// 跨域中间件
///
/// 对所有响应（包括 OPTIONS 预检和错误响应）统一写入 CORS 头和 JSON 内容类型。
pub async fn cors_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(CONTENT_TYPE_JSON),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );

    response
}

/// 错误响应体统一中间件
///
/// 框架层生成的错误（如请求超时）没有 JSON 错误体，这里按状态码补成 `{"error": ...}`。
pub async fn error_body_middleware(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let error = status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_lowercase();
    warn!("Replacing non-JSON {} response body", status.as_u16());

    (status, Json(ErrorResponse { error })).into_response()
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with(CONTENT_TYPE_JSON))
}

/// 请求日志中间件
///
/// 服务端错误记为 warn，其余记为 info。
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let status = response.status().as_u16();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        warn!(%method, %path, status, elapsed_ms, "product request failed");
    } else {
        info!(%method, %path, status, elapsed_ms, "product request served");
    }

    response
}
