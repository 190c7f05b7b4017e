// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::config::security::HostedSecurity;
use crate::config::Settings;

/// 安全中间件
///
/// 托管模式下依次执行：主机名校验（400）、HTTPS 重定向（301）、
/// 对安全请求追加 HSTS 头。两种模式都会追加 `nosniff` 与 `Referrer-Policy`。
///
/// # 参数
///
/// * `settings` - 应用配置
/// * `req` - HTTP请求
/// * `next` - 下一个中间件
pub async fn security_middleware(
    State(settings): State<Arc<Settings>>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = match settings.security.hosted() {
        Some(hosted) => match enforce_hosted(hosted, req, next).await {
            Ok(response) | Err(response) => response,
        },
        None => next.run(req).await,
    };

    let headers = response.headers_mut();
    headers
        .entry(header::X_CONTENT_TYPE_OPTIONS)
        .or_insert(HeaderValue::from_static("nosniff"));
    headers
        .entry(header::REFERRER_POLICY)
        .or_insert(HeaderValue::from_static("same-origin"));
    response
}

async fn enforce_hosted(
    hosted: &HostedSecurity,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let raw = request_host(&req).unwrap_or_default();
    let Some(host) = hosted.validated_host(&raw) else {
        warn!(host = %raw, "Rejected request for invalid or disallowed host");
        return Err((StatusCode::BAD_REQUEST, "Bad Request (400)").into_response());
    };

    let secure = is_secure(hosted, &req);
    if hosted.ssl_redirect && !secure {
        let path = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let location = format!("https://{host}{path}");
        debug!(location = %location, "Redirecting to HTTPS");
        return Err((
            StatusCode::MOVED_PERMANENTLY,
            [(header::LOCATION, location)],
        )
            .into_response());
    }

    let mut response = next.run(req).await;
    if secure {
        if let Some(value) = hosted
            .hsts_header()
            .and_then(|v| HeaderValue::from_str(&v).ok())
        {
            response
                .headers_mut()
                .entry(header::STRICT_TRANSPORT_SECURITY)
                .or_insert(value);
        }
    }
    Ok(response)
}

fn request_host(req: &Request) -> Option<String> {
    req.headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| req.uri().authority().map(|a| a.to_string()))
}

/// 请求是否经由 HTTPS 到达，以受信代理头为准
fn is_secure(hosted: &HostedSecurity, req: &Request) -> bool {
    if req.uri().scheme_str() == Some("https") {
        return true;
    }
    let proxy = &hosted.proxy_ssl_header;
    req.headers()
        .get(proxy.header_name().as_str())
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == proxy.secure_value)
}
