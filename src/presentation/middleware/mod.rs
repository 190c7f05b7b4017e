// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 中间件模块
///
/// 根据配置中的请求处理管线挂载 HTTP 层
pub mod security;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::debug;

use crate::config::components::{Component, MiddlewareStage};
use crate::config::Settings;

/// 按管线顺序挂载中间件，列表中靠前的阶段位于外层
pub fn apply_pipeline<S>(mut router: Router<S>, settings: &Arc<Settings>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    for stage in settings.middleware.iter().rev() {
        router = match stage {
            MiddlewareStage::Security => router.layer(axum::middleware::from_fn_with_state(
                settings.clone(),
                security::security_middleware,
            )),
            MiddlewareStage::Clickjacking => router.layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("DENY"),
            )),
            other => {
                debug!(stage = other.name(), "Stage has no HTTP layer");
                router
            }
        };
    }
    router
}
