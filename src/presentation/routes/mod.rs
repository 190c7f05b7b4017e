// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::State, routing::get, Json, Router};
use serde_json::Value;
use tower_http::trace::TraceLayer;

use crate::presentation::errors::AppError;
use crate::presentation::middleware::apply_pipeline;
use crate::presentation::openapi;
use crate::presentation::state::AppState;

/// 文档端点相对 API 前缀的路径
pub const SCHEMA_PATH: &str = "/schema";

/// 创建应用路由
///
/// # 返回值
///
/// 挂载了请求处理管线的路由
pub fn routes(state: AppState) -> Router {
    let schema_path = schema_path(&state);

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
        .route(&schema_path, get(schema));

    apply_pipeline(router, &state.settings)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn schema_path(state: &AppState) -> String {
    format!("{}{}", state.settings.api_prefix(), SCHEMA_PATH)
}

/// 健康检查端点
///
/// 数据库不可达时返回 503
pub async fn health_check(State(state): State<AppState>) -> Result<&'static str, AppError> {
    state.db.ping().await?;
    Ok("OK")
}

/// 版本信息端点
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// API 文档端点
pub async fn schema(State(state): State<AppState>) -> Json<Value> {
    let schema_path = schema_path(&state);
    let paths = vec![
        "/health".to_string(),
        "/version".to_string(),
        schema_path.clone(),
    ];
    Json(openapi::document(&state.settings.schema, &paths, &schema_path))
}
