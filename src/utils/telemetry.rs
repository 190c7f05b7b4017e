// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::DeploymentMode;

/// 未设置 `RUST_LOG` 时的默认过滤规则
pub const DEFAULT_FILTER: &str = "info,yogayu=debug,tower_http=debug";

/// 初始化日志
///
/// 托管模式输出 JSON 行，便于平台日志收集；本地模式输出可读文本。
/// 重复调用时保留第一次安装的订阅者。
pub fn init_telemetry(mode: DeploymentMode) {
    let (json, pretty) = match mode {
        DeploymentMode::Hosted => (Some(tracing_subscriber::fmt::layer().json()), None),
        DeploymentMode::Local => (None, Some(tracing_subscriber::fmt::layer())),
    };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(json)
        .with(pretty)
        .try_init();
}
