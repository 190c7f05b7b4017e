// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Settings;

/// 应用共享状态
///
/// 配置在启动后不再修改，多个工作线程共享同一份
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub db: Arc<DatabaseConnection>,
}
