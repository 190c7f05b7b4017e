// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::database::DatabaseSettings;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::debug;

/// 由数据库配置生成连接选项
///
/// TLS 与语句缓存参数已经编码在连接 URL 中
pub fn connect_options(settings: &DatabaseSettings) -> ConnectOptions {
    let mut opt = ConnectOptions::new(settings.connection_url());

    opt.test_before_acquire(settings.conn_health_checks);

    if settings.conn_max_age > 0 {
        opt.max_lifetime(Duration::from_secs(settings.conn_max_age));
    } else {
        // No persistent connections
        opt.min_connections(0);
    }

    opt.sqlx_logging(true);
    opt
}

/// 创建数据库连接池
///
/// # 参数
///
/// * `settings` - 数据库配置
///
/// # 返回值
///
/// * `Ok(DatabaseConnection)` - 数据库连接
/// * `Err(DbErr)` - 连接过程中出现的错误
pub async fn create_pool(settings: &DatabaseSettings) -> Result<DatabaseConnection, DbErr> {
    debug!(
        engine = ?settings.engine,
        name = %settings.name,
        ssl_required = settings.ssl_required(),
        "Connecting to database"
    );
    Database::connect(connect_options(settings)).await
}
