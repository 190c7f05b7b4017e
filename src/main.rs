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

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{debug, error, info};

use yogayu::config::{DeploymentMode, EnvSnapshot, Settings};
use yogayu::infrastructure::database::connection;
use yogayu::presentation::routes;
use yogayu::presentation::state::AppState;
use yogayu::utils::telemetry;

/// 主函数
///
/// 解析配置失败时在绑定端口之前退出
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Capture environment once
    let env = EnvSnapshot::capture()?;

    // 2. Initialize logging
    telemetry::init_telemetry(DeploymentMode::detect(&env));
    info!("Starting yogayu...");

    // 3. Resolve configuration
    let settings = match Settings::resolve(&env) {
        Ok(settings) => Arc::new(settings),
        Err(e) => {
            error!(error = %e, variable = e.missing_variable(), "Refusing to start");
            return Err(e.into());
        }
    };
    info!(
        mode = %settings.mode,
        debug = settings.debug_enabled(),
        "Configuration loaded"
    );
    debug!(settings = %serde_json::to_string(settings.as_ref())?, "Resolved settings");

    // 4. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    info!("Database connection established");

    // 5. Start HTTP server
    let app = routes::routes(AppState {
        settings: settings.clone(),
        db: Arc::new(db),
    });

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
