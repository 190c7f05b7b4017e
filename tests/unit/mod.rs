// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod utils;

use yogayu::config::settings::{SECRET_KEY_VAR, STORAGE_BUCKET_VAR, STORAGE_REGION_VAR};
use yogayu::config::EnvSnapshot;

/// 只包含必需变量的本地环境
pub fn local_vars() -> Vec<(String, String)> {
    vec![
        (SECRET_KEY_VAR.to_string(), "test-secret".to_string()),
        (STORAGE_BUCKET_VAR.to_string(), "yogayu-media".to_string()),
        (STORAGE_REGION_VAR.to_string(), "ap-northeast-1".to_string()),
    ]
}

/// 托管平台环境
pub fn hosted_vars() -> Vec<(String, String)> {
    let mut vars = local_vars();
    vars.push(("DYNO".to_string(), "web.1".to_string()));
    vars
}

pub fn snapshot(vars: Vec<(String, String)>) -> EnvSnapshot {
    EnvSnapshot::from_vars(vars)
}
