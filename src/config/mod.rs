// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 在启动时从环境快照解析出不可变的应用配置，包括安全策略、数据库、存储、文档等
pub mod components;
pub mod database;
pub mod environment;
pub mod security;
pub mod settings;

pub use environment::{DeploymentMode, EnvSnapshot};
pub use settings::Settings;
