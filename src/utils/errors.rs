// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 缺少必需的环境变量
///
/// 启动阶段唯一不可恢复的错误，携带缺失变量的名称
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("missing required environment variable `{variable}`")]
pub struct MissingConfigError {
    /// 缺失的环境变量名
    pub variable: String,
}

impl MissingConfigError {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }
}

/// 配置解析错误类型
///
/// 所有变体都在启动阶段出现，进程必须拒绝启动
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Missing(#[from] MissingConfigError),

    #[error("unknown {kind} `{name}`")]
    UnknownComponent { kind: &'static str, name: String },

    #[error("invalid database url: {0}")]
    InvalidDatabaseUrl(String),

    #[error("invalid value for `{variable}`: {reason}")]
    InvalidValue { variable: String, reason: String },

    #[error("configuration source error: {0}")]
    Source(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SettingsError {
    /// 若为缺失变量错误，返回变量名
    pub fn missing_variable(&self) -> Option<&str> {
        match self {
            SettingsError::Missing(err) => Some(err.variable.as_str()),
            _ => None,
        }
    }
}
