// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::utils::errors::MissingConfigError;

/// 平台标记变量，存在即表示运行在托管平台上
pub const PLATFORM_MARKER: &str = "DYNO";

/// 持续集成标记变量，存在时抑制托管模式检测
pub const CI_MARKER: &str = "CI";

/// 环境变量快照
///
/// 启动时读取一次，之后只读。测试可以直接从字面量构造，
/// 不需要修改进程环境。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
    base_dir: PathBuf,
}

impl EnvSnapshot {
    /// 从当前进程环境和工作目录捕获快照
    ///
    /// 非 UTF-8 的变量会被忽略
    pub fn capture() -> std::io::Result<Self> {
        let base_dir = std::env::current_dir()?;
        Ok(Self::from_vars(std::env::vars_os().filter_map(|(k, v)| {
            Some((k.into_string().ok()?, v.into_string().ok()?))
        }))
        .with_base_dir(base_dir))
    }

    /// 从任意键值对构造快照，基础目录默认为 `.`
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            base_dir: PathBuf::from("."),
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// 读取必需变量，缺失时返回 [`MissingConfigError`]
    pub fn require(&self, name: &str) -> Result<&str, MissingConfigError> {
        self.get(name).ok_or_else(|| MissingConfigError::new(name))
    }

    /// 迭代所有变量，供分层配置源使用
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// 部署模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// 托管平台，TLS 在反向代理处终止
    Hosted,
    /// 本地开发
    Local,
}

impl DeploymentMode {
    /// 平台标记存在且 CI 标记不存在时为托管模式
    pub fn detect(env: &EnvSnapshot) -> Self {
        if env.contains(PLATFORM_MARKER) && !env.contains(CI_MARKER) {
            DeploymentMode::Hosted
        } else {
            DeploymentMode::Local
        }
    }

    pub fn is_hosted(self) -> bool {
        matches!(self, DeploymentMode::Hosted)
    }
}

impl std::fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentMode::Hosted => write!(f, "hosted"),
            DeploymentMode::Local => write!(f, "local"),
        }
    }
}
