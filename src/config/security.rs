// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;

use crate::config::environment::DeploymentMode;

/// 托管模式下唯一允许的主机名
pub const API_HOST: &str = "api.yogayu.app";

/// HSTS 有效期：180 天
pub const HSTS_SECONDS: u64 = 15_552_000;

/// 宿主自身的调试默认值，托管模式不显式设置调试标志时生效
pub const HOST_DEFAULT_DEBUG: bool = false;

/// 可信的代理协议头
///
/// `meta_key` 使用 CGI 风格的名称，例如 `HTTP_X_FORWARDED_PROTO`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxySslHeader {
    pub meta_key: String,
    pub secure_value: String,
}

impl ProxySslHeader {
    /// 转换为 HTTP 头名称，`HTTP_X_FORWARDED_PROTO` -> `x-forwarded-proto`
    pub fn header_name(&self) -> String {
        self.meta_key
            .strip_prefix("HTTP_")
            .unwrap_or(&self.meta_key)
            .replace('_', "-")
            .to_ascii_lowercase()
    }
}

/// 托管模式安全字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostedSecurity {
    pub allowed_hosts: Vec<String>,
    pub csrf_cookie_secure: bool,
    pub hsts_include_subdomains: bool,
    pub hsts_preload: bool,
    pub hsts_seconds: u64,
    pub proxy_ssl_header: ProxySslHeader,
    pub ssl_redirect: bool,
    pub session_cookie_secure: bool,
}

impl HostedSecurity {
    /// 生成 `Strict-Transport-Security` 头的值
    pub fn hsts_header(&self) -> Option<String> {
        if self.hsts_seconds == 0 {
            return None;
        }
        let mut value = format!("max-age={}", self.hsts_seconds);
        if self.hsts_include_subdomains {
            value.push_str("; includeSubDomains");
        }
        if self.hsts_preload {
            value.push_str("; preload");
        }
        Some(value)
    }

    /// 主机名是否在允许列表中，端口会被忽略
    pub fn is_allowed_host(&self, host: &str) -> bool {
        self.validated_host(host).is_some()
    }

    /// 校验 `Host` 头并返回规范化后的 `host[:port]`
    ///
    /// 语法不合法或不在允许列表中时返回 `None`
    pub fn validated_host(&self, raw: &str) -> Option<String> {
        let (name, port) = split_host(raw)?;
        let name = name.trim_end_matches('.').to_ascii_lowercase();
        let allowed = self.allowed_hosts.iter().any(|allowed| {
            let allowed = allowed.to_ascii_lowercase();
            if allowed == "*" {
                true
            } else if let Some(suffix) = allowed.strip_prefix('.') {
                name == suffix || name.ends_with(&allowed)
            } else {
                name == allowed
            }
        });
        if !allowed {
            return None;
        }
        Some(match port {
            Some(port) => format!("{name}:{port}"),
            None => name,
        })
    }
}

/// 本地模式安全字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalSecurity {
    pub debug: bool,
}

/// 安全策略
///
/// 两个分支互斥且穷尽，由部署模式决定
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SecurityPolicy {
    Hosted(HostedSecurity),
    Local(LocalSecurity),
}

impl SecurityPolicy {
    pub fn for_mode(mode: DeploymentMode) -> Self {
        match mode {
            DeploymentMode::Hosted => SecurityPolicy::Hosted(HostedSecurity {
                allowed_hosts: vec![API_HOST.to_string()],
                csrf_cookie_secure: true,
                hsts_include_subdomains: true,
                hsts_preload: true,
                hsts_seconds: HSTS_SECONDS,
                proxy_ssl_header: ProxySslHeader {
                    meta_key: "HTTP_X_FORWARDED_PROTO".to_string(),
                    secure_value: "https".to_string(),
                },
                ssl_redirect: true,
                session_cookie_secure: true,
            }),
            DeploymentMode::Local => SecurityPolicy::Local(LocalSecurity { debug: true }),
        }
    }

    /// 本策略显式设置的调试标志；托管分支不设置
    pub fn debug(&self) -> Option<bool> {
        match self {
            SecurityPolicy::Hosted(_) => None,
            SecurityPolicy::Local(local) => Some(local.debug),
        }
    }

    pub fn hosted(&self) -> Option<&HostedSecurity> {
        match self {
            SecurityPolicy::Hosted(hosted) => Some(hosted),
            SecurityPolicy::Local(_) => None,
        }
    }
}

/// 把 `Host` 头拆分为主机名和端口
///
/// 主机名只允许字母、数字、`.` 和 `-`，IPv6 字面量必须带方括号，端口只允许数字。
pub fn split_host(raw: &str) -> Option<(&str, Option<&str>)> {
    let (name, port) = if let Some(rest) = raw.strip_prefix('[') {
        let (literal, tail) = rest.split_once(']')?;
        let valid = literal.contains(':')
            && literal
                .chars()
                .all(|c| c.is_ascii_hexdigit() || c == ':' || c == '.');
        if !valid {
            return None;
        }
        let port = match tail {
            "" => None,
            tail => Some(tail.strip_prefix(':')?),
        };
        (&raw[..literal.len() + 2], port)
    } else {
        let (name, port) = match raw.split_once(':') {
            Some((name, port)) => (name, Some(port)),
            None => (raw, None),
        };
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        if !valid {
            return None;
        }
        (name, port)
    };

    match port {
        Some(port) if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) => None,
        _ => Some((name, port)),
    }
}
