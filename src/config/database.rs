// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use url::Url;

use crate::utils::errors::SettingsError;

/// 数据库连接字符串所在的环境变量
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// 连接最大存活时间（秒）所在的环境变量
pub const CONN_MAX_AGE_VAR: &str = "CONN_MAX_AGE";

/// 内存 SQLite 数据库名
pub const SQLITE_MEMORY: &str = ":memory:";

/// 数据库引擎
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseEngine {
    Postgres,
    MySql,
    Sqlite,
}

/// URL scheme 到引擎的查找表
const SCHEMES: &[(&str, DatabaseEngine)] = &[
    ("postgres", DatabaseEngine::Postgres),
    ("postgresql", DatabaseEngine::Postgres),
    ("pgsql", DatabaseEngine::Postgres),
    ("postgis", DatabaseEngine::Postgres),
    ("mysql", DatabaseEngine::MySql),
    ("mysql2", DatabaseEngine::MySql),
    ("sqlite", DatabaseEngine::Sqlite),
];

impl DatabaseEngine {
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        SCHEMES
            .iter()
            .find(|(name, _)| *name == scheme)
            .map(|(_, engine)| *engine)
    }

    fn url_scheme(self) -> &'static str {
        match self {
            DatabaseEngine::Postgres => "postgres",
            DatabaseEngine::MySql => "mysql",
            DatabaseEngine::Sqlite => "sqlite",
        }
    }
}

/// 连接层标志
///
/// 由解析器注入，与连接字符串本身无关
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionFlags {
    pub conn_health_checks: bool,
    pub disable_server_side_cursors: bool,
    pub ssl_require: bool,
    pub conn_max_age: u64,
}

/// 数据库配置设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseSettings {
    /// 数据库引擎
    pub engine: DatabaseEngine,
    /// 数据库名，SQLite 时为文件路径
    pub name: String,
    pub user: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// 透传给驱动的连接参数
    pub options: BTreeMap<String, String>,
    /// 每次取用连接前检查连接是否存活
    pub conn_health_checks: bool,
    /// 禁用服务端游标（适配事务级连接池）
    pub disable_server_side_cursors: bool,
    /// 连接最大存活时间（秒），0 表示每个请求后关闭
    pub conn_max_age: u64,
}

impl DatabaseSettings {
    /// 解析数据库连接字符串
    ///
    /// 查询参数会作为驱动参数保留；`ssl_require` 为真时追加 `sslmode=require`。
    pub fn parse(raw: &str, flags: ConnectionFlags) -> Result<Self, SettingsError> {
        // The authority of this form is not a valid host:port pair
        if raw == "sqlite://:memory:" {
            return Ok(Self::sqlite(SQLITE_MEMORY.to_string(), flags));
        }

        let url = Url::parse(raw)
            .map_err(|e| SettingsError::InvalidDatabaseUrl(format!("{e}")))?;

        let engine = DatabaseEngine::from_scheme(url.scheme()).ok_or_else(|| {
            SettingsError::InvalidDatabaseUrl(format!("unsupported scheme `{}`", url.scheme()))
        })?;

        let path = decode(url.path().strip_prefix('/').unwrap_or(url.path()))?;
        let name = if path.is_empty() && engine == DatabaseEngine::Sqlite {
            SQLITE_MEMORY.to_string()
        } else {
            path
        };

        let user = match url.username() {
            "" => None,
            user => Some(decode(user)?),
        };
        let password = url.password().map(decode).transpose()?;
        let host = match url.host_str() {
            None | Some("") => None,
            Some(host) => Some(decode(host)?),
        };

        let mut options: BTreeMap<String, String> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        if flags.ssl_require {
            options.insert("sslmode".to_string(), "require".to_string());
        }

        Ok(Self {
            engine,
            name,
            user,
            password,
            host,
            port: url.port(),
            options,
            conn_health_checks: flags.conn_health_checks,
            disable_server_side_cursors: flags.disable_server_side_cursors,
            conn_max_age: flags.conn_max_age,
        })
    }

    /// `DATABASE_URL` 未设置时使用的本地 SQLite 数据库
    pub fn local_default(base_dir: &Path, flags: ConnectionFlags) -> Self {
        Self::sqlite(
            base_dir.join("db.sqlite3").to_string_lossy().into_owned(),
            flags,
        )
    }

    fn sqlite(name: String, flags: ConnectionFlags) -> Self {
        let mut options = BTreeMap::new();
        if flags.ssl_require {
            options.insert("sslmode".to_string(), "require".to_string());
        }
        Self {
            engine: DatabaseEngine::Sqlite,
            name,
            user: None,
            password: None,
            host: None,
            port: None,
            options,
            conn_health_checks: flags.conn_health_checks,
            disable_server_side_cursors: flags.disable_server_side_cursors,
            conn_max_age: flags.conn_max_age,
        }
    }

    pub fn ssl_required(&self) -> bool {
        self.options.get("sslmode").map(String::as_str) == Some("require")
    }

    /// 生成驱动可用的连接 URL
    ///
    /// PostgreSQL 在禁用服务端游标时关闭语句缓存，MySQL 的 sslmode 改写为 `ssl-mode`。
    /// 以 `/` 开头的主机视为 Unix 套接字，通过查询参数传给驱动。
    pub fn connection_url(&self) -> String {
        if self.engine == DatabaseEngine::Sqlite {
            return if self.name == SQLITE_MEMORY {
                "sqlite::memory:".to_string()
            } else {
                let path: Vec<_> = self.name.split('/').map(urlencoding::encode).collect();
                format!("sqlite://{}?mode=rwc", path.join("/"))
            };
        }

        let mut url = format!("{}://", self.engine.url_scheme());
        if let Some(user) = &self.user {
            url.push_str(&urlencoding::encode(user));
            if let Some(password) = &self.password {
                url.push(':');
                url.push_str(&urlencoding::encode(password));
            }
            url.push('@');
        }
        let socket = self.host.as_deref().filter(|host| host.starts_with('/'));
        match (&self.host, socket) {
            // A socket directory cannot live in the authority
            (_, Some(_)) => url.push_str("localhost"),
            (Some(host), None) => url.push_str(host),
            (None, None) => {}
        }
        if let Some(port) = self.port {
            url.push_str(&format!(":{port}"));
        }
        url.push('/');
        url.push_str(&urlencoding::encode(&self.name));

        let mut query = url::form_urlencoded::Serializer::new(String::new());
        if let Some(socket) = socket {
            let key = match self.engine {
                DatabaseEngine::MySql => "socket",
                _ => "host",
            };
            query.append_pair(key, socket);
        }
        for (key, value) in &self.options {
            match (self.engine, key.as_str()) {
                (DatabaseEngine::MySql, "sslmode") => {
                    let mode = match value.as_str() {
                        "require" => "REQUIRED".to_string(),
                        other => other.to_uppercase(),
                    };
                    query.append_pair("ssl-mode", &mode);
                }
                _ => {
                    query.append_pair(key, value);
                }
            }
        }
        if self.engine == DatabaseEngine::Postgres && self.disable_server_side_cursors {
            query.append_pair("statement-cache-capacity", "0");
        }
        let query = query.finish();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        url
    }
}

fn decode(raw: &str) -> Result<String, SettingsError> {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .map_err(|e| SettingsError::InvalidDatabaseUrl(format!("{e}")))
}
