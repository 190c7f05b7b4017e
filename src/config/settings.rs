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

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize, Serializer};

use crate::config::components::{
    AuthenticationClass, Component, ContextProcessor, InstalledApp, MiddlewareStage,
    PermissionClass, SchemaClass, StorageBackend, TemplateBackend,
};
use crate::config::database::{
    ConnectionFlags, DatabaseSettings, CONN_MAX_AGE_VAR, DATABASE_URL_VAR,
};
use crate::config::environment::{DeploymentMode, EnvSnapshot};
use crate::config::security::{SecurityPolicy, API_HOST, HOST_DEFAULT_DEBUG};
use crate::utils::errors::SettingsError;

pub const SECRET_KEY_VAR: &str = "SECRET_KEY";
pub const STORAGE_BUCKET_VAR: &str = "AWS_STORAGE_BUCKET_NAME";
pub const STORAGE_REGION_VAR: &str = "AWS_S3_REGION_NAME";
pub const APP_ENVIRONMENT_VAR: &str = "APP_ENVIRONMENT";
pub const PORT_VAR: &str = "PORT";

/// 覆盖分层配置的环境变量前缀，例如 `YOGAYU__SERVER__HOST`
pub const ENV_PREFIX: &str = "YOGAYU";

/// API 版本路径段
pub const API_VERSION: &str = "v1alpha";

pub const ACCESS_TOKEN_LIFETIME: Duration = Duration::from_secs(60 * 60);
pub const REFRESH_TOKEN_LIFETIME: Duration = Duration::from_secs(365 * 24 * 60 * 60);

pub const INSTALLED_APPS: &[InstalledApp] = &[
    InstalledApp::Admin,
    InstalledApp::Auth,
    InstalledApp::ContentTypes,
    InstalledApp::Sessions,
    InstalledApp::Messages,
    InstalledApp::StaticFiles,
    InstalledApp::RestApi,
    InstalledApp::SchemaGenerator,
    InstalledApp::YogaLevels,
    InstalledApp::YogaPoses,
    InstalledApp::Users,
    InstalledApp::YogaHistories,
];

pub const MIDDLEWARE: &[MiddlewareStage] = &[
    MiddlewareStage::Security,
    MiddlewareStage::StaticFiles,
    MiddlewareStage::Session,
    MiddlewareStage::Common,
    MiddlewareStage::Csrf,
    MiddlewareStage::Authentication,
    MiddlewareStage::Messages,
    MiddlewareStage::Clickjacking,
];

const SCHEMA_DESCRIPTION: &str = "Yogayu REST API for Yogayu mobile app. Provides endpoints for \
managing yoga levels, yoga poses, users, and user yoga histories.";

/// 签名密钥
///
/// `Debug` 与序列化输出均被遮盖
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(********)")
    }
}

impl Serialize for SecretKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("********")
    }
}

/// 模板引擎配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSettings {
    pub backend: TemplateBackend,
    pub dirs: Vec<PathBuf>,
    /// 自动在各模块目录中查找模板
    pub app_dirs: bool,
    pub context_processors: Vec<ContextProcessor>,
}

/// 密码强度校验器及其参数
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum PasswordValidator {
    UserAttributeSimilarity {
        user_attributes: Vec<String>,
        max_similarity: f64,
    },
    MinimumLength {
        min_length: usize,
    },
    CommonPassword,
    NumericPassword,
}

/// 时区与国际化
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct I18nSettings {
    pub time_zone: String,
    pub use_i18n: bool,
    /// 以带时区的方式存储时间
    pub use_tz: bool,
}

/// 静态资源配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticFilesSettings {
    /// URL 前缀
    pub url: String,
    /// 收集后的静态文件目录
    pub root: PathBuf,
}

/// 对象存储目标
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectStorageSettings {
    pub bucket_name: String,
    pub region: String,
}

/// 具名存储后端
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageSettings {
    /// 默认（媒体）存储
    pub default: StorageBackend,
    /// 静态文件存储
    pub staticfiles: StorageBackend,
    /// 只保留带哈希的静态文件
    pub keep_only_hashed_files: bool,
}

/// REST 接口默认策略
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestFrameworkSettings {
    pub authentication_classes: Vec<AuthenticationClass>,
    pub permission_classes: Vec<PermissionClass>,
    pub schema_class: SchemaClass,
}

/// 令牌有效期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaServer {
    pub url: String,
}

/// API 文档生成配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaSettings {
    pub title: String,
    pub description: String,
    pub version: Option<String>,
    pub servers: Vec<SchemaServer>,
    pub schema_path_prefix: String,
    /// 生成文档时去掉路径前缀
    pub schema_path_prefix_trim: bool,
    /// 请求与响应使用不同的组件
    pub component_split_request: bool,
    /// 文档中是否包含 schema 端点自身
    pub serve_include_schema: bool,
}

impl SchemaSettings {
    fn standard() -> Self {
        Self {
            title: "Yogayu API".to_string(),
            description: SCHEMA_DESCRIPTION.to_string(),
            version: None,
            servers: vec![SchemaServer {
                url: server_url(API_HOST, API_VERSION),
            }],
            schema_path_prefix: format!("/{API_VERSION}"),
            schema_path_prefix_trim: true,
            component_split_request: true,
            serve_include_schema: false,
        }
    }
}

/// 服务器配置设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 可由配置文件和 `YOGAYU__` 变量覆盖的部分
#[derive(Debug, Deserialize)]
struct LayeredSettings {
    server: ServerSettings,
    storages: StorageNames,
}

#[derive(Debug, Deserialize)]
struct StorageNames {
    default: String,
    staticfiles: String,
    keep_only_hashed_files: bool,
}

/// 应用程序配置
///
/// 启动时构建一次，之后只读，通过 `Arc<Settings>` 注入到需要的组件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// 部署模式
    pub mode: DeploymentMode,
    /// 项目根目录
    pub base_dir: PathBuf,
    /// 签名密钥
    pub secret_key: SecretKey,
    /// 安全策略
    pub security: SecurityPolicy,
    /// 已安装模块，顺序固定
    pub installed_apps: Vec<InstalledApp>,
    /// 请求处理管线，顺序固定
    pub middleware: Vec<MiddlewareStage>,
    /// 模板配置
    pub templates: TemplateSettings,
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 用户模型引用
    pub auth_user_model: String,
    /// 密码校验器，顺序固定
    pub password_validators: Vec<PasswordValidator>,
    /// 时区配置
    pub i18n: I18nSettings,
    /// 静态资源配置
    pub static_files: StaticFilesSettings,
    /// 对象存储配置
    pub object_storage: ObjectStorageSettings,
    /// 存储后端
    pub storages: StorageSettings,
    /// REST 接口配置
    pub rest_framework: RestFrameworkSettings,
    /// 令牌有效期
    pub tokens: TokenLifetimes,
    /// 文档配置
    pub schema: SchemaSettings,
    /// 服务器配置
    pub server: ServerSettings,
}

impl Settings {
    /// 从环境快照解析配置
    ///
    /// 同一快照总是得到相同的结果，不做网络或文件写入
    pub fn resolve(env: &EnvSnapshot) -> Result<Self, SettingsError> {
        let secret_key = SecretKey(env.require(SECRET_KEY_VAR)?.to_string());
        let mode = DeploymentMode::detect(env);
        let object_storage = ObjectStorageSettings {
            bucket_name: env.require(STORAGE_BUCKET_VAR)?.to_string(),
            region: env.require(STORAGE_REGION_VAR)?.to_string(),
        };
        let database = resolve_database(env, mode)?;
        let layered = load_layered(env)?;
        let base_dir = env.base_dir().to_path_buf();

        Ok(Self {
            mode,
            secret_key,
            security: SecurityPolicy::for_mode(mode),
            installed_apps: INSTALLED_APPS.to_vec(),
            middleware: MIDDLEWARE.to_vec(),
            templates: TemplateSettings {
                backend: TemplateBackend::Standard,
                dirs: Vec::new(),
                app_dirs: true,
                context_processors: vec![
                    ContextProcessor::Debug,
                    ContextProcessor::Request,
                    ContextProcessor::Auth,
                    ContextProcessor::Messages,
                ],
            },
            database,
            auth_user_model: "users.User".to_string(),
            password_validators: vec![
                PasswordValidator::UserAttributeSimilarity {
                    user_attributes: vec!["email".to_string(), "name".to_string()],
                    max_similarity: 0.7,
                },
                PasswordValidator::MinimumLength { min_length: 8 },
                PasswordValidator::CommonPassword,
                PasswordValidator::NumericPassword,
            ],
            i18n: I18nSettings {
                time_zone: "UTC".to_string(),
                use_i18n: false,
                use_tz: true,
            },
            static_files: StaticFilesSettings {
                url: "static/".to_string(),
                root: base_dir.join("staticfiles"),
            },
            object_storage,
            storages: StorageSettings {
                default: StorageBackend::from_name(&layered.storages.default)?,
                staticfiles: StorageBackend::from_name(&layered.storages.staticfiles)?,
                keep_only_hashed_files: layered.storages.keep_only_hashed_files,
            },
            rest_framework: RestFrameworkSettings {
                authentication_classes: vec![AuthenticationClass::Jwt],
                permission_classes: vec![PermissionClass::IsAuthenticated],
                schema_class: SchemaClass::Auto,
            },
            tokens: TokenLifetimes {
                access: ACCESS_TOKEN_LIFETIME,
                refresh: REFRESH_TOKEN_LIFETIME,
            },
            schema: SchemaSettings::standard(),
            server: layered.server,
            base_dir,
        })
    }

    /// 实际生效的调试开关
    ///
    /// 托管模式不设置调试标志，此时使用宿主默认值
    pub fn debug_enabled(&self) -> bool {
        self.security.debug().unwrap_or(HOST_DEFAULT_DEBUG)
    }

    /// API 路径前缀，例如 `/v1alpha`
    pub fn api_prefix(&self) -> &str {
        &self.schema.schema_path_prefix
    }
}

/// 拼接文档中的服务器地址
pub fn server_url(host: &str, version: &str) -> String {
    format!("https://{host}/{version}")
}

fn resolve_database(env: &EnvSnapshot, mode: DeploymentMode) -> Result<DatabaseSettings, SettingsError> {
    let conn_max_age = match env.get(CONN_MAX_AGE_VAR) {
        Some(raw) => raw.parse::<u64>().map_err(|e| SettingsError::InvalidValue {
            variable: CONN_MAX_AGE_VAR.to_string(),
            reason: e.to_string(),
        })?,
        None => 0,
    };
    let flags = ConnectionFlags {
        conn_health_checks: true,
        disable_server_side_cursors: true,
        ssl_require: mode.is_hosted(),
        conn_max_age,
    };

    match env.get(DATABASE_URL_VAR) {
        Some(url) => DatabaseSettings::parse(url, flags),
        None => Ok(DatabaseSettings::local_default(env.base_dir(), flags)),
    }
}

fn load_layered(env: &EnvSnapshot) -> Result<LayeredSettings, SettingsError> {
    let app_env = env.get(APP_ENVIRONMENT_VAR).unwrap_or("default");
    let config_dir = env.base_dir().join("config");
    let vars: config::Map<String, String> = env
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let builder = Config::builder()
        // Start with default settings
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("storages.default", StorageBackend::S3.name())?
        .set_default(
            "storages.staticfiles",
            StorageBackend::CompressedManifest.name(),
        )?
        .set_default("storages.keep_only_hashed_files", true)?
        .add_source(File::with_name(&config_dir.join("default").to_string_lossy()).required(false))
        .add_source(File::with_name(&config_dir.join(app_env).to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(Some(vars)),
        )
        // The platform assigns the listening port
        .set_override_option("server.port", env.get(PORT_VAR).map(str::to_string))?;

    Ok(builder.build()?.try_deserialize()?)
}
